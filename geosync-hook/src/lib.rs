//! Webhook trigger: verify a signed push notification, refresh the local
//! checkout, then sync every matching package in it.

pub mod checkout;
pub mod config;
mod error;
pub mod gateway;
pub mod signature;

pub use checkout::{Checkout, GitCheckout};
pub use config::HookConfig;
pub use error::HookError;
pub use gateway::{Gateway, HookOutcome, HookResponse, HookState, SyncRunner};
