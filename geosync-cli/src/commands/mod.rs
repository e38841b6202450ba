pub mod hook;
pub mod layers;
pub mod sync;
