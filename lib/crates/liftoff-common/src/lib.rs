pub mod codes;
pub mod types;

pub use types::*;
