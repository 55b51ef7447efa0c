pub mod identity;
pub mod json_string;

pub use identity::*;
