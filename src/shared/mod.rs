pub mod instance;
pub mod utils;

pub use utils::*;
