#![allow(unused_imports)]
pub mod fixtures;
pub mod mock_panel;

pub use fixtures::*;
pub use mock_panel::*;
