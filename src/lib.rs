pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod shared;

pub use api::*;
pub use config::*;
pub use domain::*;
pub use infrastructure::http::XuiClient;
pub use models::*;
pub use services::*;
