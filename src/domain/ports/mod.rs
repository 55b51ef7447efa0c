pub mod task_spawner;
pub mod time_service;

pub use task_spawner::TaskSpawner;
pub use time_service::TimeService;
