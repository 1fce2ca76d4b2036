pub mod lifecycle_service;
pub mod material_service;
pub mod scheduler;
pub mod session;
pub mod stats_service;
pub mod status_reporter;
