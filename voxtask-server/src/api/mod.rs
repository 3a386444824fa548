//! HTTP API handlers for voxtask-server

pub mod health;
pub mod tasks;
pub mod upload;
pub mod webhook;

pub use health::health_routes;
pub use tasks::task_routes;
pub use upload::upload_routes;
pub use webhook::webhook_routes;
