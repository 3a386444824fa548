//! Data models for voxtask-server

pub mod task;

pub use task::{group_by_date, CreateTasksRequest, NewTasks, Task, TaskGroup, TaskPatch};
