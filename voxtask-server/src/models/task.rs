//! Task records and request payloads

use serde::{Deserialize, Serialize};
use voxtask_common::{Error, Result};

/// A single to-do item
///
/// `id` is assigned by the store and never reused. `date` is the grouping
/// key and is never changed after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub content: String,
    pub date: String,
    pub done: bool,
}

/// Tasks sharing one `date`, as returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGroup {
    pub date: String,
    pub tasks: Vec<Task>,
}

/// POST /api/tasks body
///
/// Both fields are optional at the serde level so that a missing field is
/// reported as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTasksRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub tasks: Option<Vec<String>>,
}

/// Validated batch of new tasks under one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTasks {
    pub date: String,
    pub contents: Vec<String>,
}

impl CreateTasksRequest {
    pub fn validate(self) -> Result<NewTasks> {
        let date = self
            .date
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| Error::InvalidInput("'date' is required".to_string()))?;

        let contents = self
            .tasks
            .ok_or_else(|| Error::InvalidInput("'tasks' is required".to_string()))?;

        if contents.is_empty() {
            return Err(Error::InvalidInput(
                "'tasks' must contain at least one entry".to_string(),
            ));
        }
        if let Some(pos) = contents.iter().position(|c| c.trim().is_empty()) {
            return Err(Error::InvalidInput(format!("tasks[{}] is empty", pos)));
        }

        Ok(NewTasks { date, contents })
    }
}

/// PUT /api/tasks/{id} body; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub content: Option<String>,
}

impl TaskPatch {
    pub fn validate(self) -> Result<Self> {
        if matches!(&self.content, Some(c) if c.trim().is_empty()) {
            return Err(Error::InvalidInput("'content' must not be empty".to_string()));
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_none() && self.content.is_none()
    }
}

/// Group tasks by date
///
/// Dates descending; inside a date pending tasks come before completed ones,
/// then ascending id.
pub fn group_by_date(mut tasks: Vec<Task>) -> Vec<TaskGroup> {
    tasks.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(a.done.cmp(&b.done))
            .then(a.id.cmp(&b.id))
    });

    let mut groups: Vec<TaskGroup> = Vec::new();
    for task in tasks {
        match groups.last_mut() {
            Some(group) if group.date == task.date => group.tasks.push(task),
            _ => groups.push(TaskGroup {
                date: task.date.clone(),
                tasks: vec![task],
            }),
        }
    }
    groups
}
