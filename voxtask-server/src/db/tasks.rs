//! Task table operations
//!
//! Every mutation runs as one statement or one transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use voxtask_common::{Error, Result};

use crate::models::{group_by_date, NewTasks, Task, TaskGroup, TaskPatch};

/// All tasks, unordered
pub async fn list_tasks(db: &SqlitePool) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>("SELECT id, content, date, done FROM tasks")
        .fetch_all(db)
        .await?;

    Ok(tasks)
}

/// All tasks grouped by date, in display order (see [`group_by_date`])
pub async fn list_task_groups(db: &SqlitePool) -> Result<Vec<TaskGroup>> {
    Ok(group_by_date(list_tasks(db).await?))
}

/// Insert a batch of tasks under one date
///
/// All rows are inserted in a single transaction; either every content
/// becomes a task or none does. Returned tasks keep the input order.
pub async fn create_tasks(db: &SqlitePool, new_tasks: &NewTasks) -> Result<Vec<Task>> {
    let created_at = Utc::now().to_rfc3339();
    let mut tx = db.begin().await?;
    let mut created = Vec::with_capacity(new_tasks.contents.len());

    for content in &new_tasks.contents {
        let id = sqlx::query(
            "INSERT INTO tasks (content, date, done, created_at) VALUES (?, ?, 0, ?)",
        )
        .bind(content)
        .bind(&new_tasks.date)
        .bind(&created_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        created.push(Task {
            id,
            content: content.clone(),
            date: new_tasks.date.clone(),
            done: false,
        });
    }

    tx.commit().await?;

    tracing::debug!(date = %new_tasks.date, count = created.len(), "Tasks created");

    Ok(created)
}

/// Apply a partial update
///
/// Fields absent from `patch` keep their value. `date` is never touched.
/// An unknown id returns [`Error::NotFound`] and creates nothing.
pub async fn update_task(db: &SqlitePool, id: i64, patch: &TaskPatch) -> Result<Task> {
    let mut tx = db.begin().await?;

    let result = sqlx::query(
        "UPDATE tasks SET done = COALESCE(?, done), content = COALESCE(?, content) WHERE id = ?",
    )
    .bind(patch.done)
    .bind(patch.content.as_deref())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Task {} not found", id)));
    }

    let task = sqlx::query_as::<_, Task>("SELECT id, content, date, done FROM tasks WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(task)
}

/// Delete a task
pub async fn delete_task(db: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Task {} not found", id)));
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Setup a file-backed test database with the production schema
    async fn setup_test_db() -> (TempDir, SqlitePool) {
        let temp_dir = TempDir::new().unwrap();
        let pool = crate::db::init_database_pool(&temp_dir.path().join("test.db"))
            .await
            .unwrap();
        (temp_dir, pool)
    }

    fn batch(date: &str, contents: &[&str]) -> NewTasks {
        NewTasks {
            date: date.to_string(),
            contents: contents.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_unique_increasing_ids() {
        let (_dir, pool) = setup_test_db().await;

        let created = create_tasks(&pool, &batch("2025-06-01", &["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(created.len(), 3);
        assert!(created.windows(2).all(|w| w[0].id < w[1].id));
        assert!(created.iter().all(|t| !t.done && t.date == "2025-06-01"));
        assert_eq!(
            created.iter().map(|t| t.content.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let (_dir, pool) = setup_test_db().await;

        let first = create_tasks(&pool, &batch("2025-06-01", &["a"])).await.unwrap();
        delete_task(&pool, first[0].id).await.unwrap();

        let second = create_tasks(&pool, &batch("2025-06-01", &["b"])).await.unwrap();
        assert!(second[0].id > first[0].id);
    }

    #[tokio::test]
    async fn test_list_groups_in_display_order() {
        let (_dir, pool) = setup_test_db().await;

        let old = create_tasks(&pool, &batch("2025-06-01", &["old"])).await.unwrap();
        let new = create_tasks(&pool, &batch("2025-06-02", &["x", "y"])).await.unwrap();

        update_task(
            &pool,
            new[0].id,
            &TaskPatch {
                done: Some(true),
                content: None,
            },
        )
        .await
        .unwrap();

        let groups = list_task_groups(&pool).await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, "2025-06-02");
        assert_eq!(
            groups[0].tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![new[1].id, new[0].id]
        );
        assert_eq!(groups[1].date, "2025-06-01");
        assert_eq!(groups[1].tasks[0].id, old[0].id);
    }

    #[tokio::test]
    async fn test_update_fields_independently() {
        let (_dir, pool) = setup_test_db().await;
        let created = create_tasks(&pool, &batch("2025-06-01", &["draft"])).await.unwrap();
        let id = created[0].id;

        let done = update_task(
            &pool,
            id,
            &TaskPatch {
                done: Some(true),
                content: None,
            },
        )
        .await
        .unwrap();
        assert!(done.done);
        assert_eq!(done.content, "draft");

        let renamed = update_task(
            &pool,
            id,
            &TaskPatch {
                done: None,
                content: Some("final".into()),
            },
        )
        .await
        .unwrap();
        assert!(renamed.done);
        assert_eq!(renamed.content, "final");
        assert_eq!(renamed.date, "2025-06-01");

        let unchanged = update_task(&pool, id, &TaskPatch::default()).await.unwrap();
        assert_eq!(unchanged, renamed);
    }

    #[tokio::test]
    async fn test_update_unknown_id_creates_nothing() {
        let (_dir, pool) = setup_test_db().await;

        let result = update_task(
            &pool,
            42,
            &TaskPatch {
                done: Some(true),
                content: Some("ghost".into()),
            },
        )
        .await;

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(list_tasks(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let (_dir, pool) = setup_test_db().await;
        let created = create_tasks(&pool, &batch("2025-06-01", &["a"])).await.unwrap();
        let id = created[0].id;

        delete_task(&pool, id).await.unwrap();
        assert!(list_tasks(&pool).await.unwrap().iter().all(|t| t.id != id));
        assert!(matches!(delete_task(&pool, id).await, Err(Error::NotFound(_))));
    }
}
