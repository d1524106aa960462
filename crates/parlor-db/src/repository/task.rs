//! # Task Repository
//!
//! Database operations for claimable staff tasks.
//!
//! Claiming is the textbook conditional update: `assigned_to` moves from
//! NULL to the claimer in one statement, permitted only from NULL. Two
//! concurrent claims produce one winner; the loser learns it lost from
//! `rows_affected() == 0`, never from a stale read.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use parlor_core::Task;

/// Outcome of a claim attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskClaim {
    /// The claim won; the task now belongs to the claimer.
    Claimed(Task),
    /// Someone else owns the task.
    AlreadyClaimed,
    /// No task with that id exists.
    NotFound,
}

/// Repository for task database operations.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    /// Creates a new TaskRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TaskRepository { pool }
    }

    /// Inserts a task.
    pub async fn insert(&self, task: &Task) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, notes, created_by, assigned_to, claimed_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.notes)
        .bind(&task.created_by)
        .bind(&task.assigned_to)
        .bind(task.claimed_at)
        .bind(task.created_at)
        .execute(&self.pool)
        .await?;

        debug!(task_id = %task.id, title = %task.title, "Inserted task");
        Ok(())
    }

    /// Gets a task by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Task> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("task", id))
    }

    /// Transfers ownership of an unclaimed task to the claimer.
    pub async fn claim(
        &self,
        id: &str,
        claimer_id: &str,
        now: DateTime<Utc>,
    ) -> DbResult<TaskClaim> {
        let result = sqlx::query(
            "UPDATE tasks SET assigned_to = ?, claimed_at = ? WHERE id = ? AND assigned_to IS NULL",
        )
        .bind(claimer_id)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            let task = self.get_by_id(id).await?;
            debug!(task_id = %id, claimer_id = %claimer_id, "Task claimed");
            return Ok(TaskClaim::Claimed(task));
        }

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(if exists.is_some() {
            TaskClaim::AlreadyClaimed
        } else {
            TaskClaim::NotFound
        })
    }

    /// Lists unclaimed tasks, oldest first.
    pub async fn list_unclaimed(&self) -> DbResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE assigned_to IS NULL ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }
}
