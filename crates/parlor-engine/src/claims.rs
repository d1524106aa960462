//! # Task Engine
//!
//! Staff work items claimable by exactly one person. The claim is the
//! same compare-and-set idiom as slot capacity: a conditional update
//! permitted only from the unassigned state, so two concurrent claims
//! produce exactly one owner.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use parlor_core::validation::{validate_title, validate_uuid};
use parlor_core::{CoreError, Identity, Role, Task};
use parlor_db::repository::task::TaskClaim;
use parlor_db::{Database, DbError};

use crate::error::EngineResult;

// =============================================================================
// Requests
// =============================================================================

/// Parameters for creating a task.
#[derive(Debug, Clone)]
pub struct CreateTaskRequest {
    /// What needs doing.
    pub title: String,
    /// Optional detail.
    pub notes: Option<String>,
}

// =============================================================================
// Task Engine
// =============================================================================

/// Task creation and claiming.
pub struct TaskEngine {
    db: Arc<Database>,
}

impl TaskEngine {
    /// Creates a task engine over the given database.
    pub fn new(db: Arc<Database>) -> Self {
        TaskEngine { db }
    }

    /// Creates an unassigned task. Admin only.
    pub async fn create_task(&self, caller: &Identity, req: CreateTaskRequest) -> EngineResult<Task> {
        caller.require(Role::Admin)?;
        validate_title(&req.title)?;
        self.db.profiles().ensure_exists(&caller.id, caller.role).await?;

        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: req.title.trim().to_string(),
            notes: req.notes,
            created_by: caller.id.clone(),
            assigned_to: None,
            claimed_at: None,
            created_at: Utc::now(),
        };
        self.db.tasks().insert(&task).await?;
        info!(task_id = %task.id, title = %task.title, "task created");
        Ok(task)
    }

    /// Claims an unassigned task for the caller.
    ///
    /// Ownership transfers only from the unassigned state; losing the
    /// race is a definitive [`CoreError::AlreadyClaimed`].
    pub async fn claim(&self, caller: &Identity, task_id: &str) -> EngineResult<Task> {
        caller.require(Role::Member)?;
        validate_uuid(task_id)?;
        self.db.profiles().ensure_exists(&caller.id, caller.role).await?;

        match self.db.tasks().claim(task_id, &caller.id, Utc::now()).await? {
            TaskClaim::Claimed(task) => {
                info!(task_id, claimer_id = %caller.id, "task claimed");
                Ok(task)
            }
            TaskClaim::AlreadyClaimed => {
                debug!(task_id, claimer_id = %caller.id, "claim lost, task already owned");
                Err(CoreError::AlreadyClaimed {
                    task_id: task_id.to_string(),
                }
                .into())
            }
            TaskClaim::NotFound => Err(DbError::not_found("task", task_id).into()),
        }
    }

    /// Lists tasks still waiting for an owner, oldest first.
    pub async fn list_unclaimed(&self) -> EngineResult<Vec<Task>> {
        Ok(self.db.tasks().list_unclaimed().await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_core::ErrorClass;
    use parlor_db::DbConfig;

    use crate::error::EngineError;

    async fn test_db() -> Arc<Database> {
        Arc::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    fn admin() -> Identity {
        Identity::new("admin-1", Role::Admin)
    }

    #[tokio::test]
    async fn test_create_requires_admin_and_title() {
        let db = test_db().await;
        let engine = TaskEngine::new(db);

        let member = Identity::new("member-1", Role::Member);
        let err = engine
            .create_task(
                &member,
                CreateTaskRequest {
                    title: "Restock ink".to_string(),
                    notes: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Forbidden);

        let err = engine
            .create_task(
                &admin(),
                CreateTaskRequest {
                    title: "   ".to_string(),
                    notes: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);

        let task = engine
            .create_task(
                &admin(),
                CreateTaskRequest {
                    title: "  Restock ink  ".to_string(),
                    notes: Some("black and grey wash".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(task.title, "Restock ink");
        assert!(!task.is_claimed());
    }

    #[tokio::test]
    async fn test_concurrent_claims_one_owner() {
        let db = test_db().await;
        let engine = Arc::new(TaskEngine::new(db));
        let task = engine
            .create_task(
                &admin(),
                CreateTaskRequest {
                    title: "Clean station 2".to_string(),
                    notes: None,
                },
            )
            .await
            .unwrap();

        let alice = Identity::new("44444444-4444-4444-4444-444444444444", Role::Member);
        let bala = Identity::new("55555555-5555-5555-5555-555555555555", Role::Member);
        let (first, second) = tokio::join!(
            engine.claim(&alice, &task.id),
            engine.claim(&bala, &task.id),
        );

        let results = [first, second];
        let winners: Vec<_> = results.iter().filter(|r| r.is_ok()).collect();
        assert_eq!(winners.len(), 1);
        let winner = winners[0].as_ref().unwrap();
        assert!(winner.assigned_to.is_some());
        assert!(winner.claimed_at.is_some());

        let loser = results.iter().find(|r| r.is_err()).unwrap();
        assert!(matches!(
            loser.as_ref().unwrap_err(),
            EngineError::Core(CoreError::AlreadyClaimed { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_unclaimed_drops_claimed() {
        let db = test_db().await;
        let engine = TaskEngine::new(db);
        let open = engine
            .create_task(
                &admin(),
                CreateTaskRequest {
                    title: "Order needles".to_string(),
                    notes: None,
                },
            )
            .await
            .unwrap();
        let taken = engine
            .create_task(
                &admin(),
                CreateTaskRequest {
                    title: "Sterilize grips".to_string(),
                    notes: None,
                },
            )
            .await
            .unwrap();

        let claimer = Identity::new("44444444-4444-4444-4444-444444444444", Role::Member);
        engine.claim(&claimer, &taken.id).await.unwrap();

        let unclaimed = engine.list_unclaimed().await.unwrap();
        assert_eq!(unclaimed.len(), 1);
        assert_eq!(unclaimed[0].id, open.id);
    }
}
