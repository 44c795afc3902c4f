// ============================================================================
// Persistence Ports - Data Context / Unit of Work
// ============================================================================
//
// Handlers never see tables. They open a `DataContext` per invocation, read
// what they need, stage changes and persist them with `save_changes`.
// A context is used by one invocation at a time; dropping it before `commit`
// discards everything staged or written.
//
// Adapters:
// - memory:   in-process store (tests, demo runs)
// - postgres: sqlx-backed store, one transaction per context
//
// ============================================================================

use anyhow::Result;
use async_trait::async_trait;

use crate::core::{CancellationSignal, Cancelled};
use crate::domain::activity::{Activity, ActivityId, Comment};
use crate::domain::user::AppUser;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Per-invocation session over the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataContext: Send {
    /// Load an activity's own fields. `comments` is left empty.
    async fn find_activity(&mut self, id: ActivityId) -> Result<Option<Activity>>;

    /// Load an activity with its comments and their authors.
    async fn find_activity_with_comments(&mut self, id: ActivityId) -> Result<Option<Activity>>;

    /// Load the single user with this username, photos included.
    async fn find_user_with_photos(&mut self, username: &str) -> Result<Option<AppUser>>;

    /// Stage a new activity row.
    fn add_activity(&mut self, activity: &Activity);

    /// Stage an update of the activity's own fields.
    fn update_activity(&mut self, activity: &Activity);

    /// Stage a new comment row.
    fn stage_comment(&mut self, comment: &Comment);

    /// Write everything staged without making it visible. Returns affected rows.
    async fn write_changes(&mut self) -> Result<u64>;

    /// Make written changes visible in one atomic step.
    async fn commit(&mut self) -> Result<()>;
}

/// Write staged changes, then commit them.
///
/// Cancellation is honoured until the writes finish. `commit` always runs to
/// completion once started.
pub async fn save_changes(context: &mut dyn DataContext, cancel: &CancellationSignal) -> Result<u64> {
    cancel.check()?;

    let affected = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Cancelled.into()),
        affected = context.write_changes() => affected?,
    };

    context.commit().await?;
    Ok(affected)
}

/// Opens data contexts. Shared across invocations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContextFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn DataContext>>;
}

/// Pending write held by a context until it is written.
#[derive(Debug, Clone)]
pub(crate) enum Change {
    InsertActivity(Activity),
    UpdateActivity(Activity),
    InsertComment(Comment),
}
