use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::activity::{Activity, ActivityId, Comment};
use crate::domain::user::AppUser;

use super::{Change, ContextFactory, DataContext};

// ============================================================================
// In-Memory Store
// ============================================================================
//
// Keeps activities (with their comments) and users behind one mutex.
// `write_changes` checks staged changes against a copy; `commit` applies them
// all or none.
//
// ============================================================================

#[derive(Debug, Default)]
struct State {
    activities: HashMap<ActivityId, Activity>,
    users: HashMap<String, AppUser>,
    commits: u64,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_user(&self, user: AppUser) {
        let mut state = self.state.lock().await;
        state.users.insert(user.username.clone(), user);
    }

    pub async fn seed_activity(&self, activity: Activity) {
        let mut state = self.state.lock().await;
        state.activities.insert(activity.id, activity);
    }

    pub async fn activity(&self, id: ActivityId) -> Option<Activity> {
        self.state.lock().await.activities.get(&id).cloned()
    }

    /// Number of `commit` calls that reached the store.
    pub async fn commit_count(&self) -> u64 {
        self.state.lock().await.commits
    }
}

#[async_trait]
impl ContextFactory for InMemoryStore {
    async fn open(&self) -> Result<Box<dyn DataContext>> {
        Ok(Box::new(InMemoryContext {
            state: Arc::clone(&self.state),
            pending: Vec::new(),
        }))
    }
}

struct InMemoryContext {
    state: Arc<Mutex<State>>,
    pending: Vec<Change>,
}

/// Applies `pending` to `activities`. Stops at the first violation.
fn apply(pending: &[Change], users: &HashMap<String, AppUser>, activities: &mut HashMap<ActivityId, Activity>) -> Result<u64> {
    let mut affected = 0u64;

    for change in pending {
        match change {
            Change::InsertActivity(activity) => {
                if activities.contains_key(&activity.id) {
                    bail!("duplicate key: activity {} already exists", activity.id);
                }
                activities.insert(activity.id, activity.clone());
                affected += 1;
            }
            Change::UpdateActivity(activity) => {
                let Some(stored) = activities.get_mut(&activity.id) else {
                    bail!("update target missing: activity {}", activity.id);
                };
                if stored.input() != activity.input() || stored.is_cancelled != activity.is_cancelled {
                    stored.apply(activity.input());
                    stored.is_cancelled = activity.is_cancelled;
                    affected += 1;
                }
            }
            Change::InsertComment(comment) => {
                if !users.contains_key(&comment.author.username) {
                    bail!("foreign key violation: author {} missing", comment.author.username);
                }
                let Some(parent) = activities.get_mut(&comment.activity_id) else {
                    bail!("foreign key violation: activity {} missing", comment.activity_id);
                };
                parent.comments.push(comment.clone());
                affected += 1;
            }
        }
    }

    Ok(affected)
}

#[async_trait]
impl DataContext for InMemoryContext {
    async fn find_activity(&mut self, id: ActivityId) -> Result<Option<Activity>> {
        let state = self.state.lock().await;
        Ok(state.activities.get(&id).map(|activity| Activity {
            comments: Vec::new(),
            ..activity.clone()
        }))
    }

    async fn find_activity_with_comments(&mut self, id: ActivityId) -> Result<Option<Activity>> {
        Ok(self.state.lock().await.activities.get(&id).cloned())
    }

    async fn find_user_with_photos(&mut self, username: &str) -> Result<Option<AppUser>> {
        Ok(self.state.lock().await.users.get(username).cloned())
    }

    fn add_activity(&mut self, activity: &Activity) {
        self.pending.push(Change::InsertActivity(activity.clone()));
    }

    fn update_activity(&mut self, activity: &Activity) {
        self.pending.push(Change::UpdateActivity(activity.clone()));
    }

    fn stage_comment(&mut self, comment: &Comment) {
        self.pending.push(Change::InsertComment(comment.clone()));
    }

    async fn write_changes(&mut self) -> Result<u64> {
        // Dry run against a copy; nothing is visible until commit.
        let state = self.state.lock().await;
        let mut activities = state.activities.clone();
        apply(&self.pending, &state.users, &mut activities)
    }

    async fn commit(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        let mut state = self.state.lock().await;
        state.commits += 1;

        let mut activities = state.activities.clone();
        let affected = apply(&pending, &state.users, &mut activities)?;
        state.activities = activities;

        tracing::debug!(affected, "In-memory changes committed");
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
