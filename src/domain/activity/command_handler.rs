use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::{CancellationSignal, Outcome, RequestHandler};
use crate::persistence::{save_changes, ContextFactory};

use super::aggregate::Activity;
use super::commands::{ActivityDetails, CreateActivity, EditActivity};

// ============================================================================
// Activity Command Handlers
// ============================================================================
//
// Create:  Command → Activity::new → add_activity → save_changes
// Edit:    Command → find → apply → update_activity → save_changes
// Details: Query → find with comments
//
// A commit that touches no rows is reported as a failure. Editing an
// activity without changing any field therefore fails as well.
//
// ============================================================================

pub const ACTIVITY_NOT_FOUND: &str = "Activity not found";
pub const CREATE_FAILED: &str = "Failed to create activity";
pub const UPDATE_FAILED: &str = "Failed to update the activity";

pub struct CreateActivityHandler {
    contexts: Arc<dyn ContextFactory>,
}

impl CreateActivityHandler {
    pub fn new(contexts: Arc<dyn ContextFactory>) -> Self {
        Self { contexts }
    }
}

#[async_trait]
impl RequestHandler<CreateActivity> for CreateActivityHandler {
    async fn handle(&self, command: CreateActivity, cancel: &CancellationSignal) -> Result<Outcome<()>> {
        let mut context = self.contexts.open().await?;
        cancel.check()?;

        let activity = Activity::new(command.id, command.activity);
        context.add_activity(&activity);

        if save_changes(context.as_mut(), cancel).await? == 0 {
            tracing::error!(activity_id = %activity.id, "Activity insert affected no rows");
            return Ok(Outcome::failure(CREATE_FAILED));
        }

        tracing::info!(activity_id = %activity.id, title = %activity.title, "Activity created");
        Ok(Outcome::success(()))
    }
}

pub struct EditActivityHandler {
    contexts: Arc<dyn ContextFactory>,
}

impl EditActivityHandler {
    pub fn new(contexts: Arc<dyn ContextFactory>) -> Self {
        Self { contexts }
    }
}

#[async_trait]
impl RequestHandler<EditActivity> for EditActivityHandler {
    async fn handle(&self, command: EditActivity, cancel: &CancellationSignal) -> Result<Outcome<()>> {
        let mut context = self.contexts.open().await?;

        let Some(mut activity) = context.find_activity(command.id).await? else {
            tracing::warn!(activity_id = %command.id, "Activity not found, nothing to edit");
            return Ok(Outcome::not_found(ACTIVITY_NOT_FOUND));
        };
        cancel.check()?;

        let changed = activity.apply(command.activity);
        tracing::debug!(activity_id = %activity.id, changed, "Activity fields applied");
        context.update_activity(&activity);

        if save_changes(context.as_mut(), cancel).await? == 0 {
            tracing::warn!(activity_id = %activity.id, "Activity update affected no rows");
            return Ok(Outcome::failure(UPDATE_FAILED));
        }

        tracing::info!(activity_id = %activity.id, "Activity updated");
        Ok(Outcome::success(()))
    }
}

pub struct ActivityDetailsHandler {
    contexts: Arc<dyn ContextFactory>,
}

impl ActivityDetailsHandler {
    pub fn new(contexts: Arc<dyn ContextFactory>) -> Self {
        Self { contexts }
    }
}

#[async_trait]
impl RequestHandler<ActivityDetails> for ActivityDetailsHandler {
    async fn handle(&self, query: ActivityDetails, _cancel: &CancellationSignal) -> Result<Outcome<Activity>> {
        let mut context = self.contexts.open().await?;

        Ok(match context.find_activity_with_comments(query.id).await? {
            Some(activity) => Outcome::success(activity),
            None => Outcome::not_found(ACTIVITY_NOT_FOUND),
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cancelled, FailureKind};
    use crate::domain::activity::{ActivityId, ActivityInput};
    use crate::persistence::{DataContext, InMemoryStore, MockContextFactory, MockDataContext};
    use chrono::{TimeZone, Utc};

    fn input(title: &str) -> ActivityInput {
        ActivityInput {
            title: title.into(),
            date: Utc.with_ymd_and_hms(2026, 11, 20, 19, 0, 0).unwrap(),
            description: "Drinks with friends".into(),
            category: "drinks".into(),
            city: "London".into(),
            venue: "Pub".into(),
        }
    }

    #[tokio::test]
    async fn create_inserts_activity_under_given_id() {
        let store = InMemoryStore::new();
        let handler = CreateActivityHandler::new(Arc::new(store.clone()));
        let id = ActivityId::random();

        let outcome = handler
            .handle(
                CreateActivity {
                    id,
                    activity: input("Pub night"),
                },
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(store.activity(id).await.unwrap().title, "Pub night");
    }

    #[tokio::test]
    async fn create_reports_zero_rows_as_failure() {
        let mut context = MockDataContext::new();
        context.expect_add_activity().times(1).return_const(());
        context.expect_write_changes().times(1).return_once(|| Ok(0));
        context.expect_commit().times(1).return_once(|| Ok(()));
        let mut factory = MockContextFactory::new();
        factory
            .expect_open()
            .return_once(move || Ok(Box::new(context) as Box<dyn DataContext>));

        let outcome = CreateActivityHandler::new(Arc::new(factory))
            .handle(
                CreateActivity {
                    id: ActivityId::random(),
                    activity: input("Pub night"),
                },
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.message(), Some("Failed to create activity"));
    }

    #[tokio::test]
    async fn edit_missing_activity_is_not_found() {
        let store = InMemoryStore::new();
        let handler = EditActivityHandler::new(Arc::new(store.clone()));

        let outcome = handler
            .handle(
                EditActivity {
                    id: ActivityId::random(),
                    activity: input("Renamed"),
                },
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.failure_kind(), Some(&FailureKind::NotFound));
        assert_eq!(store.commit_count().await, 0);
    }

    #[tokio::test]
    async fn edit_overwrites_fields() {
        let store = InMemoryStore::new();
        let existing = Activity::new(ActivityId::random(), input("Pub night"));
        store.seed_activity(existing.clone()).await;

        let outcome = EditActivityHandler::new(Arc::new(store.clone()))
            .handle(
                EditActivity {
                    id: existing.id,
                    activity: input("Quiz night"),
                },
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(store.activity(existing.id).await.unwrap().title, "Quiz night");
    }

    #[tokio::test]
    async fn edit_without_changes_fails() {
        let store = InMemoryStore::new();
        let existing = Activity::new(ActivityId::random(), input("Pub night"));
        store.seed_activity(existing.clone()).await;

        let outcome = EditActivityHandler::new(Arc::new(store))
            .handle(
                EditActivity {
                    id: existing.id,
                    activity: input("Pub night"),
                },
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.message(), Some("Failed to update the activity"));
    }

    #[tokio::test]
    async fn cancelled_create_commits_nothing() {
        let store = InMemoryStore::new();
        let (handle, signal) = CancellationSignal::new();
        handle.cancel();
        let id = ActivityId::random();

        let err = CreateActivityHandler::new(Arc::new(store.clone()))
            .handle(
                CreateActivity {
                    id,
                    activity: input("Pub night"),
                },
                &signal,
            )
            .await
            .unwrap_err();

        assert!(err.is::<Cancelled>());
        assert!(store.activity(id).await.is_none());
    }

    #[tokio::test]
    async fn details_returns_activity_or_not_found() {
        let store = InMemoryStore::new();
        let existing = Activity::new(ActivityId::random(), input("Pub night"));
        store.seed_activity(existing.clone()).await;
        let handler = ActivityDetailsHandler::new(Arc::new(store));

        let found = handler
            .handle(ActivityDetails { id: existing.id }, &CancellationSignal::never())
            .await
            .unwrap();
        let missing = handler
            .handle(ActivityDetails { id: ActivityId::random() }, &CancellationSignal::never())
            .await
            .unwrap();

        assert_eq!(found.value(), Some(&existing));
        assert_eq!(missing.message(), Some("Activity not found"));
    }
}
