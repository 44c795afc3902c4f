use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::{CancellationSignal, Outcome, RequestHandler};
use crate::identity::UserAccessor;
use crate::mapping::Mapper;
use crate::persistence::{save_changes, ContextFactory};

use super::commands::CreateComment;
use super::dto::CommentDto;

// ============================================================================
// Create Comment Handler
// ============================================================================
//
// Orchestrates: Command → Activity + Author → Comment → write + commit → DTO
//
// Not idempotent: the same command twice adds two comments.
//
// ============================================================================

pub const ACTIVITY_NOT_FOUND: &str = "Activity not found";
pub const USER_NOT_FOUND: &str = "User not found";
pub const ADD_COMMENT_FAILED: &str = "Failed to add comment";

pub struct CreateCommentHandler {
    contexts: Arc<dyn ContextFactory>,
    mapper: Arc<dyn Mapper>,
    user_accessor: Arc<dyn UserAccessor>,
}

impl CreateCommentHandler {
    pub fn new(
        contexts: Arc<dyn ContextFactory>,
        mapper: Arc<dyn Mapper>,
        user_accessor: Arc<dyn UserAccessor>,
    ) -> Self {
        Self {
            contexts,
            mapper,
            user_accessor,
        }
    }
}

#[async_trait]
impl RequestHandler<CreateComment> for CreateCommentHandler {
    async fn handle(&self, command: CreateComment, cancel: &CancellationSignal) -> Result<Outcome<CommentDto>> {
        let mut context = self.contexts.open().await?;

        let Some(mut activity) = context.find_activity(command.activity_id).await? else {
            tracing::warn!(activity_id = %command.activity_id, "Activity not found, comment not added");
            return Ok(Outcome::not_found(ACTIVITY_NOT_FOUND));
        };
        cancel.check()?;

        let Some(username) = self.user_accessor.username() else {
            tracing::warn!(activity_id = %command.activity_id, "No authenticated user");
            return Ok(Outcome::unauthorized(USER_NOT_FOUND));
        };
        let Some(author) = context.find_user_with_photos(&username).await? else {
            tracing::warn!(username = %username, "Current user does not resolve to a record");
            return Ok(Outcome::unauthorized(USER_NOT_FOUND));
        };
        cancel.check()?;

        let comment = activity.add_comment(author, command.body)?.clone();
        context.stage_comment(&comment);

        let affected = save_changes(context.as_mut(), cancel).await?;

        if affected == 0 {
            tracing::error!(activity_id = %activity.id, "Commit affected no rows");
            return Ok(Outcome::failure(ADD_COMMENT_FAILED));
        }

        tracing::info!(
            activity_id = %activity.id,
            comment_id = %comment.id,
            author = %comment.author.username,
            "Comment added"
        );

        Ok(Outcome::success(self.mapper.comment_to_dto(&comment)))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cancelled, FailureKind};
    use crate::domain::activity::{Activity, ActivityId, ActivityInput};
    use crate::domain::user::AppUser;
    use crate::identity::{FixedUserAccessor, MockUserAccessor};
    use crate::mapping::ProfileMapper;
    use crate::persistence::{DataContext, MockContextFactory, MockDataContext};
    use chrono::Utc;

    fn activity() -> Activity {
        Activity::new(
            ActivityId::random(),
            ActivityInput {
                title: "Past Activity 2".into(),
                date: Utc::now(),
                description: "Activity 1 month ago".into(),
                category: "culture".into(),
                city: "Paris".into(),
                venue: "Louvre".into(),
            },
        )
    }

    fn factory_for(context: MockDataContext) -> Arc<MockContextFactory> {
        let mut factory = MockContextFactory::new();
        factory
            .expect_open()
            .times(1)
            .return_once(move || Ok(Box::new(context) as Box<dyn DataContext>));
        Arc::new(factory)
    }

    fn handler(context: MockDataContext, accessor: Arc<dyn UserAccessor>) -> CreateCommentHandler {
        CreateCommentHandler::new(factory_for(context), Arc::new(ProfileMapper), accessor)
    }

    #[tokio::test]
    async fn missing_activity_returns_not_found_without_commit() {
        let mut context = MockDataContext::new();
        context.expect_find_activity().times(1).return_once(|_| Ok(None));
        context.expect_find_user_with_photos().times(0);
        context.expect_stage_comment().times(0);
        context.expect_write_changes().times(0);
        context.expect_commit().times(0);

        let outcome = handler(context, Arc::new(FixedUserAccessor::new("alice")))
            .handle(
                CreateComment::new(ActivityId::random(), "Nice event!"),
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.message(), Some("Activity not found"));
        assert_eq!(outcome.failure_kind(), Some(&FailureKind::NotFound));
    }

    #[tokio::test]
    async fn anonymous_session_is_unauthorized() {
        let existing = activity();
        let mut context = MockDataContext::new();
        context
            .expect_find_activity()
            .return_once(move |_| Ok(Some(existing)));
        context.expect_find_user_with_photos().times(0);
        context.expect_write_changes().times(0);
        context.expect_commit().times(0);

        let mut accessor = MockUserAccessor::new();
        accessor.expect_username().times(1).return_const(None::<String>);

        let outcome = handler(context, Arc::new(accessor))
            .handle(
                CreateComment::new(ActivityId::random(), "Nice event!"),
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.failure_kind(), Some(&FailureKind::Unauthorized));
        assert_eq!(outcome.message(), Some("User not found"));
    }

    #[tokio::test]
    async fn unknown_username_is_unauthorized() {
        let existing = activity();
        let mut context = MockDataContext::new();
        context
            .expect_find_activity()
            .return_once(move |_| Ok(Some(existing)));
        context
            .expect_find_user_with_photos()
            .withf(|username: &str| username == "mallory")
            .return_once(|_| Ok(None));
        context.expect_write_changes().times(0);
        context.expect_commit().times(0);

        let outcome = handler(context, Arc::new(FixedUserAccessor::new("mallory")))
            .handle(
                CreateComment::new(ActivityId::random(), "hi"),
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.failure_kind(), Some(&FailureKind::Unauthorized));
    }

    #[tokio::test]
    async fn zero_row_commit_is_a_fixed_failure() {
        let existing = activity();
        let mut context = MockDataContext::new();
        context
            .expect_find_activity()
            .return_once(move |_| Ok(Some(existing)));
        context
            .expect_find_user_with_photos()
            .return_once(|_| Ok(Some(AppUser::new("alice", "Alice"))));
        context.expect_stage_comment().times(1).return_const(());
        context.expect_write_changes().times(1).return_once(|| Ok(0));
        context.expect_commit().times(1).return_once(|| Ok(()));

        let outcome = handler(context, Arc::new(FixedUserAccessor::new("alice")))
            .handle(
                CreateComment::new(ActivityId::random(), "Nice event!"),
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.message(), Some("Failed to add comment"));
        assert_eq!(outcome.failure_kind(), Some(&FailureKind::Persistence));
        assert!(outcome.value().is_none());
    }

    #[tokio::test]
    async fn successful_commit_maps_comment() {
        let existing = activity();
        let activity_id = existing.id;
        let mut context = MockDataContext::new();
        context
            .expect_find_activity()
            .withf(move |id| *id == activity_id)
            .return_once(move |_| Ok(Some(existing)));
        context
            .expect_find_user_with_photos()
            .return_once(|_| Ok(Some(AppUser::new("alice", "Alice"))));
        context
            .expect_stage_comment()
            .withf(move |comment| comment.activity_id == activity_id && comment.author.username == "alice")
            .times(1)
            .return_const(());
        context.expect_write_changes().times(1).return_once(|| Ok(1));
        context.expect_commit().times(1).return_once(|| Ok(()));

        let outcome = handler(context, Arc::new(FixedUserAccessor::new("alice")))
            .handle(
                CreateComment::new(activity_id, "Nice event!"),
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        let dto = outcome.value().unwrap();
        assert_eq!(dto.body, "Nice event!");
        assert_eq!(dto.username, "alice");
        assert_eq!(outcome.message(), None);
    }

    #[tokio::test]
    async fn store_fault_propagates_as_error() {
        let existing = activity();
        let mut context = MockDataContext::new();
        context
            .expect_find_activity()
            .return_once(move |_| Ok(Some(existing)));
        context
            .expect_find_user_with_photos()
            .return_once(|_| Ok(Some(AppUser::new("alice", "Alice"))));
        context.expect_stage_comment().return_const(());
        context
            .expect_write_changes()
            .return_once(|| Err(anyhow::anyhow!("connection reset")));
        context.expect_commit().times(0);

        let result = handler(context, Arc::new(FixedUserAccessor::new("alice")))
            .handle(
                CreateComment::new(ActivityId::random(), "Nice event!"),
                &CancellationSignal::never(),
            )
            .await;

        assert_eq!(result.unwrap_err().to_string(), "connection reset");
    }

    #[tokio::test]
    async fn cancellation_before_commit_skips_save() {
        let existing = activity();
        let mut context = MockDataContext::new();
        context
            .expect_find_activity()
            .return_once(move |_| Ok(Some(existing)));
        context.expect_find_user_with_photos().times(0);
        context.expect_write_changes().times(0);
        context.expect_commit().times(0);

        let (cancel_handle, signal) = CancellationSignal::new();
        cancel_handle.cancel();

        let err = handler(context, Arc::new(FixedUserAccessor::new("alice")))
            .handle(CreateComment::new(ActivityId::random(), "Nice event!"), &signal)
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<Cancelled>().is_some());
    }

    #[tokio::test]
    async fn cancel_arriving_during_commit_reports_the_comment() {
        let existing = activity();
        let activity_id = existing.id;
        let (cancel_handle, signal) = CancellationSignal::new();
        let mut context = MockDataContext::new();
        context
            .expect_find_activity()
            .return_once(move |_| Ok(Some(existing)));
        context
            .expect_find_user_with_photos()
            .return_once(|_| Ok(Some(AppUser::new("alice", "Alice"))));
        context.expect_stage_comment().times(1).return_const(());
        context.expect_write_changes().times(1).return_once(|| Ok(1));
        context.expect_commit().times(1).return_once(move || {
            cancel_handle.cancel();
            Ok(())
        });

        let outcome = handler(context, Arc::new(FixedUserAccessor::new("alice")))
            .handle(CreateComment::new(activity_id, "Nice event!"), &signal)
            .await
            .unwrap();

        assert!(signal.is_cancelled());
        assert_eq!(outcome.value().unwrap().body, "Nice event!");
    }
}
