use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::{CancellationSignal, Dispatch, NoValidation, Outcome, Pipeline};
use crate::domain::activity::{
    ActivityDetails, ActivityDetailsHandler, CreateActivity, CreateActivityHandler,
    CreateActivityValidator, EditActivity, EditActivityHandler, EditActivityValidator,
};
use crate::domain::comment::{CreateComment, CreateCommentHandler, CreateCommentValidator};
use crate::identity::UserAccessor;
use crate::mapping::Mapper;
use crate::metrics::Metrics;
use crate::persistence::ContextFactory;

// ============================================================================
// Mediator - One Entry Point for Every Request
// ============================================================================
//
// Holds one pipeline per request type. Callers depend on `Dispatch<R>` and
// never name a handler directly.
//
// ============================================================================

pub struct Mediator {
    create_comment: Pipeline<CreateCommentValidator, CreateCommentHandler>,
    create_activity: Pipeline<CreateActivityValidator, CreateActivityHandler>,
    edit_activity: Pipeline<EditActivityValidator, EditActivityHandler>,
    activity_details: Pipeline<NoValidation, ActivityDetailsHandler>,
}

impl Mediator {
    pub fn new(
        contexts: Arc<dyn ContextFactory>,
        user_accessor: Arc<dyn UserAccessor>,
        mapper: Arc<dyn Mapper>,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        let mediator = Self {
            create_comment: Pipeline::new(
                CreateCommentValidator,
                CreateCommentHandler::new(Arc::clone(&contexts), mapper, user_accessor),
            ),
            create_activity: Pipeline::new(
                CreateActivityValidator,
                CreateActivityHandler::new(Arc::clone(&contexts)),
            ),
            edit_activity: Pipeline::new(
                EditActivityValidator,
                EditActivityHandler::new(Arc::clone(&contexts)),
            ),
            activity_details: Pipeline::new(NoValidation, ActivityDetailsHandler::new(contexts)),
        };

        match metrics {
            Some(metrics) => mediator.with_metrics(metrics),
            None => mediator,
        }
    }

    fn with_metrics(self, metrics: Arc<Metrics>) -> Self {
        Self {
            create_comment: self.create_comment.with_metrics(Arc::clone(&metrics)),
            create_activity: self.create_activity.with_metrics(Arc::clone(&metrics)),
            edit_activity: self.edit_activity.with_metrics(Arc::clone(&metrics)),
            activity_details: self.activity_details.with_metrics(metrics),
        }
    }
}

macro_rules! route {
    ($request:ty => $field:ident) => {
        #[async_trait]
        impl Dispatch<$request> for Mediator {
            async fn send(
                &self,
                request: $request,
                cancel: &CancellationSignal,
            ) -> Result<Outcome<<$request as crate::core::Request>::Output>> {
                self.$field.send(request, cancel).await
            }
        }
    };
}

route!(CreateComment => create_comment);
route!(CreateActivity => create_activity);
route!(EditActivity => edit_activity);
route!(ActivityDetails => activity_details);
