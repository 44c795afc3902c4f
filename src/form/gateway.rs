use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::{CancellationSignal, Dispatch};
use crate::domain::activity::{Activity, ActivityDetails, ActivityId, ActivityInput, CreateActivity, EditActivity};
use crate::mediator::Mediator;

/// Where the form loads and submits activities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityGateway: Send + Sync {
    async fn load(&self, id: ActivityId) -> Result<Activity>;

    async fn create(&self, id: ActivityId, input: ActivityInput) -> Result<()>;

    async fn update(&self, id: ActivityId, input: ActivityInput) -> Result<()>;
}

/// Submits through the in-process mediator. Failed outcomes become errors.
pub struct MediatorGateway {
    mediator: Arc<Mediator>,
    cancel: CancellationSignal,
}

impl MediatorGateway {
    pub fn new(mediator: Arc<Mediator>) -> Self {
        Self {
            mediator,
            cancel: CancellationSignal::never(),
        }
    }

    /// Abort pending submissions when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationSignal) -> Self {
        self.cancel = cancel;
        self
    }
}

#[async_trait]
impl ActivityGateway for MediatorGateway {
    async fn load(&self, id: ActivityId) -> Result<Activity> {
        let outcome = self.mediator.send(ActivityDetails { id }, &self.cancel).await?;
        Ok(outcome.into_result()?)
    }

    async fn create(&self, id: ActivityId, input: ActivityInput) -> Result<()> {
        let command = CreateActivity { id, activity: input };
        let outcome = self.mediator.send(command, &self.cancel).await?;
        Ok(outcome.into_result()?)
    }

    async fn update(&self, id: ActivityId, input: ActivityInput) -> Result<()> {
        let command = EditActivity { id, activity: input };
        let outcome = self.mediator.send(command, &self.cancel).await?;
        Ok(outcome.into_result()?)
    }
}
