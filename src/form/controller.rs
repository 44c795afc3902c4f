use chrono::{DateTime, Utc};

use crate::core::ValidationFailure;
use crate::domain::activity::ActivityId;

use super::gateway::ActivityGateway;
use super::schema;
use super::state::FormState;
use super::values::ActivityFormValues;
use super::FormError;

/// Where the client goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    ActivityList,
    ActivityDetails(ActivityId),
}

impl Navigation {
    pub fn path(&self) -> String {
        match self {
            Navigation::ActivityList => "/activities".to_string(),
            Navigation::ActivityDetails(id) => format!("/activities/{id}"),
        }
    }
}

/// Create/edit form for one activity.
pub struct ActivityForm<G: ActivityGateway> {
    gateway: G,
    initial: ActivityFormValues,
    values: ActivityFormValues,
    errors: Vec<ValidationFailure>,
    state: FormState,
}

impl<G: ActivityGateway> ActivityForm<G> {
    /// Empty form for a new activity.
    pub fn new(gateway: G) -> Self {
        let values = ActivityFormValues::new();
        Self {
            gateway,
            errors: schema::validate(&values),
            initial: values.clone(),
            values,
            state: FormState::Clean,
        }
    }

    /// Switch to editing an existing activity. The loaded values become the
    /// baseline for dirtiness.
    pub async fn load(&mut self, id: ActivityId) -> Result<(), FormError> {
        let activity = self.gateway.load(id).await?;
        let values = ActivityFormValues::from(&activity);

        tracing::debug!(activity_id = %id, "Activity loaded into form");
        self.errors = schema::validate(&values);
        self.initial = values.clone();
        self.values = values;
        self.state = FormState::Clean;
        Ok(())
    }

    pub fn values(&self) -> &ActivityFormValues {
        &self.values
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Current violations, empty when every field is filled in.
    pub fn errors(&self) -> &[ValidationFailure] {
        &self.errors
    }

    /// First message for `field`, if any.
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    pub fn can_submit(&self) -> bool {
        self.state.can_submit(self.is_dirty(), self.errors.is_empty())
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.edit(|v| v.title = title.into());
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.edit(|v| v.category = category.into());
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.edit(|v| v.description = description.into());
    }

    pub fn set_date(&mut self, date: Option<DateTime<Utc>>) {
        self.edit(|v| v.date = date);
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.edit(|v| v.city = city.into());
    }

    pub fn set_venue(&mut self, venue: impl Into<String>) {
        self.edit(|v| v.venue = venue.into());
    }

    fn edit(&mut self, apply: impl FnOnce(&mut ActivityFormValues)) {
        apply(&mut self.values);
        self.errors = schema::validate(&self.values);
        self.state = self.state.after_edit(self.is_dirty(), self.errors.is_empty());
    }

    /// Leave the form without saving.
    pub fn cancel(&self) -> Navigation {
        Navigation::ActivityList
    }

    /// Create or update the activity, then point at its details page.
    /// A new activity gets its id here. On failure the form keeps its values
    /// and ends up `Failed`.
    pub async fn submit(&mut self) -> Result<Navigation, FormError> {
        if self.is_dirty() && !self.errors.is_empty() {
            return Err(FormError::Invalid(self.errors.clone()));
        }
        if !self.can_submit() {
            return Err(FormError::NotSubmittable(self.state));
        }

        let input = self.values.to_input()?;
        self.state = FormState::Submitting;

        let result = match self.values.id {
            Some(id) => self.gateway.update(id, input).await.map(|_| id),
            None => {
                let id = ActivityId::random();
                self.gateway.create(id, input).await.map(|_| id)
            }
        };

        match result {
            Ok(id) => {
                self.values.id = Some(id);
                self.initial = self.values.clone();
                self.state = FormState::Submitted;
                tracing::info!(activity_id = %id, "Activity form submitted");
                Ok(Navigation::ActivityDetails(id))
            }
            Err(error) => {
                self.state = FormState::Failed;
                tracing::warn!(error = %error, "Activity form submission failed");
                Err(FormError::Gateway(error))
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
