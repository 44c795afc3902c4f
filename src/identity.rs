//! Current-user lookup.
//!
//! Handlers ask a [`UserAccessor`] for the session's username instead of
//! touching a concrete session, so tests can pin any identity they like.

/// Resolves the username bound to the current session.
#[cfg_attr(test, mockall::automock)]
pub trait UserAccessor: Send + Sync {
    /// `None` when nobody is authenticated.
    fn username(&self) -> Option<String>;
}

/// Accessor that always answers with the same identity.
#[derive(Debug, Clone, Default)]
pub struct FixedUserAccessor {
    username: Option<String>,
}

impl FixedUserAccessor {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { username: None }
    }
}

impl UserAccessor for FixedUserAccessor {
    fn username(&self) -> Option<String> {
        self.username.clone()
    }
}
