use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// User - Read-only Identity Records
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Profile photo attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub url: String,
    pub is_main: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUser {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub photos: Vec<Photo>,
}

impl AppUser {
    pub fn new(username: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: UserId::random(),
            username: username.into(),
            display_name: display_name.into(),
            bio: None,
            photos: Vec::new(),
        }
    }

    pub fn with_photo(mut self, photo: Photo) -> Self {
        self.photos.push(photo);
        self
    }

    pub fn main_photo(&self) -> Option<&Photo> {
        self.photos.iter().find(|p| p.is_main)
    }
}
