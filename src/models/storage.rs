use serde::{Deserialize, Serialize};

/// A well-known storage root shown on the home screen. `size_display` is
/// absent until the concurrent size pass fills it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageCategory {
    pub name: String,
    pub path: String,
    pub size_display: Option<String>,
}

impl StorageCategory {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size_display: None,
        }
    }
}
