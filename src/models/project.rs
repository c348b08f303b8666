//! Project record data structure.

use serde::{Deserialize, Serialize};

/// One project scraped from the listing.
///
/// Created during the index crawl with `name` and `url` set, then enriched
/// with `team_members` when the detail page is visited.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectRecord {
    /// Project title as shown on the index page
    #[serde(rename = "projectName")]
    pub name: String,

    /// Absolute URL of the project detail page
    pub url: String,

    /// Team member names in page order
    #[serde(
        rename = "teamMembers",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub team_members: Vec<String>,
}

impl ProjectRecord {
    /// Create a record as discovered on the index page.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            team_members: Vec::new(),
        }
    }

    /// Team members joined into a single display field.
    pub fn team_field(&self, separator: &str) -> String {
        self.team_members.join(separator)
    }

    pub fn has_team(&self) -> bool {
        !self.team_members.is_empty()
    }
}
