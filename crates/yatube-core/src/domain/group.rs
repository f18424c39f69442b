use serde::{Deserialize, Serialize};

/// Group entity - a community posts can optionally belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    /// Create an unsaved group; the store assigns the id.
    pub fn new(title: String, slug: String, description: String) -> Self {
        Self {
            id: 0,
            title,
            slug,
            description,
        }
    }
}
