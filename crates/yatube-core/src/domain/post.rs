use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a text entry written by exactly one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<i32>,
    /// Path of the attached image relative to the media root.
    pub image: Option<String>,
}

impl Post {
    /// Create an unsaved post stamped with the current time.
    pub fn new(author_id: Uuid, text: String, group_id: Option<i32>, image: Option<String>) -> Self {
        Self {
            id: 0,
            text,
            pub_date: Utc::now(),
            author_id,
            group_id,
            image,
        }
    }
}
