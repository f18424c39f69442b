use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - a reply attached to one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub post_id: i32,
}

impl Comment {
    pub fn new(author_id: Uuid, post_id: i32, text: String) -> Self {
        Self {
            id: 0,
            text,
            pub_date: Utc::now(),
            author_id,
            post_id,
        }
    }
}
