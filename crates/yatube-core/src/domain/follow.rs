use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Follow entity - `user` subscribes to posts written by `author`.
///
/// The `(user_id, author_id)` pair is unique in every store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: i32,
    pub user_id: Uuid,
    pub author_id: Uuid,
}

impl Follow {
    pub fn new(user_id: Uuid, author_id: Uuid) -> Self {
        Self {
            id: 0,
            user_id,
            author_id,
        }
    }
}
