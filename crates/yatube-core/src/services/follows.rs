//! Following authors and the personalized feed.

use uuid::Uuid;

use crate::domain::Follow;
use crate::error::{DomainError, RepoError};
use crate::ports::PostFilter;

use super::Blog;
use super::views::IndexPage;

impl Blog {
    /// Posts by every author `user_id` follows.
    pub async fn follow_index(&self, user_id: Uuid, page: Option<&str>) -> Result<IndexPage, DomainError> {
        let page_obj = self.page_of(&PostFilter::FollowedBy(user_id), page).await?;
        Ok(IndexPage { page_obj })
    }

    /// Subscribe `user_id` to `username`. Following yourself, or someone
    /// already followed, changes nothing. Returns the author's username.
    pub async fn follow(&self, user_id: Uuid, username: &str) -> Result<String, DomainError> {
        let author = self.find_author(username).await?;
        let user = self.require_user(user_id).await?;

        if author.id == user.id {
            return Ok(author.username);
        }
        if self.repos.follows.exists(user.id, author.id).await? {
            return Ok(author.username);
        }

        match self.repos.follows.insert(Follow::new(user.id, author.id)).await {
            Ok(follow) => {
                tracing::info!(follow_id = follow.id, user = %user.username, author = %author.username, "Follow created");
            }
            // A concurrent request inserted the same pair first.
            Err(RepoError::Constraint(_)) => {
                tracing::debug!(user = %user.username, author = %author.username, "Follow already exists");
            }
            Err(e) => return Err(e.into()),
        }

        Ok(author.username)
    }

    /// Remove any subscription of `user_id` to `username`. Never fails for a
    /// missing subscription or an unknown username.
    pub async fn unfollow(&self, user_id: Uuid, username: &str) -> Result<(), DomainError> {
        let Some(author) = self.repos.users.find_by_username(username).await? else {
            return Ok(());
        };
        let removed = self.repos.follows.delete_pair(user_id, author.id).await?;
        tracing::info!(user = %user_id, author = %author.username, removed, "Unfollow");
        Ok(())
    }
}
