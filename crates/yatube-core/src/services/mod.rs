//! Application services - the operations behind every page.

mod accounts;
mod admin;
mod follows;
mod posts;
pub mod views;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Post, User};
use crate::error::DomainError;
use crate::pagination::{Page, PageWindow};
use crate::ports::{
    CommentRepository, FollowRepository, GroupRepository, MediaStorage, PostFilter,
    PostRepository, UserRepository,
};

pub use accounts::Accounts;
use views::{AuthorRef, CommentCard, GroupRef, PostCard};

/// Folder uploads of post images are stored under.
pub const POST_IMAGE_FOLDER: &str = "posts";

/// Default number of posts per listing page.
pub const DEFAULT_POSTS_PER_PAGE: u64 = 10;

/// The set of repositories the services work against.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

/// Blog service: listings, posts, comments, follows and the admin console.
#[derive(Clone)]
pub struct Blog {
    repos: Repositories,
    media: Arc<dyn MediaStorage>,
    posts_per_page: u64,
}

impl Blog {
    pub fn new(repos: Repositories, media: Arc<dyn MediaStorage>, posts_per_page: u64) -> Self {
        Self {
            repos,
            media,
            posts_per_page: posts_per_page.max(1),
        }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    pub fn posts_per_page(&self) -> u64 {
        self.posts_per_page
    }

    /// The user behind an authenticated request. A token for a deleted
    /// account no longer identifies anyone.
    async fn require_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthorized)
    }

    async fn find_post(&self, post_id: i32) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn find_author(&self, username: &str) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }

    async fn authors(&self, ids: impl Iterator<Item = Uuid>) -> Result<HashMap<Uuid, AuthorRef>, DomainError> {
        let ids: Vec<Uuid> = ids.collect::<HashSet<_>>().into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users = self.repos.users.find_many(&ids).await?;
        Ok(users.iter().map(|u| (u.id, AuthorRef::from(u))).collect())
    }

    /// Resolve authors and groups for a batch of posts.
    async fn cards(&self, posts: Vec<Post>) -> Result<Vec<PostCard>, DomainError> {
        let authors = self.authors(posts.iter().map(|p| p.author_id)).await?;

        let group_ids: Vec<i32> = posts
            .iter()
            .filter_map(|p| p.group_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let groups: HashMap<i32, GroupRef> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            self.repos
                .groups
                .find_many(&group_ids)
                .await?
                .iter()
                .map(|g| (g.id, GroupRef::from(g)))
                .collect()
        };

        posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned().ok_or_else(|| {
                    DomainError::Internal(format!("post {} references a missing author", post.id))
                })?;
                let group = post.group_id.and_then(|id| groups.get(&id).cloned());
                Ok(PostCard::new(post, author, group))
            })
            .collect()
    }

    async fn comment_cards(&self, comments: Vec<Comment>) -> Result<Vec<CommentCard>, DomainError> {
        let authors = self.authors(comments.iter().map(|c| c.author_id)).await?;
        comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.author_id).cloned().ok_or_else(|| {
                    DomainError::Internal(format!(
                        "comment {} references a missing author",
                        comment.id
                    ))
                })?;
                Ok(CommentCard::new(comment, author))
            })
            .collect()
    }

    /// Load one page of posts matching `filter`.
    async fn page_of(
        &self,
        filter: &PostFilter,
        raw_page: Option<&str>,
    ) -> Result<Page<PostCard>, DomainError> {
        let count = self.repos.posts.count(filter).await?;
        let window = PageWindow::resolve(raw_page, count, self.posts_per_page);
        let posts = self
            .repos
            .posts
            .list(filter, window.offset(), window.limit())
            .await?;
        Ok(window.with_items(self.cards(posts).await?))
    }
}
