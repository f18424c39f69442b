use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Follow, Group, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity, returning it with its stored ID.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, cascading to dependent records.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Load every user whose id is in `ids`, in no particular order.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, i32> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    async fn find_many(&self, ids: &[i32]) -> Result<Vec<Group>, RepoError>;

    /// All groups ordered by title, optionally narrowed to titles containing `search`.
    async fn list(&self, search: Option<&str>) -> Result<Vec<Group>, RepoError>;
}

/// Which posts a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(i32),
    Author(Uuid),
    /// Posts by every author the given user follows.
    FollowedBy(Uuid),
    /// Posts whose text contains the needle.
    TextContains(String),
}

/// Post repository. Listings are ordered newest-first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    async fn list(&self, filter: &PostFilter, offset: u64, limit: u64)
    -> Result<Vec<Post>, RepoError>;
}

/// Comment repository. Listings are ordered newest-first.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    /// Comments on one post, or every comment when `post_id` is `None`.
    async fn list(&self, post_id: Option<i32>) -> Result<Vec<Comment>, RepoError>;
}

/// Follow repository.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;

    /// Insert a follow; a duplicate pair fails with `RepoError::Constraint`.
    async fn insert(&self, follow: Follow) -> Result<Follow, RepoError>;

    /// Delete the pair if present, returning the number of removed rows.
    async fn delete_pair(&self, user_id: Uuid, author_id: Uuid) -> Result<u64, RepoError>;

    async fn delete(&self, id: i32) -> Result<(), RepoError>;

    /// Follows of one user, or all follows when `user_id` is `None`.
    async fn list(&self, user_id: Option<Uuid>) -> Result<Vec<Follow>, RepoError>;
}
