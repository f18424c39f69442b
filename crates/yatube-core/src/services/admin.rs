//! Administrative console operations, used by staff only.

use crate::domain::{Group, Post};
use crate::error::{DomainError, RepoError};
use crate::forms::{CleanGroup, GroupForm, INVALID_CHOICE};
use crate::pagination::Page;
use crate::ports::PostFilter;

use super::Blog;
use super::views::{CommentCard, FollowCard, PostCard};

fn missing(entity_type: &'static str, id: i32) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}

impl Blog {
    /// All posts, optionally narrowed to those whose text contains `search`.
    pub async fn admin_posts(
        &self,
        search: Option<&str>,
        page: Option<&str>,
    ) -> Result<Page<PostCard>, DomainError> {
        let filter = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => PostFilter::TextContains(needle.to_string()),
            None => PostFilter::All,
        };
        self.page_of(&filter, page).await
    }

    /// Move a post into a group, or out of any group.
    pub async fn admin_set_post_group(
        &self,
        post_id: i32,
        group_id: Option<i32>,
    ) -> Result<Post, DomainError> {
        let post = self.find_post(post_id).await?;
        if let Some(group_id) = group_id {
            if self.repos.groups.find_by_id(group_id).await?.is_none() {
                return Err(DomainError::Validation(INVALID_CHOICE.to_string()));
            }
        }
        let post = self.repos.posts.update(Post { group_id, ..post }).await?;
        tracing::info!(post_id, group_id = ?group_id, "Post group changed");
        Ok(post)
    }

    /// Delete a post together with its comments and stored image.
    pub async fn admin_delete_post(&self, post_id: i32) -> Result<(), DomainError> {
        let post = self.find_post(post_id).await?;
        self.repos
            .posts
            .delete(post_id)
            .await
            .map_err(missing("post", post_id))?;

        if let Some(image) = &post.image {
            if let Err(e) = self.media.delete(image).await {
                tracing::warn!(image = %image, error = %e, "Could not remove post image");
            }
        }
        tracing::info!(post_id, "Post deleted");
        Ok(())
    }

    pub async fn admin_groups(&self, search: Option<&str>) -> Result<Vec<Group>, DomainError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        Ok(self.repos.groups.list(search).await?)
    }

    async fn clean_group(&self, form: GroupForm, editing: Option<i32>) -> Result<CleanGroup, DomainError> {
        let clean = form.clean().map_err(DomainError::Form)?;
        if let Some(existing) = self.repos.groups.find_by_slug(&clean.slug).await? {
            if Some(existing.id) != editing {
                return Err(DomainError::Duplicate(format!(
                    "Group with slug '{}' already exists",
                    clean.slug
                )));
            }
        }
        Ok(clean)
    }

    pub async fn admin_create_group(&self, form: GroupForm) -> Result<Group, DomainError> {
        let clean = self.clean_group(form, None).await?;
        let group = self
            .repos
            .groups
            .insert(Group::new(clean.title, clean.slug, clean.description))
            .await?;
        tracing::info!(group_id = group.id, slug = %group.slug, "Group created");
        Ok(group)
    }

    pub async fn admin_update_group(&self, group_id: i32, form: GroupForm) -> Result<Group, DomainError> {
        self.repos
            .groups
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| DomainError::not_found("group", group_id))?;
        let clean = self.clean_group(form, Some(group_id)).await?;
        let group = self
            .repos
            .groups
            .update(Group {
                id: group_id,
                title: clean.title,
                slug: clean.slug,
                description: clean.description,
            })
            .await?;
        tracing::info!(group_id, slug = %group.slug, "Group updated");
        Ok(group)
    }

    /// Delete a group. Its posts stay, without a group.
    pub async fn admin_delete_group(&self, group_id: i32) -> Result<(), DomainError> {
        self.repos
            .groups
            .delete(group_id)
            .await
            .map_err(missing("group", group_id))?;
        tracing::info!(group_id, "Group deleted");
        Ok(())
    }

    pub async fn admin_comments(&self, post_id: Option<i32>) -> Result<Vec<CommentCard>, DomainError> {
        let comments = self.repos.comments.list(post_id).await?;
        self.comment_cards(comments).await
    }

    pub async fn admin_delete_comment(&self, comment_id: i32) -> Result<(), DomainError> {
        self.repos
            .comments
            .delete(comment_id)
            .await
            .map_err(missing("comment", comment_id))?;
        tracing::info!(comment_id, "Comment deleted");
        Ok(())
    }

    /// Follows, optionally only those made by `username`.
    pub async fn admin_follows(&self, username: Option<&str>) -> Result<Vec<FollowCard>, DomainError> {
        let user_id = match username.map(str::trim).filter(|s| !s.is_empty()) {
            Some(username) => match self.repos.users.find_by_username(username).await? {
                Some(user) => Some(user.id),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let follows = self.repos.follows.list(user_id).await?;
        let users = self
            .authors(follows.iter().flat_map(|f| [f.user_id, f.author_id]))
            .await?;

        Ok(follows
            .into_iter()
            .filter_map(|f| {
                Some(FollowCard {
                    id: f.id,
                    user: users.get(&f.user_id)?.clone(),
                    author: users.get(&f.author_id)?.clone(),
                })
            })
            .collect())
    }

    pub async fn admin_delete_follow(&self, follow_id: i32) -> Result<(), DomainError> {
        self.repos
            .follows
            .delete(follow_id)
            .await
            .map_err(missing("follow", follow_id))?;
        tracing::info!(follow_id, "Follow deleted");
        Ok(())
    }
}
