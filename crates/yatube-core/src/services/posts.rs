//! Listings, post pages, post editing and comments.

use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::DomainError;
use crate::forms::{CleanImage, CleanPost, CommentForm, FieldErrors, INVALID_CHOICE, PostForm};
use crate::ports::PostFilter;

use super::views::{
    CommentFormState, CreateOutcome, EditOutcome, GroupPage, GroupRef, IndexPage, PostCard,
    PostDetailPage, PostFormPage, PostFormValues, ProfilePage,
};
use super::{Blog, POST_IMAGE_FOLDER};

impl Blog {
    /// Every post, newest first.
    pub async fn index(&self, page: Option<&str>) -> Result<IndexPage, DomainError> {
        let page_obj = self.page_of(&PostFilter::All, page).await?;
        Ok(IndexPage { page_obj })
    }

    pub async fn group_posts(&self, slug: &str, page: Option<&str>) -> Result<GroupPage, DomainError> {
        let group = self
            .repos
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;
        let page_obj = self.page_of(&PostFilter::Group(group.id), page).await?;
        Ok(GroupPage { group, page_obj })
    }

    /// An author's posts. `viewer` is the requesting user, if signed in.
    pub async fn profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        page: Option<&str>,
    ) -> Result<ProfilePage, DomainError> {
        let author = self.find_author(username).await?;
        let page_obj = self.page_of(&PostFilter::Author(author.id), page).await?;
        let following = match viewer {
            Some(viewer) => self.repos.follows.exists(viewer, author.id).await?,
            None => false,
        };
        Ok(ProfilePage {
            author: (&author).into(),
            count: page_obj.count,
            following,
            page_obj,
        })
    }

    pub async fn post_detail(
        &self,
        post_id: i32,
        viewer: Option<Uuid>,
    ) -> Result<PostDetailPage, DomainError> {
        let post = self.find_post(post_id).await?;
        let count = self
            .repos
            .posts
            .count(&PostFilter::Author(post.author_id))
            .await?;
        let comments = self.repos.comments.list(Some(post_id)).await?;
        let comments = self.comment_cards(comments).await?;
        let post = self.card(post).await?;

        Ok(PostDetailPage {
            post,
            count,
            comments,
            form: viewer.map(|_| CommentFormState::default()),
        })
    }

    async fn card(&self, post: Post) -> Result<PostCard, DomainError> {
        let id = post.id;
        self.cards(vec![post])
            .await?
            .pop()
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    async fn form_page(
        &self,
        form: PostFormValues,
        errors: FieldErrors,
        post_id: Option<i32>,
    ) -> Result<PostFormPage, DomainError> {
        let groups = self.repos.groups.list(None).await?;
        Ok(PostFormPage {
            form,
            errors,
            is_edit: post_id.is_some(),
            post_id,
            groups: groups.iter().map(GroupRef::from).collect(),
        })
    }

    /// The empty creation form.
    pub async fn new_post_form(&self) -> Result<PostFormPage, DomainError> {
        self.form_page(PostFormValues::default(), FieldErrors::default(), None)
            .await
    }

    /// Validate a post form, including that the chosen group exists.
    async fn clean_post(&self, form: PostForm) -> Result<Result<CleanPost, FieldErrors>, DomainError> {
        let clean = match form.clean() {
            Ok(clean) => clean,
            Err(errors) => return Ok(Err(errors)),
        };
        if let Some(group_id) = clean.group_id {
            if self.repos.groups.find_by_id(group_id).await?.is_none() {
                let mut errors = FieldErrors::default();
                errors.add("group", INVALID_CHOICE);
                return Ok(Err(errors));
            }
        }
        Ok(Ok(clean))
    }

    async fn store_image(&self, image: &CleanImage) -> Result<String, DomainError> {
        self.media
            .save(POST_IMAGE_FOLDER, &image.file_name, &image.bytes)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    /// Drop an upload whose post was never saved.
    async fn discard_image(&self, path: &str) {
        if let Err(e) = self.media.delete(path).await {
            tracing::warn!(path, error = %e, "Orphaned post image left in storage");
        }
    }

    pub async fn create_post(&self, author_id: Uuid, form: PostForm) -> Result<CreateOutcome, DomainError> {
        let author = self.require_user(author_id).await?;
        let values = PostFormValues::from_form(&form);

        let clean = match self.clean_post(form).await? {
            Ok(clean) => clean,
            Err(errors) => {
                tracing::debug!(author = %author.username, "Post form rejected");
                return Ok(CreateOutcome::Invalid(self.form_page(values, errors, None).await?));
            }
        };

        let image = match &clean.image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };

        let inserted = self
            .repos
            .posts
            .insert(Post::new(author.id, clean.text, clean.group_id, image.clone()))
            .await;
        let post = match inserted {
            Ok(post) => post,
            Err(e) => {
                if let Some(path) = &image {
                    self.discard_image(path).await;
                }
                return Err(e.into());
            }
        };

        tracing::info!(post_id = post.id, author = %author.username, "Post created");

        Ok(CreateOutcome::Created {
            post,
            author: author.username,
        })
    }

    /// Show (`form = None`) or submit the edit form for a post.
    ///
    /// Only the author gets past the ownership check; anyone else is sent
    /// back to the post untouched.
    pub async fn edit_post(
        &self,
        editor_id: Uuid,
        post_id: i32,
        form: Option<PostForm>,
    ) -> Result<EditOutcome, DomainError> {
        let post = self.find_post(post_id).await?;
        if post.author_id != editor_id {
            tracing::debug!(post_id, editor = %editor_id, "Edit by non-author ignored");
            return Ok(EditOutcome::NotAuthor { post_id });
        }

        let Some(form) = form else {
            let page = self
                .form_page(PostFormValues::from_post(&post), FieldErrors::default(), Some(post_id))
                .await?;
            return Ok(EditOutcome::Form(page));
        };

        let mut values = PostFormValues::from_form(&form);
        values.image = post.image.clone();

        let clean = match self.clean_post(form).await? {
            Ok(clean) => clean,
            Err(errors) => {
                let page = self.form_page(values, errors, Some(post_id)).await?;
                return Ok(EditOutcome::Form(page));
            }
        };

        let uploaded = match &clean.image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };
        let image = match &uploaded {
            Some(path) => Some(path.clone()),
            None if clean.clear_image => None,
            None => post.image.clone(),
        };

        let updated = Post {
            text: clean.text,
            group_id: clean.group_id,
            image,
            ..post
        };
        if let Err(e) = self.repos.posts.update(updated).await {
            if let Some(path) = &uploaded {
                self.discard_image(path).await;
            }
            return Err(e.into());
        }

        tracing::info!(post_id, "Post updated");
        Ok(EditOutcome::Saved { post_id })
    }

    /// Attach a comment to a post. An invalid form creates nothing and
    /// returns `None`; the caller redirects either way.
    pub async fn add_comment(
        &self,
        author_id: Uuid,
        post_id: i32,
        form: CommentForm,
    ) -> Result<Option<Comment>, DomainError> {
        let post = self.find_post(post_id).await?;
        let author = self.require_user(author_id).await?;

        let text = match form.clean() {
            Ok(text) => text,
            Err(errors) => {
                tracing::debug!(post_id, errors = ?errors.messages(), "Comment form rejected");
                return Ok(None);
            }
        };

        let comment = self
            .repos
            .comments
            .insert(Comment::new(author.id, post.id, text))
            .await?;

        tracing::info!(post_id, comment_id = comment.id, author = %author.username, "Comment added");
        Ok(Some(comment))
    }
}
