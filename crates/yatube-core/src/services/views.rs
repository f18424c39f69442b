//! Page contexts produced by the `Blog` service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Comment, Group, Post, User};
use crate::forms::{FieldErrors, PostForm};
use crate::pagination::Page;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for AuthorRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRef {
    pub id: i32,
    pub slug: String,
    pub title: String,
}

impl From<&Group> for GroupRef {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            slug: group.slug.clone(),
            title: group.title.clone(),
        }
    }
}

/// A post with its author and group resolved.
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub id: i32,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: AuthorRef,
    pub group: Option<GroupRef>,
    pub image: Option<String>,
}

impl PostCard {
    pub fn new(post: Post, author: AuthorRef, group: Option<GroupRef>) -> Self {
        Self {
            id: post.id,
            text: post.text,
            pub_date: post.pub_date,
            author,
            group,
            image: post.image,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentCard {
    pub id: i32,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: AuthorRef,
    pub post_id: i32,
}

impl CommentCard {
    pub fn new(comment: Comment, author: AuthorRef) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            pub_date: comment.pub_date,
            author,
            post_id: comment.post_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowCard {
    pub id: i32,
    pub user: AuthorRef,
    pub author: AuthorRef,
}

/// Home page and personalized feed.
#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub page_obj: Page<PostCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupPage {
    pub group: Group,
    pub page_obj: Page<PostCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub author: AuthorRef,
    /// Total posts by the author.
    pub count: u64,
    /// Whether the requesting user follows the author.
    pub following: bool,
    pub page_obj: Page<PostCard>,
}

/// An unbound comment form, offered to signed-in readers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentFormState {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetailPage {
    pub post: PostCard,
    pub count: u64,
    pub comments: Vec<CommentCard>,
    pub form: Option<CommentFormState>,
}

/// Values echoed back into the post form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostFormValues {
    pub text: String,
    pub group: Option<String>,
    /// Currently stored image, when editing.
    pub image: Option<String>,
}

impl PostFormValues {
    pub fn from_form(form: &PostForm) -> Self {
        Self {
            text: form.text.clone().unwrap_or_default(),
            group: form.group.clone().filter(|g| !g.trim().is_empty()),
            image: None,
        }
    }

    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id.map(|id| id.to_string()),
            image: post.image.clone(),
        }
    }
}

/// Post creation/editing page.
#[derive(Debug, Clone, Serialize)]
pub struct PostFormPage {
    pub form: PostFormValues,
    pub errors: FieldErrors,
    pub is_edit: bool,
    pub post_id: Option<i32>,
    /// Choices for the group select.
    pub groups: Vec<GroupRef>,
}

#[derive(Debug, Clone)]
pub enum CreateOutcome {
    Created { post: Post, author: String },
    Invalid(PostFormPage),
}

#[derive(Debug, Clone)]
pub enum EditOutcome {
    /// The requester does not own the post; nothing changed.
    NotAuthor { post_id: i32 },
    Saved { post_id: i32 },
    /// Show the form: either unbound (GET) or with errors.
    Form(PostFormPage),
}
