//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Listing with a search box (`?q=`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<String>,
}

/// Post form fields sent as `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormRequest {
    pub text: Option<String>,
    pub group: Option<String>,
    /// Checkbox that drops the stored image on edit.
    #[serde(rename = "image-clear")]
    pub image_clear: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: Option<String>,
}

/// Request to sign up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Where to go after signing in.
    #[serde(default)]
    pub next: Option<String>,
}

/// `GET /auth/login/` context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginPage {
    pub next: Option<String>,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub is_staff: bool,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Admin: create or edit a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Admin: move a post to another group; `None` removes it from any group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostGroupRequest {
    pub group: Option<i32>,
}

/// Admin: comments filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentFilterQuery {
    pub post: Option<i32>,
}

/// Admin: follows filter by follower username.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowFilterQuery {
    pub user: Option<String>,
}
