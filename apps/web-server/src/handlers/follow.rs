//! Personalized feed and author subscriptions.

use actix_web::{HttpResponse, web};

use super::{PageParam, profile_url, redirect};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /follow/ - posts by everyone the requester follows.
pub async fn follow_index(
    state: web::Data<AppState>,
    identity: Identity,
    page: PageParam,
) -> AppResult<HttpResponse> {
    let page = state
        .blog
        .follow_index(identity.user_id, page.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// /profile/{username}/follow/
pub async fn profile_follow(
    state: web::Data<AppState>,
    identity: Identity,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = state.blog.follow(identity.user_id, &username).await?;
    Ok(redirect(&profile_url(&author)))
}

/// /profile/{username}/unfollow/
pub async fn profile_unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.blog.unfollow(identity.user_id, &username).await?;
    Ok(redirect(&profile_url(&username)))
}
