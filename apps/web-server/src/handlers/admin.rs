//! Administrative console. Every handler requires a staff identity.

use actix_web::{HttpResponse, web};

use yatube_core::forms::GroupForm;
use yatube_shared::ApiResponse;
use yatube_shared::dto::{
    CommentFilterQuery, FollowFilterQuery, GroupRequest, PostGroupRequest, SearchQuery,
};

use crate::middleware::auth::StaffIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn group_form(req: GroupRequest) -> GroupForm {
    GroupForm {
        title: req.title,
        slug: req.slug,
        description: req.description,
    }
}

/// GET /admin/posts/?q=&page=
pub async fn list_posts(
    state: web::Data<AppState>,
    _staff: StaffIdentity,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .blog
        .admin_posts(query.q.as_deref(), query.page.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// POST /admin/posts/{post_id}/group/
pub async fn set_post_group(
    state: web::Data<AppState>,
    _staff: StaffIdentity,
    post_id: web::Path<i32>,
    body: web::Json<PostGroupRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .blog
        .admin_set_post_group(*post_id, body.group)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /admin/posts/{post_id}/
pub async fn delete_post(
    state: web::Data<AppState>,
    staff: StaffIdentity,
    post_id: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state.blog.admin_delete_post(*post_id).await?;
    tracing::info!(post_id = *post_id, staff = %staff.0.username, "Post deleted from admin");
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(*post_id, "Post deleted")))
}

/// GET /admin/groups/?q=
pub async fn list_groups(
    state: web::Data<AppState>,
    _staff: StaffIdentity,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let groups = state.blog.admin_groups(search).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(groups)))
}

/// POST /admin/groups/
pub async fn create_group(
    state: web::Data<AppState>,
    _staff: StaffIdentity,
    body: web::Json<GroupRequest>,
) -> AppResult<HttpResponse> {
    let group = state
        .blog
        .admin_create_group(group_form(body.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(group)))
}

/// PUT /admin/groups/{group_id}/
pub async fn update_group(
    state: web::Data<AppState>,
    _staff: StaffIdentity,
    group_id: web::Path<i32>,
    body: web::Json<GroupRequest>,
) -> AppResult<HttpResponse> {
    let group = state
        .blog
        .admin_update_group(*group_id, group_form(body.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(group)))
}

/// DELETE /admin/groups/{group_id}/
pub async fn delete_group(
    state: web::Data<AppState>,
    _staff: StaffIdentity,
    group_id: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state.blog.admin_delete_group(*group_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(*group_id, "Group deleted")))
}

/// GET /admin/comments/?post=
pub async fn list_comments(
    state: web::Data<AppState>,
    _staff: StaffIdentity,
    query: web::Query<CommentFilterQuery>,
) -> AppResult<HttpResponse> {
    let comments = state.blog.admin_comments(query.post).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}

/// DELETE /admin/comments/{comment_id}/
pub async fn delete_comment(
    state: web::Data<AppState>,
    _staff: StaffIdentity,
    comment_id: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state.blog.admin_delete_comment(*comment_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(*comment_id, "Comment deleted")))
}

/// GET /admin/follows/?user=
pub async fn list_follows(
    state: web::Data<AppState>,
    _staff: StaffIdentity,
    query: web::Query<FollowFilterQuery>,
) -> AppResult<HttpResponse> {
    let follows = state.blog.admin_follows(query.user.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(follows)))
}

/// DELETE /admin/follows/{follow_id}/
pub async fn delete_follow(
    state: web::Data<AppState>,
    _staff: StaffIdentity,
    follow_id: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state.blog.admin_delete_follow(*follow_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(*follow_id, "Follow deleted")))
}

/// POST /admin/cache/clear/
pub async fn clear_cache(state: web::Data<AppState>, staff: StaffIdentity) -> AppResult<HttpResponse> {
    state
        .cache
        .clear()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    tracing::info!(staff = %staff.0.username, "Page cache cleared");
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "Cache cleared")))
}
