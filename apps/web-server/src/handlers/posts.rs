//! Listings, post pages, post editing and comments.

use actix_multipart::form::MultipartForm;
use actix_multipart::form::bytes::Bytes;
use actix_multipart::form::text::Text;
use actix_web::{Either, HttpRequest, HttpResponse, web};

use yatube_core::forms::{CommentForm, ImageUpload, PostForm};
use yatube_core::services::views::{CreateOutcome, EditOutcome};
use yatube_shared::dto::{CommentRequest, PostFormRequest};

use super::{PageParam, profile_url, redirect};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::page_cache;
use crate::state::AppState;

/// Post form fields sent as `multipart/form-data`; the only way to attach an image.
#[derive(MultipartForm)]
pub struct PostUpload {
    pub text: Option<Text<String>>,
    pub group: Option<Text<String>>,
    pub image: Option<Bytes>,
    #[multipart(rename = "image-clear")]
    pub image_clear: Option<Text<String>>,
}

fn checked(flag: Option<&str>) -> bool {
    matches!(flag, Some(v) if !v.is_empty() && v != "false" && v != "0")
}

/// Bind either encoding of the post form.
fn post_form(body: Either<web::Form<PostFormRequest>, MultipartForm<PostUpload>>) -> PostForm {
    match body {
        Either::Left(web::Form(fields)) => PostForm {
            text: fields.text,
            group: fields.group,
            image: None,
            clear_image: checked(fields.image_clear.as_deref()),
        },
        Either::Right(MultipartForm(upload)) => PostForm {
            text: upload.text.map(Text::into_inner),
            group: upload.group.map(Text::into_inner),
            image: upload.image.map(|file| {
                ImageUpload::new(file.file_name.unwrap_or_default(), file.data.to_vec())
            }),
            clear_image: checked(upload.image_clear.as_ref().map(|t| t.as_str())),
        },
    }
}

/// GET / - cached for `INDEX_CACHE_SECONDS`.
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    page: PageParam,
) -> AppResult<HttpResponse> {
    let key = page_cache::cache_key(&req);
    if let Some(hit) = page_cache::lookup(state.cache.as_ref(), &key).await {
        return Ok(hit);
    }

    let page = state.blog.index(page.as_deref()).await?;
    let body = serde_json::to_string(&page)?;
    Ok(page_cache::store(state.cache.as_ref(), &key, state.settings.index_cache_ttl(), body).await)
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    page: PageParam,
) -> AppResult<HttpResponse> {
    let page = state.blog.group_posts(&slug, page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    username: web::Path<String>,
    page: PageParam,
) -> AppResult<HttpResponse> {
    let page = state
        .blog
        .profile(&username, identity.user_id(), page.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let page = state.blog.post_detail(*post_id, identity.user_id()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /create/
pub async fn create_form(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let page = state.blog.new_post_form().await?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /create/ - redirects to the author's profile on success.
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: Either<web::Form<PostFormRequest>, MultipartForm<PostUpload>>,
) -> AppResult<HttpResponse> {
    match state.blog.create_post(identity.user_id, post_form(body)).await? {
        CreateOutcome::Created { author, .. } => Ok(redirect(&profile_url(&author))),
        CreateOutcome::Invalid(page) => Ok(HttpResponse::Ok().json(page)),
    }
}

fn edit_response(outcome: EditOutcome) -> HttpResponse {
    match outcome {
        EditOutcome::NotAuthor { post_id } | EditOutcome::Saved { post_id } => {
            redirect(&format!("/posts/{}/", post_id))
        }
        EditOutcome::Form(page) => HttpResponse::Ok().json(page),
    }
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let outcome = state.blog.edit_post(identity.user_id, *post_id, None).await?;
    Ok(edit_response(outcome))
}

/// POST /posts/{post_id}/edit/
pub async fn edit_post(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i32>,
    body: Either<web::Form<PostFormRequest>, MultipartForm<PostUpload>>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .edit_post(identity.user_id, *post_id, Some(post_form(body)))
        .await?;
    Ok(edit_response(outcome))
}

/// POST /posts/{post_id}/comment/ - back to the post whether or not the comment was valid.
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i32>,
    body: web::Form<CommentRequest>,
) -> AppResult<HttpResponse> {
    let form = CommentForm {
        text: body.into_inner().text,
    };
    state.blog.add_comment(identity.user_id, *post_id, form).await?;
    Ok(redirect(&format!("/posts/{}/", post_id)))
}
