//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod follow;
mod health;
mod media;
mod posts;

use actix_multipart::form::MultipartFormConfig;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use std::future::{Ready, ready};

use yatube_shared::ErrorResponse;

use crate::observability::RequestId;

/// Largest accepted request body; uploads are buffered in memory.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// `302 Found` to `location`.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Profile page of `username`, with the name percent-encoded.
pub(crate) fn profile_url(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

/// Raw `?page=` value of a listing. Repeated keys keep the last value and
/// unparsable query strings read as no page at all.
pub(crate) struct PageParam(Option<String>);

impl PageParam {
    fn from_query(query: &str) -> Self {
        let page = web::Query::<Vec<(String, String)>>::from_query(query)
            .ok()
            .and_then(|pairs| {
                pairs
                    .into_inner()
                    .into_iter()
                    .rev()
                    .find(|(key, _)| key == "page")
            })
            .map(|(_, value)| value);
        PageParam(page)
    }

    pub(crate) fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequest for PageParam {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(PageParam::from_query(req.query_string())))
    }
}

/// Fallback for unknown paths.
async fn not_found(req: HttpRequest, request_id: RequestId) -> HttpResponse {
    let error = ErrorResponse::not_found(format!("No page at {}", req.path()))
        .with_instance(req.path())
        .with_request_id(request_id.as_str());
    HttpResponse::NotFound().json(error)
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .app_data(
            MultipartFormConfig::default()
                .total_limit(MAX_BODY_BYTES)
                .memory_limit(MAX_BODY_BYTES),
        )
        .route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .route("/profile/{username}/", web::get().to(posts::profile))
        .service(
            web::resource("/profile/{username}/follow/")
                .route(web::get().to(follow::profile_follow))
                .route(web::post().to(follow::profile_follow)),
        )
        .service(
            web::resource("/profile/{username}/unfollow/")
                .route(web::get().to(follow::profile_unfollow))
                .route(web::post().to(follow::profile_unfollow)),
        )
        .route("/posts/{post_id}/", web::get().to(posts::post_detail))
        .service(
            web::resource("/create/")
                .route(web::get().to(posts::create_form))
                .route(web::post().to(posts::create_post)),
        )
        .service(
            web::resource("/posts/{post_id}/edit/")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::edit_post)),
        )
        .route("/posts/{post_id}/comment/", web::post().to(posts::add_comment))
        .route("/follow/", web::get().to(follow::follow_index))
        .service(
            web::scope("/auth")
                .route("/signup/", web::post().to(auth::signup))
                .service(
                    web::resource("/login/")
                        .route(web::get().to(auth::login_page))
                        .route(web::post().to(auth::login)),
                )
                .service(
                    web::resource("/logout/")
                        .route(web::get().to(auth::logout))
                        .route(web::post().to(auth::logout)),
                )
                .route("/me/", web::get().to(auth::me)),
        )
        .service(
            web::scope("/admin")
                .route("/posts/", web::get().to(admin::list_posts))
                .route("/posts/{post_id}/", web::delete().to(admin::delete_post))
                .route("/posts/{post_id}/group/", web::post().to(admin::set_post_group))
                .service(
                    web::resource("/groups/")
                        .route(web::get().to(admin::list_groups))
                        .route(web::post().to(admin::create_group)),
                )
                .service(
                    web::resource("/groups/{group_id}/")
                        .route(web::put().to(admin::update_group))
                        .route(web::delete().to(admin::delete_group)),
                )
                .route("/comments/", web::get().to(admin::list_comments))
                .route("/comments/{comment_id}/", web::delete().to(admin::delete_comment))
                .route("/follows/", web::get().to(admin::list_follows))
                .route("/follows/{follow_id}/", web::delete().to(admin::delete_follow))
                .route("/cache/clear/", web::post().to(admin::clear_cache)),
        )
        .route("/media/{path:.*}", web::get().to(media::serve))
        .route("/health/", web::get().to(health::health_check))
        .default_service(web::to(not_found));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_param_takes_last_value() {
        assert_eq!(PageParam::from_query("page=1&page=2").as_deref(), Some("2"));
        assert_eq!(PageParam::from_query("q=x&page=3").as_deref(), Some("3"));
        assert_eq!(PageParam::from_query("page=abc").as_deref(), Some("abc"));
        assert_eq!(PageParam::from_query("").as_deref(), None);
    }

    #[test]
    fn test_profile_url_encodes_username() {
        assert_eq!(profile_url("leo"), "/profile/leo/");
        assert_eq!(
            profile_url("Толстой"),
            "/profile/%D0%A2%D0%BE%D0%BB%D1%81%D1%82%D0%BE%D0%B9/"
        );
        assert_eq!(profile_url("a/b"), "/profile/a%2Fb/");
    }
}
