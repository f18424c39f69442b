//! Whole-response caching for listing pages.
//!
//! Entries are keyed by method and full URI, so every `?page=` is cached on
//! its own. Identity does not vary the key.

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use yatube_core::ports::Cache;

pub const CACHE_STATUS_HEADER: &str = "x-cache";

const JSON: &str = "application/json";

#[derive(Debug, Serialize, Deserialize)]
struct CachedPage {
    status: u16,
    content_type: String,
    body: String,
}

impl CachedPage {
    fn into_response(self, cache_status: &'static str) -> HttpResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        HttpResponse::build(status)
            .insert_header((header::CONTENT_TYPE, self.content_type))
            .insert_header((
                HeaderName::from_static(CACHE_STATUS_HEADER),
                HeaderValue::from_static(cache_status),
            ))
            .body(self.body)
    }
}

pub fn cache_key(req: &HttpRequest) -> String {
    format!("page:{}:{}", req.method(), req.uri())
}

/// The stored response for `key`, if still fresh.
pub async fn lookup(cache: &dyn Cache, key: &str) -> Option<HttpResponse> {
    let raw = cache.get(key).await?;
    match serde_json::from_str::<CachedPage>(&raw) {
        Ok(page) => {
            tracing::debug!(key = %key, "Page cache hit");
            Some(page.into_response("HIT"))
        }
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Dropping unreadable cached page");
            None
        }
    }
}

/// Store a freshly rendered JSON page and return it.
pub async fn store(cache: &dyn Cache, key: &str, ttl: Duration, body: String) -> HttpResponse {
    let page = CachedPage {
        status: StatusCode::OK.as_u16(),
        content_type: JSON.to_string(),
        body,
    };

    if !ttl.is_zero() {
        match serde_json::to_string(&page) {
            Ok(raw) => {
                if let Err(e) = cache.set(key, &raw, Some(ttl)).await {
                    tracing::warn!(key = %key, error = %e, "Failed to cache page");
                }
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to serialize page"),
        }
    }

    page.into_response("MISS")
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use yatube_infra::InMemoryCache;

    #[test]
    fn test_key_includes_method_and_query() {
        let req = TestRequest::get().uri("/?page=2").to_http_request();
        assert_eq!(cache_key(&req), "page:GET:/?page=2");

        let req = TestRequest::get().uri("/").to_http_request();
        assert_eq!(cache_key(&req), "page:GET:/");
    }

    #[actix_web::test]
    async fn test_store_then_lookup() {
        let cache = InMemoryCache::new();
        assert!(lookup(&cache, "page:GET:/").await.is_none());

        let miss = store(&cache, "page:GET:/", Duration::from_secs(20), "{}".into()).await;
        assert_eq!(miss.headers().get(CACHE_STATUS_HEADER).unwrap(), "MISS");

        let hit = lookup(&cache, "page:GET:/").await.unwrap();
        assert_eq!(hit.status(), StatusCode::OK);
        assert_eq!(hit.headers().get(CACHE_STATUS_HEADER).unwrap(), "HIT");
        assert_eq!(hit.headers().get(header::CONTENT_TYPE).unwrap(), JSON);
    }

    #[actix_web::test]
    async fn test_zero_ttl_disables_caching() {
        let cache = InMemoryCache::new();
        store(&cache, "page:GET:/", Duration::ZERO, "{}".into()).await;
        assert!(lookup(&cache, "page:GET:/").await.is_none());
    }
}
