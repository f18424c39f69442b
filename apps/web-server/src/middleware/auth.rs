//! Authentication extractors.
//!
//! A request is authenticated by `Authorization: Bearer <jwt>` or by the
//! `session` cookie set at login. Pages that need a user send anonymous
//! visitors to the login page instead of failing.

use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use std::fmt;
use std::future::{Ready, ready};

use yatube_core::ports::{ADMIN_ROLE, TokenClaims};

use super::error::AppError;
use crate::state::AppState;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Where anonymous visitors are sent.
pub const LOGIN_URL: &str = "/auth/login/";

/// Authenticated user identity extractor.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

impl Identity {
    /// Check if the user has a specific role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_staff(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            roles: claims.roles,
        }
    }
}

/// Percent-encode a path for the `next` parameter, leaving `/` readable.
fn encode_next(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// `/auth/login/?next=<path>` for the given original path (with query).
pub fn login_redirect_url(next: &str) -> String {
    format!("{}?next={}", LOGIN_URL, encode_next(next))
}

/// Rejection for anonymous requests to pages that need a user.
#[derive(Debug)]
pub struct LoginRequired {
    pub next: String,
}

impl fmt::Display for LoginRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Login required for {}", self.next)
    }
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, login_redirect_url(&self.next)))
            .finish()
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// Resolve the requester from the bearer header or the session cookie.
/// Invalid or expired tokens count as anonymous.
fn identify(req: &HttpRequest) -> Option<Identity> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return None;
    };

    let token = bearer_token(req).or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))?;

    match state.tokens.validate_token(&token) {
        Ok(claims) => Some(Identity::from(claims)),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid session token");
            None
        }
    }
}

fn full_path(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string())
}

impl FromRequest for Identity {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identify(req).ok_or_else(|| LoginRequired {
            next: full_path(req),
        }))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(identify(req))))
    }
}

/// A signed-in staff user. Other users get 403; anonymous visitors go to login.
pub struct StaffIdentity(pub Identity);

impl FromRequest for StaffIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match identify(req) {
            Some(identity) if identity.is_staff() => Ok(StaffIdentity(identity)),
            Some(identity) => {
                tracing::warn!(user = %identity.username, path = %req.path(), "Staff-only page refused");
                Err(AppError::Forbidden.into())
            }
            None => Err(LoginRequired {
                next: full_path(req),
            }
            .into()),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_keeps_slashes() {
        assert_eq!(login_redirect_url("/create/"), "/auth/login/?next=/create/");
        assert_eq!(
            login_redirect_url("/follow/?page=2"),
            "/auth/login/?next=/follow/%3Fpage%3D2"
        );
        assert_eq!(
            login_redirect_url("/profile/a b/follow/"),
            "/auth/login/?next=/profile/a%20b/follow/"
        );
        assert_eq!(
            login_redirect_url("/profile/Толстой/follow/"),
            "/auth/login/?next=/profile/%D0%A2%D0%BE%D0%BB%D1%81%D1%82%D0%BE%D0%B9/follow/"
        );
        assert_eq!(
            login_redirect_url("/profile/%D0%A2/follow/"),
            "/auth/login/?next=/profile/%25D0%25A2/follow/"
        );
    }
}
