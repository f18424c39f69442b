//! Sign-up, login and logout.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{Either, HttpResponse, web};

use yatube_core::domain::User;
use yatube_core::forms::SignupForm;
use yatube_core::ports::ADMIN_ROLE;
use yatube_shared::dto::{AuthResponse, LoginPage, LoginRequest, SignupRequest, UserResponse};

use super::redirect;
use crate::middleware::auth::{Identity, SESSION_COOKIE};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Only local paths are followed after login.
fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| {
        n.starts_with('/')
            && !n.starts_with("//")
            && !n.contains('\\')
            && n.bytes().all(|b| b.is_ascii_graphic())
    })
}

fn body<T>(body: Either<web::Form<T>, web::Json<T>>) -> T {
    match body {
        Either::Left(web::Form(inner)) => inner,
        Either::Right(web::Json(inner)) => inner,
    }
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let roles = if user.is_staff {
        vec![ADMIN_ROLE.to_string()]
    } else {
        Vec::new()
    };
    let token = state
        .tokens
        .generate_token(user.id, &user.username, roles)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
        user: UserResponse {
            id: user.id.to_string(),
            username: user.username.clone(),
            is_staff: user.is_staff,
        },
    })
}

/// POST /auth/signup/ - creates the account, signs it in and goes home.
pub async fn signup(
    state: web::Data<AppState>,
    req: Either<web::Form<SignupRequest>, web::Json<SignupRequest>>,
) -> AppResult<HttpResponse> {
    let req = body(req);
    let user = state
        .accounts
        .signup(SignupForm {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    let auth = issue_token(&state, &user)?;
    Ok(HttpResponse::Found()
        .insert_header((actix_web::http::header::LOCATION, "/"))
        .cookie(session_cookie(auth.access_token))
        .finish())
}

/// GET /auth/login/
pub async fn login_page(query: web::Query<LoginPage>) -> HttpResponse {
    HttpResponse::Ok().json(query.into_inner())
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    req: Either<web::Form<LoginRequest>, web::Json<LoginRequest>>,
) -> AppResult<HttpResponse> {
    let req = body(req);
    let user = state.accounts.authenticate(&req.username, &req.password).await?;
    let auth = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

    let cookie = session_cookie(auth.access_token.clone());
    match safe_next(req.next.as_deref()) {
        Some(next) => {
            let mut response = redirect(next);
            response
                .add_cookie(&cookie)
                .map_err(|e| AppError::Internal(e.to_string()))?;
            Ok(response)
        }
        None => Ok(HttpResponse::Ok().cookie(cookie).json(auth)),
    }
}

/// /auth/logout/ - drops the session cookie.
pub async fn logout() -> HttpResponse {
    let mut cookie = session_cookie(String::new());
    cookie.make_removal();
    HttpResponse::Found()
        .insert_header((actix_web::http::header::LOCATION, "/"))
        .cookie(cookie)
        .finish()
}

/// GET /auth/me/
pub async fn me(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse {
        id: identity.user_id.to_string(),
        is_staff: identity.is_staff(),
        username: identity.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_local_next_is_followed() {
        assert_eq!(safe_next(Some("/create/")), Some("/create/"));
        assert_eq!(safe_next(Some("//evil.example/")), None);
        assert_eq!(safe_next(Some("https://evil.example/")), None);
        assert_eq!(safe_next(None), None);
        assert_eq!(safe_next(Some("/profile/Толстой/")), None);
        assert_eq!(
            safe_next(Some("/profile/%D0%A2/")),
            Some("/profile/%D0%A2/")
        );
    }
}
