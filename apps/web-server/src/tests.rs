//! HTTP behavior against an in-memory `AppState`.

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::Value;

use yatube_core::domain::{Group, Post, User};
use yatube_core::ports::{ADMIN_ROLE, PostFilter};

use crate::config::SiteSettings;
use crate::handlers;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

const GIF: &[u8] = b"GIF89a\x02\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff!\xf9\x04\x00\x00\x00\x00\x00,\x00\x00\x00\x00\x02\x00\x01\x00\x00\x02\x02\x0c\n\x00;";

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state.clone()))
                .configure(handlers::configure_routes),
        )
        .await
    };
}

fn state() -> AppState {
    AppState::in_memory(SiteSettings::default())
}

/// Insert a user directly and return it with a bearer header value.
async fn user(state: &AppState, username: &str, staff: bool) -> (User, String) {
    let mut user = User::new(username.into(), format!("{}@example.com", username), String::new());
    user.is_staff = staff;
    let user = state.blog.repositories().users.insert(user).await.unwrap();
    let roles = if staff { vec![ADMIN_ROLE.to_string()] } else { vec![] };
    let token = state
        .tokens
        .generate_token(user.id, &user.username, roles)
        .unwrap();
    (user, format!("Bearer {}", token))
}

async fn group(state: &AppState, slug: &str) -> Group {
    let group = Group::new(format!("Group {}", slug), slug.into(), "About".into());
    state.blog.repositories().groups.insert(group).await.unwrap()
}

async fn post(state: &AppState, author: &User, text: &str, group: Option<&Group>) -> Post {
    let post = Post::new(author.id, text.into(), group.map(|g| g.id), None);
    state.blog.repositories().posts.insert(post).await.unwrap()
}

async fn stored_post(state: &AppState, id: i32) -> Option<Post> {
    state.blog.repositories().posts.find_by_id(id).await.unwrap()
}

fn location(resp: &actix_web::dev::ServiceResponse) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn multipart(fields: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "yatube-test-boundary";
    let mut body = Vec::new();
    for (name, file_name, data) in fields {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    name, file_name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    (format!("multipart/form-data; boundary={}", boundary), body)
}

#[actix_web::test]
async fn test_login_required_pages_redirect_with_next() {
    let state = state();
    let app = app!(state);

    for (method, uri) in [
        ("GET", "/create/"),
        ("GET", "/follow/"),
        ("POST", "/posts/1/comment/"),
        ("POST", "/profile/leo/follow/"),
        ("GET", "/posts/1/edit/"),
    ] {
        let req = match method {
            "GET" => test::TestRequest::get(),
            _ => test::TestRequest::post(),
        };
        let resp = test::call_service(&app, req.uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{}", uri);
        assert_eq!(location(&resp), format!("/auth/login/?next={}", uri));
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/create/")
            .insert_header((header::AUTHORIZATION, "Bearer garbage"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[actix_web::test]
async fn test_public_pages() {
    let state = state();
    let (author, _) = user(&state, "leo", false).await;
    let cats = group(&state, "cats").await;
    let post = post(&state, &author, "Hello", Some(&cats)).await;
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/group/cats/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["group"]["slug"], "cats");
    assert_eq!(body["page_obj"]["object_list"][0]["text"], "Hello");
    assert_eq!(body["page_obj"]["object_list"][0]["author"]["username"], "leo");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/profile/leo/").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["following"], false);

    let uri = format!("/posts/{}/", post.id);
    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["post"]["id"], post.id);
    assert!(body["form"].is_null());

    for uri in ["/group/dogs/", "/profile/ghost/", "/posts/999/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn test_unknown_path_is_problem_json() {
    let state = state();
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/nowhere/")
            .insert_header(("x-request-id", "abc-123"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["instance"], "/nowhere/");
    assert_eq!(body["request_id"], "abc-123");
}

#[actix_web::test]
async fn test_group_pages_of_ten_and_three() {
    let state = state();
    let (author, _) = user(&state, "leo", false).await;
    let cats = group(&state, "cats").await;
    for i in 0..13 {
        post(&state, &author, &format!("post {}", i), Some(&cats)).await;
    }
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/group/cats/").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["page_obj"]["object_list"].as_array().unwrap().len(), 10);
    assert_eq!(body["page_obj"]["num_pages"], 2);
    assert_eq!(body["page_obj"]["object_list"][0]["text"], "post 12");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/group/cats/?page=2").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["page_obj"]["object_list"].as_array().unwrap().len(), 3);
    assert_eq!(body["page_obj"]["has_previous"], true);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/group/cats/?page=abc").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["page_obj"]["number"], 1);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/group/cats/?page=1&page=2").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["page_obj"]["number"], 2);
    assert_eq!(body["page_obj"]["object_list"].as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn test_non_ascii_username_redirects_are_encoded() {
    let state = state();
    let (_, author_bearer) = user(&state, "Толстой", false).await;
    let (_, reader_bearer) = user(&state, "anna", false).await;
    let app = app!(state);
    let profile = "/profile/%D0%A2%D0%BE%D0%BB%D1%81%D1%82%D0%BE%D0%B9/";

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .insert_header((header::AUTHORIZATION, author_bearer))
            .set_form([("text", "War and peace")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), profile);

    let resp = test::call_service(&app, test::TestRequest::get().uri(profile).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    for action in ["follow", "unfollow"] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("{}{}/", profile, action))
                .insert_header((header::AUTHORIZATION, reader_bearer.clone()))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{}", action);
        assert_eq!(location(&resp), profile);
    }
}

#[actix_web::test]
async fn test_create_post_from_urlencoded_form() {
    let state = state();
    let (author, bearer) = user(&state, "leo", false).await;
    let cats = group(&state, "cats").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/create/")
            .insert_header((header::AUTHORIZATION, bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["is_edit"], false);
    assert_eq!(body["groups"][0]["slug"], "cats");

    let group_id = cats.id.to_string();
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .insert_header((header::AUTHORIZATION, bearer))
            .set_form([("text", "  Fresh post  "), ("group", group_id.as_str())])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo/");

    let posts = state.blog.repositories().posts.list(&PostFilter::All, 0, 10).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].text, "Fresh post");
    assert_eq!(posts[0].author_id, author.id);
    assert_eq!(posts[0].group_id, Some(cats.id));
    assert_eq!(posts[0].image, None);
}

#[actix_web::test]
async fn test_create_post_with_image_upload() {
    let state = state();
    let (_, bearer) = user(&state, "leo", false).await;
    let app = app!(state);

    let (content_type, body) = multipart(&[
        ("text", None, b"With a picture"),
        ("group", None, b""),
        ("image", Some("small.gif"), GIF),
    ]);
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .insert_header((header::AUTHORIZATION, bearer))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let posts = state.blog.repositories().posts.list(&PostFilter::All, 0, 10).await.unwrap();
    assert_eq!(posts[0].text, "With a picture");
    assert_eq!(posts[0].group_id, None);
    assert_eq!(posts[0].image.as_deref(), Some("posts/small.gif"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/media/posts/small.gif").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/gif");
    assert_eq!(test::read_body(resp).await.as_ref(), GIF);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/media/posts/missing.gif").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_invalid_post_form_is_redisplayed() {
    let state = state();
    let (_, bearer) = user(&state, "leo", false).await;
    let app = app!(state);

    let (content_type, body) = multipart(&[
        ("text", None, b"   "),
        ("image", Some("notes.gif"), b"plain text, not an image"),
    ]);
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .insert_header((header::AUTHORIZATION, bearer))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["text"].is_array());
    assert!(body["errors"]["image"].is_array());

    let count = state.blog.repositories().posts.count(&PostFilter::All).await.unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn test_edit_by_non_author_redirects_without_changes() {
    let state = state();
    let (author, author_bearer) = user(&state, "leo", false).await;
    let (_, intruder_bearer) = user(&state, "anna", false).await;
    let original = post(&state, &author, "Original", None).await;
    let app = app!(state);
    let uri = format!("/posts/{}/edit/", original.id);
    let detail = format!("/posts/{}/", original.id);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, intruder_bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, intruder_bearer))
            .set_form([("text", "Hijacked")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail);
    assert_eq!(stored_post(&state, original.id).await.unwrap(), original);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, author_bearer.clone()))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["is_edit"], true);
    assert_eq!(body["form"]["text"], "Original");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, author_bearer))
            .set_form([("text", "Edited")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail);
    let edited = stored_post(&state, original.id).await.unwrap();
    assert_eq!(edited.text, "Edited");
    assert_eq!(edited.pub_date, original.pub_date);
    assert_eq!(edited.author_id, author.id);
}

#[actix_web::test]
async fn test_comment_redirects_either_way() {
    let state = state();
    let (author, _) = user(&state, "leo", false).await;
    let (_, bearer) = user(&state, "anna", false).await;
    let target = post(&state, &author, "Post", None).await;
    let app = app!(state);
    let uri = format!("/posts/{}/comment/", target.id);

    for text in ["Nice post", ""] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&uri)
                .insert_header((header::AUTHORIZATION, bearer.clone()))
                .set_form([("text", text)])
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), format!("/posts/{}/", target.id));
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/", target.id))
            .insert_header((header::AUTHORIZATION, bearer.clone()))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);
    assert_eq!(body["comments"][0]["text"], "Nice post");
    assert_eq!(body["form"]["text"], "");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/999/comment/")
            .insert_header((header::AUTHORIZATION, bearer))
            .set_form([("text", "Hello?")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_follow_twice_then_feed_and_unfollow() {
    let state = state();
    let (followed, _) = user(&state, "leo", false).await;
    let (other, _) = user(&state, "fedor", false).await;
    let (_, bearer) = user(&state, "anna", false).await;
    post(&state, &followed, "From leo", None).await;
    post(&state, &other, "From fedor", None).await;
    let app = app!(state);

    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/profile/leo/follow/")
                .insert_header((header::AUTHORIZATION, bearer.clone()))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/profile/leo/");
    }
    assert_eq!(state.blog.repositories().follows.list(None).await.unwrap().len(), 1);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/leo/")
            .insert_header((header::AUTHORIZATION, bearer.clone()))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["following"], true);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/follow/")
            .insert_header((header::AUTHORIZATION, bearer.clone()))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let feed = body["page_obj"]["object_list"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["text"], "From leo");

    for uri in ["/profile/fedor/unfollow/", "/profile/leo/unfollow/", "/profile/leo/unfollow/"] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(uri)
                .insert_header((header::AUTHORIZATION, bearer.clone()))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
    }
    assert!(state.blog.repositories().follows.list(None).await.unwrap().is_empty());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/ghost/follow/")
            .insert_header((header::AUTHORIZATION, bearer))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_home_page_is_cached_until_cleared() {
    let state = state();
    let (author, _) = user(&state, "leo", false).await;
    let (_, staff) = user(&state, "admin", true).await;
    let doomed = post(&state, &author, "Soon deleted", None).await;
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.headers().get("x-cache").unwrap(), "MISS");
    let first = test::read_body(resp).await;

    state.blog.admin_delete_post(doomed.id).await.unwrap();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.headers().get("x-cache").unwrap(), "HIT");
    assert_eq!(test::read_body(resp).await, first);

    // Each query string is its own entry.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/?page=1").to_request()).await;
    assert_eq!(resp.headers().get("x-cache").unwrap(), "MISS");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/cache/clear/")
            .insert_header((header::AUTHORIZATION, staff))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.headers().get("x-cache").unwrap(), "MISS");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["page_obj"]["count"], 0);
}

#[actix_web::test]
async fn test_signup_login_and_cookie_session() {
    let state = state();
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/signup/")
            .set_form([
                ("username", "leo"),
                ("email", "leo@example.com"),
                ("password", "war-and-peace"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(resp.response().cookies().any(|c| c.name() == "session"));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/signup/")
            .set_form([
                ("username", "leo"),
                ("email", "other@example.com"),
                ("password", "war-and-peace"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([("username", "leo"), ("password", "wrong-password")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([("username", "leo"), ("password", "war-and-peace"), ("next", "/create/")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/create/");
    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .map(|c| c.value().to_string())
        .unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/create/")
            .cookie(Cookie::new("session", session))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::post().uri("/auth/logout/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[actix_web::test]
async fn test_admin_console_is_staff_only() {
    let state = state();
    let (_, member) = user(&state, "leo", false).await;
    let (_, staff) = user(&state, "admin", true).await;
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/admin/groups/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/admin/groups/");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/admin/groups/")
            .insert_header((header::AUTHORIZATION, member))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let create = |slug: &str| {
        test::TestRequest::post()
            .uri("/admin/groups/")
            .insert_header((header::AUTHORIZATION, staff.clone()))
            .set_json(serde_json::json!({
                "title": "Cats",
                "slug": slug,
                "description": "All about cats",
            }))
            .to_request()
    };

    let resp = test::call_service(&app, create("cats")).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["slug"], "cats");

    let resp = test::call_service(&app, create("cats")).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(&app, create("not a slug")).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["slug"].is_array());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/admin/groups/?q=Cat")
            .insert_header((header::AUTHORIZATION, staff.clone()))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_health() {
    let state = state();
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}
