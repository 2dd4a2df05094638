#[macro_use]
mod common;

use actix_web::http::StatusCode;
use chrono::{Duration, Utc};
use common::{TestApp, authed, credentials, get, post};
use ems::auth::jwt::TokenService;
use serde_json::json;

#[actix_web::test]
async fn signup_returns_a_bearer_token() {
    let app = TestApp::new().await;
    let srv = init_app!(app);

    let (status, body) = send!(srv, post("/auth/signup").set_json(credentials("alice", "pw1")));

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["userName"], "alice");
    assert!(body["userId"].as_i64().is_some());

    let token = body["token"].as_str().unwrap();
    assert!(!token.is_empty());
    assert_eq!(app.state.identity.resolve(token).await.unwrap().username, "alice");
}

#[actix_web::test]
async fn signup_with_a_taken_username_conflicts() {
    let app = TestApp::new().await;
    let srv = init_app!(app);

    let (status, _) = send!(srv, post("/auth/signup").set_json(credentials("alice", "pw1")));
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(srv, post("/auth/signup").set_json(credentials("alice", "other")));
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username is already taken.");

    // the original password still works
    let (status, _) = send!(srv, post("/auth/signin").set_json(credentials("alice", "pw1")));
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn usernames_are_case_sensitive() {
    let app = TestApp::new().await;
    let srv = init_app!(app);

    let (first, _) = send!(srv, post("/auth/signup").set_json(credentials("alice", "pw1")));
    let (second, _) = send!(srv, post("/auth/signup").set_json(credentials("Alice", "pw2")));

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CREATED);
}

#[actix_web::test]
async fn signup_rejects_blank_and_missing_fields() {
    let app = TestApp::new().await;
    let srv = init_app!(app);

    let (status, body) = send!(srv, post("/auth/signup").set_json(credentials("  ", "pw")));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username is required");

    let (status, _) = send!(srv, post("/auth/signup").set_json(credentials("bob", "")));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send!(srv, post("/auth/signup").set_json(json!({ "userName": "bob" })));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let long_name = "x".repeat(51);
    let (status, _) = send!(srv, post("/auth/signup").set_json(credentials(&long_name, "pw")));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn signup_accepts_the_plain_username_key() {
    let app = TestApp::new().await;
    let srv = init_app!(app);

    let (status, body) = send!(
        srv,
        post("/auth/signup").set_json(json!({ "username": "carol", "password": "pw" }))
    );

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["userName"], "carol");
}

#[actix_web::test]
async fn signin_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    let srv = init_app!(app);
    send!(srv, post("/auth/signup").set_json(credentials("alice", "pw1")));

    let (wrong_status, wrong_body) =
        send!(srv, post("/auth/signin").set_json(credentials("alice", "nope")));
    let (unknown_status, unknown_body) =
        send!(srv, post("/auth/signin").set_json(credentials("mallory", "nope")));

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["error"], "Invalid username or password");
}

#[actix_web::test]
async fn signin_issues_a_token_for_the_same_user() {
    let app = TestApp::new().await;
    let srv = init_app!(app);

    let (_, signed_up) = send!(srv, post("/auth/signup").set_json(credentials("alice", "pw1")));
    let (status, signed_in) = send!(srv, post("/auth/signin").set_json(credentials("alice", "pw1")));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(signed_in["userId"], signed_up["userId"]);
    assert_eq!(signed_in["tokenType"], "Bearer");
}

#[actix_web::test]
async fn reset_password_swaps_the_credential_but_keeps_old_tokens() {
    let app = TestApp::new().await;
    let srv = init_app!(app);

    let (_, body) = send!(srv, post("/auth/signup").set_json(credentials("alice", "pw1")));
    let old_token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send!(
        srv,
        post("/auth/reset-password").set_json(json!({ "userName": "alice", "newPassword": "pw2" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password reset successfully");

    let (status, _) = send!(srv, post("/auth/signin").set_json(credentials("alice", "pw1")));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send!(srv, post("/auth/signin").set_json(credentials("alice", "pw2")));
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send!(srv, authed(get("/api/employees"), &old_token));
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn reset_password_for_unknown_user_is_not_found() {
    let app = TestApp::new().await;
    let srv = init_app!(app);

    let (status, body) = send!(
        srv,
        post("/auth/reset-password").set_json(json!({ "userName": "ghost", "newPassword": "pw" }))
    );

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[actix_web::test]
async fn protected_routes_require_a_bearer_token() {
    let app = TestApp::new().await;
    let srv = init_app!(app);

    let (status, body) = send!(srv, get("/api/employees"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = send!(
        srv,
        get("/api/employees").insert_header(("Authorization", "Basic YWxpY2U6cHcx"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send!(srv, authed(get("/api/employees"), "not-a-jwt"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn bearer_scheme_is_case_insensitive() {
    let app = TestApp::new().await;
    let srv = init_app!(app);

    let (_, body) = send!(srv, post("/auth/signup").set_json(credentials("alice", "pw1")));
    let token = body["token"].as_str().unwrap();

    for scheme in ["bearer", "BEARER", "Bearer"] {
        let (status, _) = send!(
            srv,
            get("/api/employees").insert_header(("Authorization", format!("{scheme} {token}")))
        );
        assert_eq!(status, StatusCode::OK, "scheme {scheme}");
    }
}

#[actix_web::test]
async fn tampered_and_foreign_tokens_are_rejected() {
    let app = TestApp::new().await;
    let srv = init_app!(app);

    let (_, body) = send!(srv, post("/auth/signup").set_json(credentials("alice", "pw1")));
    let token = body["token"].as_str().unwrap();

    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let payload = &mut parts[1];
    let mid = payload.len() / 2;
    let swapped = if &payload[mid..mid + 1] == "A" { "B" } else { "A" };
    payload.replace_range(mid..mid + 1, swapped);
    let tampered = parts.join(".");

    let (status, _) = send!(srv, authed(get("/api/employees"), &tampered));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut header_tampered = token.to_string().into_bytes();
    header_tampered[3] = if header_tampered[3] == b'A' { b'B' } else { b'A' };
    let header_tampered = String::from_utf8(header_tampered).unwrap();
    let (status, body) = send!(srv, authed(get("/api/employees"), &header_tampered));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let foreign = TokenService::new(b"another-secret-another-secret-another", 3600)
        .issue("alice")
        .unwrap();
    let (status, _) = send!(srv, authed(get("/api/employees"), &foreign.token));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn expired_tokens_are_rejected() {
    let app = TestApp::new().await;
    let srv = init_app!(app);
    send!(srv, post("/auth/signup").set_json(credentials("alice", "pw1")));

    let tokens = TokenService::new(common::TEST_SECRET.as_bytes(), 60);
    let stale = tokens
        .issue_at("alice", Utc::now() - Duration::hours(2))
        .unwrap();

    let (status, _) = send!(srv, authed(get("/api/employees"), &stale.token));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn tokens_for_unknown_users_are_rejected() {
    let app = TestApp::new().await;
    let srv = init_app!(app);

    let tokens = TokenService::new(common::TEST_SECRET.as_bytes(), 3600);
    let ghost = tokens.issue("ghost").unwrap();

    let (status, _) = send!(srv, authed(get("/api/employees"), &ghost.token));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
