#![allow(dead_code, unused_macros)]

use actix_web::test::TestRequest;
use ems::config::{Config, MIN_JWT_SECRET_LEN};
use ems::db::{Stores, connect_sqlite, run_sqlite_migrations};
use ems::state::AppState;
use serde_json::{Value, json};
use std::net::SocketAddr;

pub const TEST_SECRET: &str = "test-secret-test-secret-test-secret!";

pub fn test_config() -> Config {
    assert!(TEST_SECRET.len() >= MIN_JWT_SECRET_LEN);
    Config {
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        jwt_secret: TEST_SECRET.to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        access_token_ttl: 3600,
        // cheap argon2 so the suite stays fast
        hash_memory_kib: 1024,
        hash_iterations: 1,
        hash_parallelism: 1,
        username_cache_capacity: 1000,
        rate_signin_per_min: 10_000,
        rate_signup_per_min: 10_000,
        rate_reset_per_min: 10_000,
        rate_protected_per_min: 10_000,
        api_prefix: "/api".to_string(),
        log_dir: "logs".to_string(),
        log_level: tracing::Level::DEBUG,
    }
}

pub struct TestApp {
    pub config: Config,
    pub stores: Stores,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let pool = connect_sqlite(&config.database_url, 1)
            .await
            .expect("Failed to open test db");
        run_sqlite_migrations(&pool)
            .await
            .expect("Failed to migrate test db");

        let stores = Stores::sqlite(pool, config.username_cache_capacity);
        let state = AppState::new(&config, stores.clone()).expect("Failed to build state");

        Self {
            config,
            stores,
            state,
        }
    }
}

/// Builds the actix service for a `TestApp`, wired exactly like `main`.
macro_rules! init_app {
    ($app:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::NormalizePath::trim())
                .app_data(actix_web::web::Data::new($app.state.clone()))
                .configure(|cfg| ems::routes::configure(cfg, &$app.config)),
        )
        .await
    };
}

/// Sends a `TestRequest` and returns `(status, json body)`; non-JSON bodies read as `Null`.
macro_rules! send {
    ($srv:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$srv, $req.to_request()).await;
        let status = resp.status();
        let bytes = actix_web::test::read_body(resp).await;
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }};
}

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

pub fn get(uri: &str) -> TestRequest {
    TestRequest::get().uri(uri).peer_addr(peer())
}

pub fn post(uri: &str) -> TestRequest {
    TestRequest::post().uri(uri).peer_addr(peer())
}

pub fn put(uri: &str) -> TestRequest {
    TestRequest::put().uri(uri).peer_addr(peer())
}

pub fn delete(uri: &str) -> TestRequest {
    TestRequest::delete().uri(uri).peer_addr(peer())
}

pub fn authed(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header(("Authorization", format!("Bearer {token}")))
}

pub fn credentials(username: &str, password: &str) -> Value {
    json!({ "userName": username, "password": password })
}

pub fn employee(first: &str, last: &str, email: &str) -> Value {
    json!({ "firstName": first, "lastName": last, "email": email })
}
