// src/testing.rs
// DOCUMENTATION: Shared fixtures for unit and handler tests

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::test::TestRequest;
use actix_web::web;
use std::sync::{Arc, OnceLock};

use crate::config::{Config, StoreBackend};
use crate::db::MemoryStore;
use crate::models::{CampgroundForm, NewUser, User};
use crate::services::{AuthService, SESSION_COOKIE};
use crate::state::AppState;

pub const TEST_PASSWORD: &str = "password1";

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_address: "127.0.0.1".to_string(),
        server_port: 0,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        session_secret: "test-session-secret-with-enough-length".to_string(),
        session_ttl_secs: 3600,
        session_touch_after_secs: 600,
        session_purge_interval_secs: 3600,
        store_backend: StoreBackend::Memory,
        mapbox_token: String::new(),
        login_rate_limit_per_minute: 1000,
        trust_proxy_headers: false,
        db_max_connections: 1,
        db_connection_timeout: 1,
        run_migrations: false,
    }
}

pub fn memory_state() -> AppState {
    AppState::with_store(test_config(), Arc::new(MemoryStore::new()))
}

/// State for the app harness plus the store behind it, for assertions
pub fn memory_app_state() -> (web::Data<AppState>, Arc<MemoryStore>) {
    memory_app_state_with(test_config())
}

pub fn memory_app_state_with(config: Config) -> (web::Data<AppState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_store(config, store.clone());
    (web::Data::new(state), store)
}

/// A form that passes validation and needs no geocoder
pub fn sample_form(title: &str) -> CampgroundForm {
    CampgroundForm {
        title: Some(title.to_string()),
        price: Some(15.0),
        location: Some("Moab, Utah".to_string()),
        description: Some("Red rock country with dark skies".to_string()),
        images: Vec::new(),
        geometry: Some([-109.55, 38.57]),
        delete_images: Vec::new(),
    }
}

/// Hashing once keeps the suite fast
fn test_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| AuthService::hash_password(TEST_PASSWORD).unwrap())
}

/// User whose password is TEST_PASSWORD
pub async fn seed_user(state: &AppState, username: &str) -> User {
    state
        .users
        .create_user(&NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: test_password_hash().to_string(),
        })
        .await
        .unwrap()
}

pub fn login_request(username: &str) -> TestRequest {
    TestRequest::post()
        .uri("/login")
        .set_form([("username", username), ("password", TEST_PASSWORD)])
}

pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.into_owned())
}
