// src/services/session_service.rs
// DOCUMENTATION: Session token helpers and background maintenance

use actix_web::web;
use sha2::{Digest, Sha256};
use std::time::Duration;
use uuid::Uuid;

use crate::state::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Fresh opaque cookie token (two v4 UUIDs, 244 random bits)
pub fn new_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Store key for a cookie token; the secret makes keys unforgeable without it
pub fn session_key(secret: &str, token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b":");
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Start background purge task
/// DOCUMENTATION: Periodically removes expired sessions and idle limiter state
pub fn start_session_purge_task(state: web::Data<AppState>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));

        loop {
            interval.tick().await;
            match state.sessions.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => log::info!("Session purge: removed {} expired sessions", removed),
                Err(e) => log::warn!("Session purge failed: {}", e),
            }
            state.login_limiter.retain_recent();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_hex() {
        let a = new_token();
        let b = new_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn key_depends_on_secret() {
        let token = "abc";
        let key = session_key("one", token);
        assert_eq!(key, session_key("one", token));
        assert_ne!(key, session_key("two", token));
        assert_eq!(key.len(), 64);
    }
}
