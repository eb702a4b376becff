// src/services/rate_limit.rs
// DOCUMENTATION: Per-client limiter for credential endpoints

use crate::errors::AppError;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

/// Keyed by client address
pub struct LoginRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl LoginRateLimiter {
    /// A zero limit is raised to one attempt per minute
    pub fn per_minute(limit: u32) -> Self {
        let limit = NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(limit)),
        }
    }

    pub fn check(&self, client: &str) -> Result<(), AppError> {
        self.limiter.check_key(&client.to_string()).map_err(|_| {
            log::warn!("Credential rate limit exceeded for {}", client);
            AppError::RateLimited
        })
    }

    /// Drop state for clients whose quota has fully replenished
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_applies_per_client() {
        let limiter = LoginRateLimiter::per_minute(2);
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(matches!(limiter.check("10.0.0.1"), Err(AppError::RateLimited)));
        assert!(limiter.check("10.0.0.2").is_ok());
    }
}
