// src/services/auth_service.rs
// DOCUMENTATION: Registration and credential checks
// PURPOSE: argon2 hashing kept off the async workers

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::errors::AppError;
use crate::models::{NewUser, RegisterForm, User};
use crate::state::AppState;

pub struct AuthService;

impl AuthService {
    /// Hash a password into a PHC string with a random salt
    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Unhandled(format!("Password hashing failed: {}", e)))
    }

    /// False for a wrong password or an unparsable hash
    pub fn verify_password(password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                log::error!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }

    /// Create an account from a validated form
    pub async fn register(state: &AppState, form: RegisterForm) -> Result<User, AppError> {
        let password = form.password;
        let password_hash = tokio::task::spawn_blocking(move || Self::hash_password(&password))
            .await
            .map_err(|e| AppError::Unhandled(format!("Hashing task failed: {}", e)))??;

        state
            .users
            .create_user(&NewUser {
                username: form.username,
                email: form.email.to_lowercase(),
                password_hash,
            })
            .await
    }

    /// The user when username and password match
    pub async fn authenticate(
        state: &AppState,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let user = match state.users.find_by_username(username.trim()).await? {
            Some(user) => user,
            None => {
                log::info!("Login attempt for unknown user '{}'", username);
                return Ok(None);
            }
        };

        let password = password.to_string();
        let hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || Self::verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Unhandled(format!("Verification task failed: {}", e)))?;

        if valid {
            Ok(Some(user))
        } else {
            log::info!("Wrong password for user '{}'", user.username);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_state;

    #[test]
    fn hashes_verify_and_are_salted() {
        let first = AuthService::hash_password("hunter22").unwrap();
        let second = AuthService::hash_password("hunter22").unwrap();
        assert_ne!(first, second);
        assert!(AuthService::verify_password("hunter22", &first));
        assert!(!AuthService::verify_password("hunter23", &first));
        assert!(!AuthService::verify_password("hunter22", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn authenticate_checks_username_and_password() {
        let state = memory_state();
        AuthService::register(
            &state,
            RegisterForm {
                username: "falcon".into(),
                email: "Falcon@Example.com".into(),
                password: "secret1".into(),
            },
        )
        .await
        .unwrap();

        let user = AuthService::authenticate(&state, "falcon", "secret1").await.unwrap();
        assert_eq!(user.unwrap().email, "falcon@example.com");
        assert!(AuthService::authenticate(&state, "falcon", "wrong!!").await.unwrap().is_none());
        assert!(AuthService::authenticate(&state, "nobody", "secret1").await.unwrap().is_none());
    }
}
