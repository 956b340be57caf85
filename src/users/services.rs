use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use tracing::error;

use crate::error::AppError;
use crate::users::dto::CreateUserRequest;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Field checks applied before hashing. Email uniqueness is not checked
/// here; the database constraint owns it.
pub(crate) fn validate_new_user(payload: &CreateUserRequest) -> Result<(), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::invalid_params("Name must not be empty"));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::invalid_params("Invalid email"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_params(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

/// Hash on the blocking pool so the request task is not held while Argon2
/// runs.
pub async fn hash_password(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    })
    .await?
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}


#[cfg(test)]
mod validation_tests {
    use super::*;

    fn payload(name: &str, email: &str, password: &str) -> CreateUserRequest {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "email": email,
            "password": password
        }))
        .expect("payload deserializes")
    }

    fn assert_invalid(result: Result<(), AppError>, fragment: &str) {
        match result {
            Err(AppError::InvalidParameters(message)) => {
                assert!(message.contains(fragment), "unexpected message: {message}")
            }
            other => panic!("expected InvalidParameters, got {other:?}"),
        }
    }

    #[test]
    fn accepts_a_well_formed_payload() {
        assert!(validate_new_user(&payload("Ada", "ada@example.com", "12345678")).is_ok());
    }

    #[test]
    fn rejects_blank_name() {
        assert_invalid(
            validate_new_user(&payload("   ", "ada@example.com", "12345678")),
            "Name",
        );
    }

    #[test]
    fn rejects_malformed_email() {
        assert_invalid(
            validate_new_user(&payload("Ada", "not-an-email", "12345678")),
            "email",
        );
    }

    #[test]
    fn rejects_short_password() {
        assert_invalid(
            validate_new_user(&payload("Ada", "ada@example.com", "1234567")),
            "Password",
        );
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("user@wolox.com.ar"));
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user @example.com"));
        assert!(!is_valid_email("@example.com"));
    }
}
