//! Input validation for account registration and login bodies.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;

/// Default minimum password length when none is configured.
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 6;

/// Body of `POST /auth/register`.
///
/// Missing fields decode as empty strings so they surface as validation
/// errors (400) rather than body-decoding rejections.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    /// Check field formats and the password length policy.
    pub fn check(&self, password_min_length: usize) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("Invalid registration data: name is required".into()));
        }
        self.validate().map_err(|e| {
            tracing::debug!(error = %e, "Registration body failed validation");
            CoreError::Validation(format!("Invalid registration data: {e}"))
        })?;
        if self.password.chars().count() < password_min_length {
            return Err(CoreError::Validation(format!(
                "Invalid registration data: password must be at least {password_min_length} characters long"
            )));
        }
        Ok(())
    }
}

impl LoginRequest {
    pub fn check(&self) -> Result<(), CoreError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(CoreError::Validation("email and password are required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(request("Ana", "ana@example.com", "secret1").check(6).is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        assert_matches!(
            request("   ", "ana@example.com", "secret1").check(6),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn malformed_email_rejected() {
        assert_matches!(
            request("Ana", "not-an-email", "secret1").check(6),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn short_password_rejected() {
        let err = request("Ana", "ana@example.com", "abc").check(6).unwrap_err();
        assert!(err.to_string().contains("at least 6 characters"));
    }

    #[test]
    fn missing_fields_decode_as_empty() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_matches!(req.check(6), Err(CoreError::Validation(_)));

        let login: LoginRequest =
            serde_json::from_value(serde_json::json!({ "email": "a@b.co" })).unwrap();
        assert_matches!(login.check(), Err(CoreError::Validation(_)));
    }
}
