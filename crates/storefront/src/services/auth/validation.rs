//! Request body validation for the auth endpoints.
//!
//! Failures are reported per field in the shape clients already parse:
//! `{value, msg, param, location}`.

use serde::Serialize;

use corner_shop_core::Email;

use super::AuthError;

pub const REGISTRATION_INVALID: &str = "Invalid registration data";
pub const LOGIN_INVALID: &str = "Invalid login data";

const MIN_PASSWORD_LENGTH: usize = 1;

/// One failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The submitted value. Passwords are never echoed.
    pub value: String,
    pub msg: &'static str,
    pub param: &'static str,
    pub location: &'static str,
}

impl FieldError {
    fn body(param: &'static str, value: impl Into<String>, msg: &'static str) -> Self {
        Self {
            value: value.into(),
            msg,
            param,
            location: "body",
        }
    }
}

/// Validated registration input.
#[derive(Debug)]
pub struct Registration<'a> {
    pub name: &'a str,
    pub email: Email,
    pub password: &'a str,
}

/// Validated login input.
#[derive(Debug)]
pub struct Login<'a> {
    pub email: Email,
    pub password: &'a str,
}

/// Check a registration body.
///
/// The email must be well-formed and the password at least one character.
///
/// # Errors
///
/// Returns `AuthError::Validation` listing every failed field.
pub fn validate_registration<'a>(
    name: Option<&'a str>,
    email: Option<&str>,
    password: Option<&'a str>,
) -> Result<Registration<'a>, AuthError> {
    let mut errors = Vec::new();

    let email = check_email(email, "Invalid email", &mut errors);

    let password = match password {
        Some(p) if p.chars().count() >= MIN_PASSWORD_LENGTH => Some(p),
        _ => {
            errors.push(FieldError::body(
                "password",
                "",
                "Password must be at least 1 character",
            ));
            None
        }
    };

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok(Registration {
            name: name.unwrap_or_default(),
            email,
            password,
        }),
        _ => Err(AuthError::Validation {
            errors,
            message: REGISTRATION_INVALID,
        }),
    }
}

/// Check a login body.
///
/// The email is normalized before the format check. The password only has
/// to be present; an empty string passes and fails later at comparison.
///
/// # Errors
///
/// Returns `AuthError::Validation` listing every failed field.
pub fn validate_login<'a>(
    email: Option<&str>,
    password: Option<&'a str>,
) -> Result<Login<'a>, AuthError> {
    let mut errors = Vec::new();

    let email = check_email(email, "Enter a valid email", &mut errors);

    if password.is_none() {
        errors.push(FieldError::body("password", "", "Enter a password"));
    }

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok(Login { email, password }),
        _ => Err(AuthError::Validation {
            errors,
            message: LOGIN_INVALID,
        }),
    }
}

fn check_email(
    email: Option<&str>,
    msg: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<Email> {
    let raw = email.unwrap_or_default();
    match Email::parse_normalized(raw) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.push(FieldError::body("email", raw, msg));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_errors(err: AuthError) -> (Vec<FieldError>, &'static str) {
        match err {
            AuthError::Validation { errors, message } => (errors, message),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_registration_accepts_one_character_password() {
        let reg = validate_registration(Some("Ann"), Some("ann@shop.io"), Some("x"))
            .expect("valid registration");
        assert_eq!(reg.email.as_str(), "ann@shop.io");
        assert_eq!(reg.password, "x");
    }

    #[test]
    fn test_registration_rejects_empty_password() {
        let err = validate_registration(Some("Ann"), Some("ann@shop.io"), Some("")).unwrap_err();
        let (errors, message) = field_errors(err);
        assert_eq!(message, REGISTRATION_INVALID);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].param, "password");
        assert_eq!(errors[0].location, "body");
    }

    #[test]
    fn test_registration_reports_every_bad_field() {
        let err = validate_registration(None, Some("nope"), None).unwrap_err();
        let (errors, _) = field_errors(err);
        let params: Vec<_> = errors.iter().map(|e| e.param).collect();
        assert_eq!(params, ["email", "password"]);
        assert_eq!(errors[0].value, "nope");
    }

    #[test]
    fn test_password_value_is_not_echoed() {
        let err = validate_registration(Some("Ann"), Some("bad"), Some("")).unwrap_err();
        let (errors, _) = field_errors(err);
        assert!(errors.iter().all(|e| e.param != "password" || e.value.is_empty()));
    }

    #[test]
    fn test_login_normalizes_email() {
        let login = validate_login(Some("  John.Doe+shop@GMAIL.com"), Some("pw")).expect("valid");
        assert_eq!(login.email.as_str(), "johndoe@gmail.com");
    }

    #[test]
    fn test_login_allows_empty_password_but_not_missing() {
        assert!(validate_login(Some("a@b.io"), Some("")).is_ok());

        let (errors, message) = field_errors(validate_login(Some("a@b.io"), None).unwrap_err());
        assert_eq!(message, LOGIN_INVALID);
        assert_eq!(errors[0].param, "password");
    }

    #[test]
    fn test_field_error_serializes_in_client_shape() {
        let json = serde_json::to_value(FieldError::body("email", "x", "Invalid email"))
            .expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"value": "x", "msg": "Invalid email", "param": "email", "location": "body"})
        );
    }
}
