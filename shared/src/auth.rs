//! Sign-up / sign-in form state.
//!
//! Passwords are held as [`SecretString`] so they never show up in `Debug`
//! output of the model, and are only exposed when the credentials are handed
//! to the identity provider.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::AuthUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SignupError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Credentials ready to be sent to the provider.
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        let password = self.password.expose_secret().clone();
        (self.email, password)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupField {
    Email,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigninField {
    Email,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    password: Option<SecretString>,
    confirm_password: Option<SecretString>,
    pub newsletter_opt_in: bool,
    pub submitting: bool,
}

impl SignupForm {
    pub fn set_field(&mut self, field: SignupField, value: String) {
        match field {
            SignupField::Email => self.email = value,
            SignupField::Password => self.password = Some(SecretString::new(value)),
            SignupField::ConfirmPassword => {
                self.confirm_password = Some(SecretString::new(value));
            }
        }
    }

    /// Checks completeness before matching, so an empty form reports
    /// missing fields rather than a mismatch.
    pub fn validate(&self) -> Result<Credentials, SignupError> {
        let password = secret_text(self.password.as_ref());
        let confirm = secret_text(self.confirm_password.as_ref());

        if self.email.is_empty() || password.is_empty() || confirm.is_empty() {
            return Err(SignupError::MissingFields);
        }
        if password != confirm {
            return Err(SignupError::PasswordMismatch);
        }

        Ok(Credentials {
            email: self.email.clone(),
            password: SecretString::new(password.to_string()),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct SigninForm {
    pub email: String,
    password: Option<SecretString>,
    pub submitting: bool,
}

impl SigninForm {
    pub fn set_field(&mut self, field: SigninField, value: String) {
        match field {
            SigninField::Email => self.email = value,
            SigninField::Password => self.password = Some(SecretString::new(value)),
        }
    }

    pub fn validate(&self) -> Result<Credentials, SignupError> {
        let password = secret_text(self.password.as_ref());
        if self.email.is_empty() || password.is_empty() {
            return Err(SignupError::MissingFields);
        }
        Ok(Credentials {
            email: self.email.clone(),
            password: SecretString::new(password.to_string()),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn secret_text(secret: Option<&SecretString>) -> &str {
    secret.map_or("", |s| s.expose_secret().as_str())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: Option<String>,
}

impl From<AuthUser> for Session {
    fn from(user: AuthUser) -> Self {
        Self {
            uid: user.uid,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(email: &str, password: &str, confirm: &str) -> SignupForm {
        let mut form = SignupForm::default();
        form.set_field(SignupField::Email, email.into());
        form.set_field(SignupField::Password, password.into());
        form.set_field(SignupField::ConfirmPassword, confirm.into());
        form
    }

    mod signup_tests {
        use super::*;

        #[test]
        fn test_empty_form_is_missing_fields() {
            assert_eq!(
                SignupForm::default().validate().unwrap_err(),
                SignupError::MissingFields
            );
        }

        #[test]
        fn test_any_empty_field_is_missing_fields() {
            assert_eq!(
                filled("", "pw", "pw").validate().unwrap_err(),
                SignupError::MissingFields
            );
            assert_eq!(
                filled("a@b.co", "pw", "").validate().unwrap_err(),
                SignupError::MissingFields
            );
        }

        #[test]
        fn test_mismatch() {
            let err = filled("a@b.co", "secret1", "secret2").validate().unwrap_err();
            assert_eq!(err, SignupError::PasswordMismatch);
            assert_eq!(err.to_string(), "Passwords do not match");
        }

        #[test]
        fn test_valid_form_yields_credentials() {
            let (email, password) = filled("a@b.co", "secret1", "secret1")
                .validate()
                .unwrap()
                .into_parts();
            assert_eq!(email, "a@b.co");
            assert_eq!(password, "secret1");
        }

        #[test]
        fn test_debug_hides_password() {
            let form = filled("a@b.co", "hunter2", "hunter2");
            assert!(!format!("{form:?}").contains("hunter2"));
            let credentials = form.validate().unwrap();
            assert!(!format!("{credentials:?}").contains("hunter2"));
        }
    }

    mod signin_tests {
        use super::*;

        #[test]
        fn test_signin_requires_both_fields() {
            let mut form = SigninForm::default();
            form.set_field(SigninField::Email, "a@b.co".into());
            assert_eq!(form.validate().unwrap_err(), SignupError::MissingFields);

            form.set_field(SigninField::Password, "pw".into());
            assert!(form.validate().is_ok());
        }

        #[test]
        fn test_clear_resets_form() {
            let mut form = SigninForm::default();
            form.set_field(SigninField::Email, "a@b.co".into());
            form.submitting = true;
            form.clear();
            assert!(form.email.is_empty());
            assert!(!form.submitting);
        }
    }
}
