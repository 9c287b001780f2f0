use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::SignupError;
use crate::capabilities::AuthError;
use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Authentication,
    Validation,
    Configuration,
    InvalidState,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Authentication => "AUTH_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::Configuration => "CONFIG_ERROR",
            Self::InvalidState => "INVALID_STATE",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Network => ErrorSeverity::Transient,
            Self::Configuration | Self::InvalidState => ErrorSeverity::Fatal,
            Self::Authentication | Self::Validation => ErrorSeverity::Permanent,
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Network)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable() && !matches!(self.severity, ErrorSeverity::Fatal)
    }

    /// Text safe to show the user. Form and auth errors already carry a
    /// user-ready message; everything else gets a generic one.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Validation | ErrorKind::Authentication => self.message.clone(),
            ErrorKind::Network => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            ErrorKind::Configuration => {
                "The app is misconfigured. Please reinstall or contact support.".into()
            }
            ErrorKind::InvalidState => {
                "The app is in an invalid state. Please restart the app.".into()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::new(ErrorKind::Configuration, e.to_string())
    }
}

impl From<SignupError> for AppError {
    fn from(e: SignupError) -> Self {
        Self::new(ErrorKind::Validation, e.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        Self::new(ErrorKind::Authentication, e.user_message())
            .with_internal(e.to_string())
            .with_context("auth_code", e.code.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod error_kind_tests {
        use super::*;

        #[test]
        fn test_codes_are_stable() {
            assert_eq!(ErrorKind::Network.code(), "NETWORK_ERROR");
            assert_eq!(ErrorKind::InvalidState.code(), "INVALID_STATE");
        }

        #[test]
        fn test_retryable_kinds() {
            assert!(ErrorKind::Network.is_retryable());
            assert!(!ErrorKind::Validation.is_retryable());
            assert!(!ErrorKind::Authentication.is_retryable());
        }
    }

    mod app_error_tests {
        use super::*;

        #[test]
        fn test_display_includes_internal() {
            let err = AppError::new(ErrorKind::Network, "offline").with_internal("dns failure");
            assert_eq!(err.to_string(), "[NETWORK_ERROR] offline (internal: dns failure)");
        }

        #[test]
        fn test_config_error_is_fatal() {
            let err: AppError = ConfigError::InvalidLatitudeDelta(0.0).into();
            assert_eq!(err.kind, ErrorKind::Configuration);
            assert_eq!(err.severity, ErrorSeverity::Fatal);
            assert!(!err.is_retryable());
        }

        #[test]
        fn test_validation_message_passes_through() {
            let err: AppError = SignupError::PasswordMismatch.into();
            assert_eq!(err.kind, ErrorKind::Validation);
            assert_eq!(err.user_facing_message(), "Passwords do not match");
        }

        #[test]
        fn test_auth_error_conversion() {
            let err: AppError = AuthError::new("auth/weak-password", "too short").into();
            assert_eq!(err.kind, ErrorKind::Authentication);
            assert_eq!(err.user_facing_message(), "Password is too weak");
            assert_eq!(
                err.context.get("auth_code").map(String::as_str),
                Some("auth/weak-password")
            );
        }
    }
}
