use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum AuthOperation {
    CurrentUser,
    CreateUser { email: String, password: String },
    SignIn { email: String, password: String },
    SignOut,
}

// Passwords never reach logs.
impl std::fmt::Debug for AuthOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentUser => f.write_str("CurrentUser"),
            Self::CreateUser { email, .. } => f
                .debug_struct("CreateUser")
                .field("email", email)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::SignIn { email, .. } => f
                .debug_struct("SignIn")
                .field("email", email)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::SignOut => f.write_str("SignOut"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AuthOutput {
    User(Option<AuthUser>),
    SignedOut,
}

/// Error reported by the identity provider, keyed by its `auth/...` code.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct AuthError {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl AuthError {
    pub const INVALID_EMAIL: &'static str = "auth/invalid-email";
    pub const WEAK_PASSWORD: &'static str = "auth/weak-password";
    pub const EMAIL_IN_USE: &'static str = "auth/email-already-in-use";

    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self.code.as_str() {
            Self::INVALID_EMAIL => "Invalid email address",
            Self::WEAK_PASSWORD => "Password is too weak",
            Self::EMAIL_IN_USE => "That email address is already in use!",
            _ => "Something went wrong",
        }
    }
}

pub type AuthResult = Result<AuthOutput, AuthError>;

impl Operation for AuthOperation {
    type Output = AuthResult;
}

#[derive(Clone)]
pub struct Auth<E> {
    context: CapabilityContext<AuthOperation, E>,
}

impl<Ev> Capability<Ev> for Auth<Ev> {
    type Operation = AuthOperation;
    type MappedSelf<MappedEv> = Auth<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Auth::new(self.context.map_event(f))
    }
}

impl<E> Auth<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<AuthOperation, E>) -> Self {
        Self { context }
    }

    pub fn current_user<F>(&self, callback: F)
    where
        F: FnOnce(AuthResult) -> E + Send + 'static,
    {
        self.request(AuthOperation::CurrentUser, callback);
    }

    pub fn create_user<F>(&self, email: String, password: String, callback: F)
    where
        F: FnOnce(AuthResult) -> E + Send + 'static,
    {
        self.request(AuthOperation::CreateUser { email, password }, callback);
    }

    pub fn sign_in<F>(&self, email: String, password: String, callback: F)
    where
        F: FnOnce(AuthResult) -> E + Send + 'static,
    {
        self.request(AuthOperation::SignIn { email, password }, callback);
    }

    pub fn sign_out<F>(&self, callback: F)
    where
        F: FnOnce(AuthResult) -> E + Send + 'static,
    {
        self.request(AuthOperation::SignOut, callback);
    }

    fn request<F>(&self, operation: AuthOperation, callback: F)
    where
        F: FnOnce(AuthResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_map_to_messages() {
        assert_eq!(
            AuthError::new("auth/invalid-email", "").user_message(),
            "Invalid email address"
        );
        assert_eq!(
            AuthError::new("auth/weak-password", "").user_message(),
            "Password is too weak"
        );
        assert_eq!(
            AuthError::new("auth/email-already-in-use", "").user_message(),
            "That email address is already in use!"
        );
    }

    #[test]
    fn test_unknown_code_falls_back() {
        assert_eq!(
            AuthError::new("auth/network-request-failed", "").user_message(),
            "Something went wrong"
        );
    }

    #[test]
    fn test_operation_debug_redacts_password() {
        let op = AuthOperation::SignIn {
            email: "a@b.co".into(),
            password: "hunter2".into(),
        };
        let printed = format!("{op:?}");
        assert!(printed.contains("a@b.co"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_error_display() {
        let err = AuthError::new("auth/weak-password", "Password should be at least 6 characters");
        assert_eq!(
            err.to_string(),
            "auth/weak-password: Password should be at least 6 characters"
        );
    }
}
