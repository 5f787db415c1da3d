//! Sign-in state.
//!
//! The identity provider itself is an opaque collaborator behind
//! [`IdentityProvider`]. [`AuthContext`] owns the current-user observable
//! (a `tokio::sync::watch` channel) and is created once at application start;
//! views only read from it. [`SignInFlow`] is the login screen's own state:
//! a loading flag and a user-facing error message.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::config::IdentityConfig;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Sign-in with {provider} failed: {message}")]
    SignIn {
        provider: SignInMethod,
        message: String,
    },

    #[error("Sign-out failed: {0}")]
    SignOut(String),
}

/// External accounts AskBot can sign in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignInMethod {
    Google,
    GitHub,
}

impl SignInMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            SignInMethod::Google => "Google",
            SignInMethod::GitHub => "GitHub",
        }
    }

    pub fn all() -> [SignInMethod; 2] {
        [SignInMethod::Google, SignInMethod::GitHub]
    }
}

impl fmt::Display for SignInMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SignInMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(SignInMethod::Google),
            "github" => Ok(SignInMethod::GitHub),
            other => Err(format!("unknown sign-in provider: {other}")),
        }
    }
}

/// A signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub method: SignInMethod,
}

/// Opaque identity collaborator.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, method: SignInMethod) -> Result<User, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Application-wide auth state: the provider plus the current-user observable.
#[derive(Clone)]
pub struct AuthContext {
    provider: Arc<dyn IdentityProvider>,
    current: Arc<watch::Sender<Option<User>>>,
}

impl AuthContext {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            provider,
            current: Arc::new(current),
        }
    }

    /// Snapshot of the signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    /// Observe sign-in / sign-out transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }

    pub async fn sign_in(&self, method: SignInMethod) -> Result<User, AuthError> {
        let user = self.provider.sign_in(method).await?;
        info!("signed in with {method}");
        self.current.send_replace(Some(user.clone()));
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await?;
        self.current.send_replace(None);
        Ok(())
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("current", &*self.current.borrow())
            .finish_non_exhaustive()
    }
}

/// Login screen state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInFlow {
    loading: bool,
    error: Option<String>,
}

impl SignInFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a sign-in attempt is outstanding; buttons are disabled.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Label for a provider's sign-in button in the current state.
    pub fn button_label(&self, method: SignInMethod) -> String {
        if self.loading {
            format!("Signing in with {method}...")
        } else {
            format!("Sign in with {method}")
        }
    }

    /// Attempts a sign-in. Returns the user on success; on failure records a
    /// user-facing message and returns `None`. Loading is cleared either way.
    pub async fn sign_in(&mut self, auth: &AuthContext, method: SignInMethod) -> Option<User> {
        if self.loading {
            return None;
        }
        self.loading = true;
        self.error = None;

        let result = auth.sign_in(method).await;
        self.loading = false;

        match result {
            Ok(user) => Some(user),
            Err(e) => {
                error!("{method} Sign-In error: {e}");
                self.error = Some(format!(
                    "Failed to sign in with {method}. Please try again."
                ));
                None
            }
        }
    }

    pub async fn sign_out(&mut self, auth: &AuthContext) -> bool {
        self.error = None;
        match auth.sign_out().await {
            Ok(()) => true,
            Err(e) => {
                error!("Sign-Out error: {e}");
                self.error = Some("Failed to sign out. Please try again.".to_string());
                false
            }
        }
    }
}

/// Offline identity provider used when no hosted identity project is wired
/// in. Signs everyone in as a local user named after the configured project.
#[derive(Debug, Clone)]
pub struct GuestIdentityProvider {
    display_name: String,
    namespace: String,
}

impl GuestIdentityProvider {
    pub fn new(display_name: impl Into<String>, config: &IdentityConfig) -> Self {
        Self {
            display_name: display_name.into(),
            namespace: config
                .project_id
                .clone()
                .unwrap_or_else(|| "local".to_string()),
        }
    }
}

#[async_trait]
impl IdentityProvider for GuestIdentityProvider {
    async fn sign_in(&self, method: SignInMethod) -> Result<User, AuthError> {
        if self.display_name.trim().is_empty() {
            return Err(AuthError::SignIn {
                provider: method,
                message: "no display name available".into(),
            });
        }
        let method_key = match method {
            SignInMethod::Google => "google",
            SignInMethod::GitHub => "github",
        };
        Ok(User {
            uid: format!("{}:{}:{}", self.namespace, method_key, self.display_name),
            display_name: Some(self.display_name.clone()),
            email: None,
            method,
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    #[async_trait]
    impl IdentityProvider for FailingProvider {
        async fn sign_in(&self, method: SignInMethod) -> Result<User, AuthError> {
            Err(AuthError::SignIn {
                provider: method,
                message: "popup closed by user".into(),
            })
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            Err(AuthError::SignOut("network down".into()))
        }
    }

    fn guest() -> AuthContext {
        AuthContext::new(Arc::new(GuestIdentityProvider::new(
            "ada",
            &IdentityConfig::default(),
        )))
    }

    #[tokio::test]
    async fn sign_in_publishes_current_user() {
        let auth = guest();
        let mut rx = auth.subscribe();
        assert!(auth.current_user().is_none());

        let user = auth.sign_in(SignInMethod::GitHub).await.unwrap();
        assert_eq!(user.uid, "local:github:ada");

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref(), Some(&user));
        assert_eq!(auth.current_user(), Some(user));

        auth.sign_out().await.unwrap();
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn flow_reports_friendly_error_and_clears_loading() {
        let auth = AuthContext::new(Arc::new(FailingProvider));
        let mut flow = SignInFlow::new();

        assert!(flow.sign_in(&auth, SignInMethod::Google).await.is_none());
        assert!(!flow.is_loading());
        assert_eq!(
            flow.error(),
            Some("Failed to sign in with Google. Please try again.")
        );
        assert!(auth.current_user().is_none());

        assert!(!flow.sign_out(&auth).await);
        assert_eq!(flow.error(), Some("Failed to sign out. Please try again."));
    }

    #[tokio::test]
    async fn successful_flow_clears_previous_error() {
        let auth = guest();
        let mut flow = SignInFlow {
            loading: false,
            error: Some("old".into()),
        };
        let user = flow.sign_in(&auth, SignInMethod::Google).await.unwrap();
        assert_eq!(user.method, SignInMethod::Google);
        assert!(flow.error().is_none());
    }

    #[tokio::test]
    async fn successful_sign_out_clears_stale_error() {
        let auth = guest();
        let mut flow = SignInFlow {
            loading: false,
            error: Some("Failed to sign in with GitHub. Please try again.".into()),
        };
        auth.sign_in(SignInMethod::GitHub).await.unwrap();

        assert!(flow.sign_out(&auth).await);
        assert!(flow.error().is_none());
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn button_labels_follow_loading_state() {
        let mut flow = SignInFlow::new();
        assert_eq!(flow.button_label(SignInMethod::GitHub), "Sign in with GitHub");
        flow.loading = true;
        assert_eq!(
            flow.button_label(SignInMethod::GitHub),
            "Signing in with GitHub..."
        );
    }

    #[test]
    fn parses_provider_names() {
        assert_eq!("GitHub".parse::<SignInMethod>().unwrap(), SignInMethod::GitHub);
        assert!("facebook".parse::<SignInMethod>().is_err());
    }
}
