//! # askbot_core
//!
//! Core domain logic for AskBot: the message model, the conversation state
//! machine, the completion-provider client and the theme / auth contexts the
//! front-ends are built on.

pub mod auth;
pub mod config;
pub mod conversation;
pub mod hello;
pub mod message;
pub mod preferences;
pub mod provider;
pub mod relay;
pub mod theme;

pub use conversation::{ConversationView, SubmitOutcome, ViewState};
pub use message::{Message, Role};
pub use relay::{Relay, RelayError};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
