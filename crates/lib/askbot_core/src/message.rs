//! Chat message model shared by the transcript and the provider wire format.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who authored a message.
///
/// Serialised in the lowercase form completion APIs expect. `"bot"` is
/// accepted as an alias for [`Role::Assistant`] when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "bot")]
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn bot_is_read_as_assistant() {
        let msg: Message = serde_json::from_str(r#"{"role":"bot","content":"yo"}"#).unwrap();
        assert_eq!(msg.role, Role::Assistant);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let res = serde_json::from_str::<Message>(r#"{"role":"narrator","content":"x"}"#);
        assert!(res.is_err());
    }
}
