use serde::{Deserialize, Serialize};

/// Author of a message as shown in the conversation view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the end user.
    User,
    /// Message produced by the remote assistant.
    Assistant,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

/// Message role in a provider request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instruction message.
    System,
    /// Message authored by an end user.
    User,
    /// Message authored by the assistant.
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(crate::error::ProtoError::InvalidRole(other.to_string())),
        }
    }
}

/// Display senders and provider roles share spellings but are distinct
/// vocabularies; the mapping is explicit so the wire format cannot drift
/// silently if either side grows a variant.
impl From<Sender> for Role {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => Role::User,
            Sender::Assistant => Role::Assistant,
        }
    }
}

/// A message as rendered in the conversation view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMessage {
    /// Rendered message text.
    pub text: String,
    /// Author of this message.
    pub sender: Sender,
}

impl DisplayMessage {
    /// Creates a user-authored display message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    /// Creates an assistant-authored display message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Assistant,
        }
    }
}

/// A message as serialized into the provider request payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    /// Semantic role of this message.
    pub role: Role,
    /// Message content payload.
    pub content: String,
}

impl ProviderMessage {
    /// Creates a provider message with the given role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system instruction message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

impl From<&DisplayMessage> for ProviderMessage {
    fn from(msg: &DisplayMessage) -> Self {
        Self::new(Role::from(msg.sender), msg.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::ProtoError;

    #[test]
    fn role_display_and_parse_round_trip() {
        let roles = [Role::System, Role::User, Role::Assistant];
        for role in roles {
            let rendered = role.to_string();
            let parsed = Role::from_str(&rendered).expect("role should parse");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn role_parse_invalid_value_returns_error() {
        let err = Role::from_str("owner").expect_err("invalid role should fail");
        match err {
            ProtoError::InvalidRole(value) => assert_eq!(value, "owner"),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn sender_maps_to_matching_role() {
        assert_eq!(Role::from(Sender::User), Role::User);
        assert_eq!(Role::from(Sender::Assistant), Role::Assistant);
    }

    #[test]
    fn display_message_constructors_set_sender() {
        let user = DisplayMessage::user("hello");
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.text, "hello");

        let bot = DisplayMessage::assistant("hi there");
        assert_eq!(bot.sender, Sender::Assistant);
        assert_eq!(bot.text, "hi there");
    }

    #[test]
    fn provider_message_from_display_message_maps_role() {
        let display = DisplayMessage::assistant("partial reply");
        let provider = ProviderMessage::from(&display);
        assert_eq!(provider.role, Role::Assistant);
        assert_eq!(provider.content, "partial reply");
    }

    #[test]
    fn provider_message_serializes_with_lowercase_role() {
        let msg = ProviderMessage::system("be helpful");
        let json = serde_json::to_string(&msg).expect("should serialize");
        assert_eq!(json, r#"{"role":"system","content":"be helpful"}"#);
    }

    #[test]
    fn provider_message_list_serializes_as_json_array() {
        let msgs = vec![
            ProviderMessage::system("sys"),
            ProviderMessage::new(Role::User, "question"),
        ];
        let json = serde_json::to_string(&msgs).expect("should serialize");
        assert!(json.starts_with('['));
        assert!(json.contains(r#""role":"user""#));
    }
}
