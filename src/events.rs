use serde::{Deserialize, Serialize};

/// One message in the conversation, attributed to the user or the assistant.
///
/// Serialized field names (`message`, `sender`, `timestamp`) are the
/// persistence contract; turns are immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub message: String,
    pub sender: Sender,
    pub timestamp: String,
}

/// Origin of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Turn {
    pub fn user(message: impl Into<String>) -> Self {
        Self::new(message, Sender::User)
    }

    pub fn bot(message: impl Into<String>) -> Self {
        Self::new(message, Sender::Bot)
    }

    fn new(message: impl Into<String>, sender: Sender) -> Self {
        Self {
            message: message.into(),
            sender,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Role as the backend expects it: the assistant side is called "model".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One entry of the context history sent alongside a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: Role,
    pub content: String,
}

/// Build the request context from the conversation log.
///
/// The most recently appended turn is the message being sent right now, so it
/// is excluded; the backend receives it separately in the `message` field.
pub fn build_request_context(log: &[Turn]) -> Vec<ContextMessage> {
    let upto = log.len().saturating_sub(1);
    log[..upto]
        .iter()
        .map(|turn| ContextMessage {
            role: match turn.sender {
                Sender::User => Role::User,
                Sender::Bot => Role::Model,
            },
            content: turn.message.clone(),
        })
        .collect()
}
