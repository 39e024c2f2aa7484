use serde::{Deserialize, Serialize};

/// A single request decoded from the wire.
///
/// `message`, `recipient`, and `chat_name` default to empty strings when the
/// payload omits them; the router treats an empty field as "not provided".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Request {
    pub client_name: String,
    pub endpoint: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub chat_name: String,
}

impl Request {
    fn with_endpoint(client_name: impl Into<String>, endpoint: &str) -> Self {
        Self {
            client_name: client_name.into(),
            endpoint: endpoint.to_owned(),
            message: String::new(),
            recipient: String::new(),
            chat_name: String::new(),
        }
    }

    pub fn connect(client_name: impl Into<String>) -> Self {
        Self::with_endpoint(client_name, "connect")
    }

    pub fn status(client_name: impl Into<String>) -> Self {
        Self::with_endpoint(client_name, "status")
    }

    pub fn send(
        client_name: impl Into<String>,
        message: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            recipient: recipient.into(),
            ..Self::with_endpoint(client_name, "send")
        }
    }

    pub fn read_chat(client_name: impl Into<String>, chat_name: impl Into<String>) -> Self {
        Self {
            chat_name: chat_name.into(),
            ..Self::with_endpoint(client_name, "read_chat")
        }
    }
}
