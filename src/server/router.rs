//! The four-endpoint state machine against the chat registry.
//!
//! Every outcome, including lookup failures, is a plain-string response;
//! nothing here is an error in the `Result` sense.

use chrono::Local;

use crate::{
    domain::{
        message::Message,
        registry::{ChatRegistry, COMMON_CHAT_NAME},
    },
    server::request::Request,
};

const UNKNOWN_REQUEST: &str = "Unknown endpoint or unregister user";

/// Routes a decoded request to its handler.
///
/// `connect` is reachable for anyone; every other endpoint, and any
/// unrecognized endpoint string, requires an already-registered client.
pub fn route(registry: &mut ChatRegistry, request: &Request) -> String {
    tracing::info!(
        client = %request.client_name,
        endpoint = %request.endpoint,
        "routing request"
    );

    if request.endpoint == "connect" {
        return connect(registry, request);
    }
    if !registry.contains_user(&request.client_name) {
        return UNKNOWN_REQUEST.to_owned();
    }
    match request.endpoint.as_str() {
        "status" => status(registry, request),
        "send" => send(registry, request),
        "read_chat" => read_chat(registry, request),
        _ => UNKNOWN_REQUEST.to_owned(),
    }
}

fn connect(registry: &mut ChatRegistry, request: &Request) -> String {
    if registry.register_user(&request.client_name) {
        tracing::info!(client = %request.client_name, "client connected");
        "OK".to_owned()
    } else {
        "User already exists".to_owned()
    }
}

fn status(registry: &ChatRegistry, request: &Request) -> String {
    let Some(user) = registry.user(&request.client_name) else {
        return "User not found".to_owned();
    };

    let chats = user.chats.join("\n");
    let others: Vec<&str> = registry
        .users()
        .filter(|other| other.name != request.client_name)
        .map(|other| other.name.as_str())
        .collect();
    format!("Chats:\n{chats}\n\nUsers:\n{}", others.join("\n"))
}

fn send(registry: &mut ChatRegistry, request: &Request) -> String {
    let message = Message::new(
        Local::now().naive_local(),
        request.client_name.clone(),
        request.message.clone(),
    );

    if request.recipient.is_empty() {
        let Some(user) = registry.user(&request.client_name) else {
            return UNKNOWN_REQUEST.to_owned();
        };
        let joined_at = user.creation_datetime;
        let chat = registry.common_chat_mut();
        // The response is rendered before pruning, so it may still show a
        // message the prune is about to drop.
        let response = render_messages(chat.add_message(message, Some(joined_at)));
        chat.actualize();
        return response;
    }

    if !registry.contains_user(&request.recipient) {
        return "Recipient not found".to_owned();
    }
    let chat_name = registry.resolve_private_chat(&request.client_name, &request.recipient);
    let Some(chat) = registry.private_chat_mut(&chat_name) else {
        return "Chat not found".to_owned();
    };
    let response = render_messages(chat.add_message(message, None));
    chat.actualize();
    response
}

fn read_chat(registry: &mut ChatRegistry, request: &Request) -> String {
    if let Some(chat) = registry.private_chat_mut(&request.chat_name) {
        chat.actualize();
        return render_messages(chat.get_messages(None));
    }
    if request.chat_name == COMMON_CHAT_NAME {
        let Some(user) = registry.user(&request.client_name) else {
            return UNKNOWN_REQUEST.to_owned();
        };
        let joined_at = user.creation_datetime;
        let chat = registry.common_chat_mut();
        chat.actualize();
        return render_messages(chat.get_messages(Some(joined_at)));
    }
    "Chat not found".to_owned()
}

fn render_messages(messages: &[Message]) -> String {
    messages
        .iter()
        .map(Message::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use crate::domain::registry::ChatSettings;

    use super::*;

    fn registry() -> ChatRegistry {
        ChatRegistry::new(ChatSettings::default())
    }

    fn connected(names: &[&str]) -> ChatRegistry {
        let mut registry = registry();
        for name in names {
            assert_eq!(route(&mut registry, &Request::connect(*name)), "OK");
        }
        registry
    }

    #[test]
    fn connect_registers_new_user() {
        let mut registry = registry();

        assert_eq!(route(&mut registry, &Request::connect("alice")), "OK");
        assert!(registry.contains_user("alice"));
    }

    #[test]
    fn second_connect_reports_existing_user() {
        let mut registry = connected(&["alice"]);

        assert_eq!(
            route(&mut registry, &Request::connect("alice")),
            "User already exists"
        );
    }

    #[test]
    fn unknown_client_gets_catch_all_on_every_other_endpoint() {
        let mut registry = registry();

        for request in [
            Request::status("ghost"),
            Request::send("ghost", "hi", ""),
            Request::read_chat("ghost", "Common"),
        ] {
            assert_eq!(route(&mut registry, &request), UNKNOWN_REQUEST);
        }
    }

    #[test]
    fn unrecognized_endpoint_from_known_client_gets_catch_all() {
        let mut registry = connected(&["alice"]);

        let request = Request {
            endpoint: "disconnect".to_owned(),
            ..Request::status("alice")
        };

        assert_eq!(route(&mut registry, &request), UNKNOWN_REQUEST);
    }

    #[test]
    fn status_lists_own_chats_then_other_users() {
        let mut registry = connected(&["alice", "bob"]);

        let response = route(&mut registry, &Request::status("alice"));

        assert_eq!(response, "Chats:\nCommon\n\nUsers:\nbob");
    }

    #[test]
    fn send_without_recipient_posts_to_common_chat() {
        let mut registry = connected(&["alice"]);

        let response = route(&mut registry, &Request::send("alice", "hello all", ""));

        assert!(response.ends_with("alice: hello all"));
        assert_eq!(registry.common_chat().get_messages(None).len(), 1);
    }

    #[test]
    fn send_to_unknown_recipient_is_rejected() {
        let mut registry = connected(&["alice"]);

        let response = route(&mut registry, &Request::send("alice", "hi", "ghost"));

        assert_eq!(response, "Recipient not found");
    }

    #[test]
    fn send_to_recipient_creates_single_shared_chat() {
        let mut registry = connected(&["alice", "bob"]);

        let first = route(&mut registry, &Request::send("alice", "hi", "bob"));
        assert!(first.ends_with("alice: hi"));
        assert!(registry.private_chat("alice and bob").is_some());

        let second = route(&mut registry, &Request::send("bob", "hey", "alice"));
        assert!(registry.private_chat("bob and alice").is_none());
        assert_eq!(registry.private_chats().count(), 1);

        let lines: Vec<&str> = second.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("alice: hi"));
        assert!(lines[1].ends_with("bob: hey"));
    }

    #[test]
    fn read_chat_of_empty_common_returns_empty_string() {
        let mut registry = connected(&["alice"]);

        let response = route(&mut registry, &Request::read_chat("alice", "Common"));

        assert_eq!(response, "");
    }

    #[test]
    fn read_chat_of_common_returns_posted_messages() {
        let mut registry = connected(&["alice"]);
        route(&mut registry, &Request::send("alice", "hello all", ""));

        let response = route(&mut registry, &Request::read_chat("alice", "Common"));

        assert!(response.ends_with("alice: hello all"));
    }

    #[test]
    fn read_chat_of_private_chat_returns_full_log() {
        let mut registry = connected(&["alice", "bob"]);
        route(&mut registry, &Request::send("alice", "hi", "bob"));
        route(&mut registry, &Request::send("bob", "hey", "alice"));

        let response = route(&mut registry, &Request::read_chat("bob", "alice and bob"));

        assert_eq!(response.lines().count(), 2);
    }

    #[test]
    fn read_chat_of_unknown_chat_is_rejected() {
        let mut registry = connected(&["alice"]);

        let response = route(&mut registry, &Request::read_chat("alice", "nonexistent"));

        assert_eq!(response, "Chat not found");
    }
}
