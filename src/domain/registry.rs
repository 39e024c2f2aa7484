use std::collections::BTreeMap;

use chrono::{Duration, Local};

use crate::domain::{chat::Chat, user::User};

/// Name of the shared chat every user joins on connect.
pub const COMMON_CHAT_NAME: &str = "Common";

/// Constants applied to every chat the registry creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// Cap on pre-join back-history visible to a newly joined viewer.
    pub shared_history_limit: usize,
    /// Retention window for newly created chats.
    pub actuality_period: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            shared_history_limit: 20,
            actuality_period: Duration::hours(24),
        }
    }
}

/// The server's unit of consistency: the common chat, all private chats,
/// and all registered users.
///
/// A private chat between A and B is named either `"A and B"` or `"B and A"`,
/// and at most one exists per pair; `resolve_private_chat` is the only
/// creation path and checks both spellings first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRegistry {
    settings: ChatSettings,
    common_chat: Chat,
    private_chats: BTreeMap<String, Chat>,
    users: BTreeMap<String, User>,
}

impl ChatRegistry {
    pub fn new(settings: ChatSettings) -> Self {
        let common_chat = Chat::new(
            COMMON_CHAT_NAME,
            Vec::new(),
            settings.actuality_period,
            settings.shared_history_limit,
        );
        Self {
            settings,
            common_chat,
            private_chats: BTreeMap::new(),
            users: BTreeMap::new(),
        }
    }

    /// Reassembles a registry from persisted parts.
    pub fn from_parts(
        settings: ChatSettings,
        common_chat: Chat,
        private_chats: BTreeMap<String, Chat>,
        users: BTreeMap<String, User>,
    ) -> Self {
        Self {
            settings,
            common_chat,
            private_chats,
            users,
        }
    }

    pub fn contains_user(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn common_chat(&self) -> &Chat {
        &self.common_chat
    }

    pub fn common_chat_mut(&mut self) -> &mut Chat {
        &mut self.common_chat
    }

    pub fn private_chat(&self, name: &str) -> Option<&Chat> {
        self.private_chats.get(name)
    }

    pub fn private_chat_mut(&mut self, name: &str) -> Option<&mut Chat> {
        self.private_chats.get_mut(name)
    }

    pub fn private_chats(&self) -> impl Iterator<Item = &Chat> {
        self.private_chats.values()
    }

    /// Registers a new user joined to the common chat. Returns false if the
    /// name is already taken, leaving the existing user untouched.
    pub fn register_user(&mut self, name: &str) -> bool {
        if self.users.contains_key(name) {
            return false;
        }
        let user = User::new(
            name,
            Local::now().naive_local(),
            vec![self.common_chat.name().to_owned()],
        );
        self.users.insert(name.to_owned(), user);
        true
    }

    /// Returns the name of the private chat between `client` and `recipient`,
    /// creating it on first use.
    ///
    /// Both `"client and recipient"` and `"recipient and client"` resolve to
    /// the same chat. A newly created chat is recorded in both participants'
    /// chat lists, sender first.
    pub fn resolve_private_chat(&mut self, client: &str, recipient: &str) -> String {
        let direct = format!("{client} and {recipient}");
        let reversed = format!("{recipient} and {client}");

        if self.private_chats.contains_key(&direct) {
            return direct;
        }
        if self.private_chats.contains_key(&reversed) {
            return reversed;
        }

        let chat = Chat::new(
            direct.clone(),
            Vec::new(),
            self.settings.actuality_period,
            self.settings.shared_history_limit,
        );
        self.private_chats.insert(direct.clone(), chat);
        if let Some(user) = self.users.get_mut(client) {
            user.add_chat(&direct);
        }
        if let Some(user) = self.users.get_mut(recipient) {
            user.add_chat(&direct);
        }
        direct
    }
}
