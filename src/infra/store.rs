//! JSON snapshot of the chat registry, loaded at startup and saved at
//! shutdown.
//!
//! A missing snapshot is the normal first-run case and yields `Ok(None)`.
//! A snapshot that is present but unreadable (bad JSON, unparseable
//! timestamp) is an error for the caller to surface; it is never silently
//! swallowed here.

use std::{collections::BTreeMap, fs, path::Path};

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        chat::Chat,
        message::{Message, DATETIME_FORMAT},
        registry::{ChatRegistry, ChatSettings},
        user::User,
    },
    infra::error::AppError,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct StateRecord {
    pub host: String,
    pub port: u16,
    pub common_chat: ChatRecord,
    pub private_chats: Vec<ChatRecord>,
    pub users: Vec<UserRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRecord {
    pub name: String,
    pub messages: Vec<MessageRecord>,
    pub actuality_period_seconds: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageRecord {
    pub sending_time: String,
    pub sender: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub creation_datetime: String,
    pub chats: Vec<String>,
}

/// A restored snapshot: the listen address it was saved under plus the
/// registry contents.
#[derive(Debug)]
pub struct PersistedState {
    pub host: String,
    pub port: u16,
    pub registry: ChatRegistry,
}

pub fn load(path: &Path, settings: &ChatSettings) -> Result<Option<PersistedState>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path).map_err(|source| AppError::StateRead {
        path: path.to_path_buf(),
        source,
    })?;
    let record: StateRecord =
        serde_json::from_str(&raw).map_err(|source| AppError::StateParse {
            path: path.to_path_buf(),
            source,
        })?;

    let common_chat = record.common_chat.into_chat(path, settings)?;

    let mut private_chats = BTreeMap::new();
    for chat_record in record.private_chats {
        let chat = chat_record.into_chat(path, settings)?;
        private_chats.insert(chat.name().to_owned(), chat);
    }

    let mut users = BTreeMap::new();
    for user_record in record.users {
        let user = user_record.into_user(path)?;
        users.insert(user.name.clone(), user);
    }

    Ok(Some(PersistedState {
        host: record.host,
        port: record.port,
        registry: ChatRegistry::from_parts(settings.clone(), common_chat, private_chats, users),
    }))
}

pub fn save(path: &Path, host: &str, port: u16, registry: &ChatRegistry) -> Result<(), AppError> {
    let record = StateRecord {
        host: host.to_owned(),
        port,
        common_chat: chat_record(registry.common_chat()),
        private_chats: registry.private_chats().map(chat_record).collect(),
        users: registry.users().map(user_record).collect(),
    };

    let raw = serde_json::to_string_pretty(&record).map_err(|source| AppError::StateEncode {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, raw).map_err(|source| AppError::StateWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn message_record(message: &Message) -> MessageRecord {
    MessageRecord {
        sending_time: message.sending_time.format(DATETIME_FORMAT).to_string(),
        sender: message.sender.clone(),
        text: message.text.clone(),
    }
}

fn chat_record(chat: &Chat) -> ChatRecord {
    ChatRecord {
        name: chat.name().to_owned(),
        messages: chat.get_messages(None).iter().map(message_record).collect(),
        actuality_period_seconds: chat.actuality_period().num_seconds(),
    }
}

fn user_record(user: &User) -> UserRecord {
    UserRecord {
        name: user.name.clone(),
        creation_datetime: user.creation_datetime.format(DATETIME_FORMAT).to_string(),
        chats: user.chats.clone(),
    }
}

fn parse_timestamp(value: &str, path: &Path) -> Result<NaiveDateTime, AppError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|source| {
        AppError::StateTimestamp {
            path: path.to_path_buf(),
            value: value.to_owned(),
            source,
        }
    })
}

impl MessageRecord {
    fn into_message(self, path: &Path) -> Result<Message, AppError> {
        let sending_time = parse_timestamp(&self.sending_time, path)?;
        Ok(Message::new(sending_time, self.sender, self.text))
    }
}

impl ChatRecord {
    // The period is restored at full second precision; the history limit is
    // not part of the record and comes from the current settings.
    fn into_chat(self, path: &Path, settings: &ChatSettings) -> Result<Chat, AppError> {
        let mut messages = Vec::with_capacity(self.messages.len());
        for message_record in self.messages {
            messages.push(message_record.into_message(path)?);
        }
        Ok(Chat::new(
            self.name,
            messages,
            Duration::seconds(self.actuality_period_seconds),
            settings.shared_history_limit,
        ))
    }
}

impl UserRecord {
    fn into_user(self, path: &Path) -> Result<User, AppError> {
        let creation_datetime = parse_timestamp(&self.creation_datetime, path)?;
        Ok(User::new(self.name, creation_datetime, self.chats))
    }
}
