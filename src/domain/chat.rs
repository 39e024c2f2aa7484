use chrono::{Duration, Local, NaiveDateTime};

use crate::domain::message::Message;

/// An ordered, append-only log of messages with a retention window.
///
/// Messages stay sorted by sending time because insertion is append-only and
/// `actualize` only drops entries. `history_limit` caps how much back-history
/// a viewer who joined later than the oldest messages gets to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    name: String,
    messages: Vec<Message>,
    actuality_period: Duration,
    history_limit: usize,
}

impl Chat {
    pub fn new(
        name: impl Into<String>,
        messages: Vec<Message>,
        actuality_period: Duration,
        history_limit: usize,
    ) -> Self {
        Self {
            name: name.into(),
            messages,
            actuality_period,
            history_limit,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actuality_period(&self) -> Duration {
        self.actuality_period
    }

    /// Returns the retained log, windowed for a viewer who joined at
    /// `viewer_joined_at`.
    ///
    /// Without a join time the full log is returned. With one, messages
    /// strictly older than it are counted; if more than `history_limit - 1`
    /// predate the join, the view starts at the `history_limit`-th most
    /// recent pre-join message, so a new participant sees at most
    /// `history_limit` older messages plus everything after they joined.
    pub fn get_messages(&self, viewer_joined_at: Option<NaiveDateTime>) -> &[Message] {
        let Some(joined_at) = viewer_joined_at else {
            return &self.messages;
        };

        let older = self
            .messages
            .iter()
            .take_while(|message| message.sending_time < joined_at)
            .count();
        if older > self.history_limit.saturating_sub(1) {
            &self.messages[older - self.history_limit..]
        } else {
            &self.messages
        }
    }

    /// Appends a message and returns the same windowed view a fresh read
    /// would produce.
    pub fn add_message(
        &mut self,
        message: Message,
        viewer_joined_at: Option<NaiveDateTime>,
    ) -> &[Message] {
        self.messages.push(message);
        self.get_messages(viewer_joined_at)
    }

    /// Drops every message older than the actuality period, preserving order.
    pub fn actualize(&mut self) {
        let cutoff = Local::now().naive_local() - self.actuality_period;
        self.messages.retain(|message| message.sending_time > cutoff);
    }
}
