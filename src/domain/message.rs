use std::fmt;

use chrono::NaiveDateTime;

/// Format for timestamps in rendered messages and persisted snapshots.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sending_time: NaiveDateTime,
    pub sender: String,
    pub text: String,
}

impl Message {
    pub fn new(
        sending_time: NaiveDateTime,
        sender: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            sending_time,
            sender: sender.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.sending_time.format(DATETIME_FORMAT),
            self.sender,
            self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn display_renders_time_sender_and_text() {
        let sending_time = NaiveDate::from_ymd_opt(2024, 5, 1)
            .expect("valid date")
            .and_hms_opt(12, 30, 5)
            .expect("valid time");
        let message = Message::new(sending_time, "alice", "hello there");

        assert_eq!(message.to_string(), "[2024-05-01 12:30:05] alice: hello there");
    }
}
