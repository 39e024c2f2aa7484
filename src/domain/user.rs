use chrono::NaiveDateTime;

/// A registered client: identity, join time, and the chats it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub creation_datetime: NaiveDateTime,
    pub chats: Vec<String>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        creation_datetime: NaiveDateTime,
        chats: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            creation_datetime,
            chats,
        }
    }

    /// Records membership in a chat. Deliberately does not dedupe: callers
    /// are expected to add a chat once, and a repeated name is kept as-is.
    pub fn add_chat(&mut self, chat_name: &str) {
        self.chats.push(chat_name.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn user() -> User {
        let joined = NaiveDate::from_ymd_opt(2024, 5, 1)
            .expect("valid date")
            .and_hms_opt(9, 0, 0)
            .expect("valid time");
        User::new("alice", joined, vec!["Common".to_owned()])
    }

    #[test]
    fn add_chat_appends_to_membership_list() {
        let mut user = user();

        user.add_chat("alice and bob");

        assert_eq!(user.chats, vec!["Common", "alice and bob"]);
    }

    #[test]
    fn add_chat_keeps_repeated_names() {
        let mut user = user();

        user.add_chat("alice and bob");
        user.add_chat("alice and bob");

        assert_eq!(user.chats.len(), 3);
    }
}
