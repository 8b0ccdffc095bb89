//! Chat transcript state

/// Placeholder entry shown while a reply is in flight
pub const THINKING_NOTICE: &str = "Model is thinking...";

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
    /// Non-conversational notice (status or error); excluded from the counter
    System,
}

/// One entry in the transcript
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

/// Ordered message list plus the user+bot message counter
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Message>,
    message_count: usize,
    thinking_at: Option<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message and count it
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.entries.push(Message {
            role: Role::User,
            text: text.into(),
        });
        self.message_count += 1;
    }

    /// Append a bot message and count it
    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.entries.push(Message {
            role: Role::Bot,
            text: text.into(),
        });
        self.message_count += 1;
    }

    /// Append a system notice; not counted
    pub fn push_system(&mut self, text: impl Into<String>) {
        self.entries.push(Message {
            role: Role::System,
            text: text.into(),
        });
    }

    /// Append the in-flight placeholder entry
    pub fn begin_thinking(&mut self) {
        self.thinking_at = Some(self.entries.len());
        self.entries.push(Message {
            role: Role::System,
            text: THINKING_NOTICE.to_string(),
        });
    }

    /// Remove the in-flight placeholder entry, if present
    pub fn end_thinking(&mut self) {
        if let Some(index) = self.thinking_at.take() {
            self.entries.remove(index);
        }
    }

    /// Whether a reply is currently in flight
    pub fn is_thinking(&self) -> bool {
        self.thinking_at.is_some()
    }

    /// Drop all entries and reset the counter
    pub fn clear(&mut self) {
        self.entries.clear();
        self.message_count = 0;
        self.thinking_at = None;
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// Number of user+bot messages since the last clear
    pub fn message_count(&self) -> usize {
        self.message_count
    }
}
