//! Append-only diagnostics log.
//!
//! Operations that can produce non-fatal diagnostics take an
//! `Option<&mut MessageLog>`. Passing `None` discards the messages.
//!
//! ```rust
//! use pxl_core::{MessageKind, MessageLog, append_message};
//!
//! let mut log = MessageLog::new();
//! append_message(Some(&mut log), "format unknown, assuming RGB", MessageKind::Warning);
//! append_message(None, "dropped", MessageKind::Verbose);
//! assert_eq!(log.len(), 1);
//! assert_eq!(log.messages()[0].kind, MessageKind::Warning);
//! ```

use std::fmt;

/// Category of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Section heading.
    Headline,
    /// Detail only shown when asked for.
    Verbose,
    /// An operation completed.
    Success,
    /// Plain information.
    Message,
    /// Something unexpected that did not stop the operation.
    Warning,
    /// A failure.
    Error,
}

impl MessageKind {
    /// Lower-case label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Headline => "headline",
            Self::Verbose => "verbose",
            Self::Success => "success",
            Self::Message => "message",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// One entry of a [`MessageLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Human-readable text.
    pub text: String,
    /// Category.
    pub kind: MessageKind,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.label(), self.text)
    }
}

/// Ordered, append-only list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message.
    pub fn add(&mut self, text: impl Into<String>, kind: MessageKind) {
        let text = text.into();
        tracing::trace!(kind = kind.label(), %text, "message logged");
        self.messages.push(Message { text, kind });
    }

    /// Messages in insertion order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log holds no messages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages of one kind.
    pub fn of_kind(&self, kind: MessageKind) -> impl Iterator<Item = &Message> + '_ {
        self.messages.iter().filter(move |m| m.kind == kind)
    }

    /// Whether any message is an error.
    pub fn contains_errors(&self) -> bool {
        self.of_kind(MessageKind::Error).next().is_some()
    }
}

/// Appends to `log` if one was supplied.
#[inline]
pub fn append_message(log: Option<&mut MessageLog>, text: impl Into<String>, kind: MessageKind) {
    if let Some(log) = log {
        log.add(text, kind);
    }
}
