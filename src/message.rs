//! Diagnostic messages.
//!
//! The core never prints. Anything the user should see is pushed into a
//! [`MessageSink`] together with a [`MessageLevel`]; the front end decides
//! how and when to show it.

use std::collections::VecDeque;
use std::fmt;

/// Severity of a queued message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageLevel {
    /// Plain information ("No background screens to display").
    Info,
    /// Command usage errors and other user mistakes.
    Error,
    /// Failures coming from the system, such as allocation failure.
    SysErr,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "info",
            Self::Error => "error",
            Self::SysErr => "syserr",
        };
        f.write_str(label)
    }
}

/// Receiver for user-facing diagnostics.
pub trait MessageSink {
    fn message(&mut self, level: MessageLevel, text: &str);
}

/// A single queued message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

/// FIFO message queue, the sink owned by the process state.
#[derive(Debug, Default)]
pub struct MessageQueue {
    pending: VecDeque<Message>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate over queued messages without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.pending.iter()
    }

    /// Remove and return every queued message, oldest first.
    pub fn drain(&mut self) -> Vec<Message> {
        self.pending.drain(..).collect()
    }
}

impl MessageSink for MessageQueue {
    fn message(&mut self, level: MessageLevel, text: &str) {
        self.pending.push_back(Message {
            level,
            text: text.to_string(),
        });
    }
}
