//! File state consulted by the quit check.

use std::collections::{HashMap, HashSet};

use super::session::Screen;
use crate::message::{MessageLevel, MessageSink};

/// Predicates owned by the file layer.
///
/// Each predicate reports its own message when it blocks a quit.
pub trait FileStatus {
    /// Whether the screen's file has unsaved modifications.
    fn is_modified(&self, screen: &Screen, sink: &mut dyn MessageSink) -> bool;

    /// Whether more files are queued for this screen to edit next.
    fn has_queued_files(&self, screen: &Screen, sink: &mut dyn MessageSink) -> bool;
}

/// In-memory file status keyed by file name.
#[derive(Debug, Default, Clone)]
pub struct FileTable {
    modified: HashSet<String>,
    queued: HashMap<String, Vec<String>>,
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_modified(&mut self, name: &str) {
        self.modified.insert(name.to_string());
    }

    pub fn mark_written(&mut self, name: &str) {
        self.modified.remove(name);
    }

    /// Queue `next` to be edited after `name`.
    pub fn queue_file(&mut self, name: &str, next: impl Into<String>) {
        self.queued
            .entry(name.to_string())
            .or_default()
            .push(next.into());
    }

    pub fn queued_files(&self, name: &str) -> &[String] {
        self.queued.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}

impl FileStatus for FileTable {
    fn is_modified(&self, screen: &Screen, sink: &mut dyn MessageSink) -> bool {
        let modified = self.modified.contains(screen.name());
        if modified {
            sink.message(
                MessageLevel::Error,
                &format!(
                    "{}: file modified since last complete write; write or use ! to override",
                    screen.name()
                ),
            );
        }
        modified
    }

    fn has_queued_files(&self, screen: &Screen, sink: &mut dyn MessageSink) -> bool {
        let remaining = self.queued_files(screen.name()).len();
        if remaining == 0 {
            return false;
        }
        let noun = if remaining == 1 { "file" } else { "files" };
        sink.message(
            MessageLevel::Error,
            &format!("{remaining} more {noun} to edit; use ! to quit anyway"),
        );
        true
    }
}
