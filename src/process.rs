//! Per-process editor state.
//!
//! Everything the core shares between commands lives in one
//! [`ProcessState`] value that callers pass around explicitly.

use crate::interrupt::Interrupt;
use crate::mem::{MemError, ScratchArena};
use crate::message::MessageQueue;
use crate::screen::{FileRecord, ScreenManager};

/// Startup geometry and sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    pub rows: u16,
    pub columns: u16,
    /// Bytes to pre-allocate for the scratch arena.
    pub scratch_capacity: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            rows: 24,
            columns: 80,
            scratch_capacity: 0,
        }
    }
}

/// State shared by every screen of one editor process.
#[derive(Debug)]
pub struct ProcessState {
    pub scratch: ScratchArena,
    pub screens: ScreenManager,
    pub interrupt: Interrupt,
    pub messages: MessageQueue,
}

impl ProcessState {
    /// Start a process whose first screen edits `file`.
    ///
    /// # Errors
    /// Returns [`MemError::OutOfMemory`] if the scratch arena cannot be
    /// pre-allocated.
    pub fn new(file: FileRecord, options: ProcessOptions) -> Result<Self, MemError> {
        Ok(Self {
            scratch: ScratchArena::with_capacity(options.scratch_capacity)?,
            screens: ScreenManager::new(file, options.rows, options.columns),
            interrupt: Interrupt::new(),
            messages: MessageQueue::new(),
        })
    }
}
