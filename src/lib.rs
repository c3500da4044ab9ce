#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. screen::ScreenError)
    clippy::module_name_repetitions
)]

//! # nexvi
//!
//! The core of a modal editor that multiplexes several editing screens
//! over one terminal.
//!
//! ## Architecture
//!
//! Two independent subsystems share one explicitly passed
//! [`ProcessState`](process::ProcessState):
//! - **Scratch memory**: a reusable transient buffer lent to one borrower
//!   at a time, with private fallbacks for nested borrowers
//! - **Screen sessions**: one foreground screen and a queue of hidden ones,
//!   with hide, show, resize, listing and quit checks
//!
//! ## Modules
//!
//! - [`mem`]: Growable buffers and the scratch arena
//! - [`screen`]: Screen session manager and its collaborator traits
//! - [`process`]: Per-process state
//! - [`ex`]: Screen commands of the `ex` language
//! - [`message`]: Diagnostics queue
//! - [`interrupt`]: User interrupt flag
//! - [`config`]: Saved command-line defaults
//! - [`perf`]: Timing and debug event log

pub mod config;
pub mod ex;
pub mod interrupt;
pub mod mem;
pub mod message;
pub mod perf;
pub mod process;
pub mod screen;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ex::{ExCommand, ExOutcome, execute};
    pub use crate::mem::{GrowableBuffer, ScratchArena, ScratchBuf};
    pub use crate::message::{MessageLevel, MessageQueue, MessageSink};
    pub use crate::process::{ProcessOptions, ProcessState};
    pub use crate::screen::{Screen, ScreenManager};
}
