//! Screen commands of the `ex` command language.
//!
//! [`ExCommand`] is the structured record a command-line parser produces;
//! [`execute`] maps it onto the core. [`ExCommand::parse`] understands the
//! handful of spellings the binary needs:
//!
//! | command              | record                         |
//! |----------------------|--------------------------------|
//! | `bg`                 | [`ExCommand::Background`]      |
//! | `fg [name]`          | [`ExCommand::Foreground`]      |
//! | `res[ize] [+\|-]rows` | [`ExCommand::Resize`]          |
//! | `di[splay] s[creens]`| [`ExCommand::DisplayScreens`]  |
//! | `q[uit][!]`          | [`ExCommand::Quit`]            |

use thiserror::Error;

use crate::mem::MemError;
use crate::message::{MessageLevel, MessageSink};
use crate::process::ProcessState;
use crate::screen::{
    BlockReason, Display, FileStatus, QuitDecision, Reap, ResizeModifiers, ScreenError,
};

/// Initial scratch request for formatting a screen listing.
const LISTING_CHUNK: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Screen(#[from] ScreenError),

    #[error(transparent)]
    Memory(#[from] MemError),
}

/// A parsed screen command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    Background,
    Foreground(Option<String>),
    Resize {
        count: u32,
        modifiers: ResizeModifiers,
    },
    DisplayScreens,
    Quit {
        force: bool,
    },
}

impl ExCommand {
    /// Parse one command line, with or without the leading `:`.
    ///
    /// # Errors
    /// [`ExError::UnknownCommand`] for anything that is not a screen
    /// command, [`ExError::InvalidArgument`] for malformed arguments.
    pub fn parse(line: &str) -> Result<Self, ExError> {
        let line = line.trim();
        let line = line.strip_prefix(':').unwrap_or(line).trim_start();
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(ExError::UnknownCommand(String::new()));
        };
        let (name, force) = match head.strip_suffix('!') {
            Some(name) => (name, true),
            None => (head, false),
        };
        let arg = words.next();
        let extra = words.next();

        let command = match name {
            "bg" => Self::Background,
            "fg" => Self::Foreground(arg.map(ToOwned::to_owned)),
            _ if is_abbrev(name, "resize", 3) => parse_resize(arg)?,
            _ if is_abbrev(name, "display", 2) => match arg {
                Some(what) if is_abbrev(what, "screens", 1) => Self::DisplayScreens,
                Some(what) => return Err(ExError::InvalidArgument(what.to_string())),
                None => return Err(ExError::InvalidArgument("display what?".to_string())),
            },
            _ if is_abbrev(name, "quit", 1) => Self::Quit { force },
            _ => return Err(ExError::UnknownCommand(head.to_string())),
        };
        if force && !matches!(command, Self::Quit { .. }) {
            return Err(ExError::UnknownCommand(head.to_string()));
        }
        if let Some(extra) = extra {
            return Err(ExError::InvalidArgument(extra.to_string()));
        }
        Ok(command)
    }
}

/// What the front end should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExOutcome {
    Done,
    /// Text to show the user.
    Output(String),
    QuitBlocked(BlockReason),
    /// The last screen quit.
    Exit,
}

/// Run `command` against `state`.
///
/// Screen errors are reported to the process message queue before they are
/// returned. A `:fg` that creates a screen leaves the switch pending; the
/// front end completes it with
/// [`ScreenManager::complete_switch`](crate::screen::ScreenManager::complete_switch).
///
/// # Errors
/// Any [`ScreenError`] or [`MemError`] raised by the core.
pub fn execute(
    state: &mut ProcessState,
    command: &ExCommand,
    display: &mut dyn Display,
    files: &dyn FileStatus,
) -> Result<ExOutcome, ExError> {
    crate::perf::log_event("ex.command", format!("{command:?}"));
    match command {
        ExCommand::Background => {
            state
                .screens
                .hide(display)
                .map_err(|err| report(err, &mut state.messages))?;
            Ok(ExOutcome::Done)
        }
        ExCommand::Foreground(name) => {
            state
                .screens
                .show(name.as_deref(), display)
                .map_err(|err| report(err, &mut state.messages))?;
            Ok(ExOutcome::Done)
        }
        ExCommand::Resize { count, modifiers } => {
            state
                .screens
                .resize(*count, *modifiers, display, &mut state.messages)?;
            Ok(ExOutcome::Done)
        }
        ExCommand::DisplayScreens => {
            Ok(render_listing(state)?.map_or(ExOutcome::Done, ExOutcome::Output))
        }
        ExCommand::Quit { force } => {
            match state.screens.check_quit(*force, files, &mut state.messages) {
                QuitDecision::Blocked(reason) => Ok(ExOutcome::QuitBlocked(reason)),
                QuitDecision::Allowed => match state.screens.reap() {
                    Reap::Exit => Ok(ExOutcome::Exit),
                    Reap::Retired(_) | Reap::Running => Ok(ExOutcome::Done),
                },
            }
        }
    }
}

/// Format the background listing in scratch space.
fn render_listing(state: &mut ProcessState) -> Result<Option<String>, MemError> {
    let ProcessState {
        scratch,
        screens,
        interrupt,
        messages,
    } = state;
    let Some(mut listing) = screens.list_background(interrupt, &mut *messages) else {
        return Ok(None);
    };

    let mut buf = scratch.acquire(LISTING_CHUNK, &mut *messages)?;
    let mut len = 0;
    for fragment in listing.by_ref() {
        let text = fragment.as_str();
        let end = len + text.len();
        if end > buf.capacity() {
            buf.extend(end, &mut *messages)?;
        }
        buf[len..end].copy_from_slice(text.as_bytes());
        len = end;
    }
    let text = String::from_utf8_lossy(&buf[..len]).into_owned();
    buf.release();

    let interrupted = listing.was_interrupted();
    interrupt.take();
    if interrupted {
        messages.message(MessageLevel::Info, "Interrupted");
    }
    Ok(Some(text))
}

fn report(err: ScreenError, sink: &mut dyn MessageSink) -> ScreenError {
    sink.message(MessageLevel::Error, &err.to_string());
    err
}

fn parse_resize(arg: Option<&str>) -> Result<ExCommand, ExError> {
    let Some(arg) = arg else {
        return Ok(ExCommand::Resize {
            count: 0,
            modifiers: ResizeModifiers::empty(),
        });
    };
    let (digits, modifiers) = if let Some(rest) = arg.strip_prefix('+') {
        (rest, ResizeModifiers::INCREASE)
    } else if let Some(rest) = arg.strip_prefix('-') {
        (rest, ResizeModifiers::INCREASE | ResizeModifiers::DECREASE)
    } else {
        (arg, ResizeModifiers::SET)
    };
    let count = digits
        .parse()
        .map_err(|_| ExError::InvalidArgument(arg.to_string()))?;
    Ok(ExCommand::Resize { count, modifiers })
}

/// Whether `word` is `full` or a prefix of it at least `min` long.
fn is_abbrev(word: &str, full: &str, min: usize) -> bool {
    word.len() >= min && full.starts_with(word)
}
