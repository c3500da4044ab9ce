//! Screen session management.
//!
//! A process has one foreground [`Screen`] and a queue of hidden ones.
//! [`ScreenManager`] moves screens between the two, resizes the
//! foreground screen through a [`Display`], lists the hidden screens and
//! gates quitting on the state reported by a [`FileStatus`].
//!
//! ```
//! use nexvi::screen::{FileRecord, HeadlessDisplay, ScreenManager, ShowOutcome};
//!
//! let mut display = HeadlessDisplay::new(24);
//! let mut screens = ScreenManager::new(FileRecord::new("main.rs"), 24, 80);
//!
//! let outcome = screens.show(Some("lib.rs"), &mut display).unwrap();
//! assert!(matches!(outcome, ShowOutcome::Created(_)));
//! assert!(screens.current().is_switch_pending());
//!
//! screens.complete_switch(&mut display);
//! assert_eq!(screens.current().name(), "lib.rs");
//! assert_eq!(screens.background().next().unwrap().name(), "main.rs");
//! ```

mod display;
mod files;
mod listing;
mod manager;
mod resize;
mod session;

use thiserror::Error;

pub use display::{Display, HeadlessDisplay, MIN_ROWS};
pub use files::{FileStatus, FileTable};
pub use listing::{BackgroundListing, Fragment};
pub use manager::{BlockReason, QuitDecision, Reap, ScreenManager, ShowOutcome};
pub use resize::{AdjustMode, Adjustment, ResizeModifiers};
pub use session::{FileRecord, Screen, ScreenFlags, ScreenId};

/// Errors from screen lifecycle operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScreenError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("You may not background your only displayed screen")]
    OnlyScreen,

    #[error("There are no background screens")]
    NoBackground,

    #[error("The screen is quitting")]
    Quitting,

    #[error("Cannot resize the screen to {rows} rows (allowed 1-{max})")]
    CannotResize { rows: i64, max: u16 },
}
