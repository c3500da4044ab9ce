//! The drawing layer as seen by the session manager.

use tracing::debug;

use super::ScreenError;
use super::resize::Adjustment;
use super::session::{Screen, ScreenId};

/// Smallest height a screen may shrink to.
pub const MIN_ROWS: u16 = 1;

/// Display operations the session manager delegates.
pub trait Display {
    /// Apply a row adjustment to `screen` and return its new height.
    ///
    /// # Errors
    /// Returns [`ScreenError::CannotResize`] when the result would fall
    /// outside what the terminal can show.
    fn adjust(&mut self, screen: &Screen, adjustment: Adjustment) -> Result<u16, ScreenError>;

    /// The display now shows `to` in place of `from`.
    fn cut_over(&mut self, from: &Screen, to: &Screen);
}

/// A display with no terminal behind it.
///
/// Heights are clamped to `MIN_ROWS..=rows`; cut-overs are recorded so
/// callers can replay them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessDisplay {
    rows: u16,
    cut_overs: Vec<(ScreenId, ScreenId)>,
}

impl HeadlessDisplay {
    pub const fn new(rows: u16) -> Self {
        Self {
            rows,
            cut_overs: Vec::new(),
        }
    }

    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Every `(from, to)` cut-over seen so far, oldest first.
    pub fn cut_overs(&self) -> &[(ScreenId, ScreenId)] {
        &self.cut_overs
    }
}

impl Display for HeadlessDisplay {
    fn adjust(&mut self, screen: &Screen, adjustment: Adjustment) -> Result<u16, ScreenError> {
        let wanted = adjustment.apply(screen.rows);
        let rows = u16::try_from(wanted)
            .ok()
            .filter(|rows| (MIN_ROWS..=self.rows).contains(rows))
            .ok_or(ScreenError::CannotResize {
                rows: wanted,
                max: self.rows,
            })?;
        debug!(screen = %screen.id(), rows, "screen resized");
        Ok(rows)
    }

    fn cut_over(&mut self, from: &Screen, to: &Screen) {
        self.cut_overs.push((from.id(), to.id()));
    }
}
