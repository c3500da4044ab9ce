//! Word-wrapped listing of background screen names.

use std::collections::vec_deque;
use std::fmt;
use std::iter::FusedIterator;

use unicode_width::UnicodeWidthStr;

use super::session::Screen;
use crate::interrupt::Interrupt;

/// One piece of listing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment<'a> {
    Name(&'a str),
    Space,
    LineBreak,
}

impl Fragment<'_> {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Space => " ",
            Self::LineBreak => "\n",
        }
    }
}

impl fmt::Display for Fragment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lazy, single-pass listing of background screens, oldest first.
///
/// Lines are broken before a name whose separator and width would bring
/// the line to `columns - 1` or beyond. The interrupt is polled before
/// each name; once raised the listing ends without a trailing line break.
#[derive(Debug)]
pub struct BackgroundListing<'a> {
    screens: vec_deque::Iter<'a, Screen>,
    interrupt: &'a Interrupt,
    limit: usize,
    col: usize,
    line_empty: bool,
    pending: Option<&'a str>,
    done: bool,
    interrupted: bool,
}

impl<'a> BackgroundListing<'a> {
    pub(crate) fn new(
        screens: vec_deque::Iter<'a, Screen>,
        columns: u16,
        interrupt: &'a Interrupt,
    ) -> Self {
        Self {
            screens,
            interrupt,
            limit: usize::from(columns).saturating_sub(1),
            col: 0,
            line_empty: true,
            pending: None,
            done: false,
            interrupted: false,
        }
    }

    /// Whether the listing stopped because of an interrupt.
    pub const fn was_interrupted(&self) -> bool {
        self.interrupted
    }
}

impl<'a> Iterator for BackgroundListing<'a> {
    type Item = Fragment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(name) = self.pending.take() {
            return Some(Fragment::Name(name));
        }
        if self.done {
            return None;
        }
        if self.interrupt.is_raised() {
            self.done = true;
            self.interrupted = true;
            return None;
        }
        let Some(screen) = self.screens.next() else {
            self.done = true;
            return Some(Fragment::LineBreak);
        };

        let name = screen.name();
        let width = name.width();
        // First on its line: emitted as is, however wide, with no break before it.
        if self.line_empty {
            self.line_empty = false;
            self.col = width;
            return Some(Fragment::Name(name));
        }

        self.pending = Some(name);
        if self.col + 1 + width >= self.limit {
            self.col = width;
            Some(Fragment::LineBreak)
        } else {
            self.col += 1 + width;
            Some(Fragment::Space)
        }
    }
}

impl FusedIterator for BackgroundListing<'_> {}
