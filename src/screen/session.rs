use std::fmt;

use bitflags::bitflags;

/// Stable identifier of a screen within one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(u32);

impl ScreenId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Lifecycle flags carried by a screen.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ScreenFlags: u8 {
        /// A normal quit passed the quit check.
        const EXIT = 1 << 0;
        /// A forced quit (`:q!`) skipped the quit check.
        const EXIT_FORCE = 1 << 1;
        /// The display should cut over to `next_display`.
        const SWITCH_PENDING = 1 << 2;
    }
}

/// The file a screen is editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
}

impl FileRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    id: ScreenId,
    file: FileRecord,
    /// Height in terminal rows.
    pub rows: u16,
    /// Width in terminal columns.
    pub columns: u16,
    next_display: Option<ScreenId>,
    flags: ScreenFlags,
}

impl Screen {
    pub(crate) fn new(id: ScreenId, file: FileRecord, rows: u16, columns: u16) -> Self {
        Self {
            id,
            file,
            rows,
            columns,
            next_display: None,
            flags: ScreenFlags::empty(),
        }
    }

    pub const fn id(&self) -> ScreenId {
        self.id
    }

    /// The screen's name, which is the name of the file it edits.
    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub const fn file(&self) -> &FileRecord {
        &self.file
    }

    pub const fn flags(&self) -> ScreenFlags {
        self.flags
    }

    /// Screen the display should switch to, set while a switch is pending.
    pub const fn next_display(&self) -> Option<ScreenId> {
        self.next_display
    }

    pub const fn is_quitting(&self) -> bool {
        self.flags.intersects(ScreenFlags::EXIT.union(ScreenFlags::EXIT_FORCE))
    }

    pub const fn is_switch_pending(&self) -> bool {
        self.flags.contains(ScreenFlags::SWITCH_PENDING)
    }

    pub(crate) fn request_switch(&mut self, target: ScreenId) {
        self.next_display = Some(target);
        self.flags.insert(ScreenFlags::SWITCH_PENDING);
    }

    pub(crate) fn clear_switch(&mut self) {
        self.next_display = None;
        self.flags.remove(ScreenFlags::SWITCH_PENDING);
    }

    pub(crate) fn mark_exit(&mut self, force: bool) {
        self.flags.insert(if force {
            ScreenFlags::EXIT_FORCE
        } else {
            ScreenFlags::EXIT
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Screen {
        Screen::new(ScreenId::new(1), FileRecord::new("notes.txt"), 24, 80)
    }

    #[test]
    fn test_new_screen_has_no_flags() {
        let sp = screen();
        assert_eq!(sp.name(), "notes.txt");
        assert!(sp.flags().is_empty());
        assert!(!sp.is_quitting());
        assert_eq!(sp.next_display(), None);
    }

    #[test]
    fn test_switch_request_and_clear() {
        let mut sp = screen();
        sp.request_switch(ScreenId::new(7));
        assert!(sp.is_switch_pending());
        assert_eq!(sp.next_display(), Some(ScreenId::new(7)));

        sp.clear_switch();
        assert!(!sp.is_switch_pending());
        assert_eq!(sp.next_display(), None);
    }

    #[test]
    fn test_forced_exit_is_distinguished() {
        let mut sp = screen();
        sp.mark_exit(true);
        assert!(sp.is_quitting());
        assert!(sp.flags().contains(ScreenFlags::EXIT_FORCE));
        assert!(!sp.flags().contains(ScreenFlags::EXIT));
    }
}
