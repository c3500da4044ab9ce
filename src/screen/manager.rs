use std::collections::VecDeque;
use std::mem;

use tracing::debug;

use super::ScreenError;
use super::display::Display;
use super::files::FileStatus;
use super::listing::BackgroundListing;
use super::resize::{Adjustment, ResizeModifiers};
use super::session::{FileRecord, Screen, ScreenId};
use crate::interrupt::Interrupt;
use crate::message::{MessageLevel, MessageSink};

const RESIZE_USAGE: &str = "resize [+|-]rows";

/// Result of [`ScreenManager::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    /// The named screen is already in the foreground.
    Current(ScreenId),
    /// A background screen was brought to the foreground.
    Promoted(ScreenId),
    /// A new screen was created and is waiting for the display to switch.
    Created(ScreenId),
}

/// Why a quit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Modified,
    QueuedFiles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitDecision {
    Allowed,
    Blocked(BlockReason),
}

/// Result of [`ScreenManager::reap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reap {
    /// The foreground screen is not quitting.
    Running,
    /// The quitting screen was removed and another took its place.
    Retired(Screen),
    /// The quitting screen was the last one; the editor should exit.
    Exit,
}

/// Owns every screen of one editor process.
///
/// Each screen is in exactly one place: the foreground, the background
/// queue, or (between [`show`](Self::show) creating it and
/// [`complete_switch`](Self::complete_switch)) the pending slot.
#[derive(Debug)]
pub struct ScreenManager {
    current: Screen,
    hidden: VecDeque<Screen>,
    pending: Option<Screen>,
    next_id: u32,
}

impl ScreenManager {
    /// Create a manager whose foreground screen edits `file`.
    pub fn new(file: FileRecord, rows: u16, columns: u16) -> Self {
        Self {
            current: Screen::new(ScreenId::new(1), file, rows, columns),
            hidden: VecDeque::new(),
            pending: None,
            next_id: 2,
        }
    }

    pub const fn current(&self) -> &Screen {
        &self.current
    }

    /// Background screens, first hidden first.
    pub fn background(&self) -> impl ExactSizeIterator<Item = &Screen> {
        self.hidden.iter()
    }

    pub const fn pending(&self) -> Option<&Screen> {
        self.pending.as_ref()
    }

    /// Add a screen straight to the background queue.
    pub fn open_background(&mut self, file: FileRecord) -> ScreenId {
        let id = self.allocate_id();
        let screen = Screen::new(id, file, self.current.rows, self.current.columns);
        self.hidden.push_back(screen);
        id
    }

    /// Hide the foreground screen (`:bg`).
    ///
    /// The foreground screen goes to the tail of the background queue and
    /// the screen at the head takes its place. A switch still pending from
    /// [`show`](Self::show) is abandoned. Returns the new foreground screen.
    ///
    /// # Errors
    /// [`ScreenError::OnlyScreen`] when nothing could replace it and
    /// [`ScreenError::Quitting`] when the foreground screen is quitting.
    pub fn hide(&mut self, display: &mut dyn Display) -> Result<ScreenId, ScreenError> {
        if self.current.is_quitting() {
            return Err(ScreenError::Quitting);
        }
        let Some(next) = self.hidden.pop_front() else {
            return Err(ScreenError::OnlyScreen);
        };
        let id = next.id();
        self.swap_foreground(next, display);
        Ok(id)
    }

    /// Show a screen (`:fg [name]`).
    ///
    /// Without a name the oldest background screen is promoted. A name
    /// matching a background screen promotes that screen and abandons any
    /// pending switch. Any other name creates a new screen, records it as
    /// the foreground screen's next display target and flags the switch;
    /// the cut-over happens in [`complete_switch`](Self::complete_switch).
    /// A screen still waiting from an earlier call is discarded.
    ///
    /// # Errors
    /// [`ScreenError::NoBackground`] when no name is given and the queue is
    /// empty, [`ScreenError::Quitting`] when the foreground screen is
    /// quitting.
    pub fn show(
        &mut self,
        target: Option<&str>,
        display: &mut dyn Display,
    ) -> Result<ShowOutcome, ScreenError> {
        if self.current.is_quitting() {
            return Err(ScreenError::Quitting);
        }

        let position = match target {
            None if self.hidden.is_empty() => return Err(ScreenError::NoBackground),
            None => Some(0),
            Some(name) if name == self.current.name() => {
                return Ok(ShowOutcome::Current(self.current.id()));
            }
            Some(name) => self.hidden.iter().position(|sp| sp.name() == name),
        };

        if let Some(screen) = position.and_then(|idx| self.hidden.remove(idx)) {
            let id = screen.id();
            self.swap_foreground(screen, display);
            return Ok(ShowOutcome::Promoted(id));
        }

        let name = target.unwrap_or_default();
        let id = self.allocate_id();
        let screen = Screen::new(
            id,
            FileRecord::new(name),
            self.current.rows,
            self.current.columns,
        );
        if let Some(dropped) = self.pending.replace(screen) {
            debug!(screen = %dropped.id(), "discarding unswitched screen");
        }
        self.current.request_switch(id);
        debug!(screen = %id, name, "screen created, switch pending");
        Ok(ShowOutcome::Created(id))
    }

    /// Perform a pending display switch.
    ///
    /// The pending screen becomes the foreground screen and the old one
    /// joins the background queue with its switch state cleared. Returns
    /// the new foreground screen, or `None` if no switch was pending.
    pub fn complete_switch(&mut self, display: &mut dyn Display) -> Option<ScreenId> {
        if !self.current.is_switch_pending() {
            return None;
        }
        let target = self.current.next_display();
        let Some(next) = self.pending.take_if(|sp| Some(sp.id()) == target) else {
            self.current.clear_switch();
            return None;
        };
        let id = next.id();
        self.swap_foreground(next, display);
        Some(id)
    }

    /// Resize the foreground screen (`:resize [+|-]rows`).
    ///
    /// # Errors
    /// [`ScreenError::Usage`] when the modifiers do not encode exactly one
    /// of set, increase, or decrease; whatever the display reports when it
    /// cannot honour the size. Both are reported to `sink` and leave the
    /// screen unchanged.
    pub fn resize(
        &mut self,
        count: u32,
        modifiers: ResizeModifiers,
        display: &mut dyn Display,
        sink: &mut dyn MessageSink,
    ) -> Result<u16, ScreenError> {
        let outcome = Adjustment::from_modifiers(count, modifiers)
            .ok_or(ScreenError::Usage(RESIZE_USAGE))
            .and_then(|adjustment| display.adjust(&self.current, adjustment));
        match outcome {
            Ok(rows) => {
                self.current.rows = rows;
                Ok(rows)
            }
            Err(err) => {
                sink.message(MessageLevel::Error, &err.to_string());
                Err(err)
            }
        }
    }

    /// List background screen names wrapped to the foreground width.
    ///
    /// With no background screens an informational message goes to `sink`
    /// and `None` is returned.
    pub fn list_background<'a>(
        &'a self,
        interrupt: &'a Interrupt,
        sink: &mut dyn MessageSink,
    ) -> Option<BackgroundListing<'a>> {
        if self.hidden.is_empty() {
            sink.message(MessageLevel::Info, "No background screens to display");
            return None;
        }
        Some(BackgroundListing::new(
            self.hidden.iter(),
            self.current.columns,
            interrupt,
        ))
    }

    /// Decide whether the foreground screen may quit (`:q[!]`).
    ///
    /// Unless `force` is set, the screen's file must be unmodified and no
    /// further files may be queued. An allowed quit flags the screen as
    /// exiting, forced or not; a blocked one changes nothing.
    pub fn check_quit(
        &mut self,
        force: bool,
        files: &dyn FileStatus,
        sink: &mut dyn MessageSink,
    ) -> QuitDecision {
        if self.current.is_quitting() {
            return QuitDecision::Allowed;
        }
        if !force {
            if files.is_modified(&self.current, sink) {
                return QuitDecision::Blocked(BlockReason::Modified);
            }
            if files.has_queued_files(&self.current, sink) {
                return QuitDecision::Blocked(BlockReason::QueuedFiles);
            }
        }
        self.current.mark_exit(force);
        debug!(screen = %self.current.id(), force, "screen quitting");
        QuitDecision::Allowed
    }

    /// Retire a quitting foreground screen.
    ///
    /// A pending screen takes over first, then the oldest background
    /// screen. With nothing left the editor should exit.
    pub fn reap(&mut self) -> Reap {
        if !self.current.is_quitting() {
            return Reap::Running;
        }
        let Some(next) = self.pending.take().or_else(|| self.hidden.pop_front()) else {
            return Reap::Exit;
        };
        let retired = mem::replace(&mut self.current, next);
        debug!(retired = %retired.id(), current = %self.current.id(), "screen retired");
        Reap::Retired(retired)
    }

    fn swap_foreground(&mut self, next: Screen, display: &mut dyn Display) {
        // A switch the old foreground was waiting on is abandoned with it.
        if let Some(dropped) = self.pending.take() {
            debug!(screen = %dropped.id(), "discarding unswitched screen");
        }
        let mut previous = mem::replace(&mut self.current, next);
        previous.clear_switch();
        display.cut_over(&previous, &self.current);
        debug!(from = %previous.id(), to = %self.current.id(), "foreground switched");
        self.hidden.push_back(previous);
    }

    fn allocate_id(&mut self) -> ScreenId {
        let id = ScreenId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageQueue;
    use crate::screen::display::HeadlessDisplay;
    use crate::screen::files::FileTable;
    use crate::screen::session::ScreenFlags;

    fn manager_with(background: &[&str]) -> ScreenManager {
        let mut screens = ScreenManager::new(FileRecord::new("main"), 20, 80);
        for name in background {
            screens.open_background(FileRecord::new(*name));
        }
        screens
    }

    fn background_names(screens: &ScreenManager) -> Vec<&str> {
        screens.background().map(Screen::name).collect()
    }

    // --- hide ---

    #[test]
    fn test_hide_moves_foreground_to_tail() {
        let mut screens = manager_with(&["a", "b"]);
        let mut display = HeadlessDisplay::new(40);

        screens.hide(&mut display).unwrap();
        assert_eq!(screens.current().name(), "a");
        assert_eq!(background_names(&screens), ["b", "main"]);
        assert_eq!(display.cut_overs().len(), 1);
    }

    #[test]
    fn test_hide_only_screen_is_refused() {
        let mut screens = manager_with(&[]);
        let mut display = HeadlessDisplay::new(40);
        assert_eq!(screens.hide(&mut display), Err(ScreenError::OnlyScreen));
        assert_eq!(screens.current().name(), "main");
    }

    // --- show ---

    #[test]
    fn test_show_without_name_promotes_oldest() {
        let mut screens = manager_with(&["a", "b"]);
        let mut display = HeadlessDisplay::new(40);

        let outcome = screens.show(None, &mut display).unwrap();
        assert!(matches!(outcome, ShowOutcome::Promoted(_)));
        assert_eq!(screens.current().name(), "a");
        assert_eq!(background_names(&screens), ["b", "main"]);
    }

    #[test]
    fn test_show_without_name_and_empty_queue_fails() {
        let mut screens = manager_with(&[]);
        let mut display = HeadlessDisplay::new(40);
        assert_eq!(screens.show(None, &mut display), Err(ScreenError::NoBackground));
    }

    #[test]
    fn test_show_existing_name_promotes_it() {
        let mut screens = manager_with(&["a", "b", "c"]);
        let mut display = HeadlessDisplay::new(40);

        screens.show(Some("b"), &mut display).unwrap();
        assert_eq!(screens.current().name(), "b");
        assert_eq!(background_names(&screens), ["a", "c", "main"]);
        assert!(screens.pending().is_none());
    }

    #[test]
    fn test_show_current_name_changes_nothing() {
        let mut screens = manager_with(&["a"]);
        let mut display = HeadlessDisplay::new(40);
        let id = screens.current().id();
        assert_eq!(screens.show(Some("main"), &mut display), Ok(ShowOutcome::Current(id)));
        assert!(display.cut_overs().is_empty());
    }

    #[test]
    fn test_show_new_name_creates_one_pending_screen() {
        let mut screens = manager_with(&["a"]);
        let mut display = HeadlessDisplay::new(40);

        let ShowOutcome::Created(id) = screens.show(Some("new"), &mut display).unwrap() else {
            panic!("expected a new screen");
        };
        assert_eq!(screens.pending().map(Screen::id), Some(id));
        assert_eq!(screens.pending().map(Screen::name), Some("new"));
        assert!(screens.current().is_switch_pending());
        assert_eq!(screens.current().next_display(), Some(id));
        assert_eq!(background_names(&screens), ["a"]);
        assert!(display.cut_overs().is_empty());
    }

    #[test]
    fn test_complete_switch_cuts_over_to_new_screen() {
        let mut screens = manager_with(&[]);
        let mut display = HeadlessDisplay::new(40);
        let old = screens.current().id();

        let ShowOutcome::Created(id) = screens.show(Some("new"), &mut display).unwrap() else {
            panic!("expected a new screen");
        };
        assert_eq!(screens.complete_switch(&mut display), Some(id));
        assert_eq!(screens.current().id(), id);
        assert_eq!(display.cut_overs(), [(old, id)]);

        let hidden = screens.background().next().unwrap();
        assert_eq!(hidden.id(), old);
        assert!(!hidden.is_switch_pending());
        assert_eq!(hidden.next_display(), None);
        assert_eq!(screens.complete_switch(&mut display), None);
    }

    #[test]
    fn test_hide_abandons_pending_switch() {
        let mut screens = manager_with(&["a"]);
        let mut display = HeadlessDisplay::new(40);
        let mut sink = MessageQueue::new();

        screens.show(Some("new"), &mut display).unwrap();
        screens.hide(&mut display).unwrap();
        assert_eq!(screens.current().name(), "a");
        assert!(screens.pending().is_none());
        assert!(screens.background().all(|sp| !sp.is_switch_pending()));
        assert_eq!(screens.complete_switch(&mut display), None);

        screens.check_quit(true, &FileTable::new(), &mut sink);
        let Reap::Retired(retired) = screens.reap() else {
            panic!("expected the screen to be retired");
        };
        assert_eq!(retired.name(), "a");
        assert_eq!(screens.current().name(), "main");
        assert_eq!(background_names(&screens), Vec::<&str>::new());
    }

    #[test]
    fn test_promoting_existing_screen_abandons_pending_switch() {
        let mut screens = manager_with(&["a", "b"]);
        let mut display = HeadlessDisplay::new(40);

        screens.show(Some("new"), &mut display).unwrap();
        assert!(matches!(
            screens.show(Some("b"), &mut display),
            Ok(ShowOutcome::Promoted(_))
        ));
        assert_eq!(screens.current().name(), "b");
        assert!(screens.pending().is_none());
        assert_eq!(background_names(&screens), ["a", "main"]);
        assert_eq!(screens.complete_switch(&mut display), None);
        assert_eq!(screens.current().name(), "b");
    }

    #[test]
    fn test_new_screen_inherits_geometry() {
        let mut screens = manager_with(&[]);
        let mut display = HeadlessDisplay::new(40);
        screens.show(Some("new"), &mut display).unwrap();
        let pending = screens.pending().unwrap();
        assert_eq!((pending.rows, pending.columns), (20, 80));
    }

    // --- resize ---

    #[test]
    fn test_resize_without_modifiers_is_usage_error() {
        let mut screens = manager_with(&[]);
        let mut display = HeadlessDisplay::new(40);
        let mut sink = MessageQueue::new();

        let err = screens
            .resize(5, ResizeModifiers::empty(), &mut display, &mut sink)
            .unwrap_err();
        assert_eq!(err, ScreenError::Usage(RESIZE_USAGE));
        assert_eq!(screens.current().rows, 20);
        assert_eq!(sink.drain()[0].text, "Usage: resize [+|-]rows");
    }

    #[test]
    fn test_resize_set_increase_decrease() {
        let mut screens = manager_with(&[]);
        let mut display = HeadlessDisplay::new(40);
        let mut sink = MessageQueue::new();

        assert_eq!(screens.resize(10, ResizeModifiers::SET, &mut display, &mut sink), Ok(10));
        assert_eq!(screens.resize(5, ResizeModifiers::INCREASE, &mut display, &mut sink), Ok(15));
        let shrink = ResizeModifiers::INCREASE | ResizeModifiers::DECREASE;
        assert_eq!(screens.resize(3, shrink, &mut display, &mut sink), Ok(12));
        assert_eq!(screens.current().rows, 12);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_resize_conflicting_modifiers_is_usage_error() {
        let mut screens = manager_with(&[]);
        let mut display = HeadlessDisplay::new(40);
        let mut sink = MessageQueue::new();
        let bad = ResizeModifiers::SET | ResizeModifiers::INCREASE;
        assert!(matches!(
            screens.resize(5, bad, &mut display, &mut sink),
            Err(ScreenError::Usage(_))
        ));
        assert_eq!(screens.current().rows, 20);
    }

    #[test]
    fn test_resize_rejected_by_display_keeps_rows() {
        let mut screens = manager_with(&[]);
        let mut display = HeadlessDisplay::new(40);
        let mut sink = MessageQueue::new();
        let shrink = ResizeModifiers::INCREASE | ResizeModifiers::DECREASE;
        assert!(screens.resize(50, shrink, &mut display, &mut sink).is_err());
        assert_eq!(screens.current().rows, 20);
        assert_eq!(sink.len(), 1);
    }

    // --- list ---

    #[test]
    fn test_list_empty_queue_reports_once() {
        let screens = manager_with(&[]);
        let interrupt = Interrupt::new();
        let mut sink = MessageQueue::new();

        assert!(screens.list_background(&interrupt, &mut sink).is_none());
        let messages = sink.drain();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].level, MessageLevel::Info);
    }

    #[test]
    fn test_list_uses_foreground_width() {
        let mut screens = ScreenManager::new(FileRecord::new("main"), 20, 8);
        for name in ["aaa", "bbbbbbbbbb", "cc"] {
            screens.open_background(FileRecord::new(name));
        }
        let interrupt = Interrupt::new();
        let mut sink = MessageQueue::new();

        let text: String = screens
            .list_background(&interrupt, &mut sink)
            .unwrap()
            .map(|f| f.to_string())
            .collect();
        assert_eq!(text, "aaa\nbbbbbbbbbb\ncc\n");
        assert!(sink.is_empty());
    }

    // --- quit ---

    #[test]
    fn test_quit_blocked_by_modification() {
        let mut screens = manager_with(&[]);
        let mut files = FileTable::new();
        files.mark_modified("main");
        let mut sink = MessageQueue::new();

        let decision = screens.check_quit(false, &files, &mut sink);
        assert_eq!(decision, QuitDecision::Blocked(BlockReason::Modified));
        assert!(screens.current().flags().is_empty());
    }

    #[test]
    fn test_quit_blocked_by_queued_files() {
        let mut screens = manager_with(&[]);
        let mut files = FileTable::new();
        files.queue_file("main", "next.txt");
        let mut sink = MessageQueue::new();

        let decision = screens.check_quit(false, &files, &mut sink);
        assert_eq!(decision, QuitDecision::Blocked(BlockReason::QueuedFiles));
        assert!(!screens.current().is_quitting());
    }

    #[test]
    fn test_forced_quit_skips_checks() {
        let mut screens = manager_with(&[]);
        let mut files = FileTable::new();
        files.mark_modified("main");
        files.queue_file("main", "next.txt");
        let mut sink = MessageQueue::new();

        assert_eq!(screens.check_quit(true, &files, &mut sink), QuitDecision::Allowed);
        assert!(screens.current().flags().contains(ScreenFlags::EXIT_FORCE));
        assert!(sink.is_empty(), "forced quit must not consult the file layer");
    }

    #[test]
    fn test_clean_quit_sets_exit() {
        let mut screens = manager_with(&[]);
        let mut sink = MessageQueue::new();
        assert_eq!(
            screens.check_quit(false, &FileTable::new(), &mut sink),
            QuitDecision::Allowed
        );
        assert!(screens.current().flags().contains(ScreenFlags::EXIT));
    }

    #[test]
    fn test_quitting_screen_cannot_be_hidden_or_switched() {
        let mut screens = manager_with(&["a"]);
        let mut display = HeadlessDisplay::new(40);
        let mut sink = MessageQueue::new();
        screens.check_quit(true, &FileTable::new(), &mut sink);

        assert_eq!(screens.hide(&mut display), Err(ScreenError::Quitting));
        assert_eq!(screens.show(Some("a"), &mut display), Err(ScreenError::Quitting));
    }

    // --- reap ---

    #[test]
    fn test_reap_promotes_background_head() {
        let mut screens = manager_with(&["a", "b"]);
        let mut sink = MessageQueue::new();
        assert_eq!(screens.reap(), Reap::Running);

        screens.check_quit(false, &FileTable::new(), &mut sink);
        let Reap::Retired(retired) = screens.reap() else {
            panic!("expected the screen to be retired");
        };
        assert_eq!(retired.name(), "main");
        assert_eq!(screens.current().name(), "a");
        assert_eq!(background_names(&screens), ["b"]);
    }

    #[test]
    fn test_reap_last_screen_exits() {
        let mut screens = manager_with(&[]);
        let mut sink = MessageQueue::new();
        screens.check_quit(false, &FileTable::new(), &mut sink);
        assert_eq!(screens.reap(), Reap::Exit);
    }
}
