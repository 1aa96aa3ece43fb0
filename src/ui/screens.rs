/// The three panes of the main screen. Tab cycles through them in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Pane {
    #[default]
    Roster,
    Teams,
    Leaderboard,
}

impl Pane {
    pub(crate) fn next(self) -> Self {
        match self {
            Pane::Roster => Pane::Teams,
            Pane::Teams => Pane::Leaderboard,
            Pane::Leaderboard => Pane::Roster,
        }
    }

    pub(crate) fn previous(self) -> Self {
        match self {
            Pane::Roster => Pane::Leaderboard,
            Pane::Teams => Pane::Roster,
            Pane::Leaderboard => Pane::Teams,
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            Pane::Roster => "People",
            Pane::Teams => "Teams",
            Pane::Leaderboard => "Leaderboard",
        }
    }
}

/// Selection inside a list whose length can change underneath it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ListCursor {
    pub(crate) selected: usize,
}

impl ListCursor {
    pub(crate) fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = (len - 1) as isize;
        self.selected = (self.selected as isize + delta).clamp(0, max) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Pull the selection back inside `0..len` after the list shrank.
    pub(crate) fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

/// Vertical scroll offset for paragraph panes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Scroll {
    pub(crate) offset: u16,
}

impl Scroll {
    pub(crate) fn move_by(&mut self, delta: i32, content_lines: usize) {
        let max = content_lines.saturating_sub(1).min(u16::MAX as usize) as i32;
        self.offset = (self.offset as i32 + delta).clamp(0, max) as u16;
    }

    pub(crate) fn reset(&mut self) {
        self.offset = 0;
    }
}
