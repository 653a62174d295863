//! Spice list screen: headline, cards, add button and the edit modal overlay.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};

use crate::domain::SyncStatus;
use crate::domain::entities::{SaveRequest, Spice, SpiceDraft};
use crate::presentation::events::{is_long_press_event, is_quit_event};
use crate::presentation::theme::Theme;
use crate::presentation::ui::edit_modal::{EditAction, EditModal};
use crate::presentation::widgets::{SpiceCard, StatusBar, StatusLevel};

const HEADLINE: &str = "My Spices";
const ADD_LABEL: &str = "+ Add spice";
const LIST_HINTS: &str = "↑↓ move  enter edit  a add  q quit";
const EDIT_HINTS: &str = "tab next  space toggle  ctrl-s save  esc cancel";

/// Outcome of a key press on the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListKeyResult {
    /// Handled locally, nothing else to do.
    Consumed,
    /// Leave the application.
    Quit,
    /// A draft was committed and must be written.
    Save(SaveRequest),
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    level: StatusLevel,
    /// `None` never expires.
    expires_at: Option<Instant>,
}

/// State of the list screen.
pub struct ListScreenState {
    spices: Vec<Spice>,
    /// Index into `spices`; `spices.len()` selects the add row.
    selected: usize,
    offset: usize,
    editor: Option<EditModal>,
    sync_status: SyncStatus,
    last_synced: Option<DateTime<Local>>,
    status: Option<StatusMessage>,
    show_emoji: bool,
    theme: Theme,
}

impl ListScreenState {
    /// Creates an empty screen waiting for its first snapshot.
    #[must_use]
    pub const fn new(theme: Theme, show_emoji: bool) -> Self {
        Self {
            spices: Vec::new(),
            selected: 0,
            offset: 0,
            editor: None,
            sync_status: SyncStatus::Connecting,
            last_synced: None,
            status: None,
            show_emoji,
            theme,
        }
    }

    /// Spices in snapshot order.
    #[must_use]
    pub fn spices(&self) -> &[Spice] {
        &self.spices
    }

    /// Open edit surface, if any.
    #[must_use]
    pub const fn editor(&self) -> Option<&EditModal> {
        self.editor.as_ref()
    }

    /// Returns whether a draft is open.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    /// Returns subscription state.
    #[must_use]
    pub const fn sync_status(&self) -> SyncStatus {
        self.sync_status
    }

    /// Selected spice, `None` when the add row is selected.
    #[must_use]
    pub fn selected_spice(&self) -> Option<&Spice> {
        self.spices.get(self.selected)
    }

    /// Replaces the list wholesale with the latest snapshot. The selection
    /// follows the previously selected spice when it is still present.
    pub fn apply_snapshot(&mut self, spices: Vec<Spice>) {
        let selected_id = self.selected_spice().map(|spice| spice.id().clone());
        let on_add_row = !self.spices.is_empty() && self.selected >= self.spices.len();

        self.spices = spices;
        self.selected = match selected_id {
            Some(id) => self
                .spices
                .iter()
                .position(|spice| spice.id() == &id)
                .unwrap_or_else(|| self.selected.min(self.spices.len())),
            None if on_add_row => self.spices.len(),
            None => self.selected.min(self.spices.len()),
        };
        self.sync_status = SyncStatus::Live;
        self.last_synced = Some(Local::now());
    }

    /// Sets subscription state.
    pub fn set_sync_status(&mut self, status: SyncStatus) {
        self.sync_status = status;
    }

    /// Shows a transient message in the status bar.
    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel, ttl: Duration) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            expires_at: Instant::now().checked_add(ttl),
        });
    }

    /// Text of the current transient message.
    #[must_use]
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }

    /// Drops an expired status message. Returns true if one was dropped.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        if self
            .status
            .as_ref()
            .is_some_and(|s| s.expires_at.is_some_and(|at| at <= now))
        {
            self.status = None;
            return true;
        }
        false
    }

    /// Opens the edit surface on a blank draft.
    pub fn open_add(&mut self) {
        self.editor = Some(EditModal::open(SpiceDraft::new_spice()));
    }

    /// Opens the edit surface on a copy of the spice at `index`.
    pub fn open_edit(&mut self, index: usize) {
        if let Some(spice) = self.spices.get(index) {
            self.editor = Some(EditModal::open(SpiceDraft::edit(spice)));
        }
    }

    fn select_next(&mut self) {
        if self.selected < self.spices.len() {
            self.selected += 1;
        }
    }

    fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Handles key event, returns what the app has to do next.
    pub fn handle_key(&mut self, key: KeyEvent) -> ListKeyResult {
        if let Some(editor) = self.editor.as_mut() {
            return match editor.handle_key(key) {
                EditAction::None => ListKeyResult::Consumed,
                EditAction::Dismiss => {
                    self.editor = None;
                    ListKeyResult::Consumed
                }
                EditAction::Save(request) => {
                    self.editor = None;
                    ListKeyResult::Save(request)
                }
            };
        }

        if is_quit_event(&key) {
            return ListKeyResult::Quit;
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => self.selected = self.spices.len(),
            KeyCode::Char('a') => self.open_add(),
            KeyCode::Enter if self.selected == self.spices.len() => self.open_add(),
            _ if is_long_press_event(&key) => self.open_edit(self.selected),
            _ => {}
        }
        ListKeyResult::Consumed
    }

    fn row_heights(&self) -> Vec<u16> {
        self.spices
            .iter()
            .map(SpiceCard::height)
            .chain(std::iter::once(1))
            .collect()
    }

    /// Moves the scroll offset so the selected row is fully visible.
    fn scroll_to_selection(&mut self, heights: &[u16], viewport: u16) {
        if self.selected < self.offset {
            self.offset = self.selected;
        }

        // Topmost row that still fits above the selection.
        let viewport = usize::from(viewport);
        let mut first = self.selected;
        let mut used = usize::from(heights[self.selected]);
        while first > self.offset {
            let above = usize::from(heights[first - 1]);
            if used + above > viewport {
                break;
            }
            used += above;
            first -= 1;
        }
        self.offset = first;
    }

    fn status_bar(&self) -> StatusBar {
        let hints = if self.is_editing() {
            EDIT_HINTS
        } else {
            LIST_HINTS
        };

        if let Some(status) = &self.status {
            return StatusBar::new()
                .left(status.text.clone())
                .right(hints)
                .level(status.level);
        }

        let (text, level) = match (self.sync_status, self.last_synced) {
            (SyncStatus::Live, Some(at)) => (
                format!(
                    "live · {} spices · synced {}",
                    self.spices.len(),
                    at.format("%H:%M:%S")
                ),
                StatusLevel::Success,
            ),
            (SyncStatus::Stopped, _) => (
                "stopped · restart to resume syncing".to_string(),
                StatusLevel::Warning,
            ),
            (status, _) => (status.label().to_string(), StatusLevel::Info),
        };
        StatusBar::new().left(text).right(hints).level(level)
    }
}

/// List screen widget.
pub struct ListScreen;

impl StatefulWidget for ListScreen {
    type State = ListScreenState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        buf.set_style(area, state.theme.base_style);

        let [headline_area, _, list_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        Paragraph::new(Line::from(Span::styled(
            HEADLINE,
            state.theme.headline_style,
        )))
        .alignment(Alignment::Center)
        .render(headline_area, buf);

        let heights = state.row_heights();
        state.scroll_to_selection(&heights, list_area.height);

        let mut y = list_area.y;
        let bottom = list_area.y + list_area.height;
        for (index, height) in heights.iter().enumerate().skip(state.offset) {
            if y + height > bottom {
                break;
            }
            let row = Rect::new(list_area.x, y, list_area.width, *height);
            let selected = index == state.selected;

            match state.spices.get(index) {
                Some(spice) => SpiceCard::new(spice, &state.theme)
                    .selected(selected)
                    .show_emoji(state.show_emoji)
                    .render(row, buf),
                None => {
                    let style = if selected {
                        state.theme.selection_style.add_modifier(Modifier::BOLD)
                    } else {
                        state.theme.headline_style
                    };
                    Paragraph::new(Span::styled(format!(" {ADD_LABEL} "), style))
                        .alignment(Alignment::Center)
                        .render(row, buf);
                }
            }
            y += height;
        }

        (&state.status_bar()).render(status_area, buf);

        if let Some(editor) = &state.editor {
            editor.render(area, buf, &state.theme);
        }
    }
}
