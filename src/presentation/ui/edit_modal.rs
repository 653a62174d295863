//! Modal edit surface for one spice draft.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::domain::entities::{SaveRequest, SpiceDraft, StatusFlag};
use crate::presentation::events::is_save_event;
use crate::presentation::theme::Theme;
use crate::presentation::widgets::TextInput;

const MODAL_WIDTH: u16 = 56;
const MODAL_HEIGHT: u16 = 14;

/// Focusable element of the modal, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditFocus {
    /// Name input.
    Name,
    /// Note input.
    Note,
    /// Switch for one flag.
    Flag(StatusFlag),
    /// Save button.
    Save,
}

const FOCUS_ORDER: [EditFocus; 6] = [
    EditFocus::Name,
    EditFocus::Note,
    EditFocus::Flag(StatusFlag::OutOfStock),
    EditFocus::Flag(StatusFlag::RunningLow),
    EditFocus::Flag(StatusFlag::HaveExtra),
    EditFocus::Save,
];

/// Outcome of a key press in the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    /// Keep editing.
    None,
    /// Draft committed; the modal should close.
    Save(SaveRequest),
    /// Closed without writing.
    Dismiss,
}

/// Open edit surface. Every keystroke is written straight into the draft.
#[derive(Debug, Clone)]
pub struct EditModal {
    draft: SpiceDraft,
    name_input: TextInput,
    note_input: TextInput,
    focus: usize,
}

impl EditModal {
    /// Opens modal on `draft`, name field focused.
    #[must_use]
    pub fn open(draft: SpiceDraft) -> Self {
        let mut name_input = TextInput::new(" Name ")
            .placeholder("Spice name")
            .with_value(draft.fields().name.clone());
        name_input.set_focused(true);
        let note_input = TextInput::new(" Note ")
            .placeholder("Where it lives, what it goes with...")
            .with_value(draft.fields().note.clone());

        Self {
            draft,
            name_input,
            note_input,
            focus: 0,
        }
    }

    /// Returns current draft.
    #[must_use]
    pub const fn draft(&self) -> &SpiceDraft {
        &self.draft
    }

    /// Returns focused element.
    #[must_use]
    pub const fn focus(&self) -> EditFocus {
        FOCUS_ORDER[self.focus]
    }

    fn set_focus(&mut self, index: usize) {
        self.focus = index % FOCUS_ORDER.len();
        let focus = self.focus();
        self.name_input.set_focused(focus == EditFocus::Name);
        self.note_input.set_focused(focus == EditFocus::Note);
    }

    fn focus_next(&mut self) {
        self.set_focus(self.focus + 1);
    }

    fn focus_previous(&mut self) {
        self.set_focus(self.focus + FOCUS_ORDER.len() - 1);
    }

    fn commit(&self) -> EditAction {
        EditAction::Save(self.draft.clone().into_save_request())
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> EditAction {
        if is_save_event(&key) {
            return self.commit();
        }

        match key.code {
            KeyCode::Esc => return EditAction::Dismiss,
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                return EditAction::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_previous();
                return EditAction::None;
            }
            _ => {}
        }

        match self.focus() {
            EditFocus::Name => {
                if self.edit_text(key, true) {
                    self.draft.set_name(self.name_input.value());
                }
            }
            EditFocus::Note => {
                if self.edit_text(key, false) {
                    self.draft.set_note(self.note_input.value());
                }
            }
            EditFocus::Flag(flag) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.draft.toggle(flag);
                }
            }
            EditFocus::Save => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    return self.commit();
                }
            }
        }

        EditAction::None
    }

    /// Applies key to the focused text field. Returns true if the text changed.
    fn edit_text(&mut self, key: KeyEvent, name: bool) -> bool {
        let input = if name {
            &mut self.name_input
        } else {
            &mut self.note_input
        };

        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                input.input_char(c);
                true
            }
            KeyCode::Backspace => {
                input.backspace();
                true
            }
            KeyCode::Delete => {
                input.delete();
                true
            }
            KeyCode::Left => {
                input.move_left();
                false
            }
            KeyCode::Right => {
                input.move_right();
                false
            }
            KeyCode::Home => {
                input.move_start();
                false
            }
            KeyCode::End => {
                input.move_end();
                false
            }
            KeyCode::Enter => {
                self.focus_next();
                false
            }
            _ => false,
        }
    }

    /// Renders the modal centered over `area`.
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let popup = centered(area, MODAL_WIDTH, MODAL_HEIGHT);
        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.focused_border_style)
            .title(Span::styled(
                format!(" Editing: {} ", self.draft.label()),
                theme.headline_style,
            ));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let [name_area, note_area, out_area, low_area, extra_area, _, save_area] =
            Layout::vertical([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(inner);

        self.name_input.render_themed(name_area, buf, theme);
        self.note_input.render_themed(note_area, buf, theme);

        for (flag, row) in StatusFlag::ALL
            .into_iter()
            .zip([out_area, low_area, extra_area])
        {
            self.render_switch(flag, row, buf, theme);
        }

        let save_style = if self.focus() == EditFocus::Save {
            theme.selection_style.add_modifier(Modifier::BOLD)
        } else {
            theme.headline_style
        };
        Paragraph::new(Line::from(Span::styled(" Save ", save_style)))
            .alignment(Alignment::Center)
            .render(save_area, buf);
    }

    fn render_switch(&self, flag: StatusFlag, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let focused = self.focus() == EditFocus::Flag(flag);
        let on = self.draft.fields().flag(flag);

        let row_style = if focused {
            theme.selection_style
        } else {
            theme.base_style
        };
        let switch_style = if on {
            theme.headline_style
        } else {
            theme.dimmed_style
        };

        let [label_area, switch_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(6)]).areas(area);

        Paragraph::new(format!(" {}", flag.question()))
            .style(row_style)
            .render(label_area, buf);
        Paragraph::new(Span::styled(if on { "[on] " } else { "[off]" }, switch_style))
            .style(row_style)
            .render(switch_area, buf);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [_, vertical, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .areas(vertical);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Spice, SpiceFields, SpiceId};
    use test_case::test_case;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(modal: &mut EditModal, text: &str) {
        for c in text.chars() {
            modal.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn focus_on(modal: &mut EditModal, target: EditFocus) {
        while modal.focus() != target {
            modal.handle_key(key(KeyCode::Tab));
        }
    }

    fn cumin() -> Spice {
        Spice::new(
            SpiceId::new("a1").unwrap(),
            SpiceFields::named("Cumin").with_flag(StatusFlag::RunningLow, true),
        )
    }

    #[test]
    fn test_new_spice_paprika_saves_as_create() {
        let mut modal = EditModal::open(SpiceDraft::new_spice());
        assert_eq!(modal.draft().label(), "New Spice");

        type_text(&mut modal, "Paprika");
        focus_on(&mut modal, EditFocus::Flag(StatusFlag::HaveExtra));
        modal.handle_key(key(KeyCode::Char(' ')));
        focus_on(&mut modal, EditFocus::Save);

        assert_eq!(
            modal.handle_key(key(KeyCode::Enter)),
            EditAction::Save(SaveRequest::Create(
                SpiceFields::named("Paprika").with_flag(StatusFlag::HaveExtra, true)
            ))
        );
    }

    #[test]
    fn test_existing_spice_saves_as_replace() {
        let mut modal = EditModal::open(SpiceDraft::edit(&cumin()));
        focus_on(&mut modal, EditFocus::Flag(StatusFlag::RunningLow));
        modal.handle_key(key(KeyCode::Enter));
        focus_on(&mut modal, EditFocus::Flag(StatusFlag::OutOfStock));
        modal.handle_key(key(KeyCode::Enter));

        let action = modal.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

        assert_eq!(
            action,
            EditAction::Save(SaveRequest::Replace {
                id: SpiceId::new("a1").unwrap(),
                fields: SpiceFields::named("Cumin").with_flag(StatusFlag::OutOfStock, true),
            })
        );
    }

    #[test_case(StatusFlag::OutOfStock ; "out_of_stock")]
    #[test_case(StatusFlag::RunningLow ; "running_low")]
    #[test_case(StatusFlag::HaveExtra ; "have_extra")]
    fn test_switch_toggles_only_its_flag(flag: StatusFlag) {
        let mut modal = EditModal::open(SpiceDraft::edit(&cumin()));
        let before = modal.draft().fields().clone();

        focus_on(&mut modal, EditFocus::Flag(flag));
        modal.handle_key(key(KeyCode::Char(' ')));

        let mut expected = before;
        expected.toggle_flag(flag);
        assert_eq!(modal.draft().fields(), &expected);
    }

    #[test]
    fn test_escape_dismisses_without_save() {
        let mut modal = EditModal::open(SpiceDraft::edit(&cumin()));
        type_text(&mut modal, " seeds");

        assert_eq!(modal.handle_key(key(KeyCode::Esc)), EditAction::Dismiss);
    }

    #[test]
    fn test_name_edits_keep_frozen_label() {
        let mut modal = EditModal::open(SpiceDraft::edit(&cumin()));
        modal.handle_key(key(KeyCode::Backspace));

        assert_eq!(modal.draft().fields().name, "Cumi");
        assert_eq!(modal.draft().label(), "Cumin");
    }

    #[test]
    fn test_letters_on_switch_are_ignored() {
        let mut modal = EditModal::open(SpiceDraft::edit(&cumin()));
        focus_on(&mut modal, EditFocus::Flag(StatusFlag::HaveExtra));
        let before = modal.draft().clone();

        type_text(&mut modal, "xyz");

        assert_eq!(modal.draft(), &before);
    }

    #[test]
    fn test_focus_wraps_backwards() {
        let mut modal = EditModal::open(SpiceDraft::new_spice());
        modal.handle_key(key(KeyCode::BackTab));
        assert_eq!(modal.focus(), EditFocus::Save);
    }

    #[test]
    fn test_render_shows_title_and_switches() {
        let modal = EditModal::open(SpiceDraft::edit(&cumin()));
        let area = Rect::new(0, 0, 70, 20);
        let mut buf = Buffer::empty(area);

        modal.render(area, &mut buf, &Theme::default());

        let text: String = buf.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Editing: Cumin"));
        assert!(text.contains("Running low?"));
        assert!(text.contains("[on]"));
    }
}
