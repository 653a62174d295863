//! Single-line text field.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::presentation::theme::Theme;

/// Text field with a character cursor. No length limit, no validation.
#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,
    /// Cursor position in characters.
    cursor: usize,
    focused: bool,
    placeholder: String,
    label: String,
}

impl TextInput {
    /// Creates new input with label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            focused: false,
            placeholder: String::new(),
            label: label.into(),
        }
    }

    /// Sets placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Sets initial value, cursor at the end.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    /// Sets focus state.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Returns current text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Inserts character at cursor.
    pub fn input_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Deletes character before cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Deletes character at cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Moves cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Moves cursor to start.
    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    /// Moves cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    fn cursor_column(&self) -> usize {
        self.value[..self.byte_index(self.cursor)].width()
    }

    /// Renders the field with theme colors.
    pub fn render_themed(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let border_style = if self.focused {
            theme.focused_border_style
        } else {
            theme.border_style
        };

        let (display, text_style) = if self.value.is_empty() {
            (self.placeholder.as_str(), theme.dimmed_style)
        } else {
            (self.value.as_str(), theme.base_style)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(self.label.as_str());

        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(display).style(text_style).render(inner, buf);

        if self.focused && inner.width > 0 {
            let column = u16::try_from(self.cursor_column()).unwrap_or(u16::MAX);
            let cursor_x = inner.x.saturating_add(column);
            if cursor_x < inner.x + inner.width {
                buf[(cursor_x, inner.y)].set_style(
                    Style::default()
                        .bg(theme.accent)
                        .fg(ratatui::style::Color::Black),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_basic() {
        let mut input = TextInput::new("Name");
        assert!(input.value().is_empty());

        input.input_char('a');
        input.input_char('b');
        assert_eq!(input.value(), "ab");

        input.backspace();
        assert_eq!(input.value(), "a");
    }

    #[test]
    fn test_editing_in_the_middle() {
        let mut input = TextInput::new("Name").with_value("Cumn");
        input.move_left();
        input.input_char('i');
        assert_eq!(input.value(), "Cumin");

        input.move_start();
        input.delete();
        assert_eq!(input.value(), "umin");
    }

    #[test]
    fn test_multibyte_characters() {
        let mut input = TextInput::new("Note").with_value("piment d'espelette é");
        input.backspace();
        input.input_char('è');
        assert_eq!(input.value(), "piment d'espelette è");

        input.move_end();
        input.input_char('!');
        assert!(input.value().ends_with("è!"));
    }
}
