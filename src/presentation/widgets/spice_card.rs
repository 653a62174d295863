//! Card showing one spice.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::domain::entities::{Spice, StatusFlag};
use crate::presentation::theme::Theme;

/// Name as title, note as subtitle, then one badge per set flag.
pub struct SpiceCard<'a> {
    spice: &'a Spice,
    theme: &'a Theme,
    selected: bool,
    show_emoji: bool,
}

impl<'a> SpiceCard<'a> {
    /// Creates card for `spice`.
    #[must_use]
    pub const fn new(spice: &'a Spice, theme: &'a Theme) -> Self {
        Self {
            spice,
            theme,
            selected: false,
            show_emoji: true,
        }
    }

    /// Sets selection highlight.
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Sets whether badges carry emoji.
    #[must_use]
    pub const fn show_emoji(mut self, show_emoji: bool) -> Self {
        self.show_emoji = show_emoji;
        self
    }

    /// Rows the card occupies, borders included.
    #[must_use]
    pub fn height(spice: &Spice) -> u16 {
        if spice.badges().is_empty() { 3 } else { 4 }
    }

    /// Text of one badge.
    #[must_use]
    pub fn badge_text(flag: StatusFlag, show_emoji: bool) -> String {
        if show_emoji {
            format!(" {} {} ", flag.label(), flag.emoji())
        } else {
            format!(" {} ", flag.label())
        }
    }

    fn badge_line(&self) -> Option<Line<'static>> {
        let badges = self.spice.badges();
        if badges.is_empty() {
            return None;
        }

        let mut spans = Vec::with_capacity(badges.len() * 2);
        for (i, flag) in badges.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                Self::badge_text(flag, self.show_emoji),
                self.theme.badge_style(flag),
            ));
        }
        Some(Line::from(spans))
    }
}

impl Widget for SpiceCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.selected {
            self.theme.focused_border_style
        } else {
            self.theme.border_style
        };

        let title = Span::styled(
            format!(" {} ", self.spice.name()),
            self.theme.base_style.add_modifier(Modifier::BOLD),
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title);

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from(Span::styled(
            self.spice.note().to_string(),
            self.theme.dimmed_style,
        ))];
        if let Some(badges) = self.badge_line() {
            lines.push(badges);
        }

        let style = if self.selected {
            self.theme.selection_style
        } else {
            self.theme.base_style
        };
        Paragraph::new(lines).style(style).render(inner, buf);
    }
}
