use super::adapter::ColorConverter;
use crate::domain::entities::StatusFlag;
use crate::infrastructure::config::{ThemeConfig, ThemeMode};
use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

/// Styles shared by every widget of the shell.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Accent color from config.
    pub accent: Color,
    /// Default text.
    pub base_style: Style,
    /// Headline, modal title and buttons.
    pub headline_style: Style,
    /// Selected row or focused control.
    pub selection_style: Style,
    /// Notes and placeholders.
    pub dimmed_style: Style,
    /// Unfocused borders.
    pub border_style: Style,
    /// Selected card and focused input borders.
    pub focused_border_style: Style,
    out_of_stock: Style,
    running_low: Style,
    have_extra: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_color(Color::Rgb(98, 0, 238), ThemeMode::Dark)
    }
}

impl Theme {
    /// Builds theme from `[theme]` config.
    #[must_use]
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self::from_color(parse_color(&config.accent_color), config.mode)
    }

    /// Derives every style from one accent color.
    #[must_use]
    pub fn from_color(accent: Color, mode: ThemeMode) -> Self {
        let (foreground, selection_lightness) = match mode {
            ThemeMode::Dark => (Color::White, 0.2),
            ThemeMode::Light => (Color::Black, 0.85),
        };

        let selection_bg = ColorConverter::tone(accent, 0.3, selection_lightness);
        let badge = |hue: Color| {
            Style::default()
                .bg(ColorConverter::tone(hue, 0.6, 0.3))
                .fg(Color::White)
        };

        Self {
            accent,
            base_style: Style::default().fg(foreground),
            headline_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            selection_style: Style::default().bg(selection_bg).fg(foreground),
            dimmed_style: Style::default().fg(Color::DarkGray),
            border_style: Style::default().fg(Color::Gray),
            focused_border_style: Style::default().fg(accent),
            out_of_stock: badge(Color::Red),
            running_low: badge(Color::Yellow),
            have_extra: badge(Color::Green),
        }
    }

    /// Style of a status badge.
    #[must_use]
    pub const fn badge_style(&self, flag: StatusFlag) -> Style {
        match flag {
            StatusFlag::OutOfStock => self.out_of_stock,
            StatusFlag::RunningLow => self.running_low,
            StatusFlag::HaveExtra => self.have_extra,
        }
    }
}

fn parse_color(s: &str) -> Color {
    if s.starts_with('#')
        && let Some((r, g, b)) = parse_hex_color(s)
    {
        return Color::Rgb(r, g, b);
    }

    if let Ok(c) = Color::from_str(s) {
        return c;
    }

    match s.to_lowercase().as_str() {
        "orange" => Color::Indexed(208),
        "purple" => Color::Rgb(98, 0, 238),
        _ => Color::Magenta,
    }
}

fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let s = s.trim_start_matches('#');

    if !s.is_ascii() {
        return None;
    }

    let channel = |hex: &str| u8::from_str_radix(hex, 16).ok();
    match s.len() {
        6 => Some((channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?)),
        3 => {
            let double = |i: usize| channel(&s[i..=i].repeat(2));
            Some((double(0)?, double(1)?, double(2)?))
        }
        _ => None,
    }
}
