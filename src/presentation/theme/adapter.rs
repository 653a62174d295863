use coolor::{Hsl, Rgb};
use ratatui::style::Color;

/// Conversions between ratatui colors and HSL.
pub struct ColorConverter;

impl ColorConverter {
    /// Converts color to HSL; named colors use the VGA palette.
    #[must_use]
    pub fn to_hsl(color: Color) -> Hsl {
        let (r, g, b) = match color {
            Color::Rgb(r, g, b) => (r, g, b),
            Color::Black => (0, 0, 0),
            Color::Red => (170, 0, 0),
            Color::Green => (0, 170, 0),
            Color::Yellow => (170, 85, 0),
            Color::Blue => (0, 0, 170),
            Color::Magenta => (170, 0, 170),
            Color::Cyan => (0, 170, 170),
            Color::Gray => (170, 170, 170),
            Color::DarkGray => (85, 85, 85),
            Color::LightRed => (255, 85, 85),
            Color::LightGreen => (85, 255, 85),
            Color::LightYellow => (255, 255, 85),
            Color::LightBlue => (85, 85, 255),
            Color::LightMagenta => (255, 85, 255),
            Color::LightCyan => (85, 255, 255),
            Color::Indexed(i) => indexed_to_rgb(i),
            _ => (255, 255, 255),
        };

        Rgb::new(r, g, b).to_hsl()
    }

    /// Converts HSL back to an RGB color.
    #[must_use]
    pub fn to_ratatui(hsl: Hsl) -> Color {
        let rgb: Rgb = hsl.to_rgb();
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }

    /// Same hue as `color` with the given saturation and lightness.
    #[must_use]
    pub fn tone(color: Color, saturation: f32, lightness: f32) -> Color {
        let mut hsl = Self::to_hsl(color);
        hsl.s = saturation;
        hsl.l = lightness;
        Self::to_ratatui(hsl)
    }
}

fn indexed_to_rgb(i: u8) -> (u8, u8, u8) {
    match i {
        0..=15 => {
            const BASE: [(u8, u8, u8); 16] = [
                (0, 0, 0),
                (170, 0, 0),
                (0, 170, 0),
                (170, 85, 0),
                (0, 0, 170),
                (170, 0, 170),
                (0, 170, 170),
                (170, 170, 170),
                (85, 85, 85),
                (255, 85, 85),
                (85, 255, 85),
                (255, 255, 85),
                (85, 85, 255),
                (255, 85, 255),
                (85, 255, 255),
                (255, 255, 255),
            ];
            BASE[usize::from(i)]
        }
        16..=231 => {
            let i = i - 16;
            let level = |c: u8| if c == 0 { 0 } else { c * 40 + 55 };
            (level(i / 36), level((i / 6) % 6), level(i % 6))
        }
        _ => {
            let v = (i - 232) * 10 + 8;
            (v, v, v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_survives_hsl() {
        let back = ColorConverter::to_ratatui(ColorConverter::to_hsl(Color::Rgb(98, 0, 238)));

        let Color::Rgb(r, g, b) = back else {
            panic!("Expected RGB color");
        };
        assert!((i16::from(r) - 98).abs() <= 1);
        assert!(i16::from(g).abs() <= 1);
        assert!((i16::from(b) - 238).abs() <= 1);
    }

    #[test]
    fn test_indexed_palette() {
        assert_eq!(indexed_to_rgb(1), (170, 0, 0));
        assert_eq!(indexed_to_rgb(208), (255, 135, 0));
        assert_eq!(indexed_to_rgb(232), (8, 8, 8));
    }

    #[test]
    fn test_tone_keeps_rgb_form() {
        assert!(matches!(
            ColorConverter::tone(Color::Green, 0.5, 0.2),
            Color::Rgb(..)
        ));
    }
}
