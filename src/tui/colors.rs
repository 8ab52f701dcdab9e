//! Color palettes for the terminal user interface.
//!
//! One palette per color scheme and light/dark mode, selected by the
//! persisted theme settings.

use ratatui::style::Color;

use crate::fields::{Theme, ThemeStyle};

/// Gauge colour when progress is below 40%.
pub const BAND_LOW: Color = Color::Rgb(200, 60, 60);
/// Gauge colour when progress is below 70%.
pub const BAND_MEDIUM: Color = Color::Rgb(220, 180, 40);
/// Gauge colour at 70% and above.
pub const BAND_HIGH: Color = Color::Rgb(60, 160, 60);

/// Resolved colors for one scheme/mode combination.
#[derive(Clone, Copy)]
pub struct Palette {
    pub accent: Color,
    pub header_fg: Color,
    pub text: Color,
    pub dim: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub priority_high: Color,
    pub priority_medium: Color,
    pub priority_low: Color,
}

impl Palette {
    /// Pick the palette for the given theme settings.
    pub fn for_settings(style: ThemeStyle, theme: Theme) -> Self {
        let dark = theme == Theme::Dark;
        match style {
            ThemeStyle::Modern => Palette {
                accent: if dark { Color::Rgb(80, 140, 220) } else { Color::Blue },
                header_fg: Color::White,
                text: if dark { Color::Gray } else { Color::Black },
                dim: Color::DarkGray,
                selection_bg: if dark { Color::Rgb(60, 60, 80) } else { Color::Rgb(200, 210, 230) },
                selection_fg: if dark { Color::White } else { Color::Black },
                priority_high: Color::Rgb(200, 60, 60),
                priority_medium: Color::Rgb(220, 180, 40),
                priority_low: Color::Rgb(60, 160, 60),
            },
            ThemeStyle::Nature => Palette {
                accent: if dark { Color::Rgb(60, 120, 60) } else { Color::Rgb(0, 100, 0) },
                header_fg: Color::White,
                text: if dark { Color::Rgb(190, 200, 180) } else { Color::Rgb(30, 50, 30) },
                dim: Color::Rgb(110, 120, 100),
                selection_bg: if dark { Color::Rgb(40, 70, 40) } else { Color::Rgb(200, 225, 190) },
                selection_fg: if dark { Color::White } else { Color::Black },
                priority_high: Color::Rgb(170, 80, 40),
                priority_medium: Color::Rgb(180, 160, 60),
                priority_low: Color::Rgb(80, 140, 80),
            },
            ThemeStyle::Neon => Palette {
                accent: Color::Rgb(220, 0, 200),
                header_fg: if dark { Color::Rgb(0, 255, 180) } else { Color::White },
                text: if dark { Color::Rgb(0, 230, 160) } else { Color::Rgb(90, 0, 90) },
                dim: Color::Rgb(120, 80, 120),
                selection_bg: if dark { Color::Rgb(80, 0, 80) } else { Color::Rgb(240, 200, 240) },
                selection_fg: if dark { Color::Rgb(0, 255, 180) } else { Color::Rgb(90, 0, 90) },
                priority_high: Color::Rgb(255, 60, 120),
                priority_medium: Color::Rgb(255, 200, 0),
                priority_low: Color::Rgb(0, 220, 120),
            },
        }
    }
}
