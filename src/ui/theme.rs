//! Color themes
//!
//! Provides:
//! - Theme struct with all UI colors
//! - Built-in presets (hydrogel, nord, gruvbox)
//! - Hex color parsing for config overrides

use ratatui::style::Color;
use thiserror::Error;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Main background color
    pub background: Color,
    /// Primary text color
    pub foreground: Color,
    /// Borders and titles
    pub accent: Color,
    /// Secondary text (hints, unset fields)
    pub dimmed: Color,
    /// Focused selector
    pub highlight: Color,
    /// Armed reminder indicator
    pub armed: Color,
    /// Failure alerts
    pub failure: Color,
    /// Pain trend line
    pub chart: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::hydrogel()
    }
}

impl Theme {
    /// Warm orange default, matching the pain chart palette
    pub fn hydrogel() -> Self {
        Self {
            background: Color::Rgb(28, 22, 18),      // #1c1612
            foreground: Color::Rgb(245, 236, 228),   // #f5ece4
            accent: Color::Rgb(226, 106, 0),         // #e26a00
            dimmed: Color::Rgb(163, 150, 140),       // #a3968c
            highlight: Color::Rgb(255, 167, 38),     // #ffa726
            armed: Color::Rgb(34, 197, 94),          // #22c55e
            failure: Color::Rgb(239, 68, 68),        // #ef4444
            chart: Color::Rgb(251, 140, 0),          // #fb8c00
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            background: Color::Rgb(46, 52, 64),      // #2e3440 (nord0)
            foreground: Color::Rgb(236, 239, 244),   // #eceff4 (nord6)
            accent: Color::Rgb(136, 192, 208),       // #88c0d0 (nord8)
            dimmed: Color::Rgb(76, 86, 106),         // #4c566a (nord3)
            highlight: Color::Rgb(235, 203, 139),    // #ebcb8b (nord13)
            armed: Color::Rgb(163, 190, 140),        // #a3be8c (nord14)
            failure: Color::Rgb(191, 97, 106),       // #bf616a (nord11)
            chart: Color::Rgb(208, 135, 112),        // #d08770 (nord12)
        }
    }

    /// Gruvbox dark theme
    pub fn gruvbox() -> Self {
        Self {
            background: Color::Rgb(40, 40, 40),      // #282828 (bg)
            foreground: Color::Rgb(235, 219, 178),   // #ebdbb2 (fg)
            accent: Color::Rgb(215, 153, 33),        // #d79921 (yellow)
            dimmed: Color::Rgb(146, 131, 116),       // #928374 (gray)
            highlight: Color::Rgb(250, 189, 47),     // #fabd2f (bright yellow)
            armed: Color::Rgb(152, 151, 26),         // #98971a (green)
            failure: Color::Rgb(204, 36, 29),        // #cc241d (red)
            chart: Color::Rgb(254, 128, 25),         // #fe8019 (orange)
        }
    }

    /// Load theme from preset name
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "hydrogel" | "default" => Some(Self::hydrogel()),
            "nord" => Some(Self::nord()),
            "gruvbox" | "gruvbox-dark" | "gruvbox_dark" => Some(Self::gruvbox()),
            _ => None,
        }
    }
}

/// Parse hex color string to Color
/// Supports: #rrggbb, #rgb, rrggbb, rgb
pub fn parse_hex_color(s: &str) -> Result<Color, ColorError> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(ColorError::InvalidHex);
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|_| ColorError::InvalidHex)
    };

    match s.len() {
        // #rgb -> #rrggbb
        3 => Ok(Color::Rgb(channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17)),
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        _ => Err(ColorError::InvalidLength),
    }
}

/// Color parsing error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("invalid color length (expected 3 or 6 hex chars)")]
    InvalidLength,
    #[error("invalid hex character")]
    InvalidHex,
}
