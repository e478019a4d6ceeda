//! Color theme and glyphs for the Innersight TUI.
//!
//! A soft paper-and-ink palette with a teal accent by default, with an optional
//! high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use innersight_types::ui::UiOptions;

/// Paper palette constants.
mod colors {
    use super::Color;

    pub const PAPER: Color = Color::Rgb(248, 247, 244); // #F8F7F4
    pub const CARD: Color = Color::Rgb(255, 255, 255);
    pub const BORDER: Color = Color::Rgb(222, 219, 212);

    pub const INK: Color = Color::Rgb(51, 51, 51); // #333333
    pub const INK_SOFT: Color = Color::Rgb(90, 90, 90);
    pub const INK_MUTED: Color = Color::Rgb(140, 138, 132);
    pub const INK_FADED: Color = Color::Rgb(196, 193, 186);

    pub const TEAL: Color = Color::Rgb(90, 154, 154); // #5A9A9A
    pub const TEAL_LIGHT: Color = Color::Rgb(225, 238, 238);
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub bg_card: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_disabled: Color,
    pub accent: Color,
    pub accent_light: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg: colors::PAPER,
            bg_card: colors::CARD,
            border: colors::BORDER,
            text_primary: colors::INK,
            text_secondary: colors::INK_SOFT,
            text_muted: colors::INK_MUTED,
            text_disabled: colors::INK_FADED,
            accent: colors::TEAL,
            accent_light: colors::TEAL_LIGHT,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            bg_card: Color::Black,
            border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::White,
            text_muted: Color::Gray,
            text_disabled: Color::DarkGray,
            accent: Color::Cyan,
            accent_light: Color::Black,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for icons and spinners.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub back: &'static str,
    pub dot_active: &'static str,
    pub dot_inactive: &'static str,
    pub step_done: &'static str,
    pub step_todo: &'static str,
    pub selected: &'static str,
    pub quote_open: &'static str,
    pub quote_close: &'static str,
    pub arrows_horizontal: &'static str,
    pub arrows_vertical: &'static str,
    pub spinner_frames: &'static [&'static str],
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            back: "<",
            dot_active: "*",
            dot_inactive: "o",
            step_done: "===",
            step_todo: "---",
            selected: ">",
            quote_open: "\"",
            quote_close: "\"",
            arrows_horizontal: "<-/->",
            arrows_vertical: "up/down",
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            back: "←",
            dot_active: "●",
            dot_inactive: "○",
            step_done: "━━━",
            step_todo: "───",
            selected: "▸",
            quote_open: "“",
            quote_close: "”",
            arrows_horizontal: "←/→",
            arrows_vertical: "↑/↓",
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

/// When `reduced_motion` is enabled, returns a static glyph instead of cycling.
#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    if options.reduced_motion {
        frames[0]
    } else {
        frames[tick % frames.len()]
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn heading(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn eyebrow(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn call_to_action(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn dimmed(palette: &Palette) -> Style {
        Style::default().fg(palette.text_disabled)
    }
}
