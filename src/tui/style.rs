//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::view::Tone;

/// Dashboard palette: gold offers, silver requests, green user turns,
/// indigo bot turns.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Rgb(30, 27, 75);

    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    pub const GOLD: Color = Color::Rgb(234, 179, 8);
    pub const SILVER: Color = Color::Rgb(203, 213, 225);
    pub const EMERALD: Color = Color::Rgb(52, 211, 153);
    pub const INDIGO: Color = Color::Rgb(129, 140, 248);

    pub const ERROR_BG: Color = Color::Red;

    pub const TAB_ACTIVE: Color = Color::Yellow;
    pub const TAB_INACTIVE: Color = Color::Gray;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Header bar style.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Error banner.
    pub fn banner() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Theme::ERROR_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Active tab style.
    pub fn tab_active() -> Style {
        Style::default()
            .fg(Theme::TAB_ACTIVE)
            .add_modifier(Modifier::BOLD)
    }

    /// Inactive tab style.
    pub fn tab_inactive() -> Style {
        Style::default().fg(Theme::TAB_INACTIVE)
    }

    /// Dimmed text style.
    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Accent color for a view-model tone.
    pub fn from_tone(tone: Tone) -> Style {
        match tone {
            Tone::Normal => Self::default(),
            Tone::Offer => Style::default().fg(Theme::GOLD),
            Tone::Request => Style::default().fg(Theme::SILVER),
            Tone::User => Style::default().fg(Theme::EMERALD),
            Tone::Assistant => Style::default().fg(Theme::INDIGO),
            Tone::Dimmed => Self::dim(),
        }
    }

    /// Bold variant of [`Styles::from_tone`], for titles and labels.
    pub fn title(tone: Tone) -> Style {
        Self::from_tone(tone).add_modifier(Modifier::BOLD)
    }
}
