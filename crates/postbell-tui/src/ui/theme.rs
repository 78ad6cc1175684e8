// Centralized theme for the notification chrome
// All colors and styles are defined here - edit this file to change the look

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// App background - pure black for contrast
pub const BG_APP: Color = Color::Rgb(0, 0, 0);

/// Header bar background
pub const BG_HEADER: Color = Color::Rgb(12, 12, 12);

/// Dropdown background
pub const BG_DROPDOWN: Color = Color::Rgb(24, 24, 24);

/// Selected item background - subtle highlight
pub const BG_SELECTED: Color = Color::Rgb(32, 32, 32);

// -----------------------------------------------------------------------------
// Text Colors
// -----------------------------------------------------------------------------

/// Primary text - off-white for readability
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 220);

/// Secondary/muted text
pub const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);

/// Dimmed text for hints, placeholders
pub const TEXT_DIM: Color = Color::Rgb(90, 90, 90);

// -----------------------------------------------------------------------------
// Accent Colors
// -----------------------------------------------------------------------------

/// Primary accent - muted blue (for interactive elements, focus)
pub const ACCENT_PRIMARY: Color = Color::Rgb(86, 156, 214);

/// Unread marker and badge - muted red
pub const ACCENT_UNREAD: Color = Color::Rgb(244, 112, 112);

/// Active border
pub const BORDER_ACTIVE: Color = Color::Rgb(100, 100, 100);

// =============================================================================
// STYLE FUNCTIONS
// =============================================================================

pub fn text_primary() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn text_dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn text_bold() -> Style {
    Style::default()
        .fg(TEXT_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn border_active() -> Style {
    Style::default().fg(BORDER_ACTIVE)
}

pub fn badge() -> Style {
    Style::default()
        .fg(BG_APP)
        .bg(ACCENT_UNREAD)
        .add_modifier(Modifier::BOLD)
}

pub fn hint_key() -> Style {
    Style::default().fg(ACCENT_PRIMARY)
}
