//! Theme system for the TUI.
//!
//! Semantic color roles map to ratatui `Style` values. `ThemeVariant` picks a
//! palette and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Cycle order for the theme key.
    pub const ALL: [Self; 2] = [Self::Dark, Self::Light];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }

    /// Look up a variant by name, ignoring case.
    pub fn from_str_name(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
    }

    pub fn next(self) -> Self {
        let at = Self::ALL.iter().position(|&v| v == self).unwrap_or(0);
        Self::ALL[(at + 1) % Self::ALL.len()]
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Movie list --
    pub movie_normal: Style,
    pub movie_selected: Style,
    pub movie_title: Style,
    pub movie_category: Style,
    pub like_bar: Style,
    pub dislike_bar: Style,
    pub like_count: Style,
    pub dislike_count: Style,
    pub vote_marker: Style,

    // -- Category tokens --
    pub token: Style,
    pub token_selected: Style,

    // -- Pagination --
    pub page_current: Style,
    pub page_normal: Style,
    pub page_disabled: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub overlay_body: Style,
    pub overlay_heading: Style,
    pub metadata: Style,
    pub error: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            movie_normal: Style::default(),
            movie_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            movie_title: Style::default().add_modifier(Modifier::BOLD),
            movie_category: Style::default().fg(Color::Cyan),
            like_bar: Style::default().fg(Color::Green),
            dislike_bar: Style::default().fg(Color::Red),
            like_count: Style::default().fg(Color::Green),
            dislike_count: Style::default().fg(Color::Red),
            vote_marker: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            token: Style::default().fg(Color::Black).bg(Color::Cyan),
            token_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            page_current: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            page_normal: Style::default().fg(Color::Cyan),
            page_disabled: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            overlay_body: Style::default(),
            overlay_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            metadata: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),
        }
    }

    fn light() -> Self {
        Self {
            movie_normal: Style::default().fg(Color::Black),
            movie_selected: Style::default().bg(Color::Blue).fg(Color::White),
            movie_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            movie_category: Style::default().fg(Color::Blue),
            like_bar: Style::default().fg(Color::Green),
            dislike_bar: Style::default().fg(Color::Red),
            like_count: Style::default().fg(Color::Green),
            dislike_count: Style::default().fg(Color::Red),
            vote_marker: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            token: Style::default().fg(Color::White).bg(Color::Blue),
            token_selected: Style::default()
                .fg(Color::White)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            page_current: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            page_normal: Style::default().fg(Color::Blue),
            page_disabled: Style::default().fg(Color::Gray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            overlay_body: Style::default().fg(Color::Black),
            overlay_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            metadata: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),
        }
    }

    /// Role name and style pairs, in declaration order.
    fn roles(&self) -> [(&'static str, Style); 21] {
        [
            ("movie_normal", self.movie_normal),
            ("movie_selected", self.movie_selected),
            ("movie_title", self.movie_title),
            ("movie_category", self.movie_category),
            ("like_bar", self.like_bar),
            ("dislike_bar", self.dislike_bar),
            ("like_count", self.like_count),
            ("dislike_count", self.dislike_count),
            ("vote_marker", self.vote_marker),
            ("token", self.token),
            ("token_selected", self.token_selected),
            ("page_current", self.page_current),
            ("page_normal", self.page_normal),
            ("page_disabled", self.page_disabled),
            ("status_bar", self.status_bar),
            ("panel_border", self.panel_border),
            ("panel_border_focused", self.panel_border_focused),
            ("overlay_body", self.overlay_body),
            ("overlay_heading", self.overlay_heading),
            ("metadata", self.metadata),
            ("error", self.error),
        ]
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup used by the render code.
#[derive(Debug, Clone)]
pub struct StyleMap {
    variant: ThemeVariant,
    map: HashMap<&'static str, Style>,
}

impl StyleMap {
    pub fn new(variant: ThemeVariant) -> Self {
        let palette = variant.palette();
        Self {
            variant,
            map: palette.roles().into_iter().collect(),
        }
    }

    pub fn variant(&self) -> ThemeVariant {
        self.variant
    }

    /// Resolve a role name to its `Style`. Unknown roles get `Style::default()`.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

impl Default for StyleMap {
    fn default() -> Self {
        Self::new(ThemeVariant::Dark)
    }
}

// ============================================================================
// Tests
// ============================================================================
