//! Theme selection and the styles derived from it.
//!
//! Palettes come from the `ratatui-themes` crate. Views never pick raw
//! colors; they ask [`ThemeColors`] for a style by role (a card border, a
//! field label, an error line) so every palette renders consistently.

use ratatui::style::{Color, Modifier, Style};
use ratatui_themes::{ThemeName, ThemePalette};
use serde::{Deserialize, Serialize};

/// Selected palette, stored in the config file by name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(pub ThemeName);

impl Theme {
    /// Every palette the picker offers
    #[must_use]
    pub const fn all() -> &'static [ThemeName] {
        ThemeName::all()
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0.display_name()
    }

    /// Role styles for this palette
    #[must_use]
    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from(self.0.palette())
    }

    #[must_use]
    pub const fn inner(&self) -> ThemeName {
        self.0
    }
}

impl From<ThemeName> for Theme {
    fn from(name: ThemeName) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Palette colors plus the role styles built from them
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub bg: Color,
    /// Status bar and popup background, a step off `bg`
    pub surface: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub selection: Color,
}

impl From<ThemePalette> for ThemeColors {
    fn from(p: ThemePalette) -> Self {
        Self {
            bg: p.bg,
            surface: raise(p.bg, 10),
            fg: p.fg,
            muted: p.muted,
            accent: p.accent,
            secondary: p.secondary,
            success: p.success,
            warning: p.warning,
            error: p.error,
            info: p.info,
            selection: p.selection,
        }
    }
}

/// Brighten an RGB color; named colors are left alone
const fn raise(color: Color, amount: u8) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            r.saturating_add(amount),
            g.saturating_add(amount),
            b.saturating_add(amount),
        ),
        other => other,
    }
}

impl ThemeColors {
    /// Record values and typed input
    #[must_use]
    pub const fn value(&self) -> Style {
        Style::new().fg(self.fg)
    }

    /// Placeholders, hints and secondary text
    #[must_use]
    pub const fn muted_text(&self) -> Style {
        Style::new().fg(self.muted)
    }

    /// Record names and the focused field label
    #[must_use]
    pub const fn accent_text(&self) -> Style {
        Style::new().fg(self.accent)
    }

    #[must_use]
    pub const fn secondary_text(&self) -> Style {
        Style::new().fg(self.secondary)
    }

    #[must_use]
    pub const fn success_text(&self) -> Style {
        Style::new().fg(self.success)
    }

    #[must_use]
    pub const fn warning_text(&self) -> Style {
        Style::new().fg(self.warning)
    }

    /// List error lines and form errors
    #[must_use]
    pub const fn error_text(&self) -> Style {
        Style::new().fg(self.error)
    }

    #[must_use]
    pub const fn info_text(&self) -> Style {
        Style::new().fg(self.info)
    }

    /// `label:` prefixes in cards and forms
    #[must_use]
    pub const fn label(&self) -> Style {
        Style::new().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub const fn border(&self) -> Style {
        Style::new().fg(self.muted)
    }

    /// Border of the active view and the card under the cursor
    #[must_use]
    pub const fn border_focus(&self) -> Style {
        Style::new().fg(self.accent)
    }

    /// Border of the single expanded card
    #[must_use]
    pub const fn card_expanded(&self) -> Style {
        Style::new().fg(self.success).add_modifier(Modifier::BOLD)
    }

    /// Border of the photo drop zone while it is armed for a drop
    #[must_use]
    pub const fn drop_zone_active(&self) -> Style {
        Style::new().fg(self.info).add_modifier(Modifier::BOLD)
    }

    /// Focused input, cursor row and pressed buttons
    #[must_use]
    pub const fn focus(&self) -> Style {
        Style::new()
            .bg(self.selection)
            .fg(self.fg)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub const fn tab(&self) -> Style {
        Style::new().fg(self.muted)
    }

    #[must_use]
    pub const fn tab_active(&self) -> Style {
        Style::new().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Shortcut keys in the status bar and help
    #[must_use]
    pub const fn key_hint(&self) -> Style {
        Style::new().fg(self.secondary).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub const fn title(&self) -> Style {
        Style::new().fg(self.accent).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_serializes_by_name() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            theme: Theme,
        }
        let text = toml::to_string(&Wrapper {
            theme: Theme::default(),
        })
        .unwrap();
        let back: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(back.theme, Theme::default());
    }

    #[test]
    fn test_raise_saturates() {
        assert_eq!(raise(Color::Rgb(250, 0, 10), 10), Color::Rgb(255, 10, 20));
        assert_eq!(raise(Color::Black, 10), Color::Black);
    }
}
