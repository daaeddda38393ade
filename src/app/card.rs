//! Expandable record card.
//!
//! A card is stateless: the list that owns it decides whether it is
//! expanded. The header is always drawn; detail rows (and the photo area,
//! when reserved) only while expanded.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::theme::ThemeColors;

const SHOW_DETAILS: &str = "ⓘ Show details";
const HIDE_DETAILS: &str = "ⓘ Hide details";

/// A record card with a summary header and collapsible details
pub struct Card<'a> {
    title: Line<'a>,
    header: Vec<Line<'a>>,
    details: Vec<(&'static str, String)>,
    expanded: bool,
    selected: bool,
    photo_rows: u16,
    colors: &'a ThemeColors,
}

impl<'a> Card<'a> {
    pub fn new(title: impl Into<Line<'a>>, colors: &'a ThemeColors) -> Self {
        Self {
            title: title.into(),
            header: Vec::new(),
            details: Vec::new(),
            expanded: false,
            selected: false,
            photo_rows: 0,
            colors,
        }
    }

    /// Summary lines shown in both states
    #[must_use]
    pub fn header(mut self, lines: Vec<Line<'a>>) -> Self {
        self.header = lines;
        self
    }

    /// `label: value` rows shown only while expanded
    #[must_use]
    pub fn details(mut self, rows: Vec<(&'static str, String)>) -> Self {
        self.details = rows;
        self
    }

    #[must_use]
    pub const fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Highlight as the row under the cursor
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Rows reserved below the details for a photo while expanded
    #[must_use]
    pub const fn photo_rows(mut self, rows: u16) -> Self {
        self.photo_rows = rows;
        self
    }

    fn detail_lines(&self, width: u16) -> Vec<Line<'static>> {
        if !self.expanded {
            return Vec::new();
        }
        let mut lines = Vec::new();
        for (label, value) in &self.details {
            let prefix = format!("{label}: ");
            let available = usize::from(width)
                .saturating_sub(unicode_width::UnicodeWidthStr::width(prefix.as_str()))
                .max(8);
            let mut wrapped = textwrap::wrap(value, available).into_iter();
            let first = wrapped.next().map(|s| s.into_owned()).unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(prefix.clone(), self.colors.label()),
                Span::styled(first, self.colors.value()),
            ]));
            let indent = " ".repeat(prefix.chars().count());
            for rest in wrapped {
                lines.push(Line::from(vec![
                    Span::raw(indent.clone()),
                    Span::styled(rest.into_owned(), self.colors.value()),
                ]));
            }
        }
        lines
    }

    fn inner_width(width: u16) -> u16 {
        width.saturating_sub(2)
    }

    /// Rows the card needs when drawn `width` columns wide
    pub fn height(&self, width: u16) -> u16 {
        let inner = Self::inner_width(width);
        let mut rows = self.header.len() + 1;
        if self.expanded {
            rows += self.detail_lines(inner).len() + usize::from(self.photo_rows);
        }
        u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2)
    }

    /// Where the photo goes when the card is drawn into `area`
    pub fn photo_area(&self, area: Rect) -> Option<Rect> {
        if !self.expanded || self.photo_rows == 0 {
            return None;
        }
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let text_rows = self.header.len() + self.detail_lines(inner.width).len();
        let offset = u16::try_from(text_rows).ok()?;
        if offset >= inner.height {
            return None;
        }
        Some(Rect {
            x: inner.x,
            y: inner.y + offset,
            width: inner.width,
            height: self.photo_rows.min(inner.height - offset),
        })
    }
}

impl Widget for Card<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.expanded {
            self.colors.card_expanded()
        } else if self.selected {
            self.colors.border_focus()
        } else {
            self.colors.border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(self.title.clone());
        let inner = block.inner(area);

        let mut lines = self.header.clone();
        lines.extend(self.detail_lines(inner.width));
        if self.expanded {
            lines.extend((0..self.photo_rows).map(|_| Line::default()));
        }
        let indicator = if self.expanded { HIDE_DETAILS } else { SHOW_DETAILS };
        lines.push(Line::from(Span::styled(indicator, self.colors.info_text())));

        let paragraph = Paragraph::new(lines).block(block);
        let paragraph = if self.selected {
            paragraph.style(self.colors.focus())
        } else {
            paragraph
        };
        paragraph.render(area, buf);
    }
}
