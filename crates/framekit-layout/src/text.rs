//! Content measurement.
//!
//! The host toolkit normally answers "what size does this content need".
//! Elements delegate that question to a [`ContentMeasure`] implementation;
//! [`TextContent`] is the built-in one for wrapped label text.

use std::fmt;

use framekit_core::Size;
use smallvec::SmallVec;

/// Answers content-size queries for a view-like element.
pub trait ContentMeasure: fmt::Debug {
    /// Size the content needs when laid out within `constraint`.
    ///
    /// A constraint component of [`f64::MAX`] means unbounded on that axis.
    fn size_that_fits(&self, constraint: Size) -> Size;
}

/// Font parameters used to estimate glyph extents.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Point size
    pub font_size: f64,
    /// Line height as a multiple of the point size
    pub line_height: f64,
    /// Extra advance after every glyph
    pub letter_spacing: f64,
    /// Line limit; `None` lets the text grow as tall as it needs
    pub max_lines: Option<u32>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 17.0,
            line_height: 1.2,
            letter_spacing: 0.0,
            max_lines: None,
        }
    }
}

impl TextStyle {
    /// Estimated advance of one glyph. Proportional fonts average a bit
    /// over half the point size.
    fn advance(&self) -> f64 {
        self.font_size * 0.55 + self.letter_spacing
    }

    fn line_extent(&self) -> f64 {
        self.font_size * self.line_height
    }
}

/// Result of measuring a run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    /// Widest line
    pub width: f64,
    pub height: f64,
    pub lines: u32,
}

/// Measure text, wrapping words greedily at `max_width`.
///
/// `None`, a non-positive or an unbounded width keeps everything on one
/// line. Greedy wrapping never produces more lines for a wider bound.
/// Lines past the style's `max_lines` are dropped.
pub fn measure_text(text: &str, style: &TextStyle, max_width: Option<f64>) -> TextMetrics {
    let limit = max_width.filter(|width| *width > 0.0 && *width < f64::MAX);
    let mut lines = wrap_lines(text, style.advance(), limit);
    if let Some(max) = style.max_lines.filter(|max| *max > 0) {
        lines.truncate(max as usize);
    }
    metrics_for(&lines, style)
}

/// Widths of the lines `text` breaks into. A word wider than the limit
/// gets a line of its own.
fn wrap_lines(text: &str, advance: f64, limit: Option<f64>) -> SmallVec<[f64; 8]> {
    let mut lines = SmallVec::new();
    let mut current: Option<f64> = None;

    for word in text.split_whitespace() {
        let word = word.chars().count() as f64 * advance;
        current = match current {
            None => Some(word),
            Some(line) if limit.map_or(true, |limit| line + advance + word <= limit) => {
                Some(line + advance + word)
            }
            Some(line) => {
                lines.push(line);
                Some(word)
            }
        };
    }
    lines.extend(current);
    lines
}

fn metrics_for(lines: &[f64], style: &TextStyle) -> TextMetrics {
    let count = lines.len() as u32;
    TextMetrics {
        width: lines.iter().copied().fold(0.0, f64::max),
        height: f64::from(count) * style.line_extent(),
        lines: count,
    }
}

/// Text content of a label-like view.
#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    pub text: String,
    pub style: TextStyle,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_max_lines(mut self, lines: u32) -> Self {
        self.style.max_lines = Some(lines);
        self
    }
}

impl ContentMeasure for TextContent {
    fn size_that_fits(&self, constraint: Size) -> Size {
        let metrics = measure_text(&self.text, &self.style, Some(constraint.width));
        Size::new(metrics.width, metrics.height)
    }
}
