//! Measurement-driven word wrap.
//!
//! `wrap` turns raw text into lines using an injected metrics query, so the
//! algorithm is independent of any font library. Lines come back in
//! original logical character order; the right-to-left reversal happens per
//! line at render time, not here.

use crate::error::TypeinkResult;
use crate::raster::BBox;

/// One visual row after wrapping.
///
/// `width`/`height` hold the last measurement taken while the line still
/// fit. A line opened by an overflowing word keeps them at zero until a
/// following word fits; the render path re-measures every line anyway.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub width: u32,
    pub height: u32,
}

/// Wrapped lines in reading order plus aggregate extents.
///
/// The aggregates only reflect measurements of words that fit: the query
/// that triggers an overflow close is discarded, matching the legacy wrap
/// accounting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextLayout {
    pub lines: Vec<Line>,
    pub max_width: u32,
    pub max_height: u32,
}

impl TextLayout {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Word-wrap `text` to `max_width` pixels using `measure` for extents.
///
/// With `max_width` of `None` (or zero) wrapping is skipped: the text is
/// split on explicit line breaks only, one `Line` per row. Each row is
/// still measured so the aggregates stay populated for downstream layout
/// math (see DESIGN.md for this deliberate divergence from the legacy
/// unwrapped result shape).
///
/// Words are space-separated; consecutive spaces collapse and a single
/// trailing space is restored after each word. A word whose addition would
/// exceed `max_width` closes the current line as-is, even when the line is
/// empty, and opens a new one, so a single overlong token can produce a
/// line wider than the limit.
pub fn wrap<F>(text: &str, max_width: Option<u32>, mut measure: F) -> TypeinkResult<TextLayout>
where
    F: FnMut(&str) -> TypeinkResult<BBox>,
{
    let Some(limit) = max_width.filter(|w| *w > 0) else {
        return wrap_disabled(text, measure);
    };

    let mut layout = TextLayout::default();
    for paragraph in text.split('\n') {
        let mut line = Line::default();
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let candidate = format!("{}{word} ", line.text);
            let bbox = measure(&candidate)?;
            let (w, h) = (bbox.width(), bbox.height());
            if w > limit {
                tracing::trace!(word, width = w, limit, "word overflows, starting new line");
                layout.lines.push(std::mem::take(&mut line));
                line.text = format!("{word} ");
            } else {
                line.text = candidate;
                line.width = w;
                line.height = h;
                layout.max_width = layout.max_width.max(w);
                layout.max_height = layout.max_height.max(h);
            }
        }
        layout.lines.push(line);
    }

    tracing::debug!(
        lines = layout.lines.len(),
        max_width = layout.max_width,
        max_height = layout.max_height,
        "wrapped text"
    );
    Ok(layout)
}

fn wrap_disabled<F>(text: &str, mut measure: F) -> TypeinkResult<TextLayout>
where
    F: FnMut(&str) -> TypeinkResult<BBox>,
{
    let mut layout = TextLayout::default();
    for row in text.split('\n') {
        let bbox = measure(row)?;
        let (w, h) = (bbox.width(), bbox.height());
        layout.max_width = layout.max_width.max(w);
        layout.max_height = layout.max_height.max(h);
        layout.lines.push(Line {
            text: row.to_string(),
            width: w,
            height: h,
        });
    }
    Ok(layout)
}
