//! The render pipeline.
//!
//! One render call is a pure sequence over an injected [`GlyphRaster`]:
//!
//! 1. [`wrap`](crate::layout::wrap) the text into measured lines
//! 2. derive line spacing and canvas geometry
//! 3. fill the background layer
//! 4. per line: reverse (right-to-left visual correction), measure,
//!    position, paint shadow then text
//!
//! The canvas is freshly allocated per call and never shared.

use crate::canvas::Canvas;
use crate::config::RenderConfig;
use crate::error::{TypeinkError, TypeinkResult};
use crate::layout::wrap;
use crate::raster::GlyphRaster;

/// Render `text` into a fresh canvas.
///
/// `width` is the wrap boundary in pixels; `None` (or zero) disables
/// wrapping and splits on explicit line breaks only. The canvas is at
/// least `width` wide and grows to fit the widest measured line.
///
/// The input is treated as a sequence of glyph codes in the legacy
/// single-byte transliteration: each `char` names one glyph, and the
/// per-line reversal below is the byte reversal that corrects storage
/// order for a left-to-right rasterizer.
#[tracing::instrument(skip(config, raster, text), fields(chars = text.chars().count()))]
pub fn render_text(
    config: &RenderConfig,
    raster: &mut dyn GlyphRaster,
    text: &str,
    width: Option<u32>,
) -> TypeinkResult<Canvas> {
    let font = config.font();
    let layout = wrap(text, width, |s| raster.measure(font, s))?;

    let spacing = if config.line_spacing() > 0 {
        config.line_spacing()
    } else {
        layout.max_height
    };
    let canvas_w = width.unwrap_or(0).max(layout.max_width);
    let canvas_h = spacing
        .checked_mul(layout.line_count() as u32)
        .ok_or_else(|| TypeinkError::layout("canvas height overflow"))?;
    if canvas_w == 0 || canvas_h == 0 {
        return Err(TypeinkError::layout("nothing measurable to render"));
    }

    let mut canvas = Canvas::new(canvas_w, canvas_h)?;
    let bg = config.background();
    canvas.fill([bg.r, bg.g, bg.b, config.background_alpha().to_alpha8()]);
    tracing::debug!(
        width = canvas_w,
        height = canvas_h,
        spacing,
        lines = layout.line_count(),
        "canvas laid out"
    );

    for (i, line) in layout.lines.iter().enumerate() {
        let reversed: String = line.text.chars().rev().collect();
        let bbox = raster.measure(font, &reversed)?;

        // Right-align the block, compensating for the left side bearing so
        // asymmetric bounding boxes keep a consistent right edge.
        let x = canvas_w as i32 - bbox.width() as i32 - bbox.left.abs();
        let y = spacing as i32 * i as i32 + bbox.ascent() as i32;

        if let Some(shadow) = config.shadow() {
            let off = shadow.offset as i32;
            raster.paint(
                &mut canvas,
                (x + off, y + off),
                font,
                shadow.color,
                shadow.alpha,
                &reversed,
            )?;
        }
        raster.paint(
            &mut canvas,
            (x, y),
            font,
            config.text_color(),
            config.text_alpha(),
            &reversed,
        )?;
    }

    Ok(canvas)
}

/// Legacy never-fails variant: any failure degrades to a 1×1 placeholder
/// canvas, as the legacy image-serving surface did.
pub fn render_text_or_placeholder(
    config: &RenderConfig,
    raster: &mut dyn GlyphRaster,
    text: &str,
    width: Option<u32>,
) -> Canvas {
    match render_text(config, raster, text, width) {
        Ok(canvas) => canvas,
        Err(err) => {
            tracing::warn!(%err, "render failed, degrading to placeholder canvas");
            Canvas::placeholder()
        }
    }
}
