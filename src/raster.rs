//! Glyph measurement and painting capability.
//!
//! The layout and compositing pipeline never touches a font library; it
//! talks to a [`GlyphRaster`], which measures a run of glyph codes and
//! paints it onto a [`Canvas`] at a baseline origin. [`AbGlyphRaster`] is
//! the shipped implementation, backed by `ab_glyph` over `.ttf` files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, Glyph, GlyphId, Point, PxScaleFont, ScaleFont, point};

use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::config::Alpha;
use crate::error::{TypeinkError, TypeinkResult};

/// Bounding box of a measured run, as offsets from the baseline origin.
///
/// Coordinates are y-down: `top` is typically negative (ink above the
/// baseline) and `bottom` positive (descenders). `left` can be negative
/// when the first glyph has a negative side bearing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BBox {
    pub fn width(&self) -> u32 {
        self.right.abs_diff(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.abs_diff(self.top)
    }

    /// Baseline offset from the top of the run.
    pub fn ascent(&self) -> u32 {
        self.top.unsigned_abs()
    }
}

/// A font file plus point size, as resolved by configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSpec {
    pub path: PathBuf,
    pub size: u32,
}

/// Measurement and painting over one font store.
///
/// Methods take `&mut self` so implementations can cache parsed fonts.
pub trait GlyphRaster {
    /// Bounding box of `text` rendered at the origin in `font`.
    fn measure(&mut self, font: &FontSpec, text: &str) -> TypeinkResult<BBox>;

    /// Paint `text` onto `canvas` with its baseline starting at `origin`.
    fn paint(
        &mut self,
        canvas: &mut Canvas,
        origin: (i32, i32),
        font: &FontSpec,
        color: Rgb,
        alpha: Alpha,
        text: &str,
    ) -> TypeinkResult<()>;
}

/// `ab_glyph`-backed raster over a directory of `.ttf` files.
///
/// Parsed fonts are cached by path for the lifetime of the value; a raster
/// is cheap to keep around across renders.
#[derive(Default)]
pub struct AbGlyphRaster {
    fonts: HashMap<PathBuf, FontVec>,
}

impl AbGlyphRaster {
    pub fn new() -> Self {
        Self::default()
    }

    fn font(&mut self, path: &Path) -> TypeinkResult<&FontVec> {
        if !self.fonts.contains_key(path) {
            let bytes = std::fs::read(path).map_err(|e| {
                TypeinkError::raster(format!("read font '{}': {e}", path.display()))
            })?;
            let font = FontVec::try_from_vec(bytes).map_err(|_| {
                TypeinkError::raster(format!("invalid font file '{}'", path.display()))
            })?;
            tracing::debug!(path = %path.display(), "loaded font");
            self.fonts.insert(path.to_path_buf(), font);
        }
        Ok(&self.fonts[path])
    }
}

impl GlyphRaster for AbGlyphRaster {
    fn measure(&mut self, spec: &FontSpec, text: &str) -> TypeinkResult<BBox> {
        let font = self.font(&spec.path)?;
        let scaled = scale_font(font, spec)?;

        let (glyphs, advance) = layout_run(&scaled, point(0.0, 0.0), text);
        let mut ink: Option<ab_glyph::Rect> = None;
        for glyph in glyphs {
            if let Some(outlined) = scaled.outline_glyph(glyph) {
                let b = outlined.px_bounds();
                ink = Some(match ink {
                    None => b,
                    Some(acc) => ab_glyph::Rect {
                        min: point(acc.min.x.min(b.min.x), acc.min.y.min(b.min.y)),
                        max: point(acc.max.x.max(b.max.x), acc.max.y.max(b.max.y)),
                    },
                });
            }
        }

        // Whitespace-only runs have no ink; fall back to font vertical
        // metrics so line heights stay usable.
        let bbox = match ink {
            Some(b) => BBox {
                left: b.min.x.floor() as i32,
                top: b.min.y.floor() as i32,
                right: b.max.x.max(advance).ceil() as i32,
                bottom: b.max.y.ceil() as i32,
            },
            None => BBox {
                left: 0,
                top: -(scaled.ascent().ceil() as i32),
                right: advance.ceil() as i32,
                bottom: (-scaled.descent()).ceil() as i32,
            },
        };
        Ok(bbox)
    }

    fn paint(
        &mut self,
        canvas: &mut Canvas,
        origin: (i32, i32),
        spec: &FontSpec,
        color: Rgb,
        alpha: Alpha,
        text: &str,
    ) -> TypeinkResult<()> {
        let alpha8 = alpha.to_alpha8();
        if alpha8 == 0 {
            return Ok(());
        }

        let font = self.font(&spec.path)?;
        let scaled = scale_font(font, spec)?;

        let (glyphs, _) = layout_run(&scaled, point(origin.0 as f32, origin.1 as f32), text);
        for glyph in glyphs {
            if let Some(outlined) = scaled.outline_glyph(glyph) {
                let b = outlined.px_bounds();
                let (bx, by) = (b.min.x as i32, b.min.y as i32);
                outlined.draw(|x, y, coverage| {
                    let a = (coverage.clamp(0.0, 1.0) * f32::from(alpha8)).round() as u8;
                    if a > 0 {
                        canvas.blend_pixel(bx + x as i32, by + y as i32, [color.r, color.g, color.b, a]);
                    }
                });
            }
        }
        Ok(())
    }
}

fn scale_font<'f>(font: &'f FontVec, spec: &FontSpec) -> TypeinkResult<PxScaleFont<&'f FontVec>> {
    let scale = font.pt_to_px_scale(spec.size as f32).ok_or_else(|| {
        TypeinkError::raster(format!("font '{}' has no unit scale", spec.path.display()))
    })?;
    Ok(font.as_scaled(scale))
}

/// Position each char's glyph along the baseline with kerning applied.
/// Returns the glyphs plus the total advance of the run.
fn layout_run<F: Font>(font: &PxScaleFont<F>, origin: Point, text: &str) -> (Vec<Glyph>, f32) {
    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret = origin.x;
    let mut last: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = last {
            caret += font.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(font.scale(), point(caret, origin.y)));
        caret += font.h_advance(id);
        last = Some(id);
    }
    (glyphs, caret - origin.x)
}
