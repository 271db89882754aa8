#![forbid(unsafe_code)]

//! Raster rendering of legacy-encoded right-to-left script text.
//!
//! The pipeline is explicitly staged:
//!
//! 1. [`wrap`]: word-wrap the input into measured lines via an injected
//!    glyph-metrics query
//! 2. [`render_text`]: reverse each line (right-to-left visual
//!    correction), position it, and composite background → shadow → text
//!    onto a fresh [`Canvas`]
//! 3. [`export`]: encode the canvas (PNG/JPEG/GIF) to a file or a stream
//!
//! Font access and encoding live behind the [`GlyphRaster`] and [`Codec`]
//! capability seams; the shipped implementations are [`AbGlyphRaster`] and
//! [`ImageCodec`]. Configuration is an immutable [`RenderConfig`] built
//! once and reusable across renders.

pub mod canvas;
pub mod color;
pub mod config;
pub mod encode;
pub mod error;
pub mod font;
pub mod layout;
pub mod pipeline;
pub mod raster;

pub use canvas::Canvas;
pub use color::Rgb;
pub use config::{Alpha, RenderConfig, RenderConfigBuilder, RenderSpec, Shadow, ShadowSpec};
pub use encode::{Codec, ExportTarget, ImageCodec, OutputFormat, export};
pub use error::{TypeinkError, TypeinkResult};
pub use font::FontDir;
pub use layout::{Line, TextLayout, wrap};
pub use pipeline::{render_text, render_text_or_placeholder};
pub use raster::{AbGlyphRaster, BBox, FontSpec, GlyphRaster};
