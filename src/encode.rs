//! Image encoding and export.
//!
//! The pipeline hands a finished [`Canvas`] to a [`Codec`]; the shipped
//! [`ImageCodec`] uses the `image` crate. Exporting to a stream emits a
//! content-type marker first, matching the legacy web-handler surface;
//! exporting to a file writes the raw bytes.

use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use image::ImageEncoder as _;

use crate::canvas::Canvas;
use crate::error::{TypeinkError, TypeinkResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Gif,
}

impl OutputFormat {
    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Gif => "image/gif",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = TypeinkError;

    /// Accepts `png`, `jpg`/`jpeg`, `gif`, case-insensitive. Anything else
    /// is a typed error; the legacy silent no-op on unknown formats is
    /// deliberately not preserved.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "gif" => Ok(OutputFormat::Gif),
            other => Err(TypeinkError::encode(format!(
                "unrecognized output format '{other}' (expected png, jpg or gif)"
            ))),
        }
    }
}

/// Encoding capability; the core depends on this seam, not on a concrete
/// graphics library.
pub trait Codec {
    fn encode(&self, canvas: &Canvas, format: OutputFormat) -> TypeinkResult<Vec<u8>>;
}

/// `image`-crate backed codec. PNG and GIF keep the alpha channel; JPEG
/// has none, so pixels are flattened over black first.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn encode(&self, canvas: &Canvas, format: OutputFormat) -> TypeinkResult<Vec<u8>> {
        let (w, h) = (canvas.width(), canvas.height());
        let mut out = Vec::new();
        match format {
            OutputFormat::Png => {
                image::codecs::png::PngEncoder::new(&mut out)
                    .write_image(canvas.data(), w, h, image::ExtendedColorType::Rgba8)
                    .map_err(|e| TypeinkError::encode(format!("png: {e}")))?;
            }
            OutputFormat::Jpeg => {
                let rgb = flatten_to_rgb(canvas);
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 90)
                    .write_image(&rgb, w, h, image::ExtendedColorType::Rgb8)
                    .map_err(|e| TypeinkError::encode(format!("jpeg: {e}")))?;
            }
            OutputFormat::Gif => {
                let mut encoder = image::codecs::gif::GifEncoder::new(&mut out);
                encoder
                    .encode(canvas.data(), w, h, image::ExtendedColorType::Rgba8)
                    .map_err(|e| TypeinkError::encode(format!("gif: {e}")))?;
            }
        }
        Ok(out)
    }
}

/// Straight-alpha flatten over black, for the alpha-less JPEG path.
fn flatten_to_rgb(canvas: &Canvas) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(canvas.data().len() / 4 * 3);
    for px in canvas.data().chunks_exact(4) {
        let a = u32::from(px[3]);
        for c in &px[..3] {
            rgb.push(((u32::from(*c) * a + 127) / 255) as u8);
        }
    }
    rgb
}

/// Where encoded bytes go.
pub enum ExportTarget<'a> {
    /// Write the bytes to this file.
    File(&'a Path),
    /// Write a `Content-Type` marker, then the bytes.
    Stream(&'a mut dyn Write),
}

/// Encode and deliver a canvas.
pub fn export(
    canvas: &Canvas,
    format: OutputFormat,
    target: ExportTarget<'_>,
    codec: &dyn Codec,
) -> TypeinkResult<()> {
    let bytes = codec.encode(canvas, format)?;
    match target {
        ExportTarget::File(path) => {
            std::fs::write(path, &bytes)?;
            tracing::debug!(path = %path.display(), len = bytes.len(), "wrote image file");
        }
        ExportTarget::Stream(writer) => {
            write!(writer, "Content-Type: {}\r\n\r\n", format.mime())?;
            writer.write_all(&bytes)?;
            writer.flush()?;
        }
    }
    Ok(())
}
