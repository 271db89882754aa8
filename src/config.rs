//! Render configuration.
//!
//! A [`RenderConfig`] is built once and is immutable for its lifetime; it
//! can be shared across any number of render calls. This replaces the
//! setter-mutated object of the legacy surface; validation happens in
//! [`RenderConfigBuilder::build`] instead of being spread over setters.

use std::path::PathBuf;

use serde::Deserialize;

use crate::color::Rgb;
use crate::error::{TypeinkError, TypeinkResult};
use crate::font::FontDir;
use crate::raster::FontSpec;

pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Transparency in the external convention: 0 is opaque, 127 is fully
/// transparent. Values above 127 clamp on construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alpha(u8);

impl Alpha {
    pub const OPAQUE: Alpha = Alpha(0);
    pub const TRANSPARENT: Alpha = Alpha(127);

    pub fn new(value: u8) -> Self {
        Self(value.min(127))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Convert to an 8-bit coverage alpha (255 = opaque).
    pub fn to_alpha8(self) -> u8 {
        let inv = u32::from(127 - self.0);
        ((inv * 255 + 63) / 127) as u8
    }
}

impl<'de> Deserialize<'de> for Alpha {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Alpha::new(u8::deserialize(deserializer)?))
    }
}

/// Drop shadow: a duplicate of each line painted first, displaced by
/// `offset` pixels on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shadow {
    pub offset: u32,
    pub color: Rgb,
    pub alpha: Alpha,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    font: FontSpec,
    text_color: Rgb,
    text_alpha: Alpha,
    background: Rgb,
    background_alpha: Alpha,
    line_spacing: u32,
    shadow: Option<Shadow>,
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn text_color(&self) -> Rgb {
        self.text_color
    }

    pub fn text_alpha(&self) -> Alpha {
        self.text_alpha
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn background_alpha(&self) -> Alpha {
        self.background_alpha
    }

    /// Explicit line spacing; 0 means "use the measured max line height".
    pub fn line_spacing(&self) -> u32 {
        self.line_spacing
    }

    pub fn shadow(&self) -> Option<Shadow> {
        self.shadow
    }
}

#[derive(Clone, Debug)]
pub struct RenderConfigBuilder {
    font_path: Option<PathBuf>,
    font_size: u32,
    text_color: Rgb,
    text_alpha: Alpha,
    background: Rgb,
    background_alpha: Alpha,
    line_spacing: u32,
    shadow: Option<Shadow>,
}

impl Default for RenderConfigBuilder {
    fn default() -> Self {
        Self {
            font_path: None,
            font_size: DEFAULT_FONT_SIZE,
            text_color: Rgb::BLACK,
            text_alpha: Alpha::OPAQUE,
            background: Rgb::WHITE,
            background_alpha: Alpha::OPAQUE,
            line_spacing: 0,
            shadow: None,
        }
    }
}

impl RenderConfigBuilder {
    /// Path of the font file to render with, typically the output of
    /// [`FontDir::resolve`].
    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// Point size; must be positive at `build` time.
    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    pub fn text_color(mut self, color: Rgb) -> Self {
        self.text_color = color;
        self
    }

    pub fn text_alpha(mut self, alpha: Alpha) -> Self {
        self.text_alpha = alpha;
        self
    }

    pub fn background(mut self, color: Rgb) -> Self {
        self.background = color;
        self
    }

    pub fn background_alpha(mut self, alpha: Alpha) -> Self {
        self.background_alpha = alpha;
        self
    }

    pub fn line_spacing(mut self, spacing: u32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// A zero offset disables the shadow.
    pub fn shadow(mut self, offset: u32, color: Rgb, alpha: Alpha) -> Self {
        self.shadow = (offset > 0).then_some(Shadow {
            offset,
            color,
            alpha,
        });
        self
    }

    pub fn build(self) -> TypeinkResult<RenderConfig> {
        let path = self
            .font_path
            .ok_or_else(|| TypeinkError::config("no font file configured"))?;
        if self.font_size == 0 {
            return Err(TypeinkError::config("font size must be positive"));
        }
        Ok(RenderConfig {
            font: FontSpec {
                path,
                size: self.font_size,
            },
            text_color: self.text_color,
            text_alpha: self.text_alpha,
            background: self.background,
            background_alpha: self.background_alpha,
            line_spacing: self.line_spacing,
            shadow: self.shadow,
        })
    }
}

/// Declarative render description, as read from a JSON config file.
///
/// Colors use the string forms of [`crate::color::parse`]; alphas are the
/// external 0..=127 convention.
#[derive(Clone, Debug, Deserialize)]
pub struct RenderSpec {
    pub font_dir: PathBuf,
    #[serde(default)]
    pub fonts: Vec<String>,
    #[serde(default)]
    pub fallback: Option<String>,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "Rgb::default")]
    pub color: Rgb,
    #[serde(default)]
    pub alpha: Alpha,
    #[serde(default = "default_background")]
    pub background: Rgb,
    #[serde(default)]
    pub background_alpha: Alpha,
    #[serde(default)]
    pub spacing: u32,
    #[serde(default)]
    pub shadow: Option<ShadowSpec>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ShadowSpec {
    pub offset: u32,
    #[serde(default = "Rgb::default")]
    pub color: Rgb,
    #[serde(default)]
    pub alpha: Alpha,
}

fn default_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_background() -> Rgb {
    Rgb::WHITE
}

impl RenderSpec {
    /// Resolve the font store and produce an immutable config.
    pub fn into_config(self) -> TypeinkResult<RenderConfig> {
        let store = FontDir::new(&self.font_dir)?;
        let path = store
            .resolve(&self.fonts, self.fallback.as_deref())
            .ok_or_else(|| {
                TypeinkError::config(format!(
                    "no usable font among {:?} under '{}'",
                    self.fonts,
                    store.path().display()
                ))
            })?;

        let mut builder = RenderConfig::builder()
            .font_path(path)
            .font_size(self.size)
            .text_color(self.color)
            .text_alpha(self.alpha)
            .background(self.background)
            .background_alpha(self.background_alpha)
            .line_spacing(self.spacing);
        if let Some(shadow) = self.shadow {
            builder = builder.shadow(shadow.offset, shadow.color, shadow.alpha);
        }
        builder.build()
    }
}
