//! Lenient color expressions.
//!
//! Three forms are recognized, tried in order: `#RRGGBB`, `rgb(r,g,b)`, and
//! the 16 W3C basic color names. Anything else resolves to black: callers
//! of the image-serving surface rely on unparseable colors degrading
//! rather than failing the request.

/// An 8-bit RGB triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The 16 W3C basic color names, resolved recursively through the hex form.
static NAMED_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("silver", "#C0C0C0"),
    ("gray", "#808080"),
    ("white", "#FFFFFF"),
    ("maroon", "#800000"),
    ("red", "#FF0000"),
    ("purple", "#800080"),
    ("fuchsia", "#FF00FF"),
    ("green", "#008000"),
    ("lime", "#00FF00"),
    ("olive", "#808000"),
    ("yellow", "#FFFF00"),
    ("navy", "#000080"),
    ("blue", "#0000FF"),
    ("teal", "#008080"),
    ("aqua", "#00FFFF"),
];

/// Parse a color expression, defaulting to black when nothing matches.
pub fn parse(expression: &str) -> Rgb {
    let s = expression.trim();
    if let Some(rgb) = parse_hex(s) {
        return rgb;
    }
    if let Some(rgb) = parse_rgb_call(s) {
        return rgb;
    }
    if let Some(rgb) = parse_named(s) {
        return rgb;
    }
    tracing::debug!(expression, "unrecognized color expression, using black");
    Rgb::BLACK
}

fn parse_hex(s: &str) -> Option<Rgb> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb::new(byte(0)?, byte(2)?, byte(4)?))
}

fn parse_rgb_call(s: &str) -> Option<Rgb> {
    let rest = s
        .get(..3)
        .filter(|p| p.eq_ignore_ascii_case("rgb"))
        .map(|_| &s[3..])?;
    let body = rest.trim_start().strip_prefix('(')?.strip_suffix(')')?;
    let mut channels = body.split(',');
    let r = channels.next()?.trim().parse::<u8>().ok()?;
    let g = channels.next()?.trim().parse::<u8>().ok()?;
    let b = channels.next()?.trim().parse::<u8>().ok()?;
    if channels.next().is_some() {
        return None;
    }
    Some(Rgb::new(r, g, b))
}

fn parse_named(s: &str) -> Option<Rgb> {
    let lower = s.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, hex)| parse(hex))
}

impl serde::Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b))
    }
}

impl<'de> serde::Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Ok(parse(&s))
    }
}
