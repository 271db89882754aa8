use typeink::{
    Alpha, BBox, Canvas, FontSpec, GlyphRaster, Rgb, RenderConfig, TypeinkError, TypeinkResult,
    render_text, render_text_or_placeholder, wrap,
};

/// Fixed-advance metrics: every char is `char_w` px wide, every row
/// `ascent + descent` px tall. `paint` marks the single pixel at the
/// baseline origin so positioning is observable.
struct StubRaster {
    char_w: i32,
    ascent: i32,
    descent: i32,
}

impl StubRaster {
    fn new() -> Self {
        Self {
            char_w: 10,
            ascent: 10,
            descent: 2,
        }
    }
}

impl GlyphRaster for StubRaster {
    fn measure(&mut self, _font: &FontSpec, text: &str) -> TypeinkResult<BBox> {
        let n = text.chars().count() as i32;
        Ok(BBox {
            left: 0,
            top: -self.ascent,
            right: n * self.char_w,
            bottom: self.descent,
        })
    }

    fn paint(
        &mut self,
        canvas: &mut Canvas,
        origin: (i32, i32),
        _font: &FontSpec,
        color: Rgb,
        alpha: Alpha,
        _text: &str,
    ) -> TypeinkResult<()> {
        canvas.blend_pixel(
            origin.0,
            origin.1,
            [color.r, color.g, color.b, alpha.to_alpha8()],
        );
        Ok(())
    }
}

struct FailingRaster;

impl GlyphRaster for FailingRaster {
    fn measure(&mut self, _font: &FontSpec, _text: &str) -> TypeinkResult<BBox> {
        Err(TypeinkError::raster("metrics backend unavailable"))
    }

    fn paint(
        &mut self,
        _canvas: &mut Canvas,
        _origin: (i32, i32),
        _font: &FontSpec,
        _color: Rgb,
        _alpha: Alpha,
        _text: &str,
    ) -> TypeinkResult<()> {
        Err(TypeinkError::raster("metrics backend unavailable"))
    }
}

fn config() -> RenderConfig {
    RenderConfig::builder()
        .font_path("stub.ttf")
        .font_size(12)
        .text_color(Rgb::new(255, 0, 0))
        .build()
        .unwrap()
}

fn count_pixels(canvas: &Canvas, rgb: [u8; 3]) -> usize {
    let mut n = 0;
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let px = canvas.pixel(x, y).unwrap();
            if [px[0], px[1], px[2]] == rgb && px[3] == 255 {
                n += 1;
            }
        }
    }
    n
}

#[test]
fn hello_world_wraps_into_two_lines_at_width_100() {
    // "hello " measures 60 px (6 chars × 10); "hello world " would be 120.
    let mut raster = StubRaster::new();
    let cfg = config();
    let layout = wrap("hello world", Some(100), |s| raster.measure(cfg.font(), s)).unwrap();
    assert_eq!(layout.line_count(), 2);
    assert_eq!(layout.lines[0].text, "hello ");
    assert_eq!(layout.lines[1].text, "world ");
}

#[test]
fn canvas_geometry_follows_layout() {
    let mut raster = StubRaster::new();
    let canvas = render_text(&config(), &mut raster, "hello world", Some(100)).unwrap();
    // Width is the requested 100 (wider than the 60 px max line); height is
    // measured line height (10 + 2) times two lines.
    assert_eq!(canvas.width(), 100);
    assert_eq!(canvas.height(), 24);
}

#[test]
fn unwrapped_canvas_grows_to_fit_the_widest_line() {
    let mut raster = StubRaster::new();
    let canvas = render_text(&config(), &mut raster, "abcd", None).unwrap();
    // No wrap boundary requested; the 40 px measured row sets the width.
    assert_eq!(canvas.width(), 40);
}

#[test]
fn overlong_token_does_not_widen_the_canvas() {
    // An overflowing word's measurement never reaches the aggregates, so
    // the canvas stays at the requested width and the overhang clips.
    let mut raster = StubRaster::new();
    let canvas =
        render_text(&config(), &mut raster, "hello incomprehensibilities", Some(100)).unwrap();
    assert_eq!(canvas.width(), 100);
    assert_eq!(canvas.height(), 24);
}

#[test]
fn explicit_line_spacing_overrides_measured_height() {
    let mut raster = StubRaster::new();
    let cfg = RenderConfig::builder()
        .font_path("stub.ttf")
        .line_spacing(20)
        .build()
        .unwrap();
    let canvas = render_text(&cfg, &mut raster, "hello world", Some(100)).unwrap();
    assert_eq!(canvas.height(), 40);
}

#[test]
fn lines_are_right_aligned_and_baselined() {
    let mut raster = StubRaster::new();
    let canvas = render_text(&config(), &mut raster, "hello world", Some(100)).unwrap();
    // Both reversed lines measure 60 px wide with zero left bearing, so the
    // stub paints their baseline origins at x = 100 - 60 = 40 and
    // y = spacing·i + ascent.
    assert_eq!(canvas.pixel(40, 10).unwrap(), [255, 0, 0, 255]);
    assert_eq!(canvas.pixel(40, 22).unwrap(), [255, 0, 0, 255]);
    assert_eq!(count_pixels(&canvas, [255, 0, 0]), 2);
}

#[test]
fn background_fills_the_whole_canvas() {
    let mut raster = StubRaster::new();
    let cfg = RenderConfig::builder()
        .font_path("stub.ttf")
        .background(Rgb::new(0, 255, 0))
        .build()
        .unwrap();
    let canvas = render_text(&cfg, &mut raster, "hi", Some(100)).unwrap();
    assert_eq!(canvas.pixel(0, 0).unwrap(), [0, 255, 0, 255]);
    assert_eq!(
        canvas.pixel(canvas.width() - 1, canvas.height() - 1).unwrap(),
        [0, 255, 0, 255]
    );
}

#[test]
fn transparent_background_stays_transparent() {
    let mut raster = StubRaster::new();
    let cfg = RenderConfig::builder()
        .font_path("stub.ttf")
        .background_alpha(Alpha::TRANSPARENT)
        .build()
        .unwrap();
    let canvas = render_text(&cfg, &mut raster, "hi", Some(100)).unwrap();
    assert_eq!(canvas.pixel(0, 0).unwrap()[3], 0);
}

#[test]
fn shadow_paints_offset_before_text() {
    let mut raster = StubRaster::new();
    let cfg = RenderConfig::builder()
        .font_path("stub.ttf")
        .text_color(Rgb::new(255, 0, 0))
        .line_spacing(20)
        .shadow(2, Rgb::new(0, 0, 255), Alpha::OPAQUE)
        .build()
        .unwrap();
    let canvas = render_text(&cfg, &mut raster, "hello", Some(100)).unwrap();
    // Main text baseline at (40, 10); shadow displaced by (+2, +2).
    assert_eq!(canvas.pixel(40, 10).unwrap(), [255, 0, 0, 255]);
    assert_eq!(canvas.pixel(42, 12).unwrap(), [0, 0, 255, 255]);
}

#[test]
fn no_shadow_pixels_without_an_offset() {
    let mut raster = StubRaster::new();
    let cfg = RenderConfig::builder()
        .font_path("stub.ttf")
        .text_color(Rgb::new(255, 0, 0))
        .shadow(0, Rgb::new(0, 0, 255), Alpha::OPAQUE)
        .build()
        .unwrap();
    let canvas = render_text(&cfg, &mut raster, "hello", Some(100)).unwrap();
    assert_eq!(count_pixels(&canvas, [0, 0, 255]), 0);
}

#[test]
fn unwrapped_text_splits_on_line_breaks_only() {
    let mut raster = StubRaster::new();
    let cfg = config();
    let layout = wrap("line1\nline2", None, |s| raster.measure(cfg.font(), s)).unwrap();
    assert_eq!(layout.line_count(), 2);
    assert_eq!(layout.lines[0].text, "line1");
    assert_eq!(layout.lines[1].text, "line2");

    let canvas = render_text(&config(), &mut raster, "line1\nline2", None).unwrap();
    assert_eq!(canvas.width(), 50);
    assert_eq!(canvas.height(), 24);
}

#[test]
fn metrics_failure_surfaces_or_degrades_to_placeholder() {
    let mut raster = FailingRaster;
    let err = render_text(&config(), &mut raster, "hello", Some(100)).unwrap_err();
    assert!(err.to_string().contains("raster error:"));

    let canvas = render_text_or_placeholder(&config(), &mut raster, "hello", Some(100));
    assert_eq!((canvas.width(), canvas.height()), (1, 1));
}

#[test]
fn unmeasurable_text_degrades_to_placeholder() {
    // Zero-advance metrics produce a zero-width canvas, an explicit layout
    // error in the strict API.
    let mut raster = StubRaster {
        char_w: 0,
        ascent: 0,
        descent: 0,
    };
    assert!(render_text(&config(), &mut raster, "x", None).is_err());
    let canvas = render_text_or_placeholder(&config(), &mut raster, "x", None);
    assert_eq!((canvas.width(), canvas.height()), (1, 1));
}
