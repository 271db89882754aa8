use std::{
    fs,
    io::{self, Read as _},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use typeink::{
    AbGlyphRaster, Alpha, ExportTarget, FontDir, ImageCodec, OutputFormat, RenderConfig,
    RenderSpec, color, config::DEFAULT_FONT_SIZE, export, render_text,
};

#[derive(Parser, Debug)]
#[command(name = "typeink", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render text to an image.
    Render(RenderArgs),
    /// List the fonts available in a font directory.
    Fonts(FontsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Text to render; reads stdin when neither this nor --in is given.
    #[arg(long)]
    text: Option<String>,

    /// Read the text from a file.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// JSON render spec; replaces the font/color flags below.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font directory (.ttf files named after lowercase family names).
    #[arg(long, default_value = "fonts")]
    font_dir: PathBuf,

    /// Font family candidate, in preference order (repeatable).
    #[arg(long = "font")]
    fonts: Vec<String>,

    /// Fallback family tried after all --font candidates.
    #[arg(long)]
    fallback: Option<String>,

    /// Font point size.
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    size: u32,

    /// Text color: #RRGGBB, rgb(r,g,b) or a W3C basic name.
    #[arg(long, default_value = "black")]
    color: String,

    /// Text transparency, 0 (opaque) to 127 (invisible).
    #[arg(long, default_value_t = 0)]
    alpha: u8,

    /// Background color.
    #[arg(long, default_value = "white")]
    bg: String,

    /// Background transparency, 0 to 127.
    #[arg(long, default_value_t = 0)]
    bg_alpha: u8,

    /// Line spacing in pixels (0 = measured line height).
    #[arg(long, default_value_t = 0)]
    spacing: u32,

    /// Shadow offset in pixels (0 disables the shadow).
    #[arg(long, default_value_t = 0)]
    shadow_offset: u32,

    /// Shadow color.
    #[arg(long, default_value = "gray")]
    shadow_color: String,

    /// Shadow transparency, 0 to 127.
    #[arg(long, default_value_t = 0)]
    shadow_alpha: u8,

    /// Wrap boundary in pixels (0 = split on line breaks only).
    #[arg(long, default_value_t = 0)]
    width: u32,

    /// Output format: png, jpg or gif.
    #[arg(long, default_value = "png")]
    format: String,

    /// Output file; omit to stream to stdout with a content-type marker.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Font directory to inspect.
    #[arg(long, default_value = "fonts")]
    font_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let text = read_text(&args)?;
    let format: OutputFormat = args.format.parse()?;
    let config = build_config(&args)?;

    let width = (args.width > 0).then_some(args.width);
    let mut raster = AbGlyphRaster::new();
    let canvas = render_text(&config, &mut raster, &text, width)?;

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            export(&canvas, format, ExportTarget::File(path), &ImageCodec)?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            export(&canvas, format, ExportTarget::Stream(&mut lock), &ImageCodec)?;
        }
    }
    Ok(())
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let store = FontDir::new(&args.font_dir)?;
    let names = store.available()?;
    if names.is_empty() {
        eprintln!("no .ttf fonts under {}", store.path().display());
        return Ok(());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn build_config(args: &RenderArgs) -> anyhow::Result<RenderConfig> {
    if let Some(path) = &args.config {
        let f = fs::File::open(path)
            .with_context(|| format!("open render spec '{}'", path.display()))?;
        let spec: RenderSpec =
            serde_json::from_reader(io::BufReader::new(f)).context("parse render spec JSON")?;
        return Ok(spec.into_config()?);
    }

    let store = FontDir::new(&args.font_dir)?;
    let font = store
        .resolve(&args.fonts, args.fallback.as_deref())
        .with_context(|| {
            format!(
                "no usable font among {:?} under '{}'",
                args.fonts,
                store.path().display()
            )
        })?;

    Ok(RenderConfig::builder()
        .font_path(font)
        .font_size(args.size)
        .text_color(color::parse(&args.color))
        .text_alpha(Alpha::new(args.alpha))
        .background(color::parse(&args.bg))
        .background_alpha(Alpha::new(args.bg_alpha))
        .line_spacing(args.spacing)
        .shadow(
            args.shadow_offset,
            color::parse(&args.shadow_color),
            Alpha::new(args.shadow_alpha),
        )
        .build()?)
}

fn read_text(args: &RenderArgs) -> anyhow::Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    let raw = if let Some(path) = &args.in_path {
        fs::read_to_string(path).with_context(|| format!("read text '{}'", path.display()))?
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("read text from stdin")?;
        buf
    };
    // A file's final newline is a terminator, not an empty last row.
    Ok(raw.strip_suffix('\n').unwrap_or(&raw).to_string())
}
