//! Grid Atlas CLI
//!
//! Pack square images into a grid texture atlas with an almanac.

use clap::{Parser, ValueEnum};
use grid_atlas::{make_atlas, AtlasConfig, CanvasColor, ResizeFilter};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "grid-atlas")]
#[command(author, version, about = "Pack square images into a grid texture atlas", long_about = None)]
struct Cli {
    /// Output atlas image (format from extension, PNG if none)
    destination: PathBuf,

    /// Edge length of the square atlas in pixels
    target_size: u32,

    /// Square input images, in tile order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Resampling filter used to scale tiles
    #[arg(long, value_enum, default_value = "nearest")]
    filter: FilterArg,

    /// Canvas pixel format (defaults to the first input's format)
    #[arg(long, value_enum)]
    color: Option<ColorArg>,

    /// Also write <destination>.almanac.json
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FilterArg {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<FilterArg> for ResizeFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Nearest => ResizeFilter::Nearest,
            FilterArg::Triangle => ResizeFilter::Triangle,
            FilterArg::CatmullRom => ResizeFilter::CatmullRom,
            FilterArg::Gaussian => ResizeFilter::Gaussian,
            FilterArg::Lanczos3 => ResizeFilter::Lanczos3,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ColorArg {
    L8,
    La8,
    Rgb8,
    Rgba8,
    L16,
    La16,
    Rgb16,
    Rgba16,
}

impl From<ColorArg> for CanvasColor {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::L8 => CanvasColor::L8,
            ColorArg::La8 => CanvasColor::La8,
            ColorArg::Rgb8 => CanvasColor::Rgb8,
            ColorArg::Rgba8 => CanvasColor::Rgba8,
            ColorArg::L16 => CanvasColor::L16,
            ColorArg::La16 => CanvasColor::La16,
            ColorArg::Rgb16 => CanvasColor::Rgb16,
            ColorArg::Rgba16 => CanvasColor::Rgba16,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", error_message(e.as_ref()));
            ExitCode::FAILURE
        }
    }
}

/// Display text of an error followed by its sources.
fn error_message(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = AtlasConfig::new(cli.target_size)
        .with_filter(cli.filter.into())
        .with_json_manifest(cli.json);
    if let Some(color) = cli.color {
        config = config.with_color(color.into());
    }

    let files = make_atlas(&cli.destination, &cli.inputs, &config)?;

    println!("Exported atlas to {:?}", files.image);
    println!("  Almanac: {:?}", files.almanac);
    if let Some(json) = files.json {
        println!("  JSON: {:?}", json);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_atlas::AtlasError;

    #[test]
    fn test_error_message_uses_display_text() {
        let err: Box<dyn Error> = Box::new(AtlasError::NotSquare {
            path: PathBuf::from("w.png"),
            width: 8,
            height: 4,
        });
        assert_eq!(error_message(err.as_ref()), "Not square: w.png (8x4)");
    }

    #[test]
    fn test_error_message_skips_repeated_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png not found");
        let err: Box<dyn Error> = Box::new(AtlasError::Io(io));
        assert_eq!(
            error_message(err.as_ref()),
            "I/O error: missing.png not found"
        );
    }
}
