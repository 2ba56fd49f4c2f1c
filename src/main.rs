use anyhow::Result;
use clap::Parser;
use console::style;
use dialoguer::Input;
use log::{error, info};
use std::path::{Path, PathBuf};
use video_contact_sheet::ContactSheetGenerator;
use video_contact_sheet::config::load_options_or_default;
use video_contact_sheet::init;
use video_contact_sheet::signal::setup_shutdown_signal;
use video_contact_sheet::tools::validate_file_exists;

/// Build a contact sheet from a video file.
///
/// A missing source or output is asked for interactively.
#[derive(Parser, Debug)]
#[command(name = "video_contact_sheet", version)]
struct Cli {
    /// Source video file.
    source: Option<String>,

    /// Output image; `${...}` templates may use `pageNumber`.
    output: Option<String>,

    /// JSON options file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init::init();
    let shutdown_signal = setup_shutdown_signal()?;

    let source = match cli.source {
        Some(source) => source,
        None => prompt_source()?,
    };
    validate_file_exists(Path::new(&source))?;

    let output = match cli.output {
        Some(output) => output,
        None => prompt_output(&source)?,
    };
    let options = load_options_or_default(cli.config.as_deref())?;

    println!("{}", style("=== Video contact sheet ===").cyan().bold());
    println!("  {} {}", style("Source:").dim(), source);

    let generator = ContactSheetGenerator::with_ffmpeg(&source, shutdown_signal);
    match generator.generate(&output, &options) {
        Ok(pages) => {
            for page in &pages {
                println!("  {} {}", style("✓").green(), page.display());
            }
            info!("Contact sheet complete: {} page(s)", pages.len());
            Ok(())
        }
        Err(e) => {
            error!("Contact sheet failed: {e:#}");
            eprintln!("{} {e:#}", style("Error:").red().bold());
            Err(e)
        }
    }
}

fn prompt_source() -> Result<String> {
    let path: String = Input::new()
        .with_prompt("Video file")
        .interact_text()?;
    Ok(path.trim().to_string())
}

fn prompt_output(source: &str) -> Result<String> {
    let stem = Path::new(source)
        .file_stem()
        .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().into_owned());
    let path: String = Input::new()
        .with_prompt("Output file")
        .default(format!("{stem}_contact_sheet.jpg"))
        .interact_text()?;
    Ok(path.trim().to_string())
}
