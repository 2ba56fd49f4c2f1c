use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Seconds before the mark for the fast keyframe seek of the two-step seek.
const SEEK_MARGIN: f64 = 2.0;

const DEFAULT_EXTENSION: &str = "png";

/// What to extract: one frame per mark, written to `directory`.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    pub marks: &'a [u32],
    pub directory: &'a Path,
    /// `%s` is the mark in seconds, `%i` the 1-based index, `%b` the source file stem.
    pub filename_template: &'a str,
    /// `WxH`, either side may be `?` to keep the aspect ratio.
    pub size: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFrame {
    pub mark: u32,
    pub path: PathBuf,
}

/// Produces still frames from a media file.
pub trait FrameExtractor {
    /// Frames come back in the order of `request.marks`.
    fn extract(&self, source: &Path, request: &ExtractionRequest<'_>) -> Result<Vec<ExtractedFrame>>;
}

/// [`FrameExtractor`] running one `ffmpeg` process per mark on the rayon pool.
#[derive(Debug, Clone)]
pub struct FfmpegFrameExtractor {
    shutdown_signal: Arc<AtomicBool>,
    show_progress: bool,
}

impl FfmpegFrameExtractor {
    #[must_use]
    pub const fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            shutdown_signal,
            show_progress: true,
        }
    }

    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn progress_bar(&self, len: usize) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }
        let progress_bar = ProgressBar::new(len as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        progress_bar.set_message("Extracting frames...");
        Ok(progress_bar)
    }
}

impl FrameExtractor for FfmpegFrameExtractor {
    fn extract(&self, source: &Path, request: &ExtractionRequest<'_>) -> Result<Vec<ExtractedFrame>> {
        let stem = source
            .file_stem()
            .map_or_else(|| "frame".to_string(), |s| s.to_string_lossy().into_owned());
        let filter = scale_filter(request.size);
        let progress_bar = self.progress_bar(request.marks.len())?;

        let frames = request
            .marks
            .par_iter()
            .enumerate()
            .map(|(index, &mark)| {
                if self.shutdown_signal.load(Ordering::SeqCst) {
                    bail!("Frame extraction cancelled");
                }
                let name = frame_filename(request.filename_template, mark, index + 1, &stem);
                let path = request.directory.join(name);
                let result = extract_frame(source, mark, filter.as_deref(), &path);
                progress_bar.inc(1);
                if let Err(e) = &result {
                    error!("Failed to extract frame at {mark}s: {e:#}");
                }
                result.map(|()| ExtractedFrame { mark, path })
            })
            .collect::<Result<Vec<_>>>();

        match &frames {
            Ok(_) => progress_bar.finish_with_message("Done"),
            Err(_) => progress_bar.abandon_with_message("Failed"),
        }
        frames
    }
}

/// Extract one frame with a two-step seek: a fast seek before `-i` to the nearest
/// keyframe, then an exact decode to the mark.
fn extract_frame(source: &Path, mark: u32, filter: Option<&str>, output: &Path) -> Result<()> {
    let timestamp = f64::from(mark);
    let t0 = (timestamp - SEEK_MARGIN).max(0.0);
    let delta = timestamp - t0;
    debug!("Extracting frame at {timestamp:.2}s, seek={t0:.2}s+{delta:.2}s");

    let mut command = Command::new("ffmpeg");
    command.args(["-hide_banner", "-loglevel", "error"]);
    if t0 > 0.0 {
        command.arg("-ss").arg(format!("{t0:.3}"));
    }
    command.arg("-i").arg(source);
    if delta > 0.0 {
        command.arg("-ss").arg(format!("{delta:.3}"));
    }
    command.args(["-frames:v", "1", "-an", "-sn", "-dn", "-threads", "1"]);
    if let Some(filter) = filter {
        command.arg("-vf").arg(filter);
    }
    command.arg("-y").arg(output);

    let result = command
        .output()
        .with_context(|| format!("Failed to run ffmpeg: {}", source.display()))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        bail!("ffmpeg failed to extract frame at {mark}s: {}", stderr.trim());
    }
    if !output.exists() {
        bail!("Frame was not written: {}", output.display());
    }
    Ok(())
}

/// Fill in a frame filename template, adding `.png` when it has no extension.
#[must_use]
pub fn frame_filename(template: &str, mark: u32, index: usize, stem: &str) -> String {
    let name = template
        .replace("%s", &mark.to_string())
        .replace("%i", &index.to_string())
        .replace("%b", stem);
    if Path::new(&name).extension().is_some() {
        name
    } else {
        format!("{name}.{DEFAULT_EXTENSION}")
    }
}

/// ffmpeg `scale` filter for a `WxH` size, `None` when neither side is constrained.
#[must_use]
pub fn scale_filter(size: &str) -> Option<String> {
    let (width, height) = size.split_once('x')?;
    let axis = |value: &str| match value.trim() {
        "?" | "" => "-2".to_string(),
        other => other.to_string(),
    };
    let (width, height) = (axis(width), axis(height));
    if width == "-2" && height == "-2" {
        return None;
    }
    Some(format!("scale={width}:{height}"))
}
