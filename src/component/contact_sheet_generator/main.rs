use super::generation_options::GenerationOptions;
use super::layout_options::LayoutOptions;
use super::page_creator::ThumbnailPageCreator;
use super::page_filename::PageFilenameGenerator;
use super::thumbnail_extractor::{ExtractionRequest, FfmpegFrameExtractor, FrameExtractor};
use crate::config::RawOptions;
use crate::tools::{
    FfprobeProber, MediaMetadata, MediaProber, TemplateContext, convert_time_to_readable,
};
use anyhow::{Context, Result, bail};
use image::DynamicImage;
use log::{debug, info};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

const PAGE_COUNT_PROPERTY: &str = "numberOfPages";

/// Contact sheet generator for one source file.
///
/// Pipeline:
/// A. Probe the source
/// B. Resolve sample marks and thumbnail size
/// C. Extract one frame per mark
/// D. Resolve page geometry using the first frame's size
/// E. Render and save each page
pub struct ContactSheetGenerator<P = FfprobeProber, E = FfmpegFrameExtractor> {
    source: PathBuf,
    prober: P,
    extractor: E,
}

impl ContactSheetGenerator {
    /// Generator backed by the `ffprobe` and `ffmpeg` executables.
    #[must_use]
    pub fn with_ffmpeg(source: impl Into<PathBuf>, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self::new(
            source,
            FfprobeProber,
            FfmpegFrameExtractor::new(shutdown_signal),
        )
    }
}

impl<P: MediaProber, E: FrameExtractor> ContactSheetGenerator<P, E> {
    pub fn new(source: impl Into<PathBuf>, prober: P, extractor: E) -> Self {
        Self {
            source: source.into(),
            prober,
            extractor,
        }
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Generate every page and return the written file names in page order.
    ///
    /// `output` is either a literal file name, numbered `_<page>` when there is more than
    /// one page, or a `${...}` template that may use `pageNumber`.
    pub fn generate(&self, output: &str, options: &RawOptions) -> Result<Vec<PathBuf>> {
        info!("Generating contact sheet for {}", self.source.display());

        // A
        let metadata = self
            .prober
            .probe(&self.source, options.video_stream)
            .with_context(|| format!("Failed to read video info: {}", self.source.display()))?;

        // B
        let mut generation = GenerationOptions::new(metadata, options.clone())?;
        let directory = generation.make_thumb_directory()?.to_path_buf();
        let thumb_size = generation.thumb_size();

        // C
        let request = ExtractionRequest {
            marks: generation.sample_positions(),
            directory: &directory,
            filename_template: generation.thumb_filename(),
            size: &thumb_size,
        };
        let frames = self.extractor.extract(&self.source, &request)?;
        let Some(first) = frames.first() else {
            bail!("no thumbnails were extracted");
        };
        debug!("Extracted {} frames into {}", frames.len(), directory.display());

        // D
        let sample_size = image::image_dimensions(&first.path)
            .with_context(|| format!("Failed to read thumbnail: {}", first.path.display()))?;
        let mut layout = LayoutOptions::new(options.clone(), &generation);
        let resolved = layout.init(Some(sample_size))?;
        let per_page = resolved.geometry.thumbs_per_page.max(1) as usize;
        let number_of_pages = u32::try_from(frames.len().div_ceil(per_page))
            .context("Too many pages")?;

        // E
        let source_name = self.source.to_string_lossy();
        let details = header_details(&source_name, generation.metadata(), number_of_pages);
        let filenames = PageFilenameGenerator::new(output, details.clone(), PAGE_COUNT_PROPERTY)?;
        let creator = ThumbnailPageCreator::new(resolved, &details);

        let mut written = Vec::with_capacity(number_of_pages as usize);
        for (page, chunk) in (1..).zip(frames.chunks(per_page)) {
            let filename = PathBuf::from(filenames.filename(page));
            let image = creator.create_page(chunk, page)?;
            DynamicImage::ImageRgba8(image)
                .into_rgb8()
                .save(&filename)
                .with_context(|| format!("Failed to save page: {}", filename.display()))?;
            info!("Wrote page {page}/{number_of_pages}: {}", filename.display());
            written.push(filename);
        }

        Ok(written)
    }
}

/// Values available to header templates and output file name templates.
#[must_use]
pub fn header_details(source: &str, metadata: &MediaMetadata, number_of_pages: u32) -> TemplateContext {
    let time = |value: Option<f64>, dps: usize| {
        value.map_or(Value::Null, |t| Value::from(convert_time_to_readable(t, dps)))
    };
    let name = source.rsplit(['/', '\\']).next().unwrap_or(source);

    let mut details = TemplateContext::new();
    details.insert("name".to_string(), Value::from(name));
    details.insert("filename".to_string(), Value::from(source));
    details.insert("durationFractional".to_string(), time(metadata.duration, 3));
    details.insert("startTimeFractional".to_string(), time(metadata.start_time, 3));
    details.insert("duration".to_string(), time(metadata.duration, 0));
    details.insert("startTime".to_string(), time(metadata.start_time, 0));
    details.insert(PAGE_COUNT_PROPERTY.to_string(), Value::from(number_of_pages));
    details.insert(
        "formatName".to_string(),
        metadata.format_name.clone().map_or(Value::Null, Value::from),
    );
    details
}
