//! End-to-end tests
//!
//! Runs the whole generator with a scripted prober and an extractor that writes solid
//! colour frames, so no ffmpeg install is needed.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use image::{Rgba, RgbaImage};
use video_contact_sheet::component::contact_sheet_generator::{
    ExtractedFrame, ExtractionRequest, FrameExtractor, frame_filename,
};
use video_contact_sheet::config::RawOptions;
use video_contact_sheet::tools::{MediaMetadata, MediaProber};
use video_contact_sheet::{ContactSheetGenerator, LayoutError};

const FRAME_WIDTH: u32 = 64;
const FRAME_HEIGHT: u32 = 36;
const HEADER_HEIGHT: u32 = 110;

struct FakeProber {
    duration: f64,
}

impl MediaProber for FakeProber {
    fn probe(&self, _path: &Path, _video_stream: Option<usize>) -> Result<MediaMetadata> {
        Ok(MediaMetadata {
            start_time: Some(0.0),
            duration: Some(self.duration),
            format_name: Some("mov,mp4,m4a,3gp,3g2,mj2".to_string()),
            video_stream: 0,
            width: Some(320),
            height: Some(180),
            display_aspect_ratio: Some("16:9".to_string()),
        })
    }
}

struct FailingProber;

impl MediaProber for FailingProber {
    fn probe(&self, _path: &Path, _video_stream: Option<usize>) -> Result<MediaMetadata> {
        bail!("No video streams found")
    }
}

#[derive(Default, Clone)]
struct SolidFrameExtractor {
    sizes: Arc<Mutex<Vec<String>>>,
}

impl FrameExtractor for SolidFrameExtractor {
    fn extract(&self, source: &Path, request: &ExtractionRequest<'_>) -> Result<Vec<ExtractedFrame>> {
        self.sizes.lock().unwrap().push(request.size.to_string());

        let stem = source.file_stem().unwrap().to_string_lossy();
        request
            .marks
            .iter()
            .enumerate()
            .map(|(index, &mark)| {
                let name = frame_filename(request.filename_template, mark, index + 1, &stem);
                let path = request.directory.join(name);
                RgbaImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, Rgba([200, 30, 30, 255]))
                    .save(&path)?;
                Ok(ExtractedFrame { mark, path })
            })
            .collect()
    }
}

fn generator(duration: f64) -> ContactSheetGenerator<FakeProber, SolidFrameExtractor> {
    generator_with(duration, SolidFrameExtractor::default())
}

fn generator_with(
    duration: f64,
    extractor: SolidFrameExtractor,
) -> ContactSheetGenerator<FakeProber, SolidFrameExtractor> {
    ContactSheetGenerator::new("/videos/clip.mp4", FakeProber { duration }, extractor)
}

/// Test 1: pages are split by rows x cols and numbered
#[test]
fn test_multi_page_sheet() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("sheet.png");
    let options = RawOptions {
        thumbs_count: Some(10),
        thumbs_rows: Some(2),
        thumbs_cols: Some(3),
        ..RawOptions::default()
    };

    let extractor = SolidFrameExtractor::default();
    let pages = generator_with(20.5, extractor.clone())
        .generate(output.to_str().unwrap(), &options)
        .unwrap();

    assert_eq!(
        pages,
        [temp.path().join("sheet_1.png"), temp.path().join("sheet_2.png")]
    );
    for page in &pages {
        let dimensions = image::image_dimensions(page).unwrap();
        assert_eq!(
            dimensions,
            (3 * FRAME_WIDTH, 2 * FRAME_HEIGHT + HEADER_HEIGHT)
        );
    }
    assert_eq!(*extractor.sizes.lock().unwrap(), ["240x?"]);
}

/// Test 2: a single page keeps the literal output name
#[test]
fn test_single_page_sheet() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("single.jpg");
    let options = RawOptions {
        thumbs_count: Some(4),
        ..RawOptions::default()
    };

    let pages = generator(20.5)
        .generate(output.to_str().unwrap(), &options)
        .unwrap();

    assert_eq!(pages, [output.clone()]);
    let (width, height) = image::image_dimensions(&output).unwrap();
    assert_eq!(width, 8 * FRAME_WIDTH);
    assert_eq!(height, 7 * FRAME_HEIGHT + HEADER_HEIGHT);
}

/// Test 3: a templated output name is filled in for every page
#[test]
fn test_templated_output_name() {
    let temp = tempfile::tempdir().unwrap();
    let template = format!("{}/${{name}}-p${{pageNumber}}.png", temp.path().display());
    let options = RawOptions {
        thumbs_interval: Some(1.0),
        thumbs_rows: Some(1),
        thumbs_cols: Some(4),
        ..RawOptions::default()
    };

    let pages = generator(6.0).generate(&template, &options).unwrap();

    assert_eq!(
        pages,
        [
            temp.path().join("clip.mp4-p1.png"),
            temp.path().join("clip.mp4-p2.png")
        ]
    );
    assert!(pages.iter().all(|page| page.exists()));
}

/// Test 4: frames go to the configured thumbnail directory
#[test]
fn test_explicit_thumb_directory() {
    let temp = tempfile::tempdir().unwrap();
    let thumbs = temp.path().join("thumbs");
    let options = RawOptions {
        thumbs_count: Some(3),
        thumb_directory: Some(thumbs.clone()),
        thumb_filename: Some("%b_%i".to_string()),
        ..RawOptions::default()
    };

    let output = temp.path().join("sheet.png");
    generator(20.5)
        .generate(output.to_str().unwrap(), &options)
        .unwrap();

    assert!(thumbs.join("clip_1.png").exists());
    assert!(thumbs.join("clip_3.png").exists());
    assert!(output.exists());
}

/// Test 5: nothing to extract from a very short video
#[test]
fn test_no_frames_extracted() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("sheet.png");

    let err = generator(0.5)
        .generate(output.to_str().unwrap(), &RawOptions::default())
        .unwrap_err();

    assert_eq!(err.to_string(), "no thumbnails were extracted");
    assert!(!output.exists());
}

/// Test 6: conflicting options fail before anything is extracted
#[test]
fn test_conflicting_options() {
    let options = RawOptions {
        thumbs_count: Some(10),
        thumbs_interval: Some(2.0),
        ..RawOptions::default()
    };

    let err = generator(20.5).generate("unused.png", &options).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LayoutError>(),
        Some(LayoutError::ConflictingSampleOptions)
    ));
}

/// Test 7: probe failures are reported with the source path
#[test]
fn test_probe_failure() {
    let generator = ContactSheetGenerator::new(
        "/videos/audio_only.m4a",
        FailingProber,
        SolidFrameExtractor::default(),
    );

    let err = generator
        .generate("unused.png", &RawOptions::default())
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to read video info: /videos/audio_only.m4a"
    );
    assert_eq!(err.root_cause().to_string(), "No video streams found");
}
