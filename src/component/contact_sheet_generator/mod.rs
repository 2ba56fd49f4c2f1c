//! Contact sheet generation
//!
//! Stages:
//! A. Probe the video (ffprobe)
//! B. Pick sample marks and the requested thumbnail size
//! C. Extract frames in parallel (ffmpeg)
//! D. Resolve page geometry from the options and one measured frame
//! E. Render each page: thumbnail grid, time labels, header

mod dimension_calculator;
mod generation_options;
mod layout_options;
mod main;
mod page_creator;
mod page_filename;
mod page_layout;
mod thumbnail_extractor;

pub use dimension_calculator::ImageDimensionCalculator;
pub use generation_options::GenerationOptions;
pub use layout_options::{LayoutOptions, ResolvedGeometry, ResolvedLayout};
pub use main::{ContactSheetGenerator, header_details};
pub use page_creator::ThumbnailPageCreator;
pub use page_filename::{DEFAULT_PAGE_COUNT_PROPERTY, PageFilenameGenerator};
pub use page_layout::{
    CellPlacement, Grid, HeaderItem, PageLayoutManager, PageLayoutOptions, TextPlacement,
    Thumbnail,
};
pub use thumbnail_extractor::{
    ExtractedFrame, ExtractionRequest, FfmpegFrameExtractor, FrameExtractor, frame_filename,
    scale_filter,
};
