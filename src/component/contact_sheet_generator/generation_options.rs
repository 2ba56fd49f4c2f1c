use crate::config::defaults::{
    DEFAULT_THUMBS_COLS, DEFAULT_THUMBS_FILENAME, DEFAULT_THUMBS_ROWS, DEFAULT_THUMBS_WIDTH,
};
use crate::config::{RawOptions, defined};
use crate::error::{LayoutError, LayoutResult};
use crate::tools::{MediaMetadata, calculate_by_count, calculate_by_interval, ensure_directory_exists};
use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug)]
enum ThumbDirectory {
    Explicit(PathBuf),
    Temporary(TempDir),
}

impl ThumbDirectory {
    fn path(&self) -> &Path {
        match self {
            Self::Explicit(path) => path,
            Self::Temporary(dir) => dir.path(),
        }
    }
}

/// Options that drive frame extraction: which marks to sample, how large each thumbnail
/// should be and where the extracted files go.
///
/// `*_defined` accessors report only what the caller asked for; `*_or_default` fill in the
/// standard grid so the sample count can be estimated before any frame has been measured.
#[derive(Debug)]
pub struct GenerationOptions {
    metadata: MediaMetadata,
    options: RawOptions,
    samples: Vec<u32>,
    thumb_directory: Option<ThumbDirectory>,
}

impl GenerationOptions {
    pub fn new(metadata: MediaMetadata, options: RawOptions) -> LayoutResult<Self> {
        if defined(options.thumbs_count).is_some() && options.thumbs_interval_defined().is_some() {
            return Err(LayoutError::ConflictingSampleOptions);
        }

        let mut generation = Self {
            metadata,
            options,
            samples: Vec::new(),
            thumb_directory: None,
        };
        generation.samples = generation.samples_from_options();
        debug!(
            "Selected {} sample marks: {:?}",
            generation.samples.len(),
            generation.samples
        );
        Ok(generation)
    }

    fn samples_from_options(&self) -> Vec<u32> {
        if let Some(samples) = &self.options.thumbs_samples {
            return samples.clone();
        }
        if let Some(interval) = self.options.thumbs_interval_defined() {
            return calculate_by_interval(self.metadata.duration, interval);
        }
        let count = defined(self.options.thumbs_count)
            .unwrap_or_else(|| self.thumbs_rows_or_default() * self.thumbs_cols_or_default());
        calculate_by_count(self.metadata.duration, count)
    }

    #[must_use]
    pub fn sample_positions(&self) -> &[u32] {
        &self.samples
    }

    #[must_use]
    pub fn thumbs_count(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn thumbs_rows_defined(&self) -> Option<u32> {
        defined(self.options.thumbs_rows)
    }

    #[must_use]
    pub fn thumbs_rows_or_default(&self) -> u32 {
        self.thumbs_rows_defined().unwrap_or(DEFAULT_THUMBS_ROWS)
    }

    #[must_use]
    pub fn thumbs_cols_defined(&self) -> Option<u32> {
        defined(self.options.thumbs_cols)
    }

    /// Declared columns, or as many declared thumbnail widths as fit in the declared page width.
    #[must_use]
    pub fn thumbs_cols_computed(&self) -> Option<u32> {
        self.thumbs_cols_defined().or_else(|| {
            let image_width = defined(self.options.image_width)?;
            let thumbs_width = defined(self.options.thumbs_width)?;
            defined(Some(image_width / thumbs_width))
        })
    }

    #[must_use]
    pub fn thumbs_cols_or_default(&self) -> u32 {
        self.thumbs_cols_computed().unwrap_or(DEFAULT_THUMBS_COLS)
    }

    /// `None` when only the height was given, leaving the width to the aspect ratio.
    #[must_use]
    pub fn thumbs_width(&self) -> Option<u32> {
        if let Some(width) = defined(self.options.thumbs_width) {
            return Some(width);
        }
        if defined(self.options.thumbs_height).is_some() {
            return None;
        }
        match defined(self.options.image_width) {
            Some(image_width) => defined(Some(image_width / self.thumbs_cols_or_default())),
            None => Some(DEFAULT_THUMBS_WIDTH),
        }
    }

    #[must_use]
    pub fn thumbs_height(&self) -> Option<u32> {
        defined(self.options.thumbs_height)
    }

    /// Requested thumbnail size as `WxH`, with `?` for an axis left to the aspect ratio.
    #[must_use]
    pub fn thumb_size(&self) -> String {
        let axis = |value: Option<u32>| value.map_or_else(|| "?".to_string(), |v| v.to_string());
        format!("{}x{}", axis(self.thumbs_width()), axis(self.thumbs_height()))
    }

    #[must_use]
    pub fn thumb_filename(&self) -> &str {
        self.options
            .thumb_filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_THUMBS_FILENAME)
    }

    #[must_use]
    pub fn image_width(&self) -> Option<u32> {
        defined(self.options.image_width)
    }

    #[must_use]
    pub fn image_height(&self) -> Option<u32> {
        defined(self.options.image_height)
    }

    /// Create the thumbnail directory, or a temporary one when no path was configured.
    ///
    /// A configured path is checked again on every call; a temporary directory is created
    /// once and lives as long as these options.
    pub fn make_thumb_directory(&mut self) -> LayoutResult<&Path> {
        if let Some(path) = &self.options.thumb_directory {
            ensure_directory_exists(path)?;
            self.thumb_directory = Some(ThumbDirectory::Explicit(path.clone()));
        } else if self.thumb_directory.is_none() {
            let dir = tempfile::Builder::new().prefix("contact-sheet-").tempdir()?;
            debug!("Created temporary thumbnail directory {}", dir.path().display());
            self.thumb_directory = Some(ThumbDirectory::Temporary(dir));
        }
        self.thumb_directory()
    }

    pub fn thumb_directory(&self) -> LayoutResult<&Path> {
        self.thumb_directory
            .as_ref()
            .map(ThumbDirectory::path)
            .ok_or(LayoutError::NotInitialised {
                what: "thumbDirectory",
                call: "make_thumb_directory()",
            })
    }

    #[must_use]
    pub fn metadata(&self) -> &MediaMetadata {
        &self.metadata
    }
}
