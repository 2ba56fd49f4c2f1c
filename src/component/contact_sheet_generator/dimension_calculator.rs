use super::generation_options::GenerationOptions;
use crate::config::defaults::{DEFAULT_THUMBS_COLS, DEFAULT_THUMBS_ROWS, PREFERRED_IMAGE_SIZES};
use crate::config::{RawOptions, defined};
use crate::error::{LayoutError, LayoutResult};

/// Page geometry resolved from declared options and, once available, the pixel size of
/// one extracted thumbnail.
///
/// Each axis is an ordered chain: layout options, then generation options, then a value
/// computed from the measured thumbnail, then the default.
#[derive(Debug, Clone)]
pub struct ImageDimensionCalculator {
    layout_rows: Option<u32>,
    layout_cols: Option<u32>,
    generation_rows: Option<u32>,
    generation_cols: Option<u32>,
    image_width_defined: Option<u32>,
    image_height_defined: Option<u32>,
    prefer_known_sizes: bool,
    header_height: Option<u32>,
    thumbnail: Option<(u32, u32)>,
}

impl ImageDimensionCalculator {
    #[must_use]
    pub fn new(layout: &RawOptions, generation: &GenerationOptions, header_height: u32) -> Self {
        Self {
            layout_rows: defined(layout.thumbs_rows),
            layout_cols: defined(layout.thumbs_cols),
            generation_rows: generation.thumbs_rows_defined(),
            generation_cols: generation.thumbs_cols_defined(),
            image_width_defined: defined(layout.image_width).or_else(|| generation.image_width()),
            image_height_defined: defined(layout.image_height)
                .or_else(|| generation.image_height()),
            prefer_known_sizes: layout.prefer_known_sizes.unwrap_or(true),
            header_height: defined(Some(header_height)),
            thumbnail: None,
        }
    }

    /// Record the natural size of an extracted thumbnail. Empty sizes are ignored.
    pub fn evaluate_thumbnail(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.thumbnail = Some((width, height));
        }
    }

    fn thumbnail_width(&self) -> Option<u32> {
        self.thumbnail.map(|(width, _)| width)
    }

    fn thumbnail_height(&self) -> Option<u32> {
        self.thumbnail.map(|(_, height)| height)
    }

    #[must_use]
    pub fn is_page_size_known_and_valid(&self) -> bool {
        self.image_width_or_none().is_some() && self.image_height_or_none().is_some()
    }

    pub fn image_width(&self) -> LayoutResult<u32> {
        self.image_width_or_none()
            .ok_or(LayoutError::IndeterminateWidth)
    }

    pub fn image_height(&self) -> LayoutResult<u32> {
        self.image_height_or_none()
            .ok_or(LayoutError::IndeterminateHeight)
    }

    fn image_width_or_none(&self) -> Option<u32> {
        let computed = self.image_width_computed();
        match (self.image_width_defined, computed) {
            (Some(declared), Some(computed)) if computed > declared => None,
            (declared, computed) => declared.or(computed),
        }
    }

    fn image_width_computed(&self) -> Option<u32> {
        self.thumbnail_width()
            .map(|width| self.thumbs_cols() * width)
    }

    fn image_height_or_none(&self) -> Option<u32> {
        let computed = self.image_height_computed();
        match (self.image_height_defined, computed) {
            (Some(declared), Some(computed)) if computed > declared => None,
            (Some(declared), _) => Some(declared),
            (None, computed) => self.preferred_height(computed).or(computed),
        }
    }

    fn image_height_computed(&self) -> Option<u32> {
        let thumbnail_height = self.thumbnail_height()?;
        let header_height = self.header_height?;
        Some(self.thumbs_rows() * thumbnail_height + header_height)
    }

    /// Round a computed height up to the first standard size of the same width.
    fn preferred_height(&self, computed: Option<u32>) -> Option<u32> {
        if !self.prefer_known_sizes {
            return None;
        }
        let computed = computed?;
        let width = self.image_width_or_none()?;
        PREFERRED_IMAGE_SIZES
            .iter()
            .find(|&&(preferred_width, preferred_height)| {
                preferred_width == width && preferred_height > computed
            })
            .map(|&(_, height)| height)
    }

    #[must_use]
    pub fn thumbs_rows(&self) -> u32 {
        self.layout_rows
            .or(self.generation_rows)
            .or_else(|| self.thumbs_rows_computed())
            .unwrap_or(DEFAULT_THUMBS_ROWS)
    }

    fn thumbs_rows_computed(&self) -> Option<u32> {
        let declared = self.image_height_defined?;
        let thumbnail_height = self.thumbnail_height()?;
        let header_height = self.header_height?;
        defined(Some(declared.saturating_sub(header_height) / thumbnail_height))
    }

    #[must_use]
    pub fn thumbs_cols(&self) -> u32 {
        self.layout_cols
            .or(self.generation_cols)
            .or_else(|| self.thumbs_cols_computed())
            .unwrap_or(DEFAULT_THUMBS_COLS)
    }

    fn thumbs_cols_computed(&self) -> Option<u32> {
        let declared = self.image_width_defined?;
        let thumbnail_width = self.thumbnail_width()?;
        defined(Some(declared / thumbnail_width))
    }

    #[must_use]
    pub fn thumbs_per_page(&self) -> u32 {
        self.thumbs_rows() * self.thumbs_cols()
    }
}
