use super::dimension_calculator::ImageDimensionCalculator;
use super::generation_options::GenerationOptions;
use super::page_layout::{PageLayoutManager, PageLayoutOptions};
use crate::config::defaults::{
    DEFAULT_BACKGROUND_COLOUR, DEFAULT_MARGIN, default_header_rows, default_time_font,
    default_title_font,
};
use crate::config::{RawOptions, defined};
use crate::error::{LayoutError, LayoutResult};
use crate::tools::{FontLayer, FontLoader, TIME_FONT_NAME, TITLE_FONT_NAME, parse_colour};
use image::Rgba;
use log::debug;

const INIT_CALL: &str = "LayoutOptions::init";

/// Page geometry after layout resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGeometry {
    pub thumbs_count: usize,
    pub rows: u32,
    pub cols: u32,
    pub thumbs_per_page: u32,
    pub thumbs_width: Option<u32>,
    pub thumbs_height: Option<u32>,
    pub page_width: u32,
    pub page_height: u32,
    pub header_height: u32,
    pub background_colour: String,
    pub background: Rgba<u8>,
    pub margin: u32,
}

/// Everything [`LayoutOptions::init`] produces.
#[derive(Debug)]
pub struct ResolvedLayout {
    pub fonts: FontLoader,
    pub page_layout: PageLayoutManager,
    pub dimensions: ImageDimensionCalculator,
    pub geometry: ResolvedGeometry,
}

/// Options that decide how the extracted thumbnails are laid out on pages.
///
/// Construction only stores the inputs. Fonts and geometry become available after
/// [`Self::init`], which may need the size of one extracted thumbnail.
#[derive(Debug)]
pub struct LayoutOptions<'g> {
    options: RawOptions,
    generation: &'g GenerationOptions,
    resolved: Option<ResolvedLayout>,
}

impl<'g> LayoutOptions<'g> {
    #[must_use]
    pub fn new(options: RawOptions, generation: &'g GenerationOptions) -> Self {
        Self {
            options,
            generation,
            resolved: None,
        }
    }

    /// Load fonts, size the header and resolve the page geometry.
    ///
    /// `sample_size` is the natural `(width, height)` of one extracted thumbnail; it is
    /// only consulted when the options alone do not fix the page size.
    pub fn init(&mut self, sample_size: Option<(u32, u32)>) -> LayoutResult<&ResolvedLayout> {
        let title_font = self.options.title_font.clone().unwrap_or_else(default_title_font);
        let time_font = self.options.time_font.clone().unwrap_or_else(default_time_font);
        let mut fonts =
            FontLoader::new([(TITLE_FONT_NAME, &title_font), (TIME_FONT_NAME, &time_font)])?;
        fonts.load_all()?;

        let page_layout = PageLayoutManager::new(
            PageLayoutOptions {
                margin: self.margin(),
                header_height: self.options.header_height,
                header_rows: self
                    .options
                    .header_rows
                    .clone()
                    .unwrap_or_else(default_header_rows),
            },
            &fonts,
        )?;
        let header_height = page_layout.header_height()?;

        let mut dimensions =
            ImageDimensionCalculator::new(&self.options, self.generation, header_height);
        if !dimensions.is_page_size_known_and_valid() {
            if let Some((width, height)) = sample_size {
                dimensions.evaluate_thumbnail(width, height);
            }
            if !dimensions.is_page_size_known_and_valid() {
                return Err(LayoutError::IndeterminatePageSize);
            }
        }

        let background_colour = self.background_colour().to_string();
        let geometry = ResolvedGeometry {
            thumbs_count: self.generation.thumbs_count(),
            rows: dimensions.thumbs_rows(),
            cols: dimensions.thumbs_cols(),
            thumbs_per_page: dimensions.thumbs_per_page(),
            thumbs_width: self.generation.thumbs_width(),
            thumbs_height: self.generation.thumbs_height(),
            page_width: dimensions.image_width()?,
            page_height: dimensions.image_height()?,
            header_height,
            background: parse_colour(&background_colour)?,
            background_colour,
            margin: self.margin(),
        };
        debug!("Resolved page geometry: {geometry:?}");

        Ok(self.resolved.insert(ResolvedLayout {
            fonts,
            page_layout,
            dimensions,
            geometry,
        }))
    }

    pub fn resolved(&self) -> LayoutResult<&ResolvedLayout> {
        self.resolved.as_ref().ok_or(LayoutError::NotInitialised {
            what: "layout",
            call: INIT_CALL,
        })
    }

    pub fn geometry(&self) -> LayoutResult<&ResolvedGeometry> {
        self.resolved().map(|resolved| &resolved.geometry).map_err(|_| {
            LayoutError::NotInitialised {
                what: "image dimensions",
                call: INIT_CALL,
            }
        })
    }

    pub fn page_layout_manager(&self) -> LayoutResult<&PageLayoutManager> {
        self.resolved().map(|resolved| &resolved.page_layout)
    }

    pub fn title_font(&self) -> LayoutResult<Vec<FontLayer>> {
        self.font(TITLE_FONT_NAME)
    }

    pub fn time_font(&self) -> LayoutResult<Vec<FontLayer>> {
        self.font(TIME_FONT_NAME)
    }

    fn font(&self, key: &str) -> LayoutResult<Vec<FontLayer>> {
        let resolved = self.resolved().map_err(|_| LayoutError::NotInitialised {
            what: "fonts",
            call: INIT_CALL,
        })?;
        resolved
            .fonts
            .fonts_by_key(key)?
            .ok_or(LayoutError::FontsNotLoaded)
    }

    pub fn thumbs_rows(&self) -> LayoutResult<u32> {
        Ok(self.geometry()?.rows)
    }

    pub fn thumbs_cols(&self) -> LayoutResult<u32> {
        Ok(self.geometry()?.cols)
    }

    pub fn image_width(&self) -> LayoutResult<u32> {
        Ok(self.geometry()?.page_width)
    }

    pub fn image_height(&self) -> LayoutResult<u32> {
        Ok(self.geometry()?.page_height)
    }

    /// `backgroundColour`, then `backgroundColor`, then white.
    #[must_use]
    pub fn background_colour(&self) -> &str {
        self.options
            .background_colour_defined()
            .unwrap_or(DEFAULT_BACKGROUND_COLOUR)
    }

    #[must_use]
    pub fn margin(&self) -> u32 {
        defined(self.options.margin).unwrap_or(DEFAULT_MARGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontInput;
    use crate::tools::MediaMetadata;

    fn generation(options: &RawOptions) -> GenerationOptions {
        let metadata = MediaMetadata {
            duration: Some(72.99933),
            ..MediaMetadata::default()
        };
        GenerationOptions::new(metadata, options.clone()).unwrap()
    }

    #[test]
    fn test_accessors_before_init() {
        let options = RawOptions::default();
        let generation = generation(&options);
        let layout = LayoutOptions::new(options, &generation);

        assert_eq!(
            layout.image_width().unwrap_err().to_string(),
            "Cannot use image dimensions before calling LayoutOptions::init"
        );
        assert_eq!(
            layout.title_font().unwrap_err().to_string(),
            "Cannot use fonts before calling LayoutOptions::init"
        );
        assert!(layout.page_layout_manager().is_err());
    }

    #[test]
    fn test_init_with_sample() {
        let options = RawOptions::default();
        let generation = generation(&options);
        let mut layout = LayoutOptions::new(options, &generation);

        let geometry = layout.init(Some((240, 135))).unwrap().geometry.clone();
        assert_eq!(geometry.page_width, 1920);
        assert_eq!(geometry.page_height, 1080);
        assert_eq!(geometry.header_height, 110);
        assert_eq!((geometry.rows, geometry.cols), (7, 8));
        assert_eq!(geometry.thumbs_per_page, 56);
        assert_eq!(geometry.thumbs_count, 56);
        assert_eq!(geometry.thumbs_width, Some(240));
        assert_eq!(geometry.background, Rgba([255, 255, 255, 255]));
        assert_eq!(geometry.margin, 1);

        assert_eq!(layout.thumbs_rows().unwrap(), 7);
        assert_eq!(layout.time_font().unwrap().len(), 2);
    }

    #[test]
    fn test_init_without_sample_fails() {
        let options = RawOptions::default();
        let generation = generation(&options);
        let mut layout = LayoutOptions::new(options, &generation);

        let err = layout.init(None).unwrap_err();
        assert_eq!(err.to_string(), "Cannot determine page dimensions");
    }

    #[test]
    fn test_declared_page_ignores_sample() {
        let options = RawOptions {
            image_width: Some(1280),
            image_height: Some(720),
            thumbs_rows: Some(3),
            thumbs_cols: Some(4),
            ..RawOptions::default()
        };
        let generation = generation(&options);
        let mut layout = LayoutOptions::new(options, &generation);

        let geometry = &layout.init(Some((2000, 2000))).unwrap().geometry;
        assert_eq!((geometry.page_width, geometry.page_height), (1280, 720));
        assert_eq!(geometry.thumbs_per_page, 12);
    }

    #[test]
    fn test_sample_too_large_for_declared_page() {
        let options = RawOptions {
            image_width: Some(300),
            thumbs_cols: Some(3),
            ..RawOptions::default()
        };
        let generation = generation(&options);
        let mut layout = LayoutOptions::new(options, &generation);

        let err = layout.init(Some((240, 135))).unwrap_err();
        assert!(matches!(err, LayoutError::IndeterminatePageSize));
    }

    #[test]
    fn test_background_and_margin() {
        let options = RawOptions {
            background_color: Some("#102030".to_string()),
            margin: Some(4),
            ..RawOptions::default()
        };
        let generation = generation(&options);
        let mut layout = LayoutOptions::new(options, &generation);
        assert_eq!(layout.background_colour(), "#102030");
        assert_eq!(layout.margin(), 4);

        let geometry = &layout.init(Some((240, 135))).unwrap().geometry;
        assert_eq!(geometry.background, Rgba([0x10, 0x20, 0x30, 255]));
        assert_eq!(geometry.header_height, 3 * 36 + 8);
    }

    #[test]
    fn test_invalid_title_font() {
        let options = RawOptions {
            title_font: Some(FontInput::Name("serif-30-red".to_string())),
            ..RawOptions::default()
        };
        let generation = generation(&options);
        let mut layout = LayoutOptions::new(options, &generation);

        let err = layout.init(Some((240, 135))).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidFont(_)));
    }
}
