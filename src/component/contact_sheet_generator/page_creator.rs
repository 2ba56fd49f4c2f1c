use super::layout_options::ResolvedLayout;
use super::page_layout::{Grid, Thumbnail};
use super::thumbnail_extractor::ExtractedFrame;
use crate::tools::{TemplateContext, create_page};
use anyhow::{Context, Result};
use image::RgbaImage;
use serde_json::Value;

/// Renders one page of thumbnails with its header.
#[derive(Debug)]
pub struct ThumbnailPageCreator<'a> {
    layout: &'a ResolvedLayout,
    header_details: &'a TemplateContext,
}

impl<'a> ThumbnailPageCreator<'a> {
    #[must_use]
    pub const fn new(layout: &'a ResolvedLayout, header_details: &'a TemplateContext) -> Self {
        Self {
            layout,
            header_details,
        }
    }

    pub fn create_page(&self, frames: &[ExtractedFrame], page_number: u32) -> Result<RgbaImage> {
        let thumbnails = frames
            .iter()
            .map(|frame| {
                let image = image::open(&frame.path)
                    .with_context(|| format!("Failed to load thumbnail: {}", frame.path.display()))?
                    .to_rgba8();
                Ok(Thumbnail {
                    image,
                    mark: frame.mark,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let geometry = &self.layout.geometry;
        let mut page = create_page(geometry.page_width, geometry.page_height, geometry.background);

        let grid = Grid {
            rows: geometry.rows,
            cols: geometry.cols,
            thumbs_width: None,
            thumbs_height: None,
        };
        let page_layout = &self.layout.page_layout;
        page_layout.insert_thumbs(&mut page, &thumbnails, &grid, None)?;

        let mut context = self.header_details.clone();
        context.insert("page".to_string(), Value::from(page_number));
        page_layout.insert_header(&mut page, &context);

        Ok(page)
    }
}
