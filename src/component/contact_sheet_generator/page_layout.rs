use crate::config::{Align, HeaderItemInput, HeaderRowInput, HeaderRowsInput, defined};
use crate::error::{LayoutError, LayoutResult};
use crate::tools::{
    Canvas, FontLayer, FontLoader, TIME_FONT_NAME, TITLE_FONT_NAME, TemplateContext,
    convert_time_to_readable, evaluate_condition, interpolate,
};
use image::RgbaImage;

#[derive(Debug, Clone)]
pub struct PageLayoutOptions {
    pub margin: u32,
    pub header_height: Option<u32>,
    pub header_rows: HeaderRowsInput,
}

/// A header text item after normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderItem {
    pub text: String,
    pub align: Align,
    pub condition: Option<String>,
}

/// Header text ready to draw, positioned at the top-left of its row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPlacement {
    pub text: String,
    pub x: i64,
    pub y: i64,
}

/// Grid shape for one page. A fixed width or height makes every cell that size on that
/// axis; otherwise each image keeps its natural size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub rows: u32,
    pub cols: u32,
    pub thumbs_width: Option<u32>,
    pub thumbs_height: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub index: usize,
    pub row: u32,
    pub col: u32,
    pub x: u32,
    pub y: u32,
    pub label_x: u32,
    pub label_y: u32,
}

/// An extracted frame and the mark, in seconds, it was taken at.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub image: RgbaImage,
    pub mark: u32,
}

/// Places the header text and the thumbnail grid on a page.
#[derive(Debug, Clone)]
pub struct PageLayoutManager {
    margin: u32,
    header_height: Option<u32>,
    header_rows: Vec<Vec<HeaderItem>>,
    title_font: Vec<FontLayer>,
    time_font: Vec<FontLayer>,
}

impl PageLayoutManager {
    pub fn new(options: PageLayoutOptions, fonts: &FontLoader) -> LayoutResult<Self> {
        let title_font = loaded_font(fonts, TITLE_FONT_NAME)?;
        let time_font = loaded_font(fonts, TIME_FONT_NAME)?;

        Ok(Self {
            margin: options.margin,
            header_height: defined(options.header_height),
            header_rows: normalise_header_rows(options.header_rows),
            title_font,
            time_font,
        })
    }

    #[must_use]
    pub fn header_rows(&self) -> &[Vec<HeaderItem>] {
        &self.header_rows
    }

    /// Room for every header row, whether or not its conditions will pass.
    pub fn header_height(&self) -> LayoutResult<u32> {
        let line_height = self.title_font[0].font.line_height();
        let rows = u32::try_from(self.header_rows.len()).unwrap_or(u32::MAX);
        let computed = rows
            .saturating_mul(line_height)
            .saturating_add(self.margin.saturating_mul(2));

        match self.header_height {
            Some(requested) if requested < computed => {
                Err(LayoutError::HeaderTooSmall { computed })
            }
            Some(requested) => Ok(requested),
            None => Ok(computed),
        }
    }

    /// Work out which header items are shown and where.
    ///
    /// A condition that fails hides its item and every item after it in the same row.
    #[must_use]
    pub fn layout_header(&self, context: &TemplateContext, page_width: u32) -> Vec<TextPlacement> {
        let line_height = text_height(&self.title_font);
        let mut placements = Vec::new();
        let mut y = i64::from(self.margin);

        for row in &self.header_rows {
            let mut row_height = 0;
            for item in row {
                if let Some(condition) = &item.condition {
                    if !evaluate_condition(&interpolate(condition, context)) {
                        break;
                    }
                }
                let text = interpolate(&item.text, context);
                let x = self.calculate_x_pos(item.align, &text, page_width);
                placements.push(TextPlacement { text, x, y });
                row_height = row_height.max(line_height);
            }
            y += row_height;
        }
        placements
    }

    /// Left edge for `text` so it sits at the margin, centred, or flush right, never
    /// closer to the left edge than the margin.
    #[must_use]
    pub fn calculate_x_pos(&self, align: Align, text: &str, page_width: u32) -> i64 {
        let margin = i64::from(self.margin);
        let page_width = i64::from(page_width);
        let text_width = || i64::from(self.title_font[0].font.measure(text));

        let x = match align {
            Align::Left => 0,
            Align::Right => page_width - margin - text_width(),
            Align::Centre => (page_width - text_width()).div_euclid(2),
        };
        x.max(margin)
    }

    /// Place images row-major from `origin`, or from just under the header.
    pub fn layout_grid(
        &self,
        sizes: &[(u32, u32)],
        grid: &Grid,
        origin: Option<(u32, u32)>,
    ) -> LayoutResult<Vec<CellPlacement>> {
        let (origin_x, origin_y) = match origin {
            Some(origin) => origin,
            None => (0, self.header_height()?),
        };

        let mut placements = Vec::with_capacity(sizes.len());
        let mut y = origin_y;
        'rows: for row in 0..grid.rows {
            let mut x = origin_x;
            let mut row_height = 0;
            for col in 0..grid.cols {
                let index = placements.len();
                let Some(&(width, height)) = sizes.get(index) else {
                    break 'rows;
                };
                placements.push(CellPlacement {
                    index,
                    row,
                    col,
                    x,
                    y,
                    label_x: x + self.margin,
                    label_y: y + self.margin,
                });
                x += grid.thumbs_width.unwrap_or(width);
                row_height = row_height.max(height);
            }
            y += grid.thumbs_height.unwrap_or(row_height);
        }
        Ok(placements)
    }

    pub fn insert_header(&self, canvas: &mut impl Canvas, context: &TemplateContext) {
        let page_width = canvas.width();
        for placement in self.layout_header(context, page_width) {
            print_text(canvas, &self.title_font, placement.x, placement.y, &placement.text);
        }
    }

    /// Draw each thumbnail with its mark as `HH:MM:SS` in the top-left corner.
    pub fn insert_thumbs(
        &self,
        canvas: &mut impl Canvas,
        thumbnails: &[Thumbnail],
        grid: &Grid,
        origin: Option<(u32, u32)>,
    ) -> LayoutResult<()> {
        let sizes: Vec<(u32, u32)> = thumbnails.iter().map(|t| t.image.dimensions()).collect();
        for cell in self.layout_grid(&sizes, grid, origin)? {
            let thumbnail = &thumbnails[cell.index];
            canvas.composite(&thumbnail.image, cell.x, cell.y);
            let time = convert_time_to_readable(f64::from(thumbnail.mark), 0);
            print_text(
                canvas,
                &self.time_font,
                i64::from(cell.label_x),
                i64::from(cell.label_y),
                &time,
            );
        }
        Ok(())
    }
}

fn loaded_font(fonts: &FontLoader, key: &str) -> LayoutResult<Vec<FontLayer>> {
    fonts
        .fonts_by_key(key)?
        .filter(|layers| !layers.is_empty())
        .ok_or(LayoutError::FontsNotLoaded)
}

/// Height taken by one line of a layered font.
fn text_height(layers: &[FontLayer]) -> i64 {
    layers
        .iter()
        .map(|layer| i64::from(layer.font.line_height()) + i64::from(layer.offset_y))
        .max()
        .unwrap_or(0)
}

/// Draw every layer of a font and return the height of the line.
fn print_text(canvas: &mut impl Canvas, layers: &[FontLayer], x: i64, y: i64, text: &str) -> i64 {
    for layer in layers {
        canvas.print(
            &layer.font,
            x + i64::from(layer.offset_x),
            y + i64::from(layer.offset_y),
            text,
        );
    }
    text_height(layers)
}

fn normalise_header_rows(input: HeaderRowsInput) -> Vec<Vec<HeaderItem>> {
    match input {
        HeaderRowsInput::Rows(rows) => rows.into_iter().map(normalise_header_row).collect(),
        HeaderRowsInput::Single(item) => vec![vec![normalise_header_item(item)]],
    }
}

fn normalise_header_row(input: HeaderRowInput) -> Vec<HeaderItem> {
    match input {
        HeaderRowInput::Items(items) => items.into_iter().map(normalise_header_item).collect(),
        HeaderRowInput::Single(item) => vec![normalise_header_item(item)],
    }
}

fn normalise_header_item(input: HeaderItemInput) -> HeaderItem {
    match input {
        HeaderItemInput::Text(text) => HeaderItem {
            text,
            align: Align::Left,
            condition: None,
        },
        HeaderItemInput::Item {
            text,
            align,
            condition,
        } => HeaderItem {
            text,
            align: align.unwrap_or_default(),
            condition: condition.filter(|c| !c.is_empty()),
        },
    }
}
