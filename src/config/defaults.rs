use crate::config::types::{Align, FontInput, HeaderItemInput, HeaderRowInput, HeaderRowsInput};

pub const DEFAULT_THUMBS_COLS: u32 = 8;
pub const DEFAULT_THUMBS_ROWS: u32 = 7;

/// Default thumbnail width; the height follows the video's aspect ratio.
pub const DEFAULT_THUMBS_WIDTH: u32 = 240;
pub const DEFAULT_THUMBS_FILENAME: &str = "tn_%s";

pub const DEFAULT_TITLE_FONT: &str = "sans-32-black";
pub const DEFAULT_TIME_FONT: [&str; 2] = ["sans-16-white", "sans-16-black"];

pub const DEFAULT_BACKGROUND_COLOUR: &str = "#FFFFFF";

pub const DEFAULT_MARGIN: u32 = 1;

/// Standard page sizes, checked in this order when rounding up a computed page height.
pub const PREFERRED_IMAGE_SIZES: [(u32, u32); 5] = [
    (2560, 1440),
    (1920, 1080),
    (1600, 900),
    (1280, 720),
    (640, 360),
];

#[must_use]
pub fn default_title_font() -> FontInput {
    FontInput::Name(DEFAULT_TITLE_FONT.to_string())
}

#[must_use]
pub fn default_time_font() -> FontInput {
    FontInput::Names(DEFAULT_TIME_FONT.iter().map(ToString::to_string).collect())
}

/// File name, page number when there is more than one page, start time for transport
/// streams, then duration.
#[must_use]
pub fn default_header_rows() -> HeaderRowsInput {
    HeaderRowsInput::Rows(vec![
        HeaderRowInput::Items(vec![
            HeaderItemInput::Item {
                text: "Name: ${name}".to_string(),
                align: Some(Align::Left),
                condition: None,
            },
            HeaderItemInput::Item {
                text: "Page: ${page} of ${numberOfPages}".to_string(),
                align: Some(Align::Right),
                condition: Some("${numberOfPages} > 1".to_string()),
            },
        ]),
        HeaderRowInput::Single(HeaderItemInput::Item {
            text: "Start time: ${startTimeFractional}".to_string(),
            align: None,
            condition: Some("${formatName} == mpegts".to_string()),
        }),
        HeaderRowInput::Single(HeaderItemInput::Item {
            text: "Duration: ${durationFractional}".to_string(),
            align: None,
            condition: None,
        }),
    ])
}
