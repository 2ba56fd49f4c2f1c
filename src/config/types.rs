use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Caller-supplied options, every key optional.
///
/// Keys match the JSON config file (`thumbsCount`, `imageWidth`, ...). Numeric zero is
/// treated the same as an absent key by the resolvers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOptions {
    pub thumbs_count: Option<u32>,
    pub thumbs_interval: Option<f64>,
    pub thumbs_samples: Option<Vec<u32>>,
    pub thumbs_rows: Option<u32>,
    pub thumbs_cols: Option<u32>,
    pub thumbs_width: Option<u32>,
    pub thumbs_height: Option<u32>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub thumb_directory: Option<PathBuf>,
    pub thumb_filename: Option<String>,
    pub background_colour: Option<String>,
    pub background_color: Option<String>,
    pub margin: Option<u32>,
    pub header_height: Option<u32>,
    pub header_rows: Option<HeaderRowsInput>,
    pub prefer_known_sizes: Option<bool>,
    pub title_font: Option<FontInput>,
    pub time_font: Option<FontInput>,
    pub video_stream: Option<usize>,
}

/// `Some(n)` only for a non-zero value.
#[must_use]
pub fn defined(value: Option<u32>) -> Option<u32> {
    value.filter(|&n| n > 0)
}

impl RawOptions {
    #[must_use]
    pub fn thumbs_interval_defined(&self) -> Option<f64> {
        self.thumbs_interval.filter(|&i| i != 0.0 && !i.is_nan())
    }

    #[must_use]
    pub fn background_colour_defined(&self) -> Option<&str> {
        self.background_colour
            .as_deref()
            .filter(|c| !c.is_empty())
            .or_else(|| self.background_color.as_deref().filter(|c| !c.is_empty()))
    }
}

/// Horizontal placement of a header item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AlignInput")]
pub enum Align {
    #[default]
    Left,
    Centre,
    Right,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AlignInput {
    Index(u8),
    Name(String),
}

impl TryFrom<AlignInput> for Align {
    type Error = String;

    fn try_from(input: AlignInput) -> Result<Self, Self::Error> {
        match input {
            AlignInput::Index(0) => Ok(Self::Left),
            AlignInput::Index(1) => Ok(Self::Centre),
            AlignInput::Index(2) => Ok(Self::Right),
            AlignInput::Name(name) => match name.to_ascii_uppercase().as_str() {
                "LEFT" => Ok(Self::Left),
                "CENTRE" | "CENTER" => Ok(Self::Centre),
                "RIGHT" => Ok(Self::Right),
                _ => Err(format!("unknown alignment: {name}")),
            },
            AlignInput::Index(other) => Err(format!("unknown alignment: {other}")),
        }
    }
}

/// One header text item as written in the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderItemInput {
    Text(String),
    Item {
        text: String,
        #[serde(default)]
        align: Option<Align>,
        #[serde(default)]
        condition: Option<String>,
    },
}

/// One header row: a list of items, or a lone item standing for a one-item row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderRowInput {
    Items(Vec<HeaderItemInput>),
    Single(HeaderItemInput),
}

/// The whole header: a list of rows, or a lone item standing for a one-row header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderRowsInput {
    Rows(Vec<HeaderRowInput>),
    Single(HeaderItemInput),
}

/// A logical font as written in the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontInput {
    Name(String),
    Names(Vec<String>),
    Layers(Vec<FontLayerInput>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontLayerInput {
    pub font_name: String,
    #[serde(default)]
    pub offset_x: Option<i32>,
    #[serde(default)]
    pub offset_y: Option<i32>,
}
