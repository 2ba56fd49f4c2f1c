//! Layered font loading
//!
//! Each logical font (`title`, `time`) may be a stack of bitmap fonts drawn at small
//! offsets from each other, which gives an embossed look that stays readable on any
//! thumbnail background.

use crate::config::FontInput;
use crate::error::{LayoutError, LayoutResult};
use crate::tools::canvas::BitmapFont;
use log::debug;
use std::collections::{BTreeSet, HashMap};

pub const TITLE_FONT_NAME: &str = "title";
pub const TIME_FONT_NAME: &str = "time";

#[derive(Debug, Clone, PartialEq, Eq)]
struct FontLayerDef {
    font_name: String,
    offset_x: i32,
    offset_y: i32,
}

/// One loaded layer of a logical font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontLayer {
    pub font: BitmapFont,
    pub offset_x: i32,
    pub offset_y: i32,
}

#[derive(Debug, Default)]
pub struct FontLoader {
    defs: HashMap<String, Vec<FontLayerDef>>,
    loaded: Option<HashMap<String, BitmapFont>>,
}

impl FontLoader {
    /// Register font definitions by key. Nothing is loaded until [`Self::load_all`].
    pub fn new<'a>(
        definitions: impl IntoIterator<Item = (&'a str, &'a FontInput)>,
    ) -> LayoutResult<Self> {
        let defs = definitions
            .into_iter()
            .map(|(key, input)| Ok((key.to_string(), normalise(input)?)))
            .collect::<LayoutResult<_>>()?;
        Ok(Self { defs, loaded: None })
    }

    /// Load every distinct font named by any definition.
    pub fn load_all(&mut self) -> LayoutResult<()> {
        let unique: BTreeSet<&str> = self
            .defs
            .values()
            .flatten()
            .map(|layer| layer.font_name.as_str())
            .collect();

        let mut loaded = HashMap::with_capacity(unique.len());
        for name in unique {
            debug!("Loading font {name}");
            loaded.insert(name.to_string(), BitmapFont::from_name(name)?);
        }
        self.loaded = Some(loaded);
        Ok(())
    }

    /// The loaded layers for `key`, or `None` when no such key was registered.
    pub fn fonts_by_key(&self, key: &str) -> LayoutResult<Option<Vec<FontLayer>>> {
        let loaded = self.loaded.as_ref().ok_or(LayoutError::FontsNotLoaded)?;
        let Some(def) = self.defs.get(key) else {
            return Ok(None);
        };

        def.iter()
            .map(|layer| {
                let font = loaded
                    .get(&layer.font_name)
                    .copied()
                    .ok_or(LayoutError::FontsNotLoaded)?;
                Ok(FontLayer {
                    font,
                    offset_x: layer.offset_x,
                    offset_y: layer.offset_y,
                })
            })
            .collect::<LayoutResult<Vec<_>>>()
            .map(Some)
    }
}

/// In the simplified list form, the first font sits one pixel down and right of the
/// second.
fn normalise(input: &FontInput) -> LayoutResult<Vec<FontLayerDef>> {
    match input {
        FontInput::Name(name) => Ok(vec![FontLayerDef {
            font_name: name.clone(),
            offset_x: 0,
            offset_y: 0,
        }]),
        FontInput::Names(names) => {
            if names.len() > 2 {
                return Err(LayoutError::TooManySimpleFonts);
            }
            let last = names.len().saturating_sub(1);
            Ok(names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let offset = (last - i) as i32;
                    FontLayerDef {
                        font_name: name.clone(),
                        offset_x: offset,
                        offset_y: offset,
                    }
                })
                .collect())
        }
        FontInput::Layers(layers) => Ok(layers
            .iter()
            .map(|layer| FontLayerDef {
                font_name: layer.font_name.clone(),
                offset_x: layer.offset_x.unwrap_or(0),
                offset_y: layer.offset_y.unwrap_or(0),
            })
            .collect()),
    }
}
