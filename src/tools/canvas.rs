//! Raster primitives used by the page layout: built-in bitmap fonts and a drawing
//! surface.

use crate::error::{LayoutError, LayoutResult};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage, imageops};
use regex::Regex;
use std::sync::LazyLock;

/// Glyph cell size of the built-in font, in pixels.
const GLYPH_SIZE: u32 = 8;

/// Largest accepted font size, in pixels.
const MAX_FONT_SIZE: u32 = 1024;

static FONT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:sans)-(\d+)-(black|white|#[0-9A-Fa-f]{6})$").expect("valid font regex")
});

/// An 8x8 bitmap font scaled up by an integer factor and drawn in a single colour.
///
/// Named like `sans-32-black`: the size is a multiple of 8 up to 1024 and the colour is `black`,
/// `white` or `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    scale: u32,
    colour: Rgba<u8>,
}

impl BitmapFont {
    pub fn from_name(name: &str) -> LayoutResult<Self> {
        let invalid = || LayoutError::InvalidFont(name.to_string());
        let caps = FONT_NAME.captures(name.trim()).ok_or_else(invalid)?;

        let size: u32 = caps[1].parse().map_err(|_| invalid())?;
        if size == 0 || size > MAX_FONT_SIZE || size % GLYPH_SIZE != 0 {
            return Err(invalid());
        }

        let colour = match caps[2].to_ascii_lowercase().as_str() {
            "black" => Rgba([0, 0, 0, 255]),
            "white" => Rgba([255, 255, 255, 255]),
            hex => parse_colour(hex).map_err(|_| invalid())?,
        };

        Ok(Self {
            scale: size / GLYPH_SIZE,
            colour,
        })
    }

    /// Height of one line of text, glyphs plus leading.
    #[must_use]
    pub const fn line_height(&self) -> u32 {
        let size = GLYPH_SIZE * self.scale;
        size + size / 8
    }

    /// Width of `text` in pixels.
    #[must_use]
    pub fn measure(&self, text: &str) -> u32 {
        u32::try_from(text.chars().count())
            .unwrap_or(u32::MAX)
            .saturating_mul(GLYPH_SIZE * self.scale)
    }

    #[must_use]
    pub const fn colour(&self) -> Rgba<u8> {
        self.colour
    }

    fn draw(&self, target: &mut RgbaImage, x: i64, y: i64, text: &str) {
        let scale = i64::from(self.scale);
        let advance = i64::from(GLYPH_SIZE) * scale;
        let (width, height) = (i64::from(target.width()), i64::from(target.height()));

        for (index, ch) in text.chars().enumerate() {
            let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
                continue;
            };
            let origin_x = x + index as i64 * advance;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_SIZE as i64 {
                    if (bits >> col) & 1 == 0 {
                        continue;
                    }
                    let px = origin_x + col * scale;
                    let py = y + row as i64 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let (tx, ty) = (px + dx, py + dy);
                            if tx >= 0 && ty >= 0 && tx < width && ty < height {
                                target.put_pixel(tx as u32, ty as u32, self.colour);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` into an RGBA colour.
pub fn parse_colour(text: &str) -> LayoutResult<Rgba<u8>> {
    let invalid = || LayoutError::InvalidColour(text.to_string());
    let hex = text.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let mut rgba = [255; 4];
            for (i, c) in hex.chars().enumerate() {
                rgba[i] = channel(&c.to_string().repeat(2))?;
            }
            Ok(Rgba(rgba))
        }
        6 | 8 => {
            let mut rgba = [255; 4];
            for i in 0..hex.len() / 2 {
                rgba[i] = channel(&hex[i * 2..i * 2 + 2])?;
            }
            Ok(Rgba(rgba))
        }
        _ => Err(invalid()),
    }
}

/// A surface that page layout draws onto.
pub trait Canvas {
    fn width(&self) -> u32;

    fn print(&mut self, font: &BitmapFont, x: i64, y: i64, text: &str);

    fn composite(&mut self, image: &RgbaImage, x: u32, y: u32);
}

impl Canvas for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn print(&mut self, font: &BitmapFont, x: i64, y: i64, text: &str) {
        font.draw(self, x, y, text);
    }

    fn composite(&mut self, image: &RgbaImage, x: u32, y: u32) {
        imageops::overlay(self, image, i64::from(x), i64::from(y));
    }
}

/// A blank page filled with `background`.
#[must_use]
pub fn create_page(width: u32, height: u32, background: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, background)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_from_name() {
        let font = BitmapFont::from_name("sans-32-black").unwrap();
        assert_eq!(font.line_height(), 36);
        assert_eq!(font.measure("abc"), 96);

        let font = BitmapFont::from_name("SANS-16-white").unwrap();
        assert_eq!(font.line_height(), 18);
        assert_eq!(font.colour(), Rgba([255, 255, 255, 255]));

        let font = BitmapFont::from_name("sans-8-#ff0000").unwrap();
        assert_eq!(font.colour(), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_invalid_font_names() {
        assert!(BitmapFont::from_name("sans-14-black").is_err());
        assert!(BitmapFont::from_name("serif-16-black").is_err());
        assert!(BitmapFont::from_name("sans-0-black").is_err());
        assert!(BitmapFont::from_name("sans-16-purple").is_err());
    }

    #[test]
    fn test_oversized_font_is_rejected() {
        assert!(matches!(
            BitmapFont::from_name("sans-4294967288-black"),
            Err(LayoutError::InvalidFont(_))
        ));
        assert!(BitmapFont::from_name("sans-1032-black").is_err());

        let font = BitmapFont::from_name("sans-1024-black").unwrap();
        assert_eq!(font.line_height(), 1152);
        assert_eq!(font.measure("ab"), 2048);
    }

    #[test]
    fn test_parse_colour() {
        assert_eq!(parse_colour("#FFFFFF").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_colour("#f00").unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_colour("#00000080").unwrap(), Rgba([0, 0, 0, 128]));
        assert!(parse_colour("white").is_err());
        assert!(parse_colour("#12345").is_err());
    }

    #[test]
    fn test_print_draws_inside_bounds_only() {
        let font = BitmapFont::from_name("sans-8-black").unwrap();
        let mut page = create_page(20, 10, Rgba([255, 255, 255, 255]));
        page.print(&font, -4, -4, "HH");
        page.print(&font, 16, 6, "H");

        let dark = page.pixels().filter(|p| p.0[0] == 0).count();
        assert!(dark > 0);
    }

    #[test]
    fn test_composite() {
        let mut page = create_page(10, 10, Rgba([255, 255, 255, 255]));
        let red = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255]));
        page.composite(&red, 2, 4);

        assert_eq!(*page.get_pixel(2, 4), Rgba([255, 0, 0, 255]));
        assert_eq!(*page.get_pixel(4, 6), Rgba([255, 0, 0, 255]));
        assert_eq!(*page.get_pixel(5, 6), Rgba([255, 255, 255, 255]));
    }
}
