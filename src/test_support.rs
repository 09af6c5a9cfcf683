use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use rusttype::Font;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
];

/// First TrueType font installed in a well-known location. Glyph tests
/// return early when this is `None`.
pub fn system_font_path() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| std::fs::read(p).ok().and_then(Font::try_from_vec).is_some())
}

pub fn system_font() -> Option<Font<'static>> {
    system_font_path().and_then(|p| std::fs::read(p).ok().and_then(Font::try_from_vec))
}

pub fn write_template(path: &Path, width: u32, height: u32, color: Rgba<u8>) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    RgbaImage::from_pixel(width, height, color).save(path).unwrap();
}
