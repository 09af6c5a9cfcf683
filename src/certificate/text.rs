use image::{Rgba, RgbaImage};
use rusttype::{point, Font, PositionedGlyph, Scale};

/// Pixel rectangle covered by laid-out text, relative to the layout origin.
/// `left` and `top` may be negative, e.g. for glyphs with a left side bearing
/// below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    fn union(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

pub struct TextLayout<'f> {
    glyphs: Vec<PositionedGlyph<'f>>,
    bounds: Option<TextBounds>,
}

impl<'f> TextLayout<'f> {
    /// Lays out `text` on one line with the top of the ascender at y = 0.
    pub fn new(font: &Font<'f>, px: f32, text: &str) -> Self {
        let scale = Scale::uniform(px);
        let ascent = font.v_metrics(scale).ascent;
        let glyphs: Vec<_> = font.layout(text, scale, point(0.0, ascent)).collect();

        let bounds = glyphs
            .iter()
            .filter_map(PositionedGlyph::pixel_bounding_box)
            .map(|bb| TextBounds {
                left: bb.min.x,
                top: bb.min.y,
                right: bb.max.x,
                bottom: bb.max.y,
            })
            .reduce(TextBounds::union);

        Self { glyphs, bounds }
    }

    /// `None` when nothing visible was laid out (empty or whitespace-only).
    pub fn bounds(&self) -> Option<TextBounds> {
        self.bounds
    }

    /// Draws the layout shifted by `(dx, dy)`, clipping at the image edges.
    pub fn draw(&self, img: &mut RgbaImage, dx: i32, dy: i32, color: Rgba<u8>) {
        let (width, height) = img.dimensions();
        for glyph in &self.glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let x = bb.min.x + gx as i32 + dx;
                let y = bb.min.y + gy as i32 + dy;
                if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                    return;
                }
                blend(img.get_pixel_mut(x as u32, y as u32), color, coverage);
            });
        }
    }
}

/// Offset that puts the centre of `bounds` on the centre of a `width` x
/// `height` image. The box's own left/top are subtracted so a non-zero
/// origin does not skew the result.
pub fn center_offset(width: u32, height: u32, bounds: TextBounds) -> (i32, i32) {
    let x = (i64::from(width) - i64::from(bounds.width())).div_euclid(2) - i64::from(bounds.left);
    let y = (i64::from(height) - i64::from(bounds.height())).div_euclid(2) - i64::from(bounds.top);
    (x as i32, y as i32)
}

/// Source-over blend of `color` at `coverage` onto `dst`.
fn blend(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0) * f32::from(color.0[3]) / 255.0;
    if alpha <= 0.0 {
        return;
    }
    let inv = 1.0 - alpha;
    for c in 0..3 {
        dst.0[c] = (f32::from(color.0[c]) * alpha + f32::from(dst.0[c]) * inv).round() as u8;
    }
    dst.0[3] = (255.0 * alpha + f32::from(dst.0[3]) * inv).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::system_font;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn midpoint(lo: i32, hi: i32) -> f64 {
        (f64::from(lo) + f64::from(hi)) / 2.0
    }

    #[test]
    fn center_offset_compensates_negative_origin() {
        let bounds = TextBounds {
            left: -3,
            top: -10,
            right: 47,
            bottom: 30,
        };
        let (dx, dy) = center_offset(200, 100, bounds);
        assert_eq!((dx, dy), (78, 40));

        let placed = bounds.translate(dx, dy);
        assert_eq!(midpoint(placed.left, placed.right), 100.0);
        assert_eq!(midpoint(placed.top, placed.bottom), 50.0);
    }

    #[test]
    fn center_offset_stays_within_a_pixel_for_odd_sizes() {
        for (w, h) in [(201, 99), (640, 480), (1, 1), (33, 17)] {
            for (left, top, right, bottom) in [(0, 0, 10, 5), (2, 7, 93, 40), (-4, -1, 3, 8), (5, 5, 6, 6)] {
                let bounds = TextBounds { left, top, right, bottom };
                let (dx, dy) = center_offset(w, h, bounds);
                let placed = bounds.translate(dx, dy);
                assert!((midpoint(placed.left, placed.right) - f64::from(w) / 2.0).abs() <= 1.0);
                assert!((midpoint(placed.top, placed.bottom) - f64::from(h) / 2.0).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn text_wider_than_image_gets_negative_offset() {
        let bounds = TextBounds {
            left: 0,
            top: 0,
            right: 300,
            bottom: 20,
        };
        assert_eq!(center_offset(100, 20, bounds), (-100, 0));
    }

    #[test]
    fn blend_mixes_by_coverage() {
        let mut px = WHITE;
        blend(&mut px, BLACK, 0.5);
        assert_eq!(px, Rgba([128, 128, 128, 255]));

        let mut px = WHITE;
        blend(&mut px, BLACK, 0.0);
        assert_eq!(px, WHITE);

        let mut px = WHITE;
        blend(&mut px, BLACK, 1.0);
        assert_eq!(px, BLACK);
    }

    #[test]
    fn blank_text_has_no_bounds() {
        let Some(font) = system_font() else {
            eprintln!("no system font, skipping");
            return;
        };
        assert_eq!(TextLayout::new(&font, 40.0, "").bounds(), None);
        assert_eq!(TextLayout::new(&font, 40.0, "   ").bounds(), None);
    }

    #[test]
    fn drawn_ink_is_centered() {
        let Some(font) = system_font() else {
            eprintln!("no system font, skipping");
            return;
        };

        for (name, w, h) in [("Alice Kumar", 600, 300), ("jy", 201, 151), ("Wolfgang Amadeus Mozart", 901, 120)] {
            let layout = TextLayout::new(&font, 48.0, name);
            let bounds = layout.bounds().unwrap();
            let (dx, dy) = center_offset(w, h, bounds);

            let mut img = RgbaImage::from_pixel(w, h, WHITE);
            layout.draw(&mut img, dx, dy, BLACK);

            let inked: Vec<(u32, u32)> = img
                .enumerate_pixels()
                .filter(|(_, _, p)| **p != WHITE)
                .map(|(x, y, _)| (x, y))
                .collect();
            assert!(!inked.is_empty(), "{name} drew nothing");

            let min_x = inked.iter().map(|p| p.0).min().unwrap();
            let max_x = inked.iter().map(|p| p.0).max().unwrap() + 1;
            let min_y = inked.iter().map(|p| p.1).min().unwrap();
            let max_y = inked.iter().map(|p| p.1).max().unwrap() + 1;

            let mid_x = (f64::from(min_x) + f64::from(max_x)) / 2.0;
            let mid_y = (f64::from(min_y) + f64::from(max_y)) / 2.0;
            assert!((mid_x - f64::from(w) / 2.0).abs() <= 1.0, "{name}: x midpoint {mid_x}");
            assert!((mid_y - f64::from(h) / 2.0).abs() <= 1.0, "{name}: y midpoint {mid_y}");
        }
    }
}
