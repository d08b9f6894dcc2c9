//! Drawing primitives on RGB rasters.

use crate::common::*;
use image::imageops;
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);

/// Placement of a `height × width` array scaled into a region of a raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub top: u32,
    pub left: u32,
    pub height: u32,
    pub width: u32,
    /// Output pixels per data element.
    pub scale: f32,
}

impl Placement {
    /// Fits the data into the region keeping the aspect ratio, centered.
    pub fn fit(data_hw: [usize; 2], region_hw: [u32; 2]) -> Option<Self> {
        let [data_h, data_w] = data_hw;
        let [region_h, region_w] = region_hw;
        if data_h == 0 || data_w == 0 || region_h == 0 || region_w == 0 {
            return None;
        }

        let scale =
            (region_h as f32 / data_h as f32).min(region_w as f32 / data_w as f32);
        let height = ((data_h as f32 * scale).floor() as u32).clamp(1, region_h);
        let width = ((data_w as f32 * scale).floor() as u32).clamp(1, region_w);

        Some(Self {
            top: (region_h - height) / 2,
            left: (region_w - width) / 2,
            height,
            width,
            scale,
        })
    }

    /// The data element shown at a raster pixel inside the placement.
    fn source_index(&self, y: u32, x: u32, data_hw: [usize; 2]) -> [usize; 2] {
        let [data_h, data_w] = data_hw;
        let row = ((y as f32 + 0.5) / self.scale) as usize;
        let col = ((x as f32 + 0.5) / self.scale) as usize;
        [row.min(data_h - 1), col.min(data_w - 1)]
    }
}

/// Paints the placement with the color of the nearest data element.
pub fn blit_with<F>(canvas: &mut RgbImage, placement: &Placement, data_hw: [usize; 2], mut color_fn: F)
where
    F: FnMut(usize, usize) -> Rgb<u8>,
{
    let patch = RgbImage::from_fn(placement.width, placement.height, |x, y| {
        let [row, col] = placement.source_index(y, x, data_hw);
        color_fn(row, col)
    });
    imageops::replace(canvas, &patch, placement.left as i64, placement.top as i64);
}

/// Draws the 1-px outline of the half-open box `[t, b) × [l, r)`.
///
/// Parts outside the raster are clipped. The box must be finite.
pub fn draw_outline(canvas: &mut RgbImage, tlbr: [f32; 4], color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    let clip = |value: f32, size: u32| value.clamp(-1.0, size as f32 + 1.0).round() as i32;

    let [t, l, b, r] = tlbr;
    let (t, b) = (clip(t, height), clip(b, height));
    let (l, r) = (clip(l, width), clip(r, width));
    let rect = Rect::at(l, t).of_size((r - l).max(1) as u32, (b - t).max(1) as u32);
    draw_hollow_rect_mut(canvas, rect, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_color(image: &RgbImage, color: Rgb<u8>) -> usize {
        image.pixels().filter(|&&pixel| pixel == color).count()
    }

    #[test]
    fn draw_outline_only() {
        let mut canvas = RgbImage::from_pixel(10, 10, WHITE);
        draw_outline(&mut canvas, [2.0, 3.0, 6.0, 8.0], RED);

        assert_eq!(*canvas.get_pixel(3, 2), RED);
        assert_eq!(*canvas.get_pixel(7, 5), RED);
        assert_eq!(*canvas.get_pixel(5, 5), RED);
        assert_eq!(*canvas.get_pixel(5, 3), WHITE);
        assert_eq!(*canvas.get_pixel(8, 2), WHITE);
        // 4 rows × 5 cols outline
        assert_eq!(count_color(&canvas, RED), 2 * 5 + 2 * 2);
    }

    #[test]
    fn draw_outline_clipped_to_canvas() {
        let mut canvas = RgbImage::from_pixel(4, 4, WHITE);
        draw_outline(&mut canvas, [-2.0, -2.0, 2.0, 2.0], RED);

        assert_eq!(*canvas.get_pixel(0, 0), WHITE);
        assert_eq!(*canvas.get_pixel(1, 0), RED);
        assert_eq!(*canvas.get_pixel(0, 1), RED);
        assert_eq!(*canvas.get_pixel(1, 1), RED);
        assert_eq!(count_color(&canvas, RED), 3);
    }

    #[test]
    fn draw_outline_far_outside() {
        let mut canvas = RgbImage::from_pixel(8, 8, WHITE);
        draw_outline(&mut canvas, [1.28e19, 1.28e19, 1.3e19, 1.3e19], RED);
        draw_outline(&mut canvas, [-1e30, -1e30, -1e29, -1e29], RED);
        assert_eq!(count_color(&canvas, RED), 0);

        // spans the whole canvas, only the edges inside are drawn
        draw_outline(&mut canvas, [-1e20, 2.0, 1e20, 5.0], RED);
        assert_eq!(count_color(&canvas, RED), 2 * 8);
    }

    #[test]
    fn placement_fit_keeps_aspect_ratio() {
        let placement = Placement::fit([25, 50], [100, 100]).unwrap();
        assert_eq!(placement.width, 100);
        assert_eq!(placement.height, 50);
        assert_eq!(placement.top, 25);
        assert_eq!(placement.left, 0);
        assert!(Placement::fit([0, 3], [10, 10]).is_none());
    }

    #[test]
    fn blit_nearest_neighbour() {
        let mut canvas = RgbImage::from_pixel(6, 4, WHITE);
        let placement = Placement::fit([2, 2], [4, 6]).unwrap();
        assert_eq!(placement.left, 1);
        blit_with(&mut canvas, &placement, [2, 2], |row, col| {
            Rgb([(row * 100) as u8, (col * 100) as u8, 0])
        });

        assert_eq!(*canvas.get_pixel(0, 0), WHITE);
        assert_eq!(*canvas.get_pixel(1, 0), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(2, 1), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(4, 0), Rgb([0, 100, 0]));
        assert_eq!(*canvas.get_pixel(1, 3), Rgb([100, 0, 0]));
        assert_eq!(*canvas.get_pixel(3, 2), Rgb([100, 100, 0]));
        assert_eq!(*canvas.get_pixel(5, 3), WHITE);
    }
}
