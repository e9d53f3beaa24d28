//! Pixel effects applied to a captured frame: filters and borders.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use pixelpop_booth_model::{BorderStroke, BorderStyle, FilterKind};

/// Apply a filter to every pixel of `image` in place.
pub fn apply_filter(image: &mut RgbaImage, filter: FilterKind) {
    if filter.is_identity() {
        return;
    }
    filter.apply_rgba_buffer(image);
}

/// Stroke the border rectangles of `style` onto `image`.
pub fn draw_border(image: &mut RgbaImage, style: BorderStyle) {
    let (width, height) = image.dimensions();
    for stroke in style.strokes(width, height) {
        draw_stroke(image, &stroke);
    }
}

/// Paint one stroke as four filled bands, clipped to the image.
fn draw_stroke(image: &mut RgbaImage, stroke: &BorderStroke) {
    let band = stroke.band();
    let color = Rgba(stroke.color.to_array());
    let thickness = band.thickness.max(0) as u32;
    let outer_w = (band.right - band.left).max(0) as u32;
    let outer_h = (band.bottom - band.top).max(0) as u32;
    if thickness == 0 || outer_w == 0 || outer_h == 0 {
        return;
    }

    let sides = [
        // top, bottom
        Rect::at(band.left, band.top).of_size(outer_w, thickness),
        Rect::at(band.left, band.bottom - thickness as i32).of_size(outer_w, thickness),
        // left, right
        Rect::at(band.left, band.top).of_size(thickness, outer_h),
        Rect::at(band.right - thickness as i32, band.top).of_size(thickness, outer_h),
    ];
    for rect in sides {
        draw_filled_rect_mut(image, rect, color);
    }
}
