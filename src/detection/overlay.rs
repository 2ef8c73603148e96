use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::detection::font;
use crate::models::{BoundingBox, Prediction};

/// Colors and dimensions of the drawn boxes and labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub box_color: Rgb<u8>,
    pub text_color: Rgb<u8>,
    pub box_thickness: u32,
    pub font_scale: f32,
    pub text_weight: u32,
    /// Vertical room around the label inside its filled background
    pub label_padding: i32,
    /// Distance from the box top edge up to the label baseline
    pub baseline_offset: i32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            box_color: Rgb([255, 0, 0]),
            text_color: Rgb([255, 255, 255]),
            box_thickness: 3,
            font_scale: 0.6,
            text_weight: 2,
            label_padding: 10,
            baseline_offset: 5,
        }
    }
}

/// Draws prediction boxes and labels on a copy of an image.
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    pub style: OverlayStyle,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    /// Return a new image with every prediction drawn on it, in order.
    /// The input is left untouched.
    pub fn render(&self, image: &RgbImage, predictions: &[Prediction]) -> RgbImage {
        let mut canvas = image.clone();
        for prediction in predictions {
            self.draw_prediction(&mut canvas, prediction);
        }
        canvas
    }

    /// Pixel size of the label for a prediction.
    pub fn label_size(&self, label: &str) -> (u32, u32) {
        font::text_size(label, self.style.font_scale, self.style.text_weight)
    }

    fn draw_prediction(&self, canvas: &mut RgbImage, prediction: &Prediction) {
        let style = &self.style;
        let bbox = prediction.bbox();

        draw_thick_rect(canvas, bbox, style.box_thickness, style.box_color);

        let label = prediction.label();
        let (text_w, text_h) = self.label_size(&label);
        let (x1, y1) = (i64::from(bbox.x1), i64::from(bbox.y1));

        // Background spans (x1, y1 - text_h - padding) to (x1 + text_w, y1), inclusive
        fill_clipped(
            canvas,
            (x1, y1 - i64::from(text_h) - i64::from(style.label_padding)),
            (x1 + i64::from(text_w), y1),
            style.box_color,
        );

        font::draw_text_mut(
            canvas,
            &label,
            x1,
            y1 - i64::from(style.baseline_offset),
            style.font_scale,
            style.text_weight,
            style.text_color,
        );
    }
}

/// Outline centered on the box edges, `thickness` pixels wide.
fn draw_thick_rect(canvas: &mut RgbImage, bbox: BoundingBox, thickness: u32, color: Rgb<u8>) {
    if thickness == 0 {
        return;
    }
    let outside = i64::from(thickness / 2);
    let inside = i64::from(thickness) - outside - 1;
    let (x1, y1) = (i64::from(bbox.x1), i64::from(bbox.y1));
    let (x2, y2) = (i64::from(bbox.x2), i64::from(bbox.y2));

    // Top, bottom, left and right strokes
    fill_clipped(canvas, (x1 - outside, y1 - outside), (x2 + outside, y1 + inside), color);
    fill_clipped(canvas, (x1 - outside, y2 - inside), (x2 + outside, y2 + outside), color);
    fill_clipped(canvas, (x1 - outside, y1 - outside), (x1 + inside, y2 + outside), color);
    fill_clipped(canvas, (x2 - inside, y1 - outside), (x2 + outside, y2 + outside), color);
}

/// Fill the inclusive rectangle between two corners, keeping only the part on the canvas.
pub(super) fn fill_clipped(
    canvas: &mut RgbImage,
    (left, top): (i64, i64),
    (right, bottom): (i64, i64),
    color: Rgb<u8>,
) {
    let left = left.max(0);
    let top = top.max(0);
    let right = right.min(i64::from(canvas.width()) - 1);
    let bottom = bottom.min(i64::from(canvas.height()) - 1);
    if left > right || top > bottom {
        return;
    }
    // Bounded by the canvas, so these fit imageproc's i32/u32 geometry
    let rect = Rect::at(left as i32, top as i32)
        .of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
    draw_filled_rect_mut(canvas, rect, color);
}
