use crate::annotations::detection::DetectionSet;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

const PALETTE: [[u8; 3]; 6] = [
    [230, 25, 75],
    [60, 180, 75],
    [255, 225, 25],
    [0, 130, 200],
    [245, 130, 48],
    [145, 30, 180],
];

/// Draws each detection's box onto a copy of the image, colored by class.
///
/// Boxes are clamped to the image; boxes that end up empty after clamping are skipped.
pub fn draw_detections(image: &RgbImage, detections: &DetectionSet) -> RgbImage {
    let mut canvas = image.clone();
    let (width, height) = (image.width() as f32, image.height() as f32);
    if width < 1.0 || height < 1.0 {
        return canvas;
    }
    for detection in detections {
        let (left, top, right, bottom) = detection.bbox().as_xyxy();
        let x_min = left.floor().clamp(0.0, width - 1.0) as i32;
        let y_min = top.floor().clamp(0.0, height - 1.0) as i32;
        let x_max = right.ceil().clamp(0.0, width - 1.0) as i32;
        let y_max = bottom.ceil().clamp(0.0, height - 1.0) as i32;
        if x_min >= x_max || y_min >= y_max {
            continue;
        }
        let color = Rgb(PALETTE[detection.class_id() % PALETTE.len()]);
        // Two pixel wide outline.
        for thickness in 0..2 {
            let rect_width = x_max - x_min + 1 - 2 * thickness;
            let rect_height = y_max - y_min + 1 - 2 * thickness;
            if rect_width <= 0 || rect_height <= 0 {
                break;
            }
            let rect = Rect::at(x_min + thickness, y_min + thickness)
                .of_size(rect_width as u32, rect_height as u32);
            draw_hollow_rect_mut(&mut canvas, rect, color);
        }
    }
    canvas
}
