use crate::config::ChannelOrder;
use image::{RgbImage, imageops};
use ndarray::Array4;

/// Converts an rgb8 image into the network input blob.
///
/// The image is resized to `width` x `height`, scaled to [0, 1] and laid out as
/// (image, channel, row, column) with a single image in the batch.
pub fn prepare_blob(
    rgb_image: &RgbImage,
    width: u32,
    height: u32,
    channel_order: ChannelOrder,
) -> Array4<f32> {
    let resized = if rgb_image.dimensions() == (width, height) {
        rgb_image.clone()
    } else {
        imageops::resize(rgb_image, width, height, imageops::FilterType::Triangle)
    };
    convert_rgb_image_to_owned_array(&resized, channel_order)
}

pub fn convert_rgb_image_to_owned_array(
    rgb_image: &RgbImage,
    channel_order: ChannelOrder,
) -> Array4<f32> {
    let mut image_array = Array4::zeros((
        1,
        3,
        rgb_image.height() as usize,
        rgb_image.width() as usize,
    ));
    let (first, third) = match channel_order {
        ChannelOrder::Rgb => (0, 2),
        ChannelOrder::Bgr => (2, 0),
    };
    for pixel in rgb_image.enumerate_pixels() {
        let x = pixel.0 as usize;
        let y = pixel.1 as usize;
        let [r, g, b] = pixel.2.0;
        image_array[[0, first, y, x]] = (r as f32) / 255.;
        image_array[[0, 1, y, x]] = (g as f32) / 255.;
        image_array[[0, third, y, x]] = (b as f32) / 255.;
    }
    image_array
}
