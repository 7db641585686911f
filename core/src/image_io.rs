//! Image I/O

use crate::geometry::*;
use crate::pbrt::*;
use exr::prelude::{self as exrs, WritableImage};
use image::{ImageBuffer, ImageFormat, Rgb};
use std::path::Path;

/// Write an RGB image. The output format is chosen from the filename
/// extension: `.exr` writes OpenEXR, `.png` and `.tga` write gamma-corrected
/// 8-bit images.
///
/// * `path`          - Output file path.
/// * `rgb`           - Floating point RGB pixel data (row-major triples).
/// * `output_bounds` - The pixel bounds covered by the data.
pub fn write_image(path: &str, rgb: &[Float], output_bounds: &Bounds2i) -> Result<(), String> {
    let resolution = output_bounds.diagonal();
    let res_x = resolution.x as u32;
    let res_y = resolution.y as u32;

    match get_extension_from_filename(path) {
        Some("exr") => write_exr(path, rgb, res_x, res_y),
        Some("tga") => write_8_bit(path, rgb, res_x, res_y, ImageFormat::Tga),
        Some("png") => write_8_bit(path, rgb, res_x, res_y, ImageFormat::Png),
        Some(extension) => Err(format!("Extension {extension} is not supported")),
        None => Err(format!("Can't determine file type from suffix of filename {path}")),
    }
}

/// Retrieve the extension from a file path.
///
/// * `path` - The file path.
fn get_extension_from_filename(path: &str) -> Option<&str> {
    Path::new(path).extension().and_then(|e| e.to_str())
}

/// Writes the image in OpenEXR format.
///
/// * `path`  - Output file path.
/// * `rgb`   - Floating point RGB pixel data.
/// * `res_x` - X resolution.
/// * `res_y` - Y resolution.
fn write_exr(path: &str, rgb: &[Float], res_x: u32, res_y: u32) -> Result<(), String> {
    info!("Writing image {} with resolution {}x{}", path, res_x, res_y);

    let image = exrs::Image::from_channels(
        (res_x as usize, res_y as usize),
        exrs::SpecificChannels::rgb(|pos: exrs::Vec2<usize>| {
            let offset = 3 * (pos.1 * (res_x as usize) + pos.0);
            (rgb[offset], rgb[offset + 1], rgb[offset + 2])
        }),
    );

    match image.write().to_file(path) {
        Ok(()) => Ok(()),
        Err(err) => Err(format!("Error saving output image {path}: {err}")),
    }
}

/// Writes the image in an 8-bit image format with gamma correction.
///
/// * `path`         - Output file path.
/// * `rgb`          - Floating point RGB pixel data.
/// * `res_x`        - X resolution.
/// * `res_y`        - Y resolution.
/// * `image_format` - Image format.
fn write_8_bit(path: &str, rgb: &[Float], res_x: u32, res_y: u32, image_format: ImageFormat) -> Result<(), String> {
    info!("Writing image {path} with resolution {res_x}x{res_y}");

    // Allocate an image buffer.
    let mut imgbuf = ImageBuffer::new(res_x, res_y);
    let mut offset = 0;
    for y in 0..res_y {
        for x in 0..res_x {
            // 8-bit format; apply gamma and clamp.
            let pixel = apply_gamma(&[rgb[offset], rgb[offset + 1], rgb[offset + 2]]);
            imgbuf.put_pixel(x, y, Rgb(pixel));
            offset += 3;
        }
    }

    // Write the output file.
    match imgbuf.save_with_format(path, image_format) {
        Ok(()) => Ok(()),
        Err(err) => Err(format!("Error saving output image {path}: {err}.")),
    }
}

/// Apply gamma correction to an RGB triple and quantize to 8 bits.
///
/// * `rgb` - The linear RGB values.
pub fn apply_gamma(rgb: &[Float; 3]) -> [u8; 3] {
    [
        (clamp(255.0 * gamma_correct(rgb[0]) + 0.5, 0.0, 255.0)) as u8,
        (clamp(255.0 * gamma_correct(rgb[1]) + 0.5, 0.0, 255.0)) as u8,
        (clamp(255.0 * gamma_correct(rgb[2]) + 0.5, 0.0, 255.0)) as u8,
    ]
}
