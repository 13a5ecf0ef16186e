// Writes the canvas to disk as a PNG.

use std::fs;
use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::error::Error;
use crate::types::{FrameBuffer, unpack};

/// Save `frame` to `path` as PNG, creating parent folders as needed.
/// An existing file is overwritten.
pub fn save_png(frame: &FrameBuffer, path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let img = RgbImage::from_fn(frame.width as u32, frame.height as u32, |x, y| {
        let (r, g, b) = unpack(frame.pixels[y as usize * frame.width + x as usize]);
        image::Rgb([r, g, b])
    });
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
