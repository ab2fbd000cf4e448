//! Image file output.
//!
//! Both writers quantize through [`Framebuffer::to_rgb8`]: gamma 2, clamp to
//! [0, 0.999], scale to 0-255. Rows are written top to bottom.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ember_renderer::Framebuffer;
use image::{ImageFormat, RgbImage};
use thiserror::Error;

/// Errors that can occur while saving an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Framebuffer {width}x{height} does not match its pixel data")]
    SizeMismatch { width: u32, height: u32 },
}

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Write the framebuffer as a plain-text (P3) PPM.
pub fn write_ppm<W: Write>(mut writer: W, framebuffer: &Framebuffer) -> OutputResult<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", framebuffer.width(), framebuffer.height())?;
    writeln!(writer, "255")?;

    for rgb in framebuffer.to_rgb8().chunks_exact(3) {
        writeln!(writer, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
    }

    writer.flush()?;
    Ok(())
}

/// Save the framebuffer, picking the format from the file extension.
///
/// `.ppm` is written as plain-text PPM; any other extension the `image` crate
/// can encode (png, jpg, bmp, tga, ...) goes through it.
pub fn save(path: impl AsRef<Path>, framebuffer: &Framebuffer) -> OutputResult<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if extension == "ppm" {
        let file = File::create(path)?;
        write_ppm(BufWriter::new(file), framebuffer)?;
    } else {
        let format = ImageFormat::from_extension(&extension)
            .filter(|format| format.can_write())
            .ok_or_else(|| OutputError::UnsupportedFormat(path.display().to_string()))?;

        let image = RgbImage::from_raw(
            framebuffer.width(),
            framebuffer.height(),
            framebuffer.to_rgb8(),
        )
        .ok_or(OutputError::SizeMismatch {
            width: framebuffer.width(),
            height: framebuffer.height(),
        })?;
        image.save_with_format(path, format)?;
    }

    log::info!("Saved output to '{}'", path.display());
    Ok(())
}
