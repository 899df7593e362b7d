//! Warning image loading.
//!
//! Each severity has a PNG file named after its label (`amber.png`, ...) in
//! the image directory. Images are decoded once at startup into owned RGB565
//! buffers, so drawing a frame is a straight pixel copy. A missing or
//! undecodable file is a startup error naming the path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::info;
use png::{ColorType, Decoder, Transformations};
use thiserror::Error;

use crate::thresholds::Severity;

/// File extension of the warning images.
pub const IMAGE_EXTENSION: &str = "png";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read image {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode image {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
}

/// A decoded image, row-major RGB565.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WarningImage {
    size: Size,
    pixels: Vec<Rgb565>,
}

impl WarningImage {
    /// Decode PNG file contents. `path` is only used for error reporting.
    ///
    /// Palette, grayscale and 16-bit images are expanded to 8-bit channels.
    /// Alpha is ignored.
    pub fn decode(
        bytes: &[u8],
        path: &Path,
    ) -> Result<Self, AssetError> {
        let decode_error = |reason: String| AssetError::Decode {
            path: path.to_path_buf(),
            reason,
        };

        let mut decoder = Decoder::new(bytes);
        decoder.set_transformations(Transformations::normalize_to_color8());
        let mut reader = decoder.read_info().map_err(|err| decode_error(err.to_string()))?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let frame = reader.next_frame(&mut buf).map_err(|err| decode_error(err.to_string()))?;
        let data = &buf[..frame.buffer_size()];

        let channels = match frame.color_type {
            ColorType::Grayscale => 1,
            ColorType::GrayscaleAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
            ColorType::Indexed => return Err(decode_error("palette was not expanded".into())),
        };
        let row_len = frame.line_size;
        let width = frame.width as usize;

        let mut pixels = Vec::with_capacity(width * frame.height as usize);
        for row in data.chunks_exact(row_len) {
            for px in row[..width * channels].chunks_exact(channels) {
                let color = if channels < 3 {
                    Rgb888::new(px[0], px[0], px[0])
                } else {
                    Rgb888::new(px[0], px[1], px[2])
                };
                pixels.push(Rgb565::from(color));
            }
        }

        Ok(Self {
            size: Size::new(frame.width, frame.height),
            pixels,
        })
    }

    /// Read and decode one PNG file.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let bytes = fs::read(path).map_err(|source| AssetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode(&bytes, path)
    }

    #[inline]
    pub const fn size(&self) -> Size { self.size }

    #[inline]
    pub fn pixels(&self) -> &[Rgb565] { &self.pixels }

    /// Top-left corner that centers the image in `area`.
    pub fn centered_in(
        &self,
        area: Size,
    ) -> Point {
        Point::new(
            (area.width as i32 - self.size.width as i32) / 2,
            (area.height as i32 - self.size.height as i32) / 2,
        )
    }

    /// Draw with the top-left corner at `top_left`. Off-screen pixels are clipped.
    pub fn draw_at<D>(
        &self,
        display: &mut D,
        top_left: Point,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let area = Rectangle::new(top_left, self.size);
        display.fill_contiguous(&area, self.pixels.iter().copied())
    }
}

/// One decoded image per severity.
#[derive(Clone, Debug)]
pub struct ImageSet {
    images: [WarningImage; 4],
}

impl ImageSet {
    /// Load `<label>.png` for every severity from `dir`.
    pub fn load(dir: &Path) -> Result<Self, AssetError> {
        let [amber, red, black, extreme] = Severity::ALL.map(|severity| image_path(dir, severity));
        let images = [
            WarningImage::load(&amber)?,
            WarningImage::load(&red)?,
            WarningImage::load(&black)?,
            WarningImage::load(&extreme)?,
        ];
        info!("Loaded {} warning images from {}", images.len(), dir.display());
        Ok(Self { images })
    }

    #[inline]
    pub fn get(
        &self,
        severity: Severity,
    ) -> &WarningImage {
        &self.images[severity.index()]
    }
}

/// Path of the image for `severity` inside `dir`.
pub fn image_path(
    dir: &Path,
    severity: Severity,
) -> PathBuf {
    dir.join(severity.label()).with_extension(IMAGE_EXTENSION)
}
