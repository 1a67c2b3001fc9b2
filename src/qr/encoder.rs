//! QR code encoder

use crate::config::RenderOptions;
use crate::error::{Error, Result};
use image::{Rgb, RgbImage};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};

/// Largest standard QR version
const MAX_VERSION: i16 = 40;

/// QR code encoder
pub struct QrEncoder {
    /// Smallest version tried when fitting a payload
    version: i16,
    /// Error correction level
    ecc_level: EcLevel,
    box_size: u32,
    border: u32,
    dark: Rgb<u8>,
    light: Rgb<u8>,
}

impl QrEncoder {
    /// Create a new QR encoder with default settings (High ECC, 10px modules, 2 module border)
    pub fn new() -> Self {
        Self::from_options(&RenderOptions::default())
    }

    /// Create an encoder from rendering options
    pub fn from_options(options: &RenderOptions) -> Self {
        Self {
            version: options.version.clamp(1, MAX_VERSION),
            ecc_level: options.ec_level.into(),
            box_size: options.box_size.max(1),
            border: options.border,
            dark: Rgb(options.dark_color),
            light: Rgb(options.light_color),
        }
    }

    /// Encode a payload, growing the version until it fits.
    pub fn encode(&self, data: &str) -> Result<QrCode> {
        for version in self.version..=MAX_VERSION {
            match QrCode::with_version(data, Version::Normal(version), self.ecc_level) {
                Ok(code) => {
                    if version != self.version {
                        tracing::debug!(
                            requested = self.version,
                            version,
                            length = data.len(),
                            "Grew QR version to fit payload"
                        );
                    }
                    return Ok(code);
                }
                Err(QrError::DataTooLong) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(Error::QrEncode(format!(
            "payload of {} bytes does not fit any QR version at {:?}",
            data.len(),
            self.ecc_level
        )))
    }

    /// Side length in pixels of the rendered image for `code`
    pub fn image_size(&self, code: &QrCode) -> u32 {
        (code.width() as u32 + 2 * self.border) * self.box_size
    }

    /// Render a symbol to an RGB image, one `box_size` square per module.
    pub fn render(&self, code: &QrCode) -> RgbImage {
        let modules = code.width() as u32;
        let size = self.image_size(code);
        let mut img = RgbImage::from_pixel(size, size, self.light);

        for (i, color) in code.to_colors().iter().enumerate() {
            if *color != Color::Dark {
                continue;
            }
            let x0 = (self.border + i as u32 % modules) * self.box_size;
            let y0 = (self.border + i as u32 / modules) * self.box_size;
            for dy in 0..self.box_size {
                for dx in 0..self.box_size {
                    img.put_pixel(x0 + dx, y0 + dy, self.dark);
                }
            }
        }

        img
    }

    /// Encode a string straight to an image
    pub fn encode_string(&self, data: &str) -> Result<RgbImage> {
        let code = self.encode(data)?;
        Ok(self.render(&code))
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric version of an encoded symbol
pub fn version_number(code: &QrCode) -> i16 {
    match code.version() {
        Version::Normal(v) | Version::Micro(v) => v,
    }
}
