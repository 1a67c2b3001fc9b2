//! QR code decoder using rqrr

use crate::error::{Error, Result};
use image::{DynamicImage, GrayImage, Luma, imageops};

/// Result of decoding one symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedQr {
    /// Decoded text content
    pub text: String,
    /// Version reported by the decoder
    pub version: usize,
}

/// QR code decoder
///
/// Images are padded with a light margin before detection so codes rendered
/// with a narrow border still have room around their finder patterns.
pub struct QrDecoder {
    margin: u32,
    fill: u8,
}

impl QrDecoder {
    /// Create a new QR decoder with a 40px white margin
    pub fn new() -> Self {
        Self::with_margin(40, 255)
    }

    /// Create a decoder padding with `margin` pixels of luma `fill`
    pub fn with_margin(margin: u32, fill: u8) -> Self {
        Self { margin, fill }
    }

    /// Decode a QR code from an image
    pub fn decode(&self, img: &DynamicImage) -> Result<DecodedQr> {
        self.decode_gray(&img.to_luma8())
    }

    /// Decode a QR code from a grayscale image
    pub fn decode_gray(&self, img: &GrayImage) -> Result<DecodedQr> {
        let mut padded = GrayImage::from_pixel(
            img.width() + 2 * self.margin,
            img.height() + 2 * self.margin,
            Luma([self.fill]),
        );
        imageops::replace(&mut padded, img, self.margin.into(), self.margin.into());

        let mut prepared = rqrr::PreparedImage::prepare(padded);
        let grids = prepared.detect_grids();

        let Some(grid) = grids.first() else {
            return Err(Error::NoQrCodeFound);
        };

        match grid.decode() {
            Ok((meta, content)) => {
                tracing::debug!(
                    "Decoded QR: version={:?}, ecc_level={:?}, length={}",
                    meta.version,
                    meta.ecc_level,
                    content.len()
                );

                Ok(DecodedQr {
                    text: content,
                    version: meta.version.0,
                })
            }
            Err(e) => Err(Error::QrDecode(format!("Decode failed: {:?}", e))),
        }
    }
}

impl Default for QrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::QrEncoder;

    #[test]
    fn decodes_rendered_code() {
        let encoder = QrEncoder::new();
        let decoder = QrDecoder::new();

        let payload = "https://example.test/repo?topic=mensa";
        let img = encoder.encode_string(payload).unwrap();
        let decoded = decoder.decode(&DynamicImage::ImageRgb8(img)).unwrap();

        assert_eq!(decoded.text, payload);
        assert!(decoded.version >= 1);
    }

    #[test]
    fn blank_image_has_no_code() {
        let decoder = QrDecoder::new();
        let blank = GrayImage::from_pixel(200, 200, Luma([255]));
        assert!(matches!(
            decoder.decode_gray(&blank),
            Err(Error::NoQrCodeFound)
        ));
    }
}
