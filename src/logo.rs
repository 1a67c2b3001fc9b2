//! Logo loading and resizing

use crate::error::{Error, Result};
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use std::path::Path;

/// Logo image shared read-only by every generated code
#[derive(Debug, Clone)]
pub struct Logo {
    image: DynamicImage,
}

impl Logo {
    /// Load the logo, failing with [`Error::MissingLogo`] if the path does not
    /// hold a readable image.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingLogo {
                path: path.to_path_buf(),
                reason: "file does not exist".to_string(),
            });
        }

        let image = image::open(path).map_err(|e| Error::MissingLogo {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Loaded logo"
        );

        Ok(Self { image })
    }

    /// Wrap an already decoded image
    pub fn from_image(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Whether the logo carries an alpha channel usable as a paste mask
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    /// Original dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// A fresh `size`×`size` copy, stretched if the logo is not square.
    pub fn resized(&self, size: u32) -> RgbaImage {
        self.image
            .resize_exact(size, size, FilterType::CatmullRom)
            .to_rgba8()
    }
}
