//! Batch generation of logo-branded topic QR codes

use crate::compose::{self, Placement};
use crate::config::{RenderOptions, TopicQrConfig};
use crate::error::{Error, Result};
use crate::logo::Logo;
use crate::qr::{QrDecoder, QrEncoder, version_number};
use crate::topics::TopicEntry;
use image::{ImageFormat, Pixel, Rgb, RgbImage, imageops};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A QR code with the logo pasted on, not yet written to disk
#[derive(Debug, Clone)]
pub struct Composite {
    /// Final RGB image
    pub image: RgbImage,
    /// QR version the payload was encoded at
    pub version: i16,
    /// Where the logo was pasted
    pub placement: Placement,
    /// Whether the logo's alpha channel was used as a mask
    pub masked: bool,
}

/// Record of one written file
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedCode {
    /// Topic label
    pub label: String,
    /// Encoded URL
    pub payload: String,
    /// Written file
    pub path: PathBuf,
    /// QR version used
    pub version: i16,
    /// Image side length in pixels
    pub width: u32,
    /// Logo position and size
    pub logo: Placement,
    /// Whether the logo was alpha-masked
    pub masked: bool,
    /// Whether the image was decoded back before saving
    pub verified: bool,
}

/// Everything written by one batch run, in generation order
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Directory the files were written to
    pub output_folder: PathBuf,
    /// One record per topic
    pub codes: Vec<GeneratedCode>,
}

/// Turns topic entries into `<label>.png` files under one output folder
pub struct Generator {
    options: RenderOptions,
    logo: Logo,
    output_folder: PathBuf,
    encoder: QrEncoder,
    decoder: QrDecoder,
    verify: bool,
}

impl Generator {
    /// Create a generator from already loaded parts. Verification is on.
    pub fn new(options: RenderOptions, logo: Logo, output_folder: impl Into<PathBuf>) -> Self {
        let encoder = QrEncoder::from_options(&options);
        let fill = Rgb(options.light_color).to_luma().0[0];
        Self {
            encoder,
            decoder: QrDecoder::with_margin(options.box_size * 4, fill),
            options,
            logo,
            output_folder: output_folder.into(),
            verify: true,
        }
    }

    /// Load the logo, then create the output folder.
    ///
    /// A missing logo fails before anything is created on disk.
    pub fn setup(config: &TopicQrConfig) -> Result<Self> {
        config.validate()?;

        let logo = Logo::load(&config.logo_path)?;
        ensure_output_folder(&config.output_folder)?;

        Ok(
            Self::new(config.render.clone(), logo, config.output_folder.clone())
                .with_verification(config.verify),
        )
    }

    /// Toggle post-composite decoding
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Directory files are written to
    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    /// Encode `payload`, render it and paste the logo in the center.
    pub fn compose(&self, payload: &str) -> Result<Composite> {
        let code = self.encoder.encode(payload)?;
        let mut image = self.encoder.render(&code);
        let placement = compose::overlay_logo(&mut image, &self.logo, self.options.logo_ratio);

        Ok(Composite {
            image,
            version: version_number(&code),
            placement,
            masked: self.logo.has_alpha(),
        })
    }

    /// Decode a composite and require it to read back as `payload`.
    pub fn verify(&self, label: &str, payload: &str, composite: &Composite) -> Result<()> {
        let gray = imageops::grayscale(&composite.image);
        let found = match self.decoder.decode_gray(&gray) {
            Ok(decoded) if decoded.text == payload => return Ok(()),
            Ok(decoded) => format!("'{}'", decoded.text),
            Err(err) => err.to_string(),
        };

        Err(Error::Unscannable {
            label: label.to_string(),
            expected: payload.to_string(),
            found,
        })
    }

    /// Generate and save `<label>.png`, overwriting any existing file.
    pub fn generate(&self, label: &str, payload: &str) -> Result<GeneratedCode> {
        let composite = self.compose(payload)?;
        if self.verify {
            self.verify(label, payload, &composite)?;
        }

        let path = self.output_folder.join(format!("{label}.png"));
        composite
            .image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| Error::FileWrite {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        info!(
            file = %path.display(),
            version = composite.version,
            width = composite.image.width(),
            "Generated QR code for {label}"
        );

        Ok(GeneratedCode {
            label: label.to_string(),
            payload: payload.to_string(),
            path,
            version: composite.version,
            width: composite.image.width(),
            logo: composite.placement,
            masked: composite.masked,
            verified: self.verify,
        })
    }

    /// Generate every topic in order, stopping at the first failure.
    pub fn run(&self, base_url: &str, topics: &[TopicEntry]) -> Result<RunReport> {
        self.run_with(base_url, topics, |_| {})
    }

    /// Like [`Generator::run`], calling `on_generated` after each file is written.
    pub fn run_with<F>(
        &self,
        base_url: &str,
        topics: &[TopicEntry],
        mut on_generated: F,
    ) -> Result<RunReport>
    where
        F: FnMut(&GeneratedCode),
    {
        let mut codes = Vec::with_capacity(topics.len());
        for entry in topics {
            let generated = self.generate(&entry.label, &entry.payload(base_url))?;
            on_generated(&generated);
            codes.push(generated);
        }

        Ok(RunReport {
            output_folder: self.output_folder.clone(),
            codes,
        })
    }
}

/// Create `path` and any missing parents.
pub fn ensure_output_folder(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Output folder ready");
    Ok(())
}
