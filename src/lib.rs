//! topicqr - batch generator for logo-branded topic QR codes
//!
//! Each configured topic becomes a `<label>.png` QR code encoding
//! `<base_url>?topic=<key>`, with a logo pasted over the center. Codes are
//! encoded at the highest error correction level so they still scan with
//! a quarter of their width covered.
//!
//! # Example
//!
//! ```no_run
//! use topicqr::{Generator, TopicQrConfig};
//!
//! fn main() -> topicqr::Result<()> {
//!     let config = TopicQrConfig::default();
//!     let generator = Generator::setup(&config)?;
//!
//!     let report = generator.run(&config.base_url, &config.topics)?;
//!     println!("Wrote {} codes", report.codes.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod compose;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod logo;
pub mod output;
pub mod qr;
pub mod topics;

// Re-exports for convenience
pub use error::{Error, Result};

pub use compose::Placement;
pub use config::{EcLevelOption, LogRotation, LoggingOptions, RenderOptions, TopicQrConfig};
pub use generator::{Composite, GeneratedCode, Generator, RunReport};
pub use logo::Logo;
pub use qr::{DecodedQr, QrDecoder, QrEncoder};
pub use topics::{TopicEntry, topic_key};
