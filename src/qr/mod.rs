//! QR code encoding and decoding
//!
//! Encoding turns a payload into an RGB raster with a configurable module
//! size and border. Decoding is used to check that a composited code still
//! scans.

mod decoder;
mod encoder;

pub use decoder::{DecodedQr, QrDecoder};
pub use encoder::{QrEncoder, version_number};
