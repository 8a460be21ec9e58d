//! Production encoder: PNG in, base64 AVIF out.
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode source | `image::load_from_memory` (format sniffed from the bytes) |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e) |
//! | Text-safe | `base64` standard alphabet |
//! | Optional verify | [`decode_avif`](super::decode::decode_avif) (avif-parse + rav1d) |
//!
//! Sources are converted to 8-bit RGBA before encoding so transparent parts
//! keep their alpha plane.

use super::decode::decode_avif;
use super::encoder::{CodecError, Dimensions, EncodeError, EncodedImage, PartEncoder};
use super::params::{Quality, Speed};
use image::{DynamicImage, GenericImageView};
use std::path::Path;

/// Encodes parts as AVIF at a fixed quality and speed.
#[derive(Debug, Clone, Copy)]
pub struct AvifEncoder {
    quality: Quality,
    speed: Speed,
    verify: bool,
}

impl AvifEncoder {
    pub fn new() -> Self {
        Self {
            quality: Quality::default(),
            speed: Speed::default(),
            verify: false,
        }
    }

    /// Decode every encoding back and check it kept the source dimensions.
    pub fn verified(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    /// Encode raw source image bytes.
    pub fn encode_bytes(&self, bytes: &[u8]) -> Result<EncodedImage, CodecError> {
        let source = image::load_from_memory(bytes).map_err(CodecError::Decode)?;
        let (width, height) = source.dimensions();

        let avif = self.encode_avif(&source)?;

        if self.verify {
            let decoded = decode_avif(&avif)?;
            let expected = Dimensions { width, height };
            let actual = Dimensions {
                width: decoded.width(),
                height: decoded.height(),
            };
            if expected != actual {
                return Err(CodecError::DimensionMismatch { expected, actual });
            }
        }

        Ok(EncodedImage::from_bytes(&avif))
    }

    fn encode_avif(&self, source: &DynamicImage) -> Result<Vec<u8>, CodecError> {
        let rgba = DynamicImage::ImageRgba8(source.to_rgba8());
        let mut buffer = Vec::new();
        let encoder = image::codecs::avif::AvifEncoder::new_with_speed_quality(
            &mut buffer,
            self.speed.value(),
            self.quality.value(),
        );
        rgba.write_with_encoder(encoder).map_err(CodecError::Encode)?;
        Ok(buffer)
    }
}

impl Default for AvifEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PartEncoder for AvifEncoder {
    fn encode(&self, path: &Path) -> Result<EncodedImage, EncodeError> {
        let bytes = std::fs::read(path).map_err(|source| EncodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.encode_bytes(&bytes).map_err(|source| EncodeError::Codec {
            path: path.to_path_buf(),
            source,
        })
    }
}
