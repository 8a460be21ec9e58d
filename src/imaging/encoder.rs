//! Encoder trait and shared types.
//!
//! The [`PartEncoder`] trait is the single operation the array builder needs:
//! turn one image file into an [`EncodedImage`]. The production
//! implementation is [`AvifEncoder`](super::avif::AvifEncoder); tests use the
//! recording mock in [`tests`].

use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to turn bytes into an encoding (or back).
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("not a decodable image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("AVIF encoding failed: {0}")]
    Encode(#[source] image::ImageError),
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("AVIF decoding failed: {0}")]
    Avif(String),
    #[error("round trip changed dimensions from {expected} to {actual}")]
    DimensionMismatch {
        expected: Dimensions,
        actual: Dimensions,
    },
}

/// Failure to encode one image file.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

impl EncodeError {
    /// The image file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            EncodeError::Io { path, .. } | EncodeError::Codec { path, .. } => path,
        }
    }
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Base64 text of one re-encoded image, ready to embed as a string literal.
///
/// Never empty: encoders always produce at least a container header, which
/// keeps every real part distinct from the empty-string sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Wrap encoded bytes as standard, padded base64.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// Recover the encoded bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Ok(STANDARD.decode(&self.0)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Turns one source image file into its embeddable encoding.
///
/// Must be `Sync`: categories are encoded in parallel.
pub trait PartEncoder: Sync {
    fn encode(&self, path: &Path) -> Result<EncodedImage, EncodeError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock encoder that records every path and returns `enc:<file name>`.
    ///
    /// Files whose name contains `broken` fail with a decode error.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockEncoder {
        pub encoded: Mutex<Vec<PathBuf>>,
    }

    impl MockEncoder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn encoded_paths(&self) -> Vec<PathBuf> {
            let mut paths = self.encoded.lock().unwrap().clone();
            paths.sort();
            paths
        }

        /// The encoding the mock produces for `file_name`.
        pub fn encoding_of(file_name: &str) -> EncodedImage {
            EncodedImage::from_bytes(format!("enc:{file_name}").as_bytes())
        }
    }

    impl PartEncoder for MockEncoder {
        fn encode(&self, path: &Path) -> Result<EncodedImage, EncodeError> {
            self.encoded.lock().unwrap().push(path.to_path_buf());

            let file_name = path.file_name().unwrap().to_string_lossy().to_string();
            if file_name.contains("broken") {
                return Err(EncodeError::Codec {
                    path: path.to_path_buf(),
                    source: CodecError::Avif("mock decode failure".to_string()),
                });
            }
            Ok(Self::encoding_of(&file_name))
        }
    }

    #[test]
    fn encoded_image_is_standard_base64() {
        let encoded = EncodedImage::from_bytes(b"robot");
        assert_eq!(encoded.as_str(), "cm9ib3Q=");
        assert_eq!(encoded.to_bytes().unwrap(), b"robot");
    }

    #[test]
    fn encoded_image_of_bytes_is_never_empty() {
        assert!(!EncodedImage::from_bytes(b"x").is_empty());
    }

    #[test]
    fn invalid_base64_is_reported() {
        let bogus = EncodedImage("not base64!".to_string());
        assert!(matches!(bogus.to_bytes(), Err(CodecError::Base64(_))));
    }

    #[test]
    fn encode_error_exposes_path() {
        let err = EncodeError::Io {
            path: PathBuf::from("parts/face#1/a.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.path(), Path::new("parts/face#1/a.png"));
        assert!(err.to_string().contains("parts/face#1/a.png"));
    }

    #[test]
    fn dimensions_display() {
        let dims = Dimensions {
            width: 300,
            height: 200,
        };
        assert_eq!(dims.to_string(), "300x200");
    }

    #[test]
    fn mock_records_and_fails_on_broken() {
        let encoder = MockEncoder::new();
        let ok = encoder.encode(Path::new("a/one.png")).unwrap();
        assert_eq!(ok, MockEncoder::encoding_of("one.png"));
        assert!(encoder.encode(Path::new("a/broken.png")).is_err());
        assert_eq!(
            encoder.encoded_paths(),
            vec![PathBuf::from("a/broken.png"), PathBuf::from("a/one.png")]
        );
    }
}
