//! Image encoding in pure Rust, no external tools.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode PNG** | `image::load_from_memory` |
//! | **Encode → AVIF** | rav1e via `image::codecs::avif`, quality 80, speed 1 |
//! | **Text-safe** | `base64` (standard alphabet) |
//! | **Round-trip** | `avif-parse` + `rav1d` |
//!
//! The module is split into:
//! - **Parameters**: fixed encoder settings ([`Quality`], [`Speed`])
//! - **Encoder**: [`PartEncoder`] trait, [`EncodedImage`] and error types
//! - **AVIF**: [`AvifEncoder`], the production encoder
//! - **Decode**: AVIF → RGB for verification

pub mod avif;
pub mod decode;
pub mod encoder;
mod params;

pub use avif::AvifEncoder;
pub use decode::decode_avif;
pub use encoder::{CodecError, Dimensions, EncodeError, EncodedImage, PartEncoder};
pub use params::{QUALITY, Quality, SPEED, Speed};
