//! Encoder settings.
//!
//! - [`Quality`]: lossy encoding quality (1–100). Clamped on construction.
//! - [`Speed`]: encoder effort (1 = slowest and smallest, 10 = fastest).
//!   Clamped on construction.
//!
//! Both are fixed per build: part sets are encoded once, offline, so the
//! pipeline always uses [`QUALITY`] and [`SPEED`].

/// Quality every part is encoded at.
pub const QUALITY: Quality = Quality(80);

/// Slowest, most thorough encoder setting.
pub const SPEED: Speed = Speed(1);

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        QUALITY
    }
}

/// Encoder effort, in rav1e speed units (1-10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speed(u8);

impl Speed {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 10))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        SPEED
    }
}
