//! Shared test utilities for the robo-parts test suite.
//!
//! Builds part trees on disk and in-memory categories so each module's tests
//! can state their fixture in one line.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = part_tree("green", &[("000#00Body", 2), ("003#01Eyes", 3)]);
//! let categories = scan(&tmp.path().join("green")).unwrap();
//! assert_eq!(labels(&categories), vec!["BODY", "EYES"]);
//! ```

use image::{ImageFormat, Rgba, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::scan::Category;

/// Side length of the PNGs [`part_tree`] writes.
pub const PART_SIZE: u32 = 16;

// =========================================================================
// Image fixtures
// =========================================================================

/// PNG bytes of a `width`x`height` image with a simple gradient.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128, 255])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Write a PNG fixture, creating nothing but the file itself.
pub fn write_png(path: &Path, width: u32, height: u32) {
    fs::write(path, png_bytes(width, height)).unwrap();
}

/// Create `root_name/` in a temp directory holding one subdirectory per
/// entry, each with `count` PNGs named `part-0.png`, `part-1.png`, ...
pub fn part_tree(root_name: &str, dirs: &[(&str, usize)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join(root_name);
    fs::create_dir_all(&root).unwrap();
    for (dir, count) in dirs {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..*count {
            write_png(&dir.join(format!("part-{i}.png")), PART_SIZE, PART_SIZE);
        }
    }
    tmp
}

// =========================================================================
// In-memory categories
// =========================================================================

/// A category at `display_path` with `count` images that only exist as paths.
///
/// Image paths are `<display_path>/part-<i>.png`, which is what the mock
/// encoder sees.
pub fn category(display_path: &str, count: usize) -> Category {
    let images = (0..count)
        .map(|i| PathBuf::from(format!("{display_path}/part-{i}.png")))
        .collect();
    Category::new(
        PathBuf::from(display_path),
        display_path.to_string(),
        images,
    )
}

/// All labels in order.
pub fn labels(categories: &[Category]) -> Vec<&str> {
    categories.iter().map(|c| c.label.as_str()).collect()
}
