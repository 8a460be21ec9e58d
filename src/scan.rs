//! Filesystem scanning for part categories.
//!
//! First step of every run. Walks a part tree and groups its images by the
//! directory that directly contains them:
//!
//! ```text
//! green/                       # Scan root
//! ├── 000#00Body/              # Category: 2 parts
//! │   ├── body-a.png
//! │   └── body-b.png
//! ├── 003#01Eyes/              # Category: 3 parts
//! │   ├── eyes-a.png
//! │   ├── eyes-b.png
//! │   ├── eyes-c.png
//! │   └── notes.txt            # Ignored
//! └── extras/                  # No images: not a category
//!     └── 005#02Hat/           # ...but still recursed into
//!         └── hat-a.png
//! ```
//!
//! ## Ordering
//!
//! Directories are walked in lexicographic pre-order and images within a
//! category are sorted by file name, so two scans of the same tree always
//! agree. This "discovery order" is what the stacking resolver falls back
//! to; it does not sort by layer itself.

use crate::naming;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Part directory not found: {}", .0.display())]
    MissingRoot(PathBuf),
}

/// File extension (without the dot) of part images.
pub const IMAGE_EXTENSION: &str = "png";

/// One directory of alternative images for a single part or background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Directory on disk.
    pub path: PathBuf,
    /// Scan root's directory name joined with the path below it,
    /// e.g. `green/003#01Eyes`. Names are derived from this.
    pub display_path: String,
    /// Images in slot order (sorted by file name).
    pub images: Vec<PathBuf>,
    /// Layer parsed from the `name#N` convention, if present.
    pub layer_index: Option<u32>,
    /// Per-directory identifier, e.g. `GREEN_003_01EYES`.
    pub identifier: String,
    /// Name of the emitted array, e.g. `EYES`.
    pub label: String,
}

impl Category {
    pub fn new(path: PathBuf, display_path: String, images: Vec<PathBuf>) -> Self {
        let layer_index = naming::parse_layer_index(Path::new(&display_path));
        let identifier = naming::declaration_identifier(&display_path);
        let label = naming::semantic_label(&identifier);
        Self {
            path,
            display_path,
            images,
            layer_index,
            identifier,
            label,
        }
    }

    /// Number of real (unpadded) images.
    pub fn true_count(&self) -> usize {
        self.images.len()
    }
}

/// Scan `root` for categories, in discovery order.
pub fn scan(root: &Path) -> Result<Vec<Category>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }

    let root_name = root_display_name(root)?;
    let mut categories = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let images = collect_images(entry.path())?;
        if images.is_empty() {
            continue;
        }

        let display_path = display_path(&root_name, root, entry.path());
        categories.push(Category::new(
            entry.path().to_path_buf(),
            display_path,
            images,
        ));
    }

    Ok(categories)
}

/// Files directly inside `dir` with the part extension, sorted by name.
fn collect_images(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    image_files(fs::read_dir(dir)?.map(|entry| entry.map(|e| e.path())))
}

/// Keep the part images among `entries`. Any unreadable entry fails the
/// whole directory rather than shrinking the category.
fn image_files(
    entries: impl Iterator<Item = std::io::Result<PathBuf>>,
) -> Result<Vec<PathBuf>, ScanError> {
    let mut images = entries
        .filter(|entry| {
            entry
                .as_ref()
                .map_or(true, |p| p.is_file() && is_image(p))
        })
        .collect::<Result<Vec<_>, _>>()?;
    images.sort();
    Ok(images)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(IMAGE_EXTENSION))
}

/// The root's own directory name, resolving `.` and similar to a real name.
fn root_display_name(root: &Path) -> Result<String, ScanError> {
    if let Some(name) = root.file_name() {
        return Ok(name.to_string_lossy().to_string());
    }
    let canonical = root.canonicalize()?;
    Ok(canonical
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default())
}

/// `root_name/relative/path` with `/` separators on every platform.
fn display_path(root_name: &str, root: &Path, dir: &Path) -> String {
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    std::iter::once(root_name.to_string())
        .chain(
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string()),
        )
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
