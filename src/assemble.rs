//! Padded part arrays.
//!
//! Every category becomes an array of the same width so the consumer can
//! index `PARTS[layer][slot]` without knowing where each row ends. Building
//! is two passes:
//!
//! 1. [`measure`]: the width is the largest true count in the run.
//! 2. [`build`]: encode each category's images in slot order, then pad the
//!    tail with [`Slot::Empty`] up to that width.
//!
//! ## Parallel Encoding
//!
//! Categories are independent once the width is known, so they are encoded
//! in parallel using [rayon](https://docs.rs/rayon). Results are collected
//! in input order: the table always matches the resolved stacking order.

use crate::imaging::{EncodeError, EncodedImage, PartEncoder};
use crate::scan::Category;
use crate::stacking::StackingOrder;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("{} holds {count} images but arrays are {width} wide", .path.display())]
    Overfull {
        path: PathBuf,
        count: usize,
        width: usize,
    },
}

/// One position in a padded array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Image(EncodedImage),
    /// Padding past the category's true count.
    Empty,
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// A category and its padded slots.
#[derive(Debug, Clone)]
pub struct PartArray {
    pub category: Category,
    pub slots: Vec<Slot>,
}

impl PartArray {
    /// Number of real images (slots before the padding).
    pub fn true_count(&self) -> usize {
        self.category.true_count()
    }

    pub fn padding(&self) -> usize {
        self.slots.len() - self.true_count()
    }
}

/// All arrays of one run, in stacking order.
#[derive(Debug, Clone)]
pub struct PartTable {
    pub arrays: Vec<PartArray>,
    /// Shared array width (the largest true count).
    pub width: usize,
    pub order: StackingOrder,
}

impl PartTable {
    /// True counts in table order, i.e. the `PARTS_LENGTH` row.
    pub fn lengths(&self) -> Vec<usize> {
        self.arrays.iter().map(PartArray::true_count).collect()
    }
}

/// Progress report for one finished category.
#[derive(Debug, Clone)]
pub struct CategoryEncoded {
    /// 1-based position in stacking order.
    pub position: usize,
    pub label: String,
    pub display_path: String,
    pub count: usize,
    pub padding: usize,
}

/// First pass: the common array width.
pub fn measure(categories: &[Category]) -> usize {
    categories
        .iter()
        .map(Category::true_count)
        .max()
        .unwrap_or(0)
}

/// Second pass: encode and pad every category to `width`.
///
/// Stops at the first image that fails to encode. When `progress` is given,
/// one [`CategoryEncoded`] is sent per category as it completes (completion
/// order, not table order).
pub fn build(
    encoder: &impl PartEncoder,
    categories: Vec<Category>,
    width: usize,
    order: StackingOrder,
    progress: Option<&Sender<CategoryEncoded>>,
) -> Result<PartTable, AssembleError> {
    if let Some(category) = categories.iter().find(|c| c.true_count() > width) {
        return Err(AssembleError::Overfull {
            path: category.path.clone(),
            count: category.true_count(),
            width,
        });
    }

    let arrays = categories
        .into_par_iter()
        .enumerate()
        .map(|(idx, category)| {
            let array = build_array(encoder, category, width)?;
            if let Some(tx) = progress {
                tx.send(CategoryEncoded {
                    position: idx + 1,
                    label: array.category.label.clone(),
                    display_path: array.category.display_path.clone(),
                    count: array.true_count(),
                    padding: array.padding(),
                })
                .ok();
            }
            Ok(array)
        })
        .collect::<Result<Vec<_>, AssembleError>>()?;

    Ok(PartTable {
        arrays,
        width,
        order,
    })
}

fn build_array(
    encoder: &impl PartEncoder,
    category: Category,
    width: usize,
) -> Result<PartArray, AssembleError> {
    let mut slots = Vec::with_capacity(width);
    for image in &category.images {
        slots.push(Slot::Image(encoder.encode(image)?));
    }
    slots.resize(width, Slot::Empty);
    Ok(PartArray { category, slots })
}
