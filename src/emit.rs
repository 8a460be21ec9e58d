//! Rust source emission.
//!
//! Serializes a [`PartTable`] into a module the consumer `include!`s or
//! declares with `mod`. For a table with two categories three slots wide:
//!
//! ```text
//! // @generated by robo-parts from `green`. Do not edit.
//!
//! pub const EMPTY: &str = "";
//!
//! pub static PARTS: [[&str; 3]; 2] = [BODY, EYES];
//!
//! pub static PARTS_LENGTH: [u8; 2] = [2, 3];
//!
//! /// green/000#00Body
//! pub const BODY: [&str; 3] = [
//!     "AAAAHGZ0eXBhdmlm...",
//!     "AAAAHGZ0eXBhdmlm...",
//!     EMPTY,
//! ];
//!
//! /// green/003#01Eyes
//! pub const EYES: [&str; 3] = [
//!     ...
//! ];
//! ```
//!
//! `PARTS[i]` and `PARTS_LENGTH[i]` always describe the same category. The
//! per-category arrays are `const` so `PARTS` can be built from them in a
//! static initializer.
//!
//! ## Name Checks
//!
//! Category labels become item names, so two categories with the same label
//! would produce a module that does not compile (or, with a sloppier
//! generator, silently shadow each other). Collisions, labels that are not
//! upper-case item names, labels that clash with the fixed item names, and
//! counts that do not fit `PARTS_LENGTH`'s `u8` are all rejected before any
//! text is produced.

use crate::assemble::{PartArray, PartTable, Slot};
use std::collections::HashMap;
use thiserror::Error;

/// Name of the sentinel constant.
pub const SENTINEL_NAME: &str = "EMPTY";
/// Name of the array-of-arrays table.
pub const PARTS_NAME: &str = "PARTS";
/// Name of the true-count table.
pub const PARTS_LENGTH_NAME: &str = "PARTS_LENGTH";

const RESERVED_NAMES: &[&str] = &[SENTINEL_NAME, PARTS_NAME, PARTS_LENGTH_NAME];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EmitError {
    #[error("Categories {first} and {second} both derive the name {label}")]
    NameCollision {
        label: String,
        first: String,
        second: String,
    },
    #[error("Category {path} derives {label}, which is not a valid item name")]
    InvalidName { label: String, path: String },
    #[error("Category {path} derives the reserved name {label}")]
    ReservedName { label: String, path: String },
    #[error("Category {path} holds {count} images, more than PARTS_LENGTH can record")]
    CountOverflow { path: String, count: usize },
}

/// Render the full generated module for `table`.
///
/// `source` names the run in the header comment.
pub fn emit(table: &PartTable, source: &str) -> Result<String, EmitError> {
    check_names(table)?;
    let lengths = checked_lengths(table)?;

    let labels: Vec<&str> = table
        .arrays
        .iter()
        .map(|a| a.category.label.as_str())
        .collect();
    let lengths: Vec<String> = lengths.iter().map(u8::to_string).collect();

    let mut out = format!("// @generated by robo-parts from `{source}`. Do not edit.\n\n");
    out.push_str(&format!("pub const {SENTINEL_NAME}: &str = \"\";\n\n"));
    out.push_str(&format!(
        "pub static {PARTS_NAME}: [[&str; {}]; {}] = [{}];\n\n",
        table.width,
        labels.len(),
        labels.join(", ")
    ));
    out.push_str(&format!(
        "pub static {PARTS_LENGTH_NAME}: [u8; {}] = [{}];\n",
        lengths.len(),
        lengths.join(", ")
    ));

    for array in &table.arrays {
        out.push('\n');
        out.push_str(&declaration(array, table.width));
    }

    Ok(out)
}

/// One per-category array, preceded by its source directory.
fn declaration(array: &PartArray, width: usize) -> String {
    let mut text = format!(
        "/// {}\npub const {}: [&str; {}] = [\n",
        array.category.display_path, array.category.label, width
    );
    for slot in &array.slots {
        match slot {
            Slot::Image(encoded) => text.push_str(&format!("    \"{}\",\n", encoded.as_str())),
            Slot::Empty => text.push_str(&format!("    {SENTINEL_NAME},\n")),
        }
    }
    text.push_str("];\n");
    text
}

/// Labels must be item names, unique, and must not shadow the fixed items.
fn check_names(table: &PartTable) -> Result<(), EmitError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for array in &table.arrays {
        let category = &array.category;
        if !is_item_name(&category.label) {
            return Err(EmitError::InvalidName {
                label: category.label.clone(),
                path: category.display_path.clone(),
            });
        }
        if RESERVED_NAMES.contains(&category.label.as_str()) {
            return Err(EmitError::ReservedName {
                label: category.label.clone(),
                path: category.display_path.clone(),
            });
        }
        if let Some(first) = seen.insert(&category.label, &category.display_path) {
            return Err(EmitError::NameCollision {
                label: category.label.clone(),
                first: first.to_string(),
                second: category.display_path.clone(),
            });
        }
    }
    Ok(())
}

/// `[A-Z_][A-Z0-9_]*`, excluding a lone `_`.
fn is_item_name(label: &str) -> bool {
    let mut chars = label.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_uppercase() || first == '_')
        && label != "_"
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn checked_lengths(table: &PartTable) -> Result<Vec<u8>, EmitError> {
    table
        .arrays
        .iter()
        .map(|array| {
            u8::try_from(array.true_count()).map_err(|_| EmitError::CountOverflow {
                path: array.category.display_path.clone(),
                count: array.true_count(),
            })
        })
        .collect()
}
