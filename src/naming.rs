//! Centralized path parsing for the `name#N` layer convention.
//!
//! Part directories encode their draw position in their name: a `#` delimiter
//! separates a semantic name from a numeric layer suffix. The same path is
//! also the source of the identifiers the emitted declarations are named by.
//!
//! ## Derivations
//!
//! | Input path | Layer index | Declaration identifier | Semantic label |
//! |---|---|---|---|
//! | `green/003#01Eyes` | `Some(1)` | `GREEN_003_01EYES` | `EYES` |
//! | `parts/face#2` | `Some(2)` | `PARTS_FACE_2` | `FACE` |
//! | `backgrounds/bg` | `None` | `BACKGROUNDS_BG` | `BACKGROUND` |
//! | `backgrounds/bg1` | `None` | `BACKGROUNDS_BG1` | `BG` |
//! | `parts/face#1b2` | `Some(12)` | `PARTS_FACE_1B2` | `B` |
//!
//! Only a digit-free path gets the `BACKGROUND` label. Numbered background
//! files such as `bg1` and `bg2` in sibling directories both derive `BG`, and
//! the emitter rejects them as a name collision.
//!
//! None of these functions fail: anything that does not follow the
//! convention yields `None` or the `BACKGROUND` fallback.

use std::path::Path;

/// Separates a category's semantic name from its layer number.
pub const LAYER_DELIMITER: char = '#';

/// Label for categories whose path carries no digits at all.
pub const BACKGROUND_LABEL: &str = "BACKGROUND";

/// Parse the layer index from a category path.
///
/// Takes the text after the last [`LAYER_DELIMITER`] and reads its digits
/// left to right, skipping anything that is not a digit:
/// - `"sets/003#01Eyes"` → `Some(1)`
/// - `"parts/face#2"` → `Some(2)`
/// - `"parts/face#1b2"` → `Some(12)`
/// - `"backgrounds/bg1"` → `None` (no delimiter)
/// - `"parts/face#"` → `None` (no digits after it)
///
/// Values that overflow `u32` are treated as unparsable.
pub fn parse_layer_index(path: &Path) -> Option<u32> {
    let text = path.to_string_lossy();
    let (_, suffix) = text.rsplit_once(LAYER_DELIMITER)?;

    let mut digits = suffix.chars().filter_map(|c| c.to_digit(10)).peekable();
    digits.peek()?;
    digits.try_fold(0u32, |acc, d| acc.checked_mul(10)?.checked_add(d))
}

/// Derive the per-directory declaration identifier.
///
/// Upper-cases the path and replaces separators, the layer delimiter and
/// any other character that cannot appear in an identifier with `_`.
pub fn declaration_identifier(path: &str) -> String {
    path.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Derive the semantic label from a declaration identifier.
///
/// The label is the text after the identifier's last digit. Identifiers
/// that end in their digits fall back to the trailing letters of the last
/// word before them, and identifiers without any digit are backgrounds.
///
/// The result always starts with a letter, or is [`BACKGROUND_LABEL`].
pub fn semantic_label(identifier: &str) -> String {
    let Some(last_digit) = identifier.rfind(|c: char| c.is_ascii_digit()) else {
        return BACKGROUND_LABEL.to_string();
    };

    let tail = identifier[last_digit + 1..].trim_matches('_');
    if !tail.is_empty() {
        return tail.to_string();
    }

    let head = identifier.trim_end_matches(|c: char| c.is_ascii_digit() || c == '_');
    let word = head.rsplit('_').next().unwrap_or_default();
    let letters = match word.rfind(|c: char| !c.is_ascii_alphabetic()) {
        Some(i) => &word[i + 1..],
        None => word,
    };
    if letters.is_empty() {
        BACKGROUND_LABEL.to_string()
    } else {
        letters.to_string()
    }
}
