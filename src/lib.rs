//! # Robo Parts
//!
//! Build-time generator for avatar part tables. A part tree on disk becomes a
//! Rust module of base64 image literals that an avatar renderer indexes by
//! layer and choice.
//!
//! # Architecture: One Run, Six Steps
//!
//! A run takes one source directory to one generated file:
//!
//! ```text
//! 1. Scan      sets/set1/green/  →  categories       (directories holding .png files)
//! 2. Resolve   categories        →  stacking order   (`name#N` layer suffix)
//! 3. Measure   categories        →  width            (largest part count)
//! 4. Build     categories        →  padded arrays    (AVIF + base64, parallel)
//! 5. Emit      padded arrays     →  Rust source
//! 6. Write     Rust source       →  src/robot_parts.rs
//! ```
//!
//! Steps 1 to 3 are cheap and make up a [`collect::Plan`], which the `scan`
//! command prints without encoding anything. Nothing touches the output file
//! until step 5 has succeeded.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks a part tree and groups images into categories |
//! | [`naming`] | `name#N` layer parsing, declaration identifiers and labels |
//! | [`stacking`] | Orders categories by layer, or keeps discovery order |
//! | [`imaging`] | Re-encodes one image to base64 AVIF; AVIF decoding for verification |
//! | [`assemble`] | Measures the common width and builds padded arrays in parallel |
//! | [`emit`] | Renders a part table as Rust declarations, rejecting name clashes |
//! | [`collect`] | Runs the steps above for one configured run |
//! | [`config`] | `parts.toml` loading, validation and stock defaults |
//! | [`output`] | CLI output formatting for plans, progress and summaries |
//!
//! # Generated Module
//!
//! ```text
//! pub const EMPTY: &str = "";
//! pub static PARTS: [[&str; 3]; 2] = [BODY, EYES];
//! pub static PARTS_LENGTH: [u8; 2] = [2, 3];
//! pub const BODY: [&str; 3] = ["...", "...", EMPTY];
//! pub const EYES: [&str; 3] = ["...", "...", "..."];
//! ```
//!
//! Arrays are padded to a common width so the table is rectangular;
//! `PARTS_LENGTH` tells the consumer how many slots of each row are real.
//!
//! # Design Decisions
//!
//! ## AVIF Everywhere
//!
//! Parts are re-encoded as AVIF at a fixed quality of 80 with the slowest
//! encoder setting. Generation happens rarely and the output is compiled into
//! a binary, so encode time is traded for size.
//!
//! ## Loud Name Clashes
//!
//! Category labels become item names. Two directories that derive the same
//! label are an error at generation time rather than a module that fails to
//! compile later, or worse, one that silently drops a category.

pub mod assemble;
pub mod collect;
pub mod config;
pub mod emit;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod scan;
pub mod stacking;

#[cfg(test)]
pub(crate) mod test_helpers;
