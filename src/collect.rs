//! Run orchestration.
//!
//! One run turns one part tree into one generated module:
//!
//! ```text
//! scan → resolve → measure → build → emit → write
//! ```
//!
//! Everything before the write happens in memory. The output file is
//! replaced only once the module text exists, through a temporary sibling
//! that is renamed into place, so a run that fails at any step leaves the
//! previous file exactly as it was.

use crate::assemble::{self, AssembleError, CategoryEncoded, PartTable};
use crate::config::{ProcessingConfig, RunConfig};
use crate::emit::{self, EmitError};
use crate::imaging::{AvifEncoder, PartEncoder};
use crate::scan::{self, Category, ScanError};
use crate::stacking::{self, StackingOrder};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("{0}")]
    Assemble(#[from] AssembleError),
    #[error("Cannot emit declarations: {0}")]
    Emit(#[from] EmitError),
    #[error("No part images found under {}", .0.display())]
    NoCategories(PathBuf),
}

/// What a run would do, computed without encoding anything.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub source: PathBuf,
    pub order: StackingOrder,
    /// Common array width.
    pub width: usize,
    /// Categories in stacking order.
    pub categories: Vec<Category>,
}

/// Per-category line of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedCategory {
    pub label: String,
    pub display_path: String,
    pub count: usize,
    pub padding: usize,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct CollectReport {
    pub run: String,
    pub output: PathBuf,
    pub order: StackingOrder,
    pub width: usize,
    pub categories: Vec<ReportedCategory>,
    /// Size of the written module.
    pub bytes: usize,
}

impl CollectReport {
    fn from_table(run: &RunConfig, table: &PartTable, bytes: usize) -> Self {
        Self {
            run: run.name.clone(),
            output: run.output.clone(),
            order: table.order,
            width: table.width,
            categories: table
                .arrays
                .iter()
                .map(|a| ReportedCategory {
                    label: a.category.label.clone(),
                    display_path: a.category.display_path.clone(),
                    count: a.true_count(),
                    padding: a.padding(),
                })
                .collect(),
            bytes,
        }
    }

    /// Total number of encoded images.
    pub fn image_count(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }
}

/// Scan, resolve and measure `source`.
///
/// An empty tree yields an empty plan, not an error; only [`collect`]
/// refuses to emit nothing.
pub fn plan(source: &Path) -> Result<Plan, CollectError> {
    let categories = scan::scan(source)?;
    let (categories, order) = stacking::resolve(categories);
    let width = assemble::measure(&categories);
    Ok(Plan {
        source: source.to_path_buf(),
        order,
        width,
        categories,
    })
}

/// Execute `run` with the AVIF encoder.
pub fn collect(
    run: &RunConfig,
    processing: &ProcessingConfig,
    events: Option<Sender<CategoryEncoded>>,
) -> Result<CollectReport, CollectError> {
    let encoder = AvifEncoder::new().verified(processing.verify);
    collect_with_encoder(&encoder, run, events)
}

/// Execute `run` with a specific encoder (allows testing with mock).
pub fn collect_with_encoder(
    encoder: &impl PartEncoder,
    run: &RunConfig,
    events: Option<Sender<CategoryEncoded>>,
) -> Result<CollectReport, CollectError> {
    let plan = plan(&run.source)?;
    if plan.categories.is_empty() {
        return Err(CollectError::NoCategories(run.source.clone()));
    }

    let table = assemble::build(
        encoder,
        plan.categories,
        plan.width,
        plan.order,
        events.as_ref(),
    )?;
    let text = emit::emit(&table, &run.source.to_string_lossy())?;

    write_replacing(&run.output, &text)?;
    Ok(CollectReport::from_table(run, &table, text.len()))
}

/// Write `contents` to `path` through a temporary sibling file.
fn write_replacing(path: &Path, contents: &str) -> Result<(), CollectError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    if let Err(e) = fs::write(&tmp, contents).and_then(|()| fs::rename(&tmp, path)) {
        fs::remove_file(&tmp).ok();
        return Err(e.into());
    }
    Ok(())
}
