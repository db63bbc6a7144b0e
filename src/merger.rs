use core::result::Result;
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;
use tracing::{debug, error, info, warn};

use crate::config::Config;

/// Name of the merged file written into every brand directory. Never read as an input.
pub const OUTPUT_FILE_NAME: &str = "products.json";

const INPUT_SUFFIX: &str = ".json";

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Base path not found: {}", .0.display())]
    BaseRootMissing(PathBuf),
    #[error("Could not list {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Serialize)]
struct MergedOutput<'a> {
    products: &'a [Value],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandOutcome {
    /// `products.json` was written with `count` records.
    Merged { count: usize },
    /// Nothing parsed, so no output was written.
    NoRecords,
    WriteFailed,
    /// The brand directory itself could not be listed.
    Unreadable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandReport {
    pub name: String,
    pub path: PathBuf,
    pub outcome: BrandOutcome,
    /// Candidate files skipped because they could not be read or parsed.
    pub failed_inputs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryStatus {
    Processed(Vec<BrandReport>),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub name: String,
    pub path: PathBuf,
    pub status: CategoryStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub categories: Vec<CategoryReport>,
}

impl RunReport {
    pub fn brands(&self) -> impl Iterator<Item = &BrandReport> {
        self.categories.iter().flat_map(|c| match &c.status {
            CategoryStatus::Processed(brands) => brands.as_slice(),
            CategoryStatus::Missing => Default::default(),
        })
    }

    pub fn missing_categories(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| c.status == CategoryStatus::Missing)
            .count()
    }

    pub fn merged_brands(&self) -> usize {
        self.brands()
            .filter(|b| matches!(b.outcome, BrandOutcome::Merged { .. }))
            .count()
    }

    pub fn products_written(&self) -> usize {
        self.brands()
            .map(|b| match b.outcome {
                BrandOutcome::Merged { count } => count,
                _ => 0,
            })
            .sum()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Immediate entries of `dir` accepted by `keep`, sorted by file name.
fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>, Error> {
    let read_dir = |source: std::io::Error| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for res in fs::read_dir(dir).map_err(read_dir)? {
        let path = res.map_err(read_dir)?.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(paths)
}

/// Names are compared as raw bytes so non-UTF-8 file names still qualify.
fn is_input_file(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.as_encoded_bytes();
    name.ends_with(INPUT_SUFFIX.as_bytes())
        && name != OUTPUT_FILE_NAME.as_bytes()
        && !path.is_dir()
}

fn read_record(path: &Path) -> Result<Value, Error> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn write_output(path: &Path, products: &[Value]) -> Result<(), Error> {
    let text = serde_json::to_string_pretty(&MergedOutput { products })?;
    fs::write(path, text)?;
    Ok(())
}

/// Merges every `*.json` file in `brand_dir` (except `products.json`) into
/// `brand_dir/products.json`.
///
/// Unreadable or malformed inputs are logged and left out. When nothing
/// parses, any existing `products.json` is left as it was. A failed write is
/// logged and reported as [`BrandOutcome::WriteFailed`]; it is never returned
/// as an error.
pub fn merge_brand(brand_dir: &Path) -> BrandReport {
    let mut report = BrandReport {
        name: display_name(brand_dir),
        path: brand_dir.to_path_buf(),
        outcome: BrandOutcome::NoRecords,
        failed_inputs: 0,
    };

    let inputs = match sorted_entries(brand_dir, is_input_file) {
        Ok(inputs) => inputs,
        Err(e) => {
            warn!("Skipping brand {}: {}", report.name, e);
            report.outcome = BrandOutcome::Unreadable;
            return report;
        }
    };

    let mut products = Vec::with_capacity(inputs.len());
    for input in &inputs {
        match read_record(input) {
            Ok(record) => {
                debug!("Read product record: {}", input.display());
                products.push(record);
            }
            Err(e) => {
                warn!("Error reading {}: {}", input.display(), e);
                report.failed_inputs += 1;
            }
        }
    }

    if products.is_empty() {
        debug!("No product records for {}, nothing written", report.name);
        return report;
    }

    let output_path = brand_dir.join(OUTPUT_FILE_NAME);
    match write_output(&output_path, &products) {
        Ok(()) => {
            info!(
                "Successfully merged {} products for {}",
                products.len(),
                report.name
            );
            report.outcome = BrandOutcome::Merged {
                count: products.len(),
            };
        }
        Err(e) => {
            error!("Error writing {}: {}", output_path.display(), e);
            report.outcome = BrandOutcome::WriteFailed;
        }
    }

    report
}

/// Treats each subdirectory of `category_root` as a brand and merges it,
/// in file name order.
///
/// # Errors
/// Returns an error only when `category_root` itself cannot be listed.
/// Problems inside a brand are logged and show up in its [`BrandReport`].
pub fn process(category_root: &Path) -> Result<Vec<BrandReport>, Error> {
    let brands = sorted_entries(category_root, Path::is_dir)?;
    Ok(brands.iter().map(|brand| merge_brand(brand)).collect())
}

/// Processes every configured category under the base root, in order.
/// Categories missing on disk are logged and skipped.
pub fn run(config: &Config) -> Result<RunReport, Error> {
    if !config.base_root.is_dir() {
        return Err(Error::BaseRootMissing(config.base_root.clone()));
    }
    fs::read_dir(&config.base_root).map_err(|source| Error::ReadDir {
        path: config.base_root.clone(),
        source,
    })?;

    let mut report = RunReport::default();
    for category in config.categories() {
        let path = config.base_root.join(category);
        let status = if path.is_dir() {
            info!("Processing category: {}", category);
            CategoryStatus::Processed(process(&path)?)
        } else {
            warn!("Category path not found: {}", path.display());
            CategoryStatus::Missing
        };
        report.categories.push(CategoryReport {
            name: category.to_string(),
            path,
            status,
        });
    }

    info!(
        "Merged {} products across {} brands ({} categories, {} missing)",
        report.products_written(),
        report.merged_brands(),
        report.categories.len(),
        report.missing_categories()
    );

    Ok(report)
}
