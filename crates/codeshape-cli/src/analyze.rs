//! File loading and per-file analysis shared by the subcommands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use tracing::{debug, warn};

use codeshape_model::{CoverageMap, DeclarationReport, SourceFile};

/// Maximum source file size in bytes (1MB)
pub const MAX_SOURCE_SIZE: usize = 1_000_000;

/// Read `path`, refusing files larger than `max_size` bytes.
pub fn read_source(path: &Path, max_size: usize) -> Result<SourceFile> {
    let file = SourceFile::open(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    if file.size() > max_size {
        bail!(
            "source file '{}' exceeds the {} byte limit ({} bytes)",
            path.display(),
            max_size,
            file.size()
        );
    }
    Ok(file)
}

/// Coverage map from the CLI flags.
///
/// The optional JSON file is a flat object of percentages keyed
/// `Class::method`, `function` or `Class`.
pub fn load_coverage(file: Option<&Path>, default: f64) -> Result<CoverageMap> {
    let map = CoverageMap::new(default);
    let Some(file) = file else {
        return Ok(map);
    };
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read coverage file '{}'", file.display()))?;
    let entries: BTreeMap<String, f64> = serde_json::from_str(&text)
        .with_context(|| format!("invalid coverage file '{}'", file.display()))?;
    debug!(entries = entries.len(), "loaded coverage");
    Ok(map.with_entries(entries))
}

/// Build the declaration report of one file with coverage applied.
pub fn analyze(path: &Path, coverage: &CoverageMap, max_size: usize) -> Result<DeclarationReport> {
    let file = read_source(path, max_size)?;
    let decls = file
        .declarations()
        .with_context(|| format!("failed to load '{}'", path.display()))?;
    coverage.apply(decls);
    file.report()
        .with_context(|| format!("failed to load '{}'", path.display()))
}

/// Analyze every path, one file per worker. Files that fail are logged and
/// left out; the input order of the rest is kept.
pub fn analyze_all(
    paths: &[PathBuf],
    coverage: &CoverageMap,
    max_size: usize,
) -> Vec<(PathBuf, DeclarationReport)> {
    paths
        .par_iter()
        .filter_map(|path| match analyze(path, coverage, max_size) {
            Ok(report) => Some((path.clone(), report)),
            Err(err) => {
                warn!(path = %path.display(), "skipping file: {err:#}");
                None
            }
        })
        .collect()
}
