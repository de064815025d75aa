use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::BatchError;
use crate::ocr::OcrProvider;
use crate::parser::classify::Classifier;
use crate::parser::{self, Record};
use crate::output;

/// Per-run counters, printed at the end of `run`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    pub pages: usize,
    pub ok: usize,
    pub failed: usize,
    pub records: usize,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub records: Vec<Record>,
    pub stats: BatchStats,
}

#[derive(Debug)]
pub struct RunSummary {
    pub stats: BatchStats,
    pub unique: usize,
    pub output: PathBuf,
}

impl RunSummary {
    pub fn print(&self) {
        println!(
            "Processed {} pages ({} ok, {} failed).",
            self.stats.pages, self.stats.ok, self.stats.failed
        );
        println!(
            "Extracted {} records, {} unique -> {}",
            self.stats.records,
            self.unique,
            self.output.display()
        );
    }
}

/// Scan `input`, extract every page, deduplicate and write the table.
/// Nothing is written unless at least one record was found.
pub fn run(
    input: &Path,
    output_path: &Path,
    provider: &dyn OcrProvider,
    classifier: &Classifier,
    extensions: &[String],
    workers: usize,
) -> Result<RunSummary, BatchError> {
    let paths = scan_inputs(input, extensions)?;
    info!(files = paths.len(), input = %input.display(), "Scanned input directory");

    let outcome = run_batch(provider, classifier, &paths, workers)?;
    if outcome.records.is_empty() {
        return Err(BatchError::NoRecords {
            pages: outcome.stats.pages,
        });
    }

    let unique = dedupe(outcome.records);
    output::write_table(output_path, &unique).map_err(|source| BatchError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;

    info!(
        pages = outcome.stats.pages,
        failed = outcome.stats.failed,
        records = outcome.stats.records,
        unique = unique.len(),
        "Batch complete"
    );

    Ok(RunSummary {
        stats: outcome.stats,
        unique: unique.len(),
        output: output_path.to_path_buf(),
    })
}

/// Files under `root` whose extension is in `extensions` (case-insensitive),
/// sorted by path so runs are reproducible.
pub fn scan_inputs(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, BatchError> {
    let paths: Vec<PathBuf> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), extensions))
        .map(|e| e.into_path())
        .collect();

    if paths.is_empty() {
        return Err(BatchError::NoInputs(root.to_path_buf()));
    }
    Ok(paths)
}

/// OCR and segment every page on a pool of `workers` threads.
///
/// A page whose OCR fails is logged and contributes nothing; the rest of the
/// batch carries on. Records come back in input order.
pub fn run_batch(
    provider: &dyn OcrProvider,
    classifier: &Classifier,
    paths: &[PathBuf],
    workers: usize,
) -> Result<BatchOutcome, BatchError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let pages: Vec<Option<Vec<Record>>> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let page = extract_page(provider, classifier, path);
                pb.inc(1);
                page
            })
            .collect()
    });
    pb.finish_and_clear();

    let mut stats = BatchStats {
        pages: paths.len(),
        ..BatchStats::default()
    };
    let mut records = Vec::new();
    for page in pages {
        match page {
            Some(found) => {
                stats.ok += 1;
                stats.records += found.len();
                records.extend(found);
            }
            None => stats.failed += 1,
        }
    }

    Ok(BatchOutcome { records, stats })
}

/// Drop repeated triples, keeping the first occurrence of each.
pub fn dedupe(records: Vec<Record>) -> Vec<Record> {
    records.into_iter().unique().collect()
}

fn extract_page(
    provider: &dyn OcrProvider,
    classifier: &Classifier,
    path: &Path,
) -> Option<Vec<Record>> {
    match provider.extract_text(path) {
        Ok(text) => {
            let records = parser::process_page(classifier, &text);
            debug!(path = %path.display(), records = records.len(), "Page segmented");
            Some(records)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "OCR failed, skipping page");
            None
        }
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}
