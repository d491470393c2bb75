//! Coverage report flow: aggregates the catalog and refreshes the summary block.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument, warn};

use leetlog_markdown::{BlockMarkers, BlockPlacement, CatalogDocument, TableMarkers, render_block};
use leetlog_metadata::MetadataSource;
use leetlog_shared::{AppConfig, CatalogRow, CoverageSummary, DifficultyCounts, FileCountSource, Result};

use crate::detect;
use crate::progress::ProgressReporter;
use crate::update::read_document;
use crate::write::write_atomic;

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Count distinct rows per difficulty and, for each tracked language, the
/// rows that link it. Rows repeating an earlier id are ignored.
///
/// Global totals and file counts are left empty for the caller to fill.
pub fn aggregate<'a>(
    rows: impl IntoIterator<Item = &'a CatalogRow>,
    tracked: &[String],
) -> CoverageSummary {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut solved = DifficultyCounts::default();
    let mut languages: Vec<(String, u32)> = tracked.iter().map(|l| (l.clone(), 0)).collect();

    for row in rows {
        if !seen.insert(row.id) {
            continue;
        }
        solved.increment(row.difficulty);
        for (language, count) in &mut languages {
            if row.has_language(language) {
                *count += 1;
            }
        }
    }

    CoverageSummary {
        solved,
        totals: None,
        languages,
        file_counts: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Report config & result
// ---------------------------------------------------------------------------

/// Configuration for the `report_coverage` pipeline.
#[derive(Debug, Clone)]
pub struct CoverageReportConfig {
    /// Path to the catalog document.
    pub document: PathBuf,
    /// Markers delimiting the catalog section.
    pub table: TableMarkers,
    /// Markers delimiting the coverage block.
    pub block: BlockMarkers,
    /// Languages reported, in display order.
    pub tracked: Vec<String>,
    /// Auxiliary directories, relative to the document.
    pub file_counts: Vec<FileCountSource>,
    /// Compute the block without writing the document.
    pub dry_run: bool,
}

impl CoverageReportConfig {
    /// Build from application config.
    pub fn from_app(config: &AppConfig, dry_run: bool) -> Self {
        Self {
            document: config.document.path.clone(),
            table: TableMarkers::from(&config.document),
            block: BlockMarkers::from(&config.document),
            tracked: config.languages.tracked.clone(),
            file_counts: config.coverage.file_counts.clone(),
            dry_run,
        }
    }
}

/// Result of the `report_coverage` pipeline.
#[derive(Debug)]
pub struct CoverageReportResult {
    /// The figures rendered into the block.
    pub summary: CoverageSummary,
    /// Where the block was placed.
    pub placement: BlockPlacement,
    /// Whether the rendered document differs from the one on disk.
    pub changed: bool,
    /// Whether the document was rewritten.
    pub written: bool,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

// ---------------------------------------------------------------------------
// Report pipeline
// ---------------------------------------------------------------------------

/// Run the coverage report.
///
/// 1. Load the document and aggregate the catalog section
/// 2. Fetch global totals (failure degrades to `N/A`)
/// 3. Count auxiliary files
/// 4. Replace the coverage block and write if the document changed
#[instrument(skip_all, fields(document = %config.document.display()))]
pub async fn report_coverage<S: MetadataSource>(
    config: &CoverageReportConfig,
    source: &S,
    progress: &dyn ProgressReporter,
) -> Result<CoverageReportResult> {
    let start = Instant::now();

    progress.phase("Loading catalog");
    let original = read_document(&config.document)?;
    let mut doc = CatalogDocument::parse(&original, config.table.clone());
    if !doc.has_section() {
        warn!(marker = %config.table.start, "catalog section not found, counting zero rows");
    }

    progress.phase("Aggregating");
    let scan = doc.scan();
    for diagnostic in &scan.diagnostics {
        warn!(%diagnostic, "excluding malformed catalog row");
    }
    let mut summary = aggregate(scan.rows.iter().map(|r| &r.row), &config.tracked);

    progress.phase("Fetching global totals");
    summary.totals = match source.difficulty_totals().await {
        Ok(totals) => Some(totals),
        Err(e) => {
            warn!(error = %e, "global totals unavailable, reporting N/A");
            None
        }
    };

    progress.phase("Counting files");
    let root = detect::document_root(&config.document);
    for entry in &config.file_counts {
        let count = detect::count_files(&root.join(&entry.dir))?;
        summary.file_counts.push((entry.label.clone(), count));
    }

    let block = render_block(&summary, &config.block);
    let placement = doc.replace_block(&config.block, &block)?;
    let rendered = doc.render();
    let changed = rendered != original;

    let mut written = false;
    if changed && !config.dry_run {
        progress.phase("Writing catalog");
        write_atomic(&config.document, &rendered)?;
        written = true;
    }

    let elapsed = start.elapsed();
    progress.done();

    info!(
        solved = summary.solved.total(),
        totals = summary.totals.is_some(),
        ?placement,
        changed,
        written,
        elapsed_ms = elapsed.as_millis() as u64,
        "coverage report complete"
    );

    Ok(CoverageReportResult {
        summary,
        placement,
        changed,
        written,
        elapsed,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
