//! Catalog update flow: merges newly added solution files into the table.
//!
//! Each candidate file is resolved to a slug, looked up once against the
//! metadata service and merged into the in-memory document. The document is
//! written back once at the end, and only if something changed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, instrument, warn};

use leetlog_markdown::{CatalogDocument, MergeOutcome, Solution, TableMarkers};
use leetlog_metadata::MetadataSource;
use leetlog_shared::{AppConfig, LanguageLink, LanguagesConfig, LeetlogError, Result};

use crate::detect;
use crate::progress::ProgressReporter;
use crate::slug;
use crate::write::write_atomic;

// ---------------------------------------------------------------------------
// Update config & result
// ---------------------------------------------------------------------------

/// Configuration for the `update_catalog` pipeline.
#[derive(Debug, Clone)]
pub struct UpdateCatalogConfig {
    /// Path to the catalog document.
    pub document: PathBuf,
    /// Candidate source files, in processing order.
    pub files: Vec<PathBuf>,
    /// Markers delimiting the catalog section.
    pub table: TableMarkers,
    /// Extension → language mapping.
    pub languages: LanguagesConfig,
    /// Prefix for canonical problem URLs; the slug and a `/` are appended.
    pub problem_url_base: String,
    /// Compute changes without writing the document.
    pub dry_run: bool,
}

impl UpdateCatalogConfig {
    /// Build from application config for the given candidate files.
    pub fn from_app(config: &AppConfig, files: Vec<PathBuf>, dry_run: bool) -> Self {
        Self {
            document: config.document.path.clone(),
            files,
            table: TableMarkers::from(&config.document),
            languages: config.languages.clone(),
            problem_url_base: config.api.problem_url_base.clone(),
            dry_run,
        }
    }
}

/// Result of the `update_catalog` pipeline.
#[derive(Debug, Default)]
pub struct UpdateCatalogResult {
    /// New rows inserted.
    pub added: usize,
    /// Existing rows that gained a language link.
    pub extended: usize,
    /// Files whose language was already linked.
    pub unchanged: usize,
    /// Files skipped: unknown extension, no slug, a repeat, or a malformed row
    /// already holding the id.
    pub skipped: usize,
    /// Files whose metadata lookup failed.
    pub failed: usize,
    /// Whether the document was rewritten.
    pub written: bool,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

impl UpdateCatalogResult {
    /// Rows inserted or extended.
    pub fn changes(&self) -> usize {
        self.added + self.extended
    }
}

// ---------------------------------------------------------------------------
// Update pipeline
// ---------------------------------------------------------------------------

/// Run the catalog update.
///
/// 1. Load and parse the document (missing document is fatal)
/// 2. For each file: language, slug, per-run dedup, metadata lookup, merge
/// 3. Write the document atomically if anything changed
#[instrument(skip_all, fields(document = %config.document.display(), files = config.files.len()))]
pub async fn update_catalog<S: MetadataSource>(
    config: &UpdateCatalogConfig,
    source: &S,
    progress: &dyn ProgressReporter,
) -> Result<UpdateCatalogResult> {
    let start = Instant::now();

    progress.phase("Loading catalog");
    let mut doc = load_document(&config.document, config.table.clone())?;
    for diagnostic in doc.scan().diagnostics {
        warn!(%diagnostic, "skipping malformed catalog row");
    }

    let root = detect::document_root(&config.document);
    let url_base = if config.problem_url_base.ends_with('/') {
        config.problem_url_base.clone()
    } else {
        format!("{}/", config.problem_url_base)
    };

    let mut result = UpdateCatalogResult::default();
    let mut processed: HashSet<String> = HashSet::new();
    let total = config.files.len();

    progress.phase("Resolving solutions");
    for (i, file) in config.files.iter().enumerate() {
        progress.item(&file.display().to_string(), i + 1, total);

        let Some(language) = config.languages.language_for(file) else {
            warn!(file = %file.display(), "unknown file extension, skipping");
            result.skipped += 1;
            continue;
        };

        if !file.is_file() {
            warn!(file = %file.display(), "not a regular file, skipping");
            result.skipped += 1;
            continue;
        }

        let Some(slug) = slug::resolve_slug(file) else {
            warn!(file = %file.display(), "could not resolve a problem slug, skipping");
            result.skipped += 1;
            continue;
        };

        if !processed.insert(slug.clone()) {
            info!(file = %file.display(), %slug, "slug already processed in this run, skipping");
            result.skipped += 1;
            continue;
        }

        let meta = match source.question(&slug).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!(file = %file.display(), %slug, error = %e, "metadata lookup failed, skipping");
                result.failed += 1;
                continue;
            }
        };

        let solution = Solution {
            id: meta.frontend_id,
            title: meta.title,
            url: format!("{url_base}{slug}/"),
            link: LanguageLink::new(language, detect::link_path(&root, file)),
            difficulty: meta.difficulty,
        };

        match doc.merge(&solution)? {
            MergeOutcome::Inserted => {
                info!(id = solution.id, title = %solution.title, %language, "added row");
                result.added += 1;
            }
            MergeOutcome::LanguageAdded => {
                info!(id = solution.id, title = %solution.title, %language, "added language");
                result.extended += 1;
            }
            MergeOutcome::AlreadyPresent => {
                info!(id = solution.id, %language, "already listed");
                result.unchanged += 1;
            }
            MergeOutcome::MalformedRow => {
                warn!(id = solution.id, file = %file.display(), "catalog row does not parse, skipping");
                result.skipped += 1;
            }
        }
    }

    if result.changes() > 0 && !config.dry_run {
        progress.phase("Writing catalog");
        write_atomic(&config.document, &doc.render())?;
        result.written = true;
    }

    result.elapsed = start.elapsed();
    progress.done();

    info!(
        added = result.added,
        extended = result.extended,
        unchanged = result.unchanged,
        skipped = result.skipped,
        failed = result.failed,
        written = result.written,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "catalog update complete"
    );

    Ok(result)
}

/// Read the catalog document text. A missing file is [`LeetlogError::DocumentNotFound`].
pub(crate) fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LeetlogError::DocumentNotFound {
            path: path.to_path_buf(),
        },
        _ => LeetlogError::io(path, e),
    })
}

/// Read and parse the catalog document.
fn load_document(path: &Path, markers: TableMarkers) -> Result<CatalogDocument> {
    let doc = CatalogDocument::parse(&read_document(path)?, markers);
    doc.require_section()?;
    Ok(doc)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
