//! Shared types, error model, and configuration for leetlog.
//!
//! This crate is the foundation depended on by all other leetlog crates.
//! It provides:
//! - [`LeetlogError`], the unified error type
//! - Domain types ([`CatalogRow`], [`LanguageLink`], [`Difficulty`], [`CoverageSummary`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ApiConfig, AppConfig, CONFIG_FILE_NAME, CoverageConfig, DetectConfig, DocumentConfig,
    FileCountSource, LanguagesConfig, home_config_path, init_config, load_config,
    load_config_from,
};
pub use error::{LeetlogError, Result};
pub use types::{
    CatalogRow, CoverageSummary, Difficulty, DifficultyCounts, DifficultyTotals, LanguageLink,
    ProblemMetadata,
};
