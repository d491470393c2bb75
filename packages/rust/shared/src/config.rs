//! Application configuration for leetlog.
//!
//! The config file is `leetlog.toml`, looked up next to the archive first and
//! then under `~/.leetlog/`. CLI flags override config file values, which
//! override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LeetlogError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "leetlog.toml";

/// Config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".leetlog";

// ---------------------------------------------------------------------------
// Config structs (matching leetlog.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog document location and markers.
    #[serde(default)]
    pub document: DocumentConfig,

    /// Metadata service settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Changed-file detection.
    #[serde(default)]
    pub detect: DetectConfig,

    /// Language naming and tracking.
    #[serde(default)]
    pub languages: LanguagesConfig,

    /// Coverage block inputs.
    #[serde(default)]
    pub coverage: CoverageConfig,
}

/// `[document]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Path to the catalog document.
    #[serde(default = "default_document_path")]
    pub path: PathBuf,

    /// Header line that opens the catalog table section.
    #[serde(default = "default_table_start")]
    pub table_start: String,

    /// Header line that closes the catalog table section.
    #[serde(default = "default_table_end")]
    pub table_end: String,

    /// Marker line opening the coverage block.
    #[serde(default = "default_coverage_start")]
    pub coverage_start: String,

    /// Marker line closing the coverage block.
    #[serde(default = "default_coverage_end")]
    pub coverage_end: String,

    /// Prefix of the line after which a missing coverage block is inserted.
    #[serde(default = "default_coverage_anchor")]
    pub coverage_anchor: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: default_document_path(),
            table_start: default_table_start(),
            table_end: default_table_end(),
            coverage_start: default_coverage_start(),
            coverage_end: default_coverage_end(),
            coverage_anchor: default_coverage_anchor(),
        }
    }
}

fn default_document_path() -> PathBuf {
    PathBuf::from("README.md")
}
fn default_table_start() -> String {
    "### LeetCode Algorithm".into()
}
fn default_table_end() -> String {
    "### LeetCode Shell".into()
}
fn default_coverage_start() -> String {
    "<!-- coverage:start -->".into()
}
fn default_coverage_end() -> String {
    "<!-- coverage:end -->".into()
}
fn default_coverage_anchor() -> String {
    "# ".into()
}

/// `[api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// GraphQL endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Prefix of canonical problem URLs; the slug and a trailing `/` are appended.
    #[serde(default = "default_problem_url_base")]
    pub problem_url_base: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            problem_url_base: default_problem_url_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "https://leetcode.com/graphql".into()
}
fn default_problem_url_base() -> String {
    "https://leetcode.com/problems/".into()
}
fn default_timeout_secs() -> u64 {
    15
}

/// `[detect]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectConfig {
    /// Directory (relative to the document) holding solution sources.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Git revision to diff against when no files are given.
    #[serde(default = "default_base_ref")]
    pub base_ref: String,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            base_ref: default_base_ref(),
        }
    }
}

fn default_source_dir() -> String {
    "algorithms".into()
}
fn default_base_ref() -> String {
    "HEAD~1".into()
}

/// `[languages]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagesConfig {
    /// Languages counted in the coverage block, in display order.
    #[serde(default = "default_tracked")]
    pub tracked: Vec<String>,

    /// File extension (without dot) → language display name.
    #[serde(default = "default_extensions")]
    pub extensions: BTreeMap<String, String>,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            tracked: default_tracked(),
            extensions: default_extensions(),
        }
    }
}

impl LanguagesConfig {
    /// Language for a file, looked up by its extension (case-insensitive).
    pub fn language_for(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.extensions.get(&ext).map(String::as_str)
    }
}

fn default_tracked() -> Vec<String> {
    ["C++", "C", "Java", "Python", "Go", "JavaScript", "Rust"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_extensions() -> BTreeMap<String, String> {
    [
        ("c", "C"),
        ("cc", "C++"),
        ("cpp", "C++"),
        ("go", "Go"),
        ("java", "Java"),
        ("js", "JavaScript"),
        ("py", "Python"),
        ("rs", "Rust"),
    ]
    .into_iter()
    .map(|(ext, lang)| (ext.to_string(), lang.to_string()))
    .collect()
}

/// `[coverage]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Auxiliary directories whose flat file counts are reported.
    #[serde(default = "default_file_counts")]
    pub file_counts: Vec<FileCountSource>,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            file_counts: default_file_counts(),
        }
    }
}

/// `[[coverage.file_counts]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCountSource {
    /// Label shown in the coverage block.
    pub label: String,
    /// Directory relative to the document.
    pub dir: String,
}

fn default_file_counts() -> Vec<FileCountSource> {
    vec![
        FileCountSource {
            label: "Shell".into(),
            dir: "shell".into(),
        },
        FileCountSource {
            label: "Database".into(),
            dir: "database".into(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the per-user config file (`~/.leetlog/leetlog.toml`).
pub fn home_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LeetlogError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the application config.
///
/// An explicit path must exist. Otherwise `./leetlog.toml` and then the
/// per-user file are tried; defaults are returned if neither exists.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }

    match home_config_path() {
        Ok(path) if path.exists() => load_config_from(&path),
        _ => {
            tracing::debug!("no config file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LeetlogError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| LeetlogError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file into `dir`. Returns the path to the created file.
///
/// Refuses to overwrite an existing file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(LeetlogError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| LeetlogError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LeetlogError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
