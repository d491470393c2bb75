//! Atomic document replacement.

use std::path::Path;

use tracing::debug;
use uuid::Uuid;

use leetlog_shared::{LeetlogError, Result};

/// Replace `path` with `content` by writing a sibling temp file and renaming
/// it over the target. Readers never observe a partially written document.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".into());
    let temp = dir.join(format!(".{name}.{}.tmp", Uuid::now_v7()));

    std::fs::write(&temp, content).map_err(|e| LeetlogError::io(&temp, e))?;

    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(LeetlogError::io(path, e));
    }

    debug!(path = %path.display(), size = content.len(), "wrote document");
    Ok(())
}
