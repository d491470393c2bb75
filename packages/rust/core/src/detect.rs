//! Locating candidate source files and other filesystem facts the jobs need.

use std::path::{Component, Path, PathBuf};
use std::process::Command;

use tracing::{debug, instrument};

use leetlog_shared::{DetectConfig, LeetlogError, Result};

/// Directory that relative paths in the catalog are resolved against.
pub fn document_root(document: &Path) -> PathBuf {
    match document.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Source files added since `config.base_ref`, as paths under `root`.
///
/// Runs `git diff --name-only --diff-filter=A` inside `root`, limited to
/// `config.source_dir`.
#[instrument(skip_all, fields(root = %root.display(), base_ref = %config.base_ref))]
pub fn added_files(root: &Path, config: &DetectConfig) -> Result<Vec<PathBuf>> {
    let output = Command::new("git")
        .current_dir(root)
        .args(["diff", "--name-only", "--relative", "--diff-filter=A"])
        .arg(&config.base_ref)
        .arg("--")
        .arg(&config.source_dir)
        .output()
        .map_err(|e| LeetlogError::Git(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LeetlogError::Git(format!(
            "git diff exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let files: Vec<PathBuf> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| root.join(l))
        .collect();

    debug!(count = files.len(), "added files from git");
    Ok(files)
}

/// Link path for `file` as written in the catalog: relative to `root`, with
/// forward slashes and a leading `./`.
///
/// Files outside `root` keep their path as given.
pub fn link_path(root: &Path, file: &Path) -> String {
    let relative = match (std::path::absolute(root), std::path::absolute(file)) {
        (Ok(root), Ok(file)) => file.strip_prefix(&root).map(Path::to_path_buf).ok(),
        _ => None,
    };

    match relative {
        Some(rel) => {
            let parts: Vec<String> = rel
                .components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect();
            format!("./{}", parts.join("/"))
        }
        None => file.to_string_lossy().replace('\\', "/"),
    }
}

/// Number of regular files directly inside `dir`. A missing directory counts
/// as zero.
pub fn count_files(dir: &Path) -> Result<u32> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "directory missing, counting zero files");
            return Ok(0);
        }
        Err(e) => return Err(LeetlogError::io(dir, e)),
    };

    let mut count = 0;
    for entry in entries {
        let entry = entry.map_err(|e| LeetlogError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| LeetlogError::io(entry.path(), e))?;
        if file_type.is_file() {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("leetlog-detect-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .current_dir(dir)
            .args([
                "-c",
                "user.name=leetlog",
                "-c",
                "user.email=leetlog@example.com",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn added_files_lists_only_new_files_under_source_dir() {
        let tmp = temp_dir();
        git(&tmp, &["init", "--quiet"]);
        write(&tmp, "algorithms/cpp/twoSum/twoSum.cpp", "int a;\n");
        write(&tmp, "notes/a.txt", "a\n");
        git(&tmp, &["add", "--all"]);
        git(&tmp, &["commit", "--quiet", "-m", "first"]);

        write(&tmp, "algorithms/cpp/twoSum/twoSum.cpp", "int a = 1;\n");
        write(&tmp, "algorithms/cpp/LRUCache/LRUCache.cpp", "class LRUCache {};\n");
        write(&tmp, "notes/b.txt", "b\n");
        git(&tmp, &["add", "--all"]);
        git(&tmp, &["commit", "--quiet", "-m", "second"]);

        let config = DetectConfig {
            source_dir: "algorithms".into(),
            base_ref: "HEAD~1".into(),
        };
        let files = added_files(&tmp, &config).unwrap();
        assert_eq!(files, vec![tmp.join("algorithms/cpp/LRUCache/LRUCache.cpp")]);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn added_files_outside_a_repository_is_a_git_error() {
        let tmp = temp_dir();
        let config = DetectConfig {
            source_dir: "algorithms".into(),
            base_ref: "HEAD~1".into(),
        };
        let err = added_files(&tmp, &config).unwrap_err();
        assert!(matches!(err, LeetlogError::Git(_)));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn root_of_bare_file_name_is_cwd() {
        assert_eq!(document_root(Path::new("README.md")), PathBuf::from("."));
        assert_eq!(document_root(Path::new("repo/README.md")), PathBuf::from("repo"));
    }

    #[test]
    fn link_path_is_relative_with_dot_prefix() {
        let root = Path::new("/repo");
        let file = Path::new("/repo/algorithms/cpp/twoSum/twoSum.cpp");
        assert_eq!(link_path(root, file), "./algorithms/cpp/twoSum/twoSum.cpp");
    }

    #[test]
    fn link_path_resolves_relative_inputs() {
        let root = Path::new(".");
        let file = Path::new("algorithms/go/twoSum/twoSum.go");
        assert_eq!(link_path(root, file), "./algorithms/go/twoSum/twoSum.go");
    }

    #[test]
    fn link_path_outside_root_is_kept() {
        let root = Path::new("/repo");
        let file = Path::new("/elsewhere/a.cpp");
        assert_eq!(link_path(root, file), "/elsewhere/a.cpp");
    }

    #[test]
    fn counts_only_regular_files() {
        let tmp = temp_dir();
        let shell = tmp.join("shell");
        std::fs::create_dir_all(shell.join("nested")).unwrap();
        std::fs::write(shell.join("a.sh"), "").unwrap();
        std::fs::write(shell.join("b.sh"), "").unwrap();

        assert_eq!(count_files(&shell).unwrap(), 2);
        assert_eq!(count_files(&tmp.join("database")).unwrap(), 0);

        std::fs::remove_dir_all(&tmp).ok();
    }
}
