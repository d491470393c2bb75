//! Core domain types for the solved-problems catalog.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Problem difficulty as reported by the metadata service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties in display order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// The label used in the catalog table and the coverage block.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// ProblemMetadata
// ---------------------------------------------------------------------------

/// Metadata returned by the remote service for a single slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemMetadata {
    /// Public problem number.
    pub frontend_id: u32,
    /// Problem title.
    pub title: String,
    /// Problem difficulty.
    pub difficulty: Difficulty,
}

// ---------------------------------------------------------------------------
// Catalog rows
// ---------------------------------------------------------------------------

/// One `[Language](path)` entry inside a catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageLink {
    /// Language display name (e.g. `C++`).
    pub language: String,
    /// Path of the solution, relative to the catalog document.
    pub path: String,
}

impl LanguageLink {
    pub fn new(language: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            path: path.into(),
        }
    }
}

impl std::fmt::Display for LanguageLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if needs_angle_brackets(&self.path) {
            write!(f, "[{}](<{}>)", self.language, self.path)
        } else {
            write!(f, "[{}]({})", self.language, self.path)
        }
    }
}

/// A bare link target may not contain whitespace or unbalanced parentheses.
fn needs_angle_brackets(path: &str) -> bool {
    let mut depth = 0usize;
    for c in path.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return true,
            ')' => depth -= 1,
            c if c.is_whitespace() => return true,
            _ => {}
        }
    }
    depth != 0
}

/// A single problem row of the catalog table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    /// Problem number; unique within the table.
    pub id: u32,
    /// Problem title.
    pub title: String,
    /// Canonical problem URL.
    pub url: String,
    /// Solutions, at most one per language, in document order.
    pub links: Vec<LanguageLink>,
    /// Problem difficulty.
    pub difficulty: Difficulty,
}

impl CatalogRow {
    /// Whether this row already links a solution in `language`.
    pub fn has_language(&self, language: &str) -> bool {
        self.links.iter().any(|link| link.language == language)
    }
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

/// Solved-problem counts per difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyCounts {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

impl DifficultyCounts {
    pub fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn increment(&mut self, difficulty: Difficulty) {
        match difficulty {
            Difficulty::Easy => self.easy += 1,
            Difficulty::Medium => self.medium += 1,
            Difficulty::Hard => self.hard += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.easy + self.medium + self.hard
    }
}

/// Global problem totals reported by the metadata service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyTotals {
    /// Per-difficulty totals.
    pub by_difficulty: DifficultyCounts,
    /// The service's own "All" aggregate.
    pub all: u32,
}

/// Aggregated statistics rendered into the coverage block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageSummary {
    /// Distinct solved problems per difficulty.
    pub solved: DifficultyCounts,
    /// Global totals; `None` when the service could not be reached.
    pub totals: Option<DifficultyTotals>,
    /// `(language, rows linking that language)` in tracked order.
    pub languages: Vec<(String, u32)>,
    /// `(label, file count)` for the auxiliary directories.
    pub file_counts: Vec<(String, u32)>,
}

impl CoverageSummary {
    /// Global total for one difficulty, or for everything when `None`.
    pub fn global_total(&self, difficulty: Option<Difficulty>) -> Option<u32> {
        let totals = self.totals?;
        Some(match difficulty {
            Some(d) => totals.by_difficulty.get(d),
            None => totals.all,
        })
    }

    /// Solved count for one difficulty, or for everything when `None`.
    pub fn solved_count(&self, difficulty: Option<Difficulty>) -> u32 {
        match difficulty {
            Some(d) => self.solved.get(d),
            None => self.solved.total(),
        }
    }

    /// Solved / global total × 100, rounded to one decimal place.
    ///
    /// `None` when the global total is unavailable or zero.
    pub fn percent(&self, difficulty: Option<Difficulty>) -> Option<f64> {
        let total = self.global_total(difficulty)?;
        if total == 0 {
            return None;
        }
        let raw = f64::from(self.solved_count(difficulty)) * 100.0 / f64::from(total);
        Some((raw * 10.0).round() / 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_parses_and_displays() {
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!(" Hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("Impossible".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Easy.to_string(), "Easy");
    }

    #[test]
    fn difficulty_deserializes_from_service_label() {
        let d: Difficulty = serde_json::from_str("\"Hard\"").unwrap();
        assert_eq!(d, Difficulty::Hard);
    }

    #[test]
    fn row_language_lookup_is_exact() {
        let row = CatalogRow {
            id: 1,
            title: "Two Sum".into(),
            url: "https://leetcode.com/problems/two-sum/".into(),
            links: vec![LanguageLink::new("C++", "./algorithms/cpp/twoSum/twoSum.cpp")],
            difficulty: Difficulty::Easy,
        };
        assert!(row.has_language("C++"));
        assert!(!row.has_language("C"));
    }

    #[test]
    fn link_renders_as_markdown() {
        let link = LanguageLink::new("Python", "./algorithms/python/twoSum/twoSum.py");
        assert_eq!(
            link.to_string(),
            "[Python](./algorithms/python/twoSum/twoSum.py)"
        );
    }

    #[test]
    fn link_wraps_awkward_paths_in_angle_brackets() {
        let balanced = LanguageLink::new("C++", "./algorithms/cpp/pow(x,n)/pow.cpp");
        assert_eq!(balanced.to_string(), "[C++](./algorithms/cpp/pow(x,n)/pow.cpp)");

        let spaced = LanguageLink::new("Go", "./algorithms/go/two sum/main.go");
        assert_eq!(spaced.to_string(), "[Go](<./algorithms/go/two sum/main.go>)");

        let unbalanced = LanguageLink::new("C", "./a)b.c");
        assert_eq!(unbalanced.to_string(), "[C](<./a)b.c>)");
    }

    #[test]
    fn counts_total() {
        let mut counts = DifficultyCounts::default();
        counts.increment(Difficulty::Easy);
        counts.increment(Difficulty::Hard);
        counts.increment(Difficulty::Hard);
        assert_eq!(counts.get(Difficulty::Hard), 2);
        assert_eq!(counts.total(), 3);
    }

    fn summary(totals: Option<DifficultyTotals>) -> CoverageSummary {
        CoverageSummary {
            solved: DifficultyCounts {
                easy: 1,
                medium: 2,
                hard: 0,
            },
            totals,
            languages: vec![],
            file_counts: vec![],
        }
    }

    #[test]
    fn percent_rounds_to_one_decimal() {
        let s = summary(Some(DifficultyTotals {
            by_difficulty: DifficultyCounts {
                easy: 3,
                medium: 7,
                hard: 5,
            },
            all: 15,
        }));
        assert_eq!(s.percent(Some(Difficulty::Easy)), Some(33.3));
        assert_eq!(s.percent(Some(Difficulty::Medium)), Some(28.6));
        assert_eq!(s.percent(Some(Difficulty::Hard)), Some(0.0));
        assert_eq!(s.percent(None), Some(20.0));
    }

    #[test]
    fn percent_unavailable_without_totals() {
        let s = summary(None);
        assert_eq!(s.percent(Some(Difficulty::Easy)), None);
        assert_eq!(s.percent(None), None);
        assert_eq!(s.global_total(None), None);
    }

    #[test]
    fn percent_unavailable_for_zero_total() {
        let s = summary(Some(DifficultyTotals {
            by_difficulty: DifficultyCounts::default(),
            all: 0,
        }));
        assert_eq!(s.percent(Some(Difficulty::Easy)), None);
    }
}
