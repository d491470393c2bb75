//! Renders the coverage block.
//!
//! The output is a pure function of the summary, so re-running the coverage
//! job on unchanged inputs produces a byte-identical block.

use leetlog_shared::{CoverageSummary, Difficulty};

use crate::document::BlockMarkers;

/// Placeholder for figures that depend on unavailable global totals.
pub const NOT_AVAILABLE: &str = "N/A";

/// Render the full coverage block, including both marker lines.
pub fn render_block(summary: &CoverageSummary, markers: &BlockMarkers) -> Vec<String> {
    let mut out = vec![markers.start.clone(), "## Progress".to_string(), String::new()];

    // Counts table
    out.push("| Difficulty | Solved | Total | Coverage |".into());
    out.push("|:-----------|-------:|------:|---------:|".into());
    for d in Difficulty::ALL {
        out.push(format!(
            "| {} | {} | {} | {} |",
            d,
            summary.solved_count(Some(d)),
            total_cell(summary, Some(d)),
            percent_cell(summary, Some(d)),
        ));
    }
    out.push(format!(
        "| **Total** | **{}** | **{}** | **{}** |",
        summary.solved_count(None),
        total_cell(summary, None),
        percent_cell(summary, None),
    ));
    out.push(String::new());

    // Pie: by difficulty
    let by_difficulty: Vec<(String, u32)> = Difficulty::ALL
        .iter()
        .map(|&d| (d.to_string(), summary.solved_count(Some(d))))
        .collect();
    push_pie(&mut out, "Solved by difficulty", &by_difficulty);

    // Pie: by language
    push_pie(&mut out, "Solutions by language", &summary.languages);

    // Per-language counts
    out.push("| Language | Problems |".into());
    out.push("|:---------|---------:|".into());
    for (language, count) in &summary.languages {
        out.push(format!("| {language} | {count} |"));
    }

    if !summary.file_counts.is_empty() {
        out.push(String::new());
        out.push("| Other | Files |".into());
        out.push("|:------|------:|".into());
        for (label, count) in &summary.file_counts {
            out.push(format!("| {label} | {count} |"));
        }
    }

    out.push(markers.end.clone());
    out
}

fn total_cell(summary: &CoverageSummary, difficulty: Option<Difficulty>) -> String {
    summary
        .global_total(difficulty)
        .map_or_else(|| NOT_AVAILABLE.to_string(), |t| t.to_string())
}

fn percent_cell(summary: &CoverageSummary, difficulty: Option<Difficulty>) -> String {
    summary
        .percent(difficulty)
        .map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("{p:.1}%"))
}

/// Mermaid pie chart; zero-valued slices are left out.
fn push_pie(out: &mut Vec<String>, title: &str, slices: &[(String, u32)]) {
    out.push("```mermaid".into());
    out.push(format!("pie title {title}"));
    for (label, value) in slices.iter().filter(|(_, v)| *v > 0) {
        out.push(format!("    \"{label}\" : {value}"));
    }
    out.push("```".into());
    out.push(String::new());
}
