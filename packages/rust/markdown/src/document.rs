//! In-memory catalog document and the row merge engine.

use std::ops::Range;

use tracing::{debug, warn};

use leetlog_shared::{CatalogRow, Difficulty, DocumentConfig, LanguageLink, LeetlogError, Result};

use crate::row::{RowCells, RowParse, leading_id, parse_row, render_row};

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

/// Lines delimiting the catalog table section.
#[derive(Debug, Clone)]
pub struct TableMarkers {
    /// Header line opening the section.
    pub start: String,
    /// Header line of the next section; the catalog section ends before it.
    pub end: String,
}

impl From<&DocumentConfig> for TableMarkers {
    fn from(config: &DocumentConfig) -> Self {
        Self {
            start: config.table_start.clone(),
            end: config.table_end.clone(),
        }
    }
}

/// Lines delimiting the coverage block, plus the fallback insertion anchor.
#[derive(Debug, Clone)]
pub struct BlockMarkers {
    pub start: String,
    pub end: String,
    /// Prefix of the line after which the block goes when no markers exist.
    pub anchor: String,
}

impl From<&DocumentConfig> for BlockMarkers {
    fn from(config: &DocumentConfig) -> Self {
        Self {
            start: config.coverage_start.clone(),
            end: config.coverage_end.clone(),
            anchor: config.coverage_anchor.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scan results
// ---------------------------------------------------------------------------

/// A parse problem inside the catalog section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number in the document.
    pub line: usize,
    /// Problem id from the first cell, when it is a number.
    pub id: Option<u32>,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// A parsed row together with its position and raw cells.
#[derive(Debug, Clone)]
pub struct TableRow {
    /// 0-based line index in the document.
    pub index: usize,
    pub row: CatalogRow,
    pub cells: RowCells,
}

/// Every row of the catalog section, in document order.
#[derive(Debug, Clone, Default)]
pub struct TableScan {
    pub rows: Vec<TableRow>,
    pub diagnostics: Vec<Diagnostic>,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// One resolved solution to merge into the catalog.
#[derive(Debug, Clone)]
pub struct Solution {
    pub id: u32,
    pub title: String,
    pub url: String,
    pub link: LanguageLink,
    pub difficulty: Difficulty,
}

/// What a merge did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new row was inserted.
    Inserted,
    /// The language was appended to an existing row.
    LanguageAdded,
    /// The row already links this language; nothing changed.
    AlreadyPresent,
    /// A row for this id exists but does not parse; nothing changed.
    MalformedRow,
}

/// Where the coverage block ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockPlacement {
    /// Existing block between the markers was replaced.
    Replaced,
    /// No markers; inserted after the anchor line.
    InsertedAfterAnchor,
    /// No markers and no anchor; inserted at the top.
    InsertedAtTop,
}

// ---------------------------------------------------------------------------
// CatalogDocument
// ---------------------------------------------------------------------------

/// One document line and the terminator it had on disk.
#[derive(Debug, Clone)]
struct Line {
    text: String,
    /// `"\n"`, `"\r\n"`, or empty for a final line without a newline.
    ending: &'static str,
}

/// The catalog Markdown document, held as lines.
///
/// Each line keeps its own terminator, so untouched lines render exactly as
/// they were read. New lines use the document's dominant terminator.
#[derive(Debug, Clone)]
pub struct CatalogDocument {
    lines: Vec<Line>,
    line_ending: &'static str,
    markers: TableMarkers,
}

impl CatalogDocument {
    /// Split document text into lines.
    pub fn parse(content: &str, markers: TableMarkers) -> Self {
        let mut lines = Vec::new();
        let (mut crlf, mut lf) = (0usize, 0usize);

        for raw in content.split_inclusive('\n') {
            let (text, ending) = if let Some(t) = raw.strip_suffix("\r\n") {
                crlf += 1;
                (t, "\r\n")
            } else if let Some(t) = raw.strip_suffix('\n') {
                lf += 1;
                (t, "\n")
            } else {
                (raw, "")
            };
            lines.push(Line {
                text: text.to_string(),
                ending,
            });
        }

        Self {
            lines,
            line_ending: if crlf > lf { "\r\n" } else { "\n" },
            markers,
        }
    }

    /// Render the document back to text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push_str(line.ending);
        }
        out
    }

    /// Whether the catalog section marker is present.
    pub fn has_section(&self) -> bool {
        self.section_bounds().is_some()
    }

    /// Fail unless the catalog section marker is present.
    pub fn require_section(&self) -> Result<()> {
        if self.has_section() {
            Ok(())
        } else {
            Err(self.missing_section())
        }
    }

    /// Parse every row of the catalog section. Empty when the section is missing.
    pub fn scan(&self) -> TableScan {
        let mut scan = TableScan::default();
        let Some((start, end)) = self.section_bounds() else {
            return scan;
        };

        for index in start + 1..end {
            let text = &self.lines[index].text;
            match parse_row(text) {
                RowParse::Row(row, cells) => scan.rows.push(TableRow { index, row, cells }),
                RowParse::NotARow => {}
                RowParse::Malformed(message) => scan.diagnostics.push(Diagnostic {
                    line: index + 1,
                    id: leading_id(text),
                    message,
                }),
            }
        }

        scan
    }

    /// Merge one solution into the catalog section.
    ///
    /// An existing row gains the language link unless it already has it. A
    /// malformed row with the same id is left alone. A new row goes before the
    /// first row with a smaller id, or after the last line of the table.
    pub fn merge(&mut self, solution: &Solution) -> Result<MergeOutcome> {
        let Some((start, end)) = self.section_bounds() else {
            return Err(self.missing_section());
        };
        let scan = self.scan();

        if let Some(existing) = scan.rows.iter().find(|r| r.row.id == solution.id) {
            if existing.row.has_language(&solution.link.language) {
                return Ok(MergeOutcome::AlreadyPresent);
            }
            self.lines[existing.index].text = existing.cells.with_link(&solution.link);
            debug!(id = solution.id, language = %solution.link.language, "appended language link");
            return Ok(MergeOutcome::LanguageAdded);
        }

        if let Some(bad) = scan.diagnostics.iter().find(|d| d.id == Some(solution.id)) {
            warn!(
                id = solution.id,
                line = bad.line,
                reason = %bad.message,
                "existing row does not parse, leaving it unchanged"
            );
            return Ok(MergeOutcome::MalformedRow);
        }

        let row = CatalogRow {
            id: solution.id,
            title: solution.title.clone(),
            url: solution.url.clone(),
            links: vec![solution.link.clone()],
            difficulty: solution.difficulty,
        };

        let at = (start + 1..end)
            .find(|&i| leading_id(&self.lines[i].text).is_some_and(|id| id < solution.id))
            .unwrap_or_else(|| self.table_tail(start, end));

        self.splice(at..at, std::iter::once(render_row(&row)));
        debug!(id = solution.id, line = at + 1, "inserted row");
        Ok(MergeOutcome::Inserted)
    }

    /// Replace the coverage block with `block` (which includes its markers).
    pub fn replace_block(&mut self, markers: &BlockMarkers, block: &[String]) -> Result<BlockPlacement> {
        let start = self.find_line(&markers.start, 0);
        let end = match start {
            Some(s) => self.find_line(&markers.end, s + 1),
            None => self.find_line(&markers.end, 0),
        };

        match (start, end) {
            (Some(s), Some(e)) => {
                self.splice(s..e + 1, block.iter().cloned());
                Ok(BlockPlacement::Replaced)
            }
            (Some(s), None) => Err(LeetlogError::validation(format!(
                "coverage marker '{}' on line {} has no matching '{}'",
                markers.start,
                s + 1,
                markers.end
            ))),
            (None, Some(e)) => Err(LeetlogError::validation(format!(
                "coverage marker '{}' on line {} has no matching '{}'",
                markers.end,
                e + 1,
                markers.start
            ))),
            (None, None) => {
                let anchor = self
                    .lines
                    .iter()
                    .position(|l| l.text.starts_with(markers.anchor.as_str()));
                match anchor {
                    Some(a) => {
                        let insert = std::iter::once(String::new()).chain(block.iter().cloned());
                        self.splice(a + 1..a + 1, insert);
                        Ok(BlockPlacement::InsertedAfterAnchor)
                    }
                    None => {
                        let insert = block.iter().cloned().chain(std::iter::once(String::new()));
                        self.splice(0..0, insert);
                        Ok(BlockPlacement::InsertedAtTop)
                    }
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn missing_section(&self) -> LeetlogError {
        LeetlogError::validation(format!(
            "catalog section marker '{}' not found",
            self.markers.start
        ))
    }

    /// Replace `range` with new lines terminated by the dominant line ending.
    /// A document without a final newline keeps its last line unterminated.
    fn splice(&mut self, range: Range<usize>, texts: impl IntoIterator<Item = String>) {
        let unterminated = self.lines.last().is_some_and(|l| l.ending.is_empty());
        let ending = self.line_ending;
        let new: Vec<Line> = texts.into_iter().map(|text| Line { text, ending }).collect();
        self.lines.splice(range, new);

        if unterminated {
            for line in &mut self.lines {
                if line.ending.is_empty() {
                    line.ending = ending;
                }
            }
            if let Some(last) = self.lines.last_mut() {
                last.ending = "";
            }
        }
    }

    /// First line at or after `from` equal to `marker`, ignoring surrounding whitespace.
    fn find_line(&self, marker: &str, from: usize) -> Option<usize> {
        let marker = marker.trim();
        self.lines
            .iter()
            .skip(from)
            .position(|l| l.text.trim() == marker)
            .map(|i| i + from)
    }

    /// `(start marker index, exclusive end index)` of the catalog section.
    ///
    /// Without an end marker the section stops at the first blank line after
    /// its first table line, or at the end of the document.
    fn section_bounds(&self) -> Option<(usize, usize)> {
        let start = self.find_line(&self.markers.start, 0)?;
        if let Some(end) = self.find_line(&self.markers.end, start + 1) {
            return Some((start, end));
        }

        let len = self.lines.len();
        let end = (start + 1..len)
            .find(|&i| is_table_line(&self.lines[i].text))
            .and_then(|first| (first..len).find(|&i| self.lines[i].text.trim().is_empty()))
            .unwrap_or(len);
        Some((start, end))
    }

    /// Insertion index after the last table line of the section.
    fn table_tail(&self, start: usize, end: usize) -> usize {
        (start + 1..end)
            .rev()
            .find(|&i| is_table_line(&self.lines[i].text))
            .map_or(start + 1, |i| i + 1)
    }
}

fn is_table_line(text: &str) -> bool {
    text.trim_start().starts_with('|')
}
