//! Typed parser for catalog table rows.
//!
//! A row looks like:
//!
//! ```text
//! |1|[Two Sum](https://leetcode.com/problems/two-sum/)|[C++](./algorithms/cpp/twoSum/twoSum.cpp), [Go](./algorithms/go/twoSum/twoSum.go)|Easy|
//! ```
//!
//! Lines whose first cell is not a number (headers, separators, prose) are not
//! rows. Lines that start like a row but do not parse are reported as malformed
//! instead of being guessed at.

use std::sync::LazyLock;

use regex::Regex;

use leetlog_shared::{CatalogRow, Difficulty, LanguageLink};

/// Matches the title cell: `[Title](url)`.
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.+)\]\((\S+)\)$").expect("title regex"));

/// Outcome of parsing a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowParse {
    /// A well-formed catalog row.
    Row(CatalogRow, RowCells),
    /// Not a catalog row (header, separator, prose, blank).
    NotARow,
    /// Looks like a row but could not be parsed.
    Malformed(String),
}

/// The raw text of a row's cells, kept so that edits preserve existing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCells {
    /// Anything before the opening `|` (normally empty).
    prefix: String,
    /// Raw `id`, `title`, `solutions`, `difficulty` cells, untrimmed.
    cells: [String; 4],
}

impl RowCells {
    /// Re-render the row with `link` appended to the solutions cell, directly
    /// before the difficulty cell. Existing cell text is kept verbatim.
    pub fn with_link(&self, link: &LanguageLink) -> String {
        let [id, title, solutions, difficulty] = &self.cells;
        let solutions = if solutions.trim().is_empty() {
            link.to_string()
        } else {
            format!("{}, {link}", solutions.trim_end())
        };
        format!(
            "{}|{id}|{title}|{solutions}|{difficulty}|",
            self.prefix
        )
    }
}

/// The numeric first cell of a line that starts like a row.
///
/// `None` for lines that are not rows at all, or whose id does not fit.
pub fn leading_id(line: &str) -> Option<u32> {
    let body = line.trim_start().strip_prefix('|')?;
    let first = body.split('|').next().unwrap_or_default().trim();
    if first.is_empty() || !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    first.parse().ok()
}

/// Parse one line of the catalog section.
pub fn parse_row(line: &str) -> RowParse {
    let trimmed = line.trim_end();
    let Some(open) = trimmed.find('|') else {
        return RowParse::NotARow;
    };
    let prefix = &trimmed[..open];
    if !prefix.trim().is_empty() {
        return RowParse::NotARow;
    }

    let body = &trimmed[open + 1..];
    let first = body.split('|').next().unwrap_or_default().trim();
    if first.is_empty() || !first.chars().all(|c| c.is_ascii_digit()) {
        return RowParse::NotARow;
    }

    let Some(body) = body.strip_suffix('|') else {
        return RowParse::Malformed("row is missing its closing '|'".into());
    };

    let raw: Vec<&str> = body.split('|').collect();
    let Ok(cells) = <[&str; 4]>::try_from(raw.as_slice()) else {
        return RowParse::Malformed(format!("expected 4 cells, found {}", raw.len()));
    };

    let id: u32 = match first.parse() {
        Ok(0) => return RowParse::Malformed("problem id must be positive".into()),
        Ok(id) => id,
        Err(e) => return RowParse::Malformed(format!("invalid problem id '{first}': {e}")),
    };

    let Some(title_caps) = TITLE_RE.captures(cells[1].trim()) else {
        return RowParse::Malformed(format!("title cell is not a link: '{}'", cells[1].trim()));
    };

    let links = match parse_links(cells[2]) {
        Ok(links) => links,
        Err(msg) => return RowParse::Malformed(msg),
    };

    let difficulty: Difficulty = match cells[3].parse() {
        Ok(d) => d,
        Err(msg) => return RowParse::Malformed(msg),
    };

    let row = CatalogRow {
        id,
        title: title_caps[1].to_string(),
        url: title_caps[2].to_string(),
        links,
        difficulty,
    };
    let cells = RowCells {
        prefix: prefix.to_string(),
        cells: cells.map(String::from),
    };

    RowParse::Row(row, cells)
}

fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

/// Parse the comma-separated solutions cell, rejecting stray text and
/// repeated languages.
fn parse_links(cell: &str) -> Result<Vec<LanguageLink>, String> {
    let mut links: Vec<LanguageLink> = Vec::new();
    let mut rest = cell.trim_start_matches(is_separator);

    while !rest.is_empty() {
        let (link, tail) = parse_link(rest)?;
        if links.iter().any(|l| l.language == link.language) {
            return Err(format!("language '{}' is linked twice", link.language));
        }
        if !tail.is_empty() && !tail.starts_with(is_separator) {
            return Err(stray_text(tail));
        }
        links.push(link);
        rest = tail.trim_start_matches(is_separator);
    }

    Ok(links)
}

/// Parse one `[Language](target)` at the start of `s`, returning the rest.
///
/// The target is either `<...>` or a bare path with balanced parentheses and
/// no whitespace.
fn parse_link(s: &str) -> Result<(LanguageLink, &str), String> {
    let err = || stray_text(s);

    let body = s.strip_prefix('[').ok_or_else(err)?;
    let close = body.find("](").ok_or_else(err)?;
    let language = body[..close].trim();
    if language.is_empty() || language.contains(['[', ']']) {
        return Err(err());
    }

    let target = &body[close + 2..];
    let (path, tail) = if let Some(inner) = target.strip_prefix('<') {
        let end = inner.find(">)").ok_or_else(err)?;
        (&inner[..end], &inner[end + 2..])
    } else {
        let mut depth = 0usize;
        let mut end = None;
        for (i, c) in target.char_indices() {
            match c {
                '(' => depth += 1,
                ')' if depth == 0 => {
                    end = Some(i);
                    break;
                }
                ')' => depth -= 1,
                c if c.is_whitespace() => return Err(err()),
                _ => {}
            }
        }
        let end = end.ok_or_else(err)?;
        (&target[..end], &target[end + 1..])
    };

    if path.trim().is_empty() {
        return Err(format!("language '{language}' has an empty link target"));
    }

    Ok((LanguageLink::new(language, path), tail))
}

fn stray_text(s: &str) -> String {
    format!("unexpected text in solutions cell: '{}'", s.trim())
}

/// Render a fresh row in canonical form.
pub fn render_row(row: &CatalogRow) -> String {
    let links = row
        .links
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "|{}|[{}]({})|{links}|{}|",
        row.id, row.title, row.url, row.difficulty
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_row(line: &str) -> (CatalogRow, RowCells) {
        match parse_row(line) {
            RowParse::Row(row, cells) => (row, cells),
            other => panic!("expected a row, got {other:?}"),
        }
    }

    #[test]
    fn parses_row_with_multiple_languages() {
        let (row, _) = expect_row(
            "|1|[Two Sum](https://leetcode.com/problems/two-sum/)| [C++](./algorithms/cpp/twoSum/twoSum.cpp), [Go](./algorithms/go/twoSum/twoSum.go)|Easy|",
        );
        assert_eq!(row.id, 1);
        assert_eq!(row.title, "Two Sum");
        assert_eq!(row.url, "https://leetcode.com/problems/two-sum/");
        assert_eq!(row.links.len(), 2);
        assert_eq!(row.links[0].language, "C++");
        assert_eq!(row.links[1].path, "./algorithms/go/twoSum/twoSum.go");
        assert_eq!(row.difficulty, Difficulty::Easy);
    }

    #[test]
    fn parses_title_with_parentheses() {
        let (row, _) = expect_row(
            "|50|[Pow(x, n)](https://leetcode.com/problems/powx-n/)|[C++](./algorithms/cpp/pow/pow.cpp)|Medium|",
        );
        assert_eq!(row.title, "Pow(x, n)");
        assert_eq!(row.url, "https://leetcode.com/problems/powx-n/");
    }

    #[test]
    fn parses_paths_with_parentheses_and_spaces() {
        let (row, _) = expect_row(
            "|50|[Pow(x, n)](https://leetcode.com/problems/powx-n/)|[C++](./algorithms/cpp/pow(x,n)/pow.cpp), [Go](<./algorithms/go/pow x n/pow.go>)|Medium|",
        );
        assert_eq!(row.links[0].path, "./algorithms/cpp/pow(x,n)/pow.cpp");
        assert_eq!(row.links[1].path, "./algorithms/go/pow x n/pow.go");

        let line = render_row(&row);
        let (again, _) = expect_row(&line);
        assert_eq!(again, row);
    }

    #[test]
    fn leading_id_covers_malformed_rows() {
        assert_eq!(leading_id("|7|[X](https://x/)|[C++](./a.cpp)|Trivial|"), Some(7));
        assert_eq!(leading_id("| 12 | broken"), Some(12));
        assert_eq!(leading_id("| # | Title |"), None);
        assert_eq!(leading_id("prose"), None);
    }

    #[test]
    fn header_and_separator_are_not_rows() {
        assert_eq!(parse_row("| # | Title | Solution | Difficulty |"), RowParse::NotARow);
        assert_eq!(parse_row("|---| ----- | -------- | ---------- |"), RowParse::NotARow);
        assert_eq!(parse_row("Some prose with a | pipe"), RowParse::NotARow);
        assert_eq!(parse_row(""), RowParse::NotARow);
    }

    #[test]
    fn malformed_rows_fail_closed() {
        let cases = [
            "|7|[Reverse Integer](https://leetcode.com/problems/reverse-integer/)|[C++](./a.cpp)|Easy",
            "|7|[Reverse Integer](https://leetcode.com/problems/reverse-integer/)|Easy|",
            "|7|Reverse Integer|[C++](./a.cpp)|Easy|",
            "|7|[Reverse Integer](https://leetcode.com/problems/reverse-integer/)|[C++](./a.cpp)|Trivial|",
            "|7|[Reverse Integer](https://leetcode.com/problems/reverse-integer/)|[C++](./a.cpp) and more|Easy|",
            "|7|[Reverse Integer](https://leetcode.com/problems/reverse-integer/)|[C++](./a.cpp), [C++](./b.cpp)|Easy|",
            "|0|[Zero](https://leetcode.com/problems/zero/)|[C++](./a.cpp)|Easy|",
            "|7|[Reverse Integer](https://leetcode.com/problems/reverse-integer/)|[C++](./a b.cpp)|Easy|",
            "|7|[Reverse Integer](https://leetcode.com/problems/reverse-integer/)|[C++](./a(b.cpp)|Easy|",
            "|7|[Reverse Integer](https://leetcode.com/problems/reverse-integer/)|[C++](./a.cpp)[Go](./b.go)|Easy|",
        ];
        for line in cases {
            assert!(
                matches!(parse_row(line), RowParse::Malformed(_)),
                "should be malformed: {line}"
            );
        }
    }

    #[test]
    fn empty_solutions_cell_is_allowed() {
        let (row, _) = expect_row("|9|[Palindrome Number](https://leetcode.com/problems/palindrome-number/)| |Easy|");
        assert!(row.links.is_empty());
    }

    #[test]
    fn with_link_preserves_existing_text() {
        let line = "|1|[Two Sum](https://leetcode.com/problems/two-sum/)| [C++](./algorithms/cpp/twoSum/twoSum.cpp) |Easy|";
        let (_, cells) = expect_row(line);
        let updated = cells.with_link(&LanguageLink::new("Go", "./algorithms/go/twoSum/twoSum.go"));
        assert_eq!(
            updated,
            "|1|[Two Sum](https://leetcode.com/problems/two-sum/)| [C++](./algorithms/cpp/twoSum/twoSum.cpp), [Go](./algorithms/go/twoSum/twoSum.go)|Easy|"
        );

        let (row, _) = expect_row(&updated);
        assert_eq!(row.links.len(), 2);
        assert_eq!(row.difficulty, Difficulty::Easy);
    }

    #[test]
    fn with_link_fills_empty_cell() {
        let (_, cells) = expect_row("|9|[Palindrome Number](https://leetcode.com/problems/palindrome-number/)||Easy|");
        assert_eq!(
            cells.with_link(&LanguageLink::new("C", "./p.c")),
            "|9|[Palindrome Number](https://leetcode.com/problems/palindrome-number/)|[C](./p.c)|Easy|"
        );
    }

    #[test]
    fn rendered_row_parses_back() {
        let row = CatalogRow {
            id: 146,
            title: "LRU Cache".into(),
            url: "https://leetcode.com/problems/lru-cache/".into(),
            links: vec![LanguageLink::new("C++", "./algorithms/cpp/LRUCache/LRUCache.cpp")],
            difficulty: Difficulty::Medium,
        };
        let line = render_row(&row);
        assert_eq!(
            line,
            "|146|[LRU Cache](https://leetcode.com/problems/lru-cache/)|[C++](./algorithms/cpp/LRUCache/LRUCache.cpp)|Medium|"
        );
        let (parsed, _) = expect_row(&line);
        assert_eq!(parsed, row);
    }
}
