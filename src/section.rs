//! Section titles derived from wikitext headings.
//!
//! Every rendered line is labelled with the closest heading at or above
//! its position in the new revision.

/// Parses a wikitext heading line (`== Title ==`) and returns its title.
///
/// Levels 1 through 6 are recognised; the title is the trimmed text
/// between the opening and closing `=` runs.
pub fn parse_heading(line: &str) -> Option<&str> {
    let line = line.trim_end();
    let leading = line.bytes().take_while(|b| *b == b'=').count();
    let trailing = line.bytes().rev().take_while(|b| *b == b'=').count();
    let level = leading.min(trailing).min(6);

    if level == 0 || line.len() <= level * 2 {
        return None;
    }

    let title = line[level..line.len() - level].trim();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Heading positions of one revision, ordered by line number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionIndex<'a> {
    headings: Vec<(usize, &'a str)>,
}

impl<'a> SectionIndex<'a> {
    /// Builds the index from 1-based `lines`.
    pub fn from_lines(lines: &[&'a str]) -> Self {
        let headings = lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| parse_heading(line).map(|title| (i + 1, title)))
            .collect();
        Self { headings }
    }

    /// Title of the section containing `line_number`, or `""` before the
    /// first heading.
    pub fn title_at(&self, line_number: usize) -> &'a str {
        let idx = self.headings.partition_point(|(line, _)| *line <= line_number);
        if idx == 0 {
            ""
        } else {
            self.headings[idx - 1].1
        }
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_heading() {
        assert_eq!(parse_heading("== History =="), Some("History"));
        assert_eq!(parse_heading("===Early life===  "), Some("Early life"));
        assert_eq!(parse_heading("= Top ="), Some("Top"));
        assert_eq!(parse_heading("=== Uneven =="), Some("= Uneven"));
    }

    #[test]
    fn test_parse_heading_rejects() {
        assert_eq!(parse_heading("plain text"), None);
        assert_eq!(parse_heading("===="), None);
        assert_eq!(parse_heading("== =="), None);
        assert_eq!(parse_heading("== open"), None);
        assert_eq!(parse_heading(""), None);
    }

    #[test]
    fn test_title_at() {
        let lines = ["intro", "== A ==", "a1", "== B ==", "b1"];
        let index = SectionIndex::from_lines(&lines);
        assert_eq!(index.len(), 2);
        assert_eq!(index.title_at(0), "");
        assert_eq!(index.title_at(1), "");
        assert_eq!(index.title_at(2), "A");
        assert_eq!(index.title_at(3), "A");
        assert_eq!(index.title_at(4), "B");
        assert_eq!(index.title_at(99), "B");
    }
}
