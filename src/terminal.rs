//! Human-readable diff output.
//!
//! [`TextRenderer`] is a [`DiffSink`] for terminals and pipes. It lays out
//! word diffs with the same move rules as the JSON renderer, but marks
//! changes with colors (terminal) or inline markers (plain text).
//!
//! Line prefixes:
//! - `"  "` unchanged context
//! - `"+ "` added line, `"- "` deleted line
//! - `"~ "` changed line
//! - `"< "` old position of a moved paragraph, `"> "` its new position
//! - `@@ -L +R @@` start of a hunk

use crate::config::DiffConfig;
use crate::record::{HighlightType, LinkDirection};
use crate::sink::{DiffSink, WordDiffLine};
use crate::word::{explode_words, layout_segments, word_diff};
use colored::*;

/// Counts of rendered lines by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStats {
    pub added: usize,
    pub deleted: usize,
    pub changed: usize,
    pub moved: usize,
}

impl TextStats {
    pub fn total_changes(&self) -> usize {
        self.added + self.deleted + self.changed + self.moved
    }

    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }
}

/// Sink producing colored or plain text lines.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    output: String,
    colorize: bool,
    max_word_complexity: usize,
    stats: TextStats,
}

impl TextRenderer {
    /// Renderer with ANSI colors.
    pub fn terminal(config: &DiffConfig) -> Self {
        Self::new(config, true)
    }

    /// Renderer with inline `[-deleted-]{+added+}` markers and no colors.
    pub fn plain(config: &DiffConfig) -> Self {
        Self::new(config, false)
    }

    fn new(config: &DiffConfig, colorize: bool) -> Self {
        Self {
            output: String::new(),
            colorize,
            max_word_complexity: config.max_word_level_diff_complexity,
            stats: TextStats::default(),
        }
    }

    pub fn stats(&self) -> &TextStats {
        &self.stats
    }

    /// The rendered lines followed by a summary.
    pub fn finish(self) -> String {
        if self.stats.is_empty() {
            let message = "No changes detected.";
            return if self.colorize {
                message.dimmed().to_string()
            } else {
                message.to_string()
            };
        }

        let mut output = self.output;
        output.push('\n');
        output.push_str(&format_summary(&self.stats));
        output
    }

    fn push_line(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn paint_line(&self, prefix: &str, text: &str, kind: HighlightType) -> String {
        if !self.colorize {
            return format!("{}{}", prefix, text);
        }
        match kind {
            HighlightType::Add => format!("{}{}", prefix.bright_green(), text.green()),
            HighlightType::Delete => format!("{}{}", prefix.bright_red(), text.red()),
        }
    }

    fn paint_segment(&self, text: &str, highlight: Option<HighlightType>) -> String {
        match (highlight, self.colorize) {
            (None, _) => text.to_string(),
            (Some(HighlightType::Add), true) => text.green().underline().to_string(),
            (Some(HighlightType::Delete), true) => text.red().strikethrough().to_string(),
            (Some(HighlightType::Add), false) => format!("{{+{}+}}", text),
            (Some(HighlightType::Delete), false) => format!("[-{}-]", text),
        }
    }
}

fn format_summary(stats: &TextStats) -> String {
    let mut parts = Vec::new();
    if stats.added > 0 {
        parts.push(format!("{} added", stats.added));
    }
    if stats.deleted > 0 {
        parts.push(format!("{} deleted", stats.deleted));
    }
    if stats.changed > 0 {
        parts.push(format!("{} changed", stats.changed));
    }
    if stats.moved > 0 {
        parts.push(format!("{} moved", stats.moved));
    }

    format!("Summary: {}", parts.join(", "))
}

impl DiffSink for TextRenderer {
    fn on_context(&mut self, text: &str, _section_title: &str, _left_line: usize, _right_line: usize) {
        let line = if self.colorize {
            format!("  {}", text.dimmed())
        } else {
            format!("  {}", text)
        };
        self.push_line(&line);
    }

    fn on_added(&mut self, text: &str, _section_title: &str, _left_line: usize, _right_line: usize) {
        self.stats.added += 1;
        let line = self.paint_line("+ ", text, HighlightType::Add);
        self.push_line(&line);
    }

    fn on_deleted(&mut self, text: &str, _section_title: &str, _left_line: usize, _right_line: usize) {
        self.stats.deleted += 1;
        let line = self.paint_line("- ", text, HighlightType::Delete);
        self.push_line(&line);
    }

    fn on_word_diff(&mut self, line: &WordDiffLine<'_>) {
        let src_words = explode_words(line.src_text);
        let dst_words = explode_words(line.dst_text);
        let ops = word_diff(&src_words, &dst_words, self.max_word_complexity);

        let prefix = if !line.is_moved() {
            self.stats.changed += 1;
            "~ "
        } else if line.is_move_source() {
            self.stats.moved += 1;
            "< "
        } else {
            "> "
        };

        let mut rendered = String::from(prefix);
        for segment in layout_segments(&ops, line.is_move_source()) {
            rendered.push_str(&self.paint_segment(segment.text, segment.highlight));
        }

        if line.is_moved() {
            let arrow = match LinkDirection::from_downward(line.move_downward) {
                LinkDirection::Down => "↓",
                LinkDirection::Up => "↑",
            };
            let link = format!("  {} {}", arrow, line.dst_anchor);
            if self.colorize {
                rendered.push_str(&link.bright_yellow().to_string());
            } else {
                rendered.push_str(&link);
            }
        }

        self.push_line(&rendered);
    }

    fn on_block_header(&mut self, left_line: usize, right_line: usize) {
        let header = format!("@@ -{} +{} @@", left_line, right_line);
        if self.colorize {
            self.push_line(&header.cyan().to_string());
        } else {
            self.push_line(&header);
        }
    }

    fn needs_json_format(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> TextRenderer {
        TextRenderer::plain(&DiffConfig::default())
    }

    #[test]
    fn test_no_changes() {
        let renderer = plain();
        assert!(!renderer.needs_json_format());
        assert_eq!(renderer.finish(), "No changes detected.");
    }

    #[test]
    fn test_plain_lines() {
        let mut renderer = plain();
        renderer.on_block_header(1, 1);
        renderer.on_context("same", "", 1, 1);
        renderer.on_added("new", "", 1, 2);
        renderer.on_deleted("old", "", 2, 2);
        let output = renderer.finish();
        assert!(output.starts_with("@@ -1 +1 @@\n  same\n+ new\n- old\n"));
        assert!(output.ends_with("Summary: 1 added, 1 deleted"));
    }

    #[test]
    fn test_plain_word_diff_markers() {
        let mut renderer = plain();
        renderer.on_word_diff(&WordDiffLine::change("cat sat", "cat ran", "", 1, 1));
        assert_eq!(renderer.stats().changed, 1);
        assert!(renderer.finish().starts_with("~ cat [-sat-]{+ran+}\n"));
    }

    #[test]
    fn test_plain_move_lines() {
        let mut renderer = plain();
        let source = WordDiffLine {
            show_right: false,
            src_anchor: "movedpara_1_4_lhs",
            dst_anchor: "movedpara_1_4_rhs",
            move_downward: true,
            ..WordDiffLine::change("cat sat", "cat ran", "", 1, 0)
        };
        let destination = WordDiffLine {
            show_left: false,
            src_anchor: "movedpara_1_4_rhs",
            dst_anchor: "movedpara_1_4_lhs",
            move_downward: false,
            ..WordDiffLine::change("cat sat", "cat ran", "", 4, 4)
        };
        renderer.on_word_diff(&source);
        renderer.on_word_diff(&destination);
        assert_eq!(renderer.stats().moved, 1);

        let output = renderer.finish();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "< cat sat  ↓ movedpara_1_4_rhs");
        assert_eq!(lines[1], "> cat [-sat-]{+ran+}  ↑ movedpara_1_4_lhs");
        assert_eq!(lines.last(), Some(&"Summary: 1 moved"));
    }

    #[test]
    fn test_format_summary() {
        let stats = TextStats {
            added: 2,
            deleted: 1,
            changed: 3,
            moved: 0,
        };
        assert_eq!(format_summary(&stats), "Summary: 2 added, 1 deleted, 3 changed");
    }
}
