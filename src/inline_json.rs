//! Inline JSON renderer.
//!
//! Emits one JSON object per sink call into a [`RecordBuffer`]. Records are
//! comma-joined; wrapping them in an array is left to the caller.
//!
//! Highlight offsets count bytes of the *raw* line text, never of the
//! escaped `text` field: a consumer slices the unescaped string.
//!
//! # Examples
//!
//! ```
//! use inline_diff_json::{DiffSink, InlineJsonRenderer};
//!
//! let mut renderer = InlineJsonRenderer::default();
//! renderer.on_context("hello", "", 1, 1);
//! assert_eq!(
//!     renderer.body(),
//!     r#"{"type": 0, "lineNumber": 1, "sectionTitle": null, "moveInfo": null, "text": "hello", "highlightRanges": []}"#
//! );
//! ```

use crate::config::{DiffConfig, SectionTitlePolicy};
use crate::escape::{write_escaped_json, write_section_title};
use crate::record::{DiffType, HighlightType, LinkDirection};
use crate::sink::{DiffSink, WordDiffLine};
use crate::word::{explode_words, layout_segments, word_diff, WordOp};
use std::collections::TryReserveError;

/// Append-only output of a renderer.
///
/// `has_results` only decides whether the next record needs a separating
/// comma.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBuffer {
    out: String,
    has_results: bool,
}

impl RecordBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a record and returns the buffer to write it into.
    pub fn begin_record(&mut self) -> &mut String {
        if self.has_results {
            self.out.push(',');
        }
        self.has_results = true;
        &mut self.out
    }

    pub fn has_results(&self) -> bool {
        self.has_results
    }

    /// Reserves room for at least `additional` more bytes.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.out.try_reserve(additional)
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

/// Sink that renders every line as an inline-diff JSON record.
#[derive(Debug, Clone)]
pub struct InlineJsonRenderer {
    buffer: RecordBuffer,
    max_word_complexity: usize,
    section_titles: SectionTitlePolicy,
}

impl Default for InlineJsonRenderer {
    fn default() -> Self {
        Self::new(&DiffConfig::default())
    }
}

impl InlineJsonRenderer {
    pub fn new(config: &DiffConfig) -> Self {
        Self {
            buffer: RecordBuffer::new(),
            max_word_complexity: config.max_word_level_diff_complexity,
            section_titles: config.section_titles,
        }
    }

    /// The records emitted so far.
    pub fn body(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn buffer_mut(&mut self) -> &mut RecordBuffer {
        &mut self.buffer
    }

    pub fn into_body(self) -> String {
        self.buffer.into_string()
    }

    /// Emits the record for `line` using a precomputed word-level script.
    pub fn render_word_ops(&mut self, line: &WordDiffLine<'_>, ops: &[WordOp<'_>]) {
        let is_move_source = line.is_move_source();
        let kind = if is_move_source {
            DiffType::MoveSource
        } else if line.is_moved() {
            DiffType::MoveDestination
        } else {
            DiffType::Change
        };

        let policy = self.section_titles;
        let out = self.buffer.begin_record();
        write_record_head(out, kind, line.right_line, line.section_title, policy);
        if line.is_moved() {
            out.push_str("{\"id\": \"");
            write_escaped_json(out, line.src_anchor);
            out.push_str("\", \"linkId\": \"");
            write_escaped_json(out, line.dst_anchor);
            out.push_str("\", \"linkDirection\": ");
            push_number(out, LinkDirection::from_downward(line.move_downward).code());
            out.push('}');
        } else {
            out.push_str("null");
        }
        out.push_str(", \"text\": \"");

        let mut ranges = String::new();
        let mut cursor: usize = 0;
        for segment in layout_segments(ops, is_move_source) {
            if let Some(kind) = segment.highlight {
                if !ranges.is_empty() {
                    ranges.push(',');
                }
                ranges.push_str("{\"start\": ");
                push_number(&mut ranges, cursor);
                ranges.push_str(", \"length\": ");
                push_number(&mut ranges, segment.text.len());
                ranges.push_str(", \"type\": ");
                push_number(&mut ranges, kind.code());
                ranges.push_str(" }");
            }
            cursor += segment.text.len();
            write_escaped_json(out, segment.text);
        }

        out.push_str("\", \"highlightRanges\": [");
        out.push_str(&ranges);
        out.push_str("]}");
    }

    fn render_add_delete(
        &mut self,
        text: &str,
        highlight: HighlightType,
        section_title: &str,
        line_number: usize,
    ) {
        let policy = self.section_titles;
        let out = self.buffer.begin_record();
        write_record_head(out, DiffType::Change, line_number, section_title, policy);
        out.push_str("null, \"text\": \"");

        // An empty line still gets a visible, highlighted placeholder.
        let length = if text.is_empty() {
            out.push(' ');
            1
        } else {
            write_escaped_json(out, text);
            text.len()
        };

        out.push_str("\", \"highlightRanges\": [{\"start\": 0, \"length\": ");
        push_number(out, length);
        out.push_str(", \"type\": ");
        push_number(out, highlight.code());
        out.push_str("}]}");
    }
}

/// Writes everything up to and including `"moveInfo": `.
fn write_record_head(
    out: &mut String,
    kind: DiffType,
    line_number: usize,
    section_title: &str,
    policy: SectionTitlePolicy,
) {
    out.push_str("{\"type\": ");
    push_number(out, kind.code());
    out.push_str(", \"lineNumber\": ");
    push_number(out, line_number);
    out.push_str(", \"sectionTitle\": ");
    write_section_title(out, section_title, policy);
    out.push_str(", \"moveInfo\": ");
}

fn push_number(out: &mut String, n: impl ToString) {
    out.push_str(&n.to_string());
}

impl DiffSink for InlineJsonRenderer {
    fn on_context(&mut self, text: &str, section_title: &str, _left_line: usize, right_line: usize) {
        let policy = self.section_titles;
        let out = self.buffer.begin_record();
        write_record_head(out, DiffType::Context, right_line, section_title, policy);
        out.push_str("null, \"text\": \"");
        write_escaped_json(out, text);
        out.push_str("\", \"highlightRanges\": []}");
    }

    fn on_added(&mut self, text: &str, section_title: &str, _left_line: usize, right_line: usize) {
        self.render_add_delete(text, HighlightType::Add, section_title, right_line);
    }

    fn on_deleted(&mut self, text: &str, section_title: &str, _left_line: usize, right_line: usize) {
        self.render_add_delete(text, HighlightType::Delete, section_title, right_line);
    }

    fn on_word_diff(&mut self, line: &WordDiffLine<'_>) {
        let src_words = explode_words(line.src_text);
        let dst_words = explode_words(line.dst_text);
        let ops = word_diff(&src_words, &dst_words, self.max_word_complexity);
        self.render_word_ops(line, &ops);
    }

    fn on_block_header(&mut self, _left_line: usize, _right_line: usize) {}

    fn needs_json_format(&self) -> bool {
        true
    }
}
