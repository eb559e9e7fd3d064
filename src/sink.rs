//! The callback surface between the line-alignment engine and a renderer.
//!
//! The engine classifies every rendered line and calls exactly one sink
//! method for it, in document order. Renderers differ only in how they
//! format those calls.

/// A paired old/new line handed to [`DiffSink::on_word_diff`].
///
/// `show_left != show_right` marks one side of a paragraph move; both set
/// marks an ordinary in-place change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordDiffLine<'a> {
    pub src_text: &'a str,
    pub dst_text: &'a str,
    pub section_title: &'a str,
    pub left_line: usize,
    pub right_line: usize,
    pub show_left: bool,
    pub show_right: bool,
    pub src_anchor: &'a str,
    pub dst_anchor: &'a str,
    pub move_downward: bool,
}

impl<'a> WordDiffLine<'a> {
    /// An ordinary in-place change of `src_text` into `dst_text`.
    pub fn change(
        src_text: &'a str,
        dst_text: &'a str,
        section_title: &'a str,
        left_line: usize,
        right_line: usize,
    ) -> Self {
        Self {
            src_text,
            dst_text,
            section_title,
            left_line,
            right_line,
            show_left: true,
            show_right: true,
            src_anchor: "",
            dst_anchor: "",
            move_downward: false,
        }
    }

    /// True when this line is one side of a paragraph move.
    pub fn is_moved(&self) -> bool {
        self.show_left != self.show_right
    }

    /// True when this line is the old position of a moved paragraph.
    pub fn is_move_source(&self) -> bool {
        self.is_moved() && self.show_left
    }
}

/// Receiver of classified diff lines.
pub trait DiffSink {
    /// An unchanged line.
    fn on_context(&mut self, text: &str, section_title: &str, left_line: usize, right_line: usize);

    /// A line present only in the new revision.
    fn on_added(&mut self, text: &str, section_title: &str, left_line: usize, right_line: usize);

    /// A line present only in the old revision.
    fn on_deleted(&mut self, text: &str, section_title: &str, left_line: usize, right_line: usize);

    /// A changed line pair, or one side of a moved paragraph.
    fn on_word_diff(&mut self, line: &WordDiffLine<'_>);

    /// Start of a new hunk.
    fn on_block_header(&mut self, left_line: usize, right_line: usize);

    /// Whether the sink emits JSON records.
    fn needs_json_format(&self) -> bool;
}
