//! Line alignment and paragraph move detection.
//!
//! This module decides what changed between two revisions and drives a
//! [`DiffSink`] with one call per rendered line:
//!
//! 1. A line-level Myers diff splits both revisions into equal, deleted,
//!    inserted and replaced runs.
//! 2. Replaced runs are paired in order; pairs that are similar enough
//!    become word diffs, the rest deletions and additions.
//! 3. Remaining deletions and additions are matched up as paragraph moves.
//! 4. Unchanged lines far from any change are dropped, and a block header
//!    opens each hunk.
//!
//! # Examples
//!
//! ```
//! use inline_diff_json::align::{align, LineEvent};
//! use inline_diff_json::DiffConfig;
//!
//! let events = align("a\nb\nc", "a\nB\nc", &DiffConfig::default());
//! assert!(matches!(events[0], LineEvent::BlockHeader { .. }));
//! assert!(events.iter().any(|e| matches!(e, LineEvent::Deleted { text: "b", .. })));
//! ```

use crate::config::DiffConfig;
use crate::section::SectionIndex;
use crate::sink::{DiffSink, WordDiffLine};
use crate::word::similarity;
use similar::{capture_diff_slices, Algorithm, DiffOp};

/// Which side of a paragraph move a line renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSide {
    Source,
    Destination,
}

/// One side of a moved paragraph.
///
/// `src_text`/`dst_text` are always the old and new text of the paragraph;
/// the anchors are given from this side's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedLine<'a> {
    pub side: MoveSide,
    pub src_text: &'a str,
    pub dst_text: &'a str,
    pub left_line: usize,
    pub right_line: usize,
    pub src_anchor: String,
    pub dst_anchor: String,
    pub downward: bool,
}

/// A classified line, in document order.
///
/// One-sided lines carry the number of the last line seen on the other
/// side (0 before the first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent<'a> {
    BlockHeader {
        left_line: usize,
        right_line: usize,
    },
    Context {
        text: &'a str,
        left_line: usize,
        right_line: usize,
    },
    Added {
        text: &'a str,
        left_line: usize,
        right_line: usize,
    },
    Deleted {
        text: &'a str,
        left_line: usize,
        right_line: usize,
    },
    Changed {
        src_text: &'a str,
        dst_text: &'a str,
        left_line: usize,
        right_line: usize,
    },
    Moved(MovedLine<'a>),
}

impl LineEvent<'_> {
    /// Left and right line numbers of the event.
    pub fn lines(&self) -> (usize, usize) {
        match self {
            LineEvent::BlockHeader {
                left_line,
                right_line,
            }
            | LineEvent::Context {
                left_line,
                right_line,
                ..
            }
            | LineEvent::Added {
                left_line,
                right_line,
                ..
            }
            | LineEvent::Deleted {
                left_line,
                right_line,
                ..
            }
            | LineEvent::Changed {
                left_line,
                right_line,
                ..
            } => (*left_line, *right_line),
            LineEvent::Moved(moved) => (moved.left_line, moved.right_line),
        }
    }

    fn is_context(&self) -> bool {
        matches!(self, LineEvent::Context { .. })
    }
}

/// Splits a revision into lines. A final newline does not start an
/// extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.split('\n').collect()
}

/// True when the revisions differ in at least one line.
pub fn has_differences(old: &str, new: &str) -> bool {
    split_lines(old) != split_lines(new)
}

/// Classifies every line of `old` and `new`.
///
/// Returns an empty list when the revisions have identical lines.
pub fn align<'a>(old: &'a str, new: &'a str, config: &DiffConfig) -> Vec<LineEvent<'a>> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    align_lines(&old_lines, &new_lines, config)
}

fn align_lines<'a>(
    old_lines: &[&'a str],
    new_lines: &[&'a str],
    config: &DiffConfig,
) -> Vec<LineEvent<'a>> {
    let mut events = classify(old_lines, new_lines, config);
    detect_moves(&mut events, config);
    select_context(events, config.context_lines)
}

/// Accumulates classified lines while tracking both line counters.
struct Classifier<'a> {
    events: Vec<LineEvent<'a>>,
    left: usize,
    right: usize,
}

impl<'a> Classifier<'a> {
    fn context(&mut self, text: &'a str) {
        self.left += 1;
        self.right += 1;
        self.events.push(LineEvent::Context {
            text,
            left_line: self.left,
            right_line: self.right,
        });
    }

    fn deleted(&mut self, text: &'a str) {
        self.left += 1;
        self.events.push(LineEvent::Deleted {
            text,
            left_line: self.left,
            right_line: self.right,
        });
    }

    fn added(&mut self, text: &'a str) {
        self.right += 1;
        self.events.push(LineEvent::Added {
            text,
            left_line: self.left,
            right_line: self.right,
        });
    }

    fn changed(&mut self, src_text: &'a str, dst_text: &'a str) {
        self.left += 1;
        self.right += 1;
        self.events.push(LineEvent::Changed {
            src_text,
            dst_text,
            left_line: self.left,
            right_line: self.right,
        });
    }

    /// Pairs a replaced run in order: each old line takes the next new
    /// line similar enough to it, skipped new lines become additions.
    fn replaced(&mut self, old_run: &[&'a str], new_run: &[&'a str], config: &DiffConfig) {
        let lookahead = config.moved_paragraph_detection_cutoff.max(1);
        let mut next_new = 0;

        for &src in old_run {
            let matched = (next_new..new_run.len()).take(lookahead).find(|&j| {
                similarity(src, new_run[j], config.max_word_level_diff_complexity)
                    >= config.change_threshold
            });
            match matched {
                Some(j) => {
                    for &dst in &new_run[next_new..j] {
                        self.added(dst);
                    }
                    self.changed(src, new_run[j]);
                    next_new = j + 1;
                }
                None => self.deleted(src),
            }
        }

        for &dst in &new_run[next_new..] {
            self.added(dst);
        }
    }
}

fn classify<'a>(
    old_lines: &[&'a str],
    new_lines: &[&'a str],
    config: &DiffConfig,
) -> Vec<LineEvent<'a>> {
    let ops = capture_diff_slices(Algorithm::Myers, old_lines, new_lines);
    let mut classifier = Classifier {
        events: Vec::with_capacity(old_lines.len().max(new_lines.len())),
        left: 0,
        right: 0,
    };

    for op in ops {
        let (_, old_range, new_range) = op.as_tag_tuple();
        match op {
            DiffOp::Equal { .. } => {
                for &text in &old_lines[old_range] {
                    classifier.context(text);
                }
            }
            DiffOp::Delete { .. } => {
                for &text in &old_lines[old_range] {
                    classifier.deleted(text);
                }
            }
            DiffOp::Insert { .. } => {
                for &text in &new_lines[new_range] {
                    classifier.added(text);
                }
            }
            DiffOp::Replace { .. } => {
                tracing::debug!(
                    old_len = old_range.len(),
                    new_len = new_range.len(),
                    "pairing replaced lines"
                );
                classifier.replaced(&old_lines[old_range], &new_lines[new_range], config);
            }
        }
    }

    classifier.events
}

/// Turns matching deleted/added pairs into move source/destination events.
fn detect_moves(events: &mut [LineEvent<'_>], config: &DiffConfig) {
    let deleted: Vec<usize> = positions(events, |e| matches!(e, LineEvent::Deleted { .. }));
    let added: Vec<usize> = positions(events, |e| matches!(e, LineEvent::Added { .. }));

    if deleted.is_empty() || added.is_empty() {
        return;
    }
    let cutoff = config.moved_paragraph_detection_cutoff;
    if deleted.len() > cutoff || added.len() > cutoff {
        tracing::debug!(
            deleted = deleted.len(),
            added = added.len(),
            cutoff,
            "too many candidates, skipping move detection"
        );
        return;
    }

    let mut taken = vec![false; added.len()];
    let mut pairs = Vec::new();

    for &src_idx in &deleted {
        let LineEvent::Deleted { text: src, .. } = events[src_idx] else {
            continue;
        };
        if src.trim().is_empty() {
            continue;
        }

        let mut best: Option<(usize, f32)> = None;
        for (slot, &dst_idx) in added.iter().enumerate() {
            if taken[slot] {
                continue;
            }
            let LineEvent::Added { text: dst, .. } = events[dst_idx] else {
                continue;
            };
            let score = similarity(src, dst, config.max_word_level_diff_complexity);
            if score >= config.move_similarity_threshold
                && best.map_or(true, |(_, best_score)| score > best_score)
            {
                best = Some((slot, score));
            }
        }

        if let Some((slot, score)) = best {
            taken[slot] = true;
            tracing::debug!(src_idx, dst_idx = added[slot], score, "paragraph move detected");
            pairs.push((src_idx, added[slot]));
        }
    }

    for (src_idx, dst_idx) in pairs {
        let (src_text, left_line, src_right) = match events[src_idx] {
            LineEvent::Deleted {
                text,
                left_line,
                right_line,
            } => (text, left_line, right_line),
            _ => continue,
        };
        let (dst_text, dst_left, right_line) = match events[dst_idx] {
            LineEvent::Added {
                text,
                left_line,
                right_line,
            } => (text, left_line, right_line),
            _ => continue,
        };

        let lhs = format!("movedpara_{}_{}_lhs", left_line, right_line);
        let rhs = format!("movedpara_{}_{}_rhs", left_line, right_line);
        let downward = dst_idx > src_idx;

        events[src_idx] = LineEvent::Moved(MovedLine {
            side: MoveSide::Source,
            src_text,
            dst_text,
            left_line,
            right_line: src_right,
            src_anchor: lhs.clone(),
            dst_anchor: rhs.clone(),
            downward,
        });
        events[dst_idx] = LineEvent::Moved(MovedLine {
            side: MoveSide::Destination,
            src_text,
            dst_text,
            left_line: dst_left,
            right_line,
            src_anchor: rhs,
            dst_anchor: lhs,
            downward: !downward,
        });
    }
}

fn positions(events: &[LineEvent<'_>], pred: impl Fn(&LineEvent<'_>) -> bool) -> Vec<usize> {
    events
        .iter()
        .enumerate()
        .filter(|(_, e)| pred(e))
        .map(|(i, _)| i)
        .collect()
}

/// Keeps context lines within `context_lines` of a change and opens each
/// hunk with a block header.
fn select_context(events: Vec<LineEvent<'_>>, context_lines: usize) -> Vec<LineEvent<'_>> {
    let len = events.len();
    let mut keep = vec![false; len];

    let mut last_change: Option<usize> = None;
    for (i, event) in events.iter().enumerate() {
        if !event.is_context() {
            last_change = Some(i);
        }
        keep[i] = last_change.is_some_and(|c| i - c <= context_lines);
    }
    let mut next_change: Option<usize> = None;
    for (i, event) in events.iter().enumerate().rev() {
        if !event.is_context() {
            next_change = Some(i);
        }
        keep[i] |= next_change.is_some_and(|c| c - i <= context_lines);
    }

    let mut selected = Vec::with_capacity(len);
    let mut previous_kept = false;
    for (event, kept) in events.into_iter().zip(keep) {
        if kept {
            if !previous_kept {
                let (left_line, right_line) = event.lines();
                selected.push(LineEvent::BlockHeader {
                    left_line,
                    right_line,
                });
            }
            selected.push(event);
        }
        previous_kept = kept;
    }
    selected
}

/// Replays `events` into `sink`, labelling each line with its section.
pub fn drive<S: DiffSink + ?Sized>(events: &[LineEvent<'_>], sections: &SectionIndex<'_>, sink: &mut S) {
    for event in events {
        match event {
            LineEvent::BlockHeader {
                left_line,
                right_line,
            } => sink.on_block_header(*left_line, *right_line),
            LineEvent::Context {
                text,
                left_line,
                right_line,
            } => sink.on_context(text, sections.title_at(*right_line), *left_line, *right_line),
            LineEvent::Added {
                text,
                left_line,
                right_line,
            } => sink.on_added(text, sections.title_at(*right_line), *left_line, *right_line),
            LineEvent::Deleted {
                text,
                left_line,
                right_line,
            } => sink.on_deleted(text, sections.title_at(*right_line), *left_line, *right_line),
            LineEvent::Changed {
                src_text,
                dst_text,
                left_line,
                right_line,
            } => sink.on_word_diff(&WordDiffLine::change(
                src_text,
                dst_text,
                sections.title_at(*right_line),
                *left_line,
                *right_line,
            )),
            LineEvent::Moved(moved) => sink.on_word_diff(&WordDiffLine {
                src_text: moved.src_text,
                dst_text: moved.dst_text,
                section_title: sections.title_at(moved.right_line),
                left_line: moved.left_line,
                right_line: moved.right_line,
                show_left: moved.side == MoveSide::Source,
                show_right: moved.side == MoveSide::Destination,
                src_anchor: &moved.src_anchor,
                dst_anchor: &moved.dst_anchor,
                move_downward: moved.downward,
            }),
        }
    }
}

/// Aligns `old` against `new` and feeds the result into `sink`.
///
/// Returns the number of events delivered.
pub fn run_diff<S: DiffSink + ?Sized>(old: &str, new: &str, config: &DiffConfig, sink: &mut S) -> usize {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let sections = SectionIndex::from_lines(&new_lines);

    tracing::debug!(
        old_lines = old_lines.len(),
        new_lines = new_lines.len(),
        sections = sections.len(),
        json = sink.needs_json_format(),
        "aligning revisions"
    );

    let events = align_lines(&old_lines, &new_lines, config);
    drive(&events, &sections, sink);
    events.len()
}
