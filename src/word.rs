//! Word tokenization and word-level edit scripts.
//!
//! A line is split into words, each a body followed by the whitespace that
//! trails it. Words compare by body only, so a change in spacing alone does
//! not produce a highlight; renderers always print the whole word.
//!
//! # Examples
//!
//! ```
//! use inline_diff_json::word::{explode_words, word_diff, WordOp};
//!
//! let src = explode_words("cat sat");
//! let dst = explode_words("cat ran");
//! let ops = word_diff(&src, &dst, 1_000);
//!
//! assert!(matches!(ops[0], WordOp::Copy(_)));
//! assert!(matches!(ops[1], WordOp::Change { .. }));
//! ```

use crate::record::HighlightType;
use similar::{capture_diff_slices, get_diff_ratio, Algorithm, DiffOp};
use std::iter::Peekable;
use std::str::CharIndices;

/// A word of a line: `body` plus its trailing whitespace make up `whole`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub body: &'a str,
    pub whole: &'a str,
}

/// One element of a word-level edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordOp<'a> {
    /// Words present on both sides (source words are kept)
    Copy(Vec<Word<'a>>),
    /// Words only in the source
    Delete(Vec<Word<'a>>),
    /// Words only in the destination
    Add(Vec<Word<'a>>),
    /// Source words replaced by destination words
    Change {
        from: Vec<Word<'a>>,
        to: Vec<Word<'a>>,
    },
}

/// A run of raw text placed into a rendered line, optionally highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlight: Option<HighlightType>,
}

fn is_ideograph(c: char) -> bool {
    matches!(
        c as u32,
        0x3040..=0x30ff | 0x3400..=0x4dbf | 0x4e00..=0x9fff | 0xf900..=0xfaff
    )
}

fn is_word_char(c: char) -> bool {
    (c.is_alphanumeric() || c == '_') && !is_ideograph(c)
}

/// Consumes whitespace and returns the offset of the next character.
fn skip_whitespace(chars: &mut Peekable<CharIndices<'_>>, len: usize) -> usize {
    while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    chars.peek().map_or(len, |(i, _)| *i)
}

/// Splits `text` into words.
///
/// Bodies are maximal runs of alphanumeric/underscore characters, or a
/// single other non-whitespace character. CJK ideographs and kana are one
/// word each. Leading whitespace becomes a word with an empty body.
pub fn explode_words(text: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut chars = text.char_indices().peekable();

    let leading_end = skip_whitespace(&mut chars, text.len());
    if leading_end > 0 {
        words.push(Word {
            body: &text[..0],
            whole: &text[..leading_end],
        });
    }

    while let Some((start, first)) = chars.next() {
        if is_word_char(first) {
            while chars.next_if(|(_, c)| is_word_char(*c)).is_some() {}
        }
        let body_end = chars.peek().map_or(text.len(), |(i, _)| *i);
        let whole_end = skip_whitespace(&mut chars, text.len());
        words.push(Word {
            body: &text[start..body_end],
            whole: &text[start..whole_end],
        });
    }

    words
}

fn capture_ops(src: &[Word<'_>], dst: &[Word<'_>]) -> Vec<DiffOp> {
    let old: Vec<&str> = src.iter().map(|w| w.body).collect();
    let new: Vec<&str> = dst.iter().map(|w| w.body).collect();
    capture_diff_slices(Algorithm::Myers, &old, &new)
}

fn exceeds_complexity(src: &[Word<'_>], dst: &[Word<'_>], max_complexity: usize) -> bool {
    src.len().saturating_mul(dst.len()) > max_complexity
}

/// Computes the word-level edit script turning `src` into `dst`.
///
/// When `src.len() * dst.len()` exceeds `max_complexity` the script
/// degrades to a single `Change` covering both sides.
pub fn word_diff<'a>(
    src: &[Word<'a>],
    dst: &[Word<'a>],
    max_complexity: usize,
) -> Vec<WordOp<'a>> {
    if exceeds_complexity(src, dst, max_complexity) {
        tracing::debug!(
            src_words = src.len(),
            dst_words = dst.len(),
            "word diff complexity exceeded, falling back to whole-line change"
        );
        return vec![WordOp::Change {
            from: src.to_vec(),
            to: dst.to_vec(),
        }];
    }

    capture_ops(src, dst)
        .into_iter()
        .map(|op| match op {
            DiffOp::Equal { old_index, len, .. } => {
                WordOp::Copy(src[old_index..old_index + len].to_vec())
            }
            DiffOp::Delete {
                old_index, old_len, ..
            } => WordOp::Delete(src[old_index..old_index + old_len].to_vec()),
            DiffOp::Insert {
                new_index, new_len, ..
            } => WordOp::Add(dst[new_index..new_index + new_len].to_vec()),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => WordOp::Change {
                from: src[old_index..old_index + old_len].to_vec(),
                to: dst[new_index..new_index + new_len].to_vec(),
            },
        })
        .collect()
}

/// Word-level similarity of two lines in `0.0..=1.0`.
///
/// Pairs too large for `max_complexity` are reported as dissimilar.
pub fn similarity(src: &str, dst: &str, max_complexity: usize) -> f32 {
    let src_words = explode_words(src);
    let dst_words = explode_words(dst);
    if exceeds_complexity(&src_words, &dst_words, max_complexity) {
        return 0.0;
    }
    let ops = capture_ops(&src_words, &dst_words);
    get_diff_ratio(&ops, src_words.len(), dst_words.len())
}

/// Lays out an edit script as the text segments of one rendered line.
///
/// A move source shows the line as it stood at its old position: copied
/// and deleted words unhighlighted, destination-only words left out. Every
/// other line gets delete highlights on removed words and add highlights
/// on inserted ones.
pub fn layout_segments<'a>(ops: &[WordOp<'a>], is_move_source: bool) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();

    let mut push = |words: &[Word<'a>], highlight: Option<HighlightType>| {
        segments.extend(words.iter().map(|w| Segment {
            text: w.whole,
            highlight,
        }));
    };

    let removed = if is_move_source {
        None
    } else {
        Some(HighlightType::Delete)
    };

    for op in ops {
        match op {
            WordOp::Copy(words) => push(words, None),
            WordOp::Delete(words) => push(words, removed),
            WordOp::Add(words) => {
                if !is_move_source {
                    push(words, Some(HighlightType::Add));
                }
            }
            WordOp::Change { from, to } => {
                push(from, removed);
                if !is_move_source {
                    push(to, Some(HighlightType::Add));
                }
            }
        }
    }

    segments
}
