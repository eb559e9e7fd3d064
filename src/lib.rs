//! inline-diff-json - inline diff renderer for text revisions.
//!
//! Compares two revisions line by line, pairs changed lines into word-level
//! diffs, detects paragraphs that moved, and renders the result as a list of
//! JSON records for an inline diff view. Each record carries byte ranges of
//! added/deleted words and, for moved paragraphs, anchors linking both
//! positions.
//!
//! # Example
//!
//! ```
//! use inline_diff_json::{try_compare, DiffConfig, DiffDocument, DiffType};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let old = "== Intro ==\nThe cat sat on the mat.";
//! let new = "== Intro ==\nThe cat ran on the mat.";
//!
//! let document = try_compare(old, new, &DiffConfig::default())?;
//! let parsed: DiffDocument = serde_json::from_str(&document)?;
//!
//! let change = &parsed.diff[1];
//! assert_eq!(change.kind, DiffType::Change);
//! assert_eq!(change.section_title.as_deref(), Some("Intro"));
//! assert_eq!(change.highlight_ranges.len(), 2);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod align;
pub mod compare;
pub mod config;
pub mod error;
pub mod escape;
pub mod inline_json;
pub mod record;
pub mod section;
pub mod sink;
pub mod terminal;
pub mod word;

// Re-export commonly used types for convenience
pub use align::{align, has_differences, run_diff, LineEvent};
pub use compare::{
    compare, compare_with_config, try_compare, try_compare_with_format, OutputFormat,
};
pub use config::{DiffConfig, SectionTitlePolicy};
pub use error::{CompareError, ConfigError, InputError};
pub use inline_json::{InlineJsonRenderer, RecordBuffer};
pub use record::{
    parse_body, DiffDocument, DiffRecord, DiffType, HighlightRange, HighlightType, LinkDirection,
    MoveLink,
};
pub use sink::{DiffSink, WordDiffLine};
pub use terminal::TextRenderer;
pub use word::{explode_words, word_diff, Word, WordOp};
