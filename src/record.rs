//! Typed model of the emitted diff records.
//!
//! The renderers write the wire format directly; these types describe it
//! and let consumers parse a body back with `serde_json`. Enumerations are
//! carried on the wire as their integer codes.

use serde::Deserialize;
use std::fmt;

/// Kind of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum DiffType {
    Context,
    Change,
    MoveSource,
    MoveDestination,
}

/// Kind of a highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum HighlightType {
    Add,
    Delete,
}

/// Where the paired block of a move sits relative to this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum LinkDirection {
    Down,
    Up,
}

/// Error for an integer code with no matching variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: u8,
}

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} code {}", self.kind, self.code)
    }
}

impl std::error::Error for UnknownCode {}

macro_rules! wire_codes {
    ($ty:ident, $kind:literal, { $($variant:ident = $code:literal),+ $(,)? }) => {
        impl $ty {
            /// Integer code used on the wire.
            pub fn code(self) -> u8 {
                match self {
                    $($ty::$variant => $code,)+
                }
            }
        }

        impl TryFrom<u8> for $ty {
            type Error = UnknownCode;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($ty::$variant),)+
                    _ => Err(UnknownCode { kind: $kind, code }),
                }
            }
        }
    };
}

wire_codes!(DiffType, "diff type", {
    Context = 0,
    Change = 1,
    MoveSource = 2,
    MoveDestination = 3,
});

wire_codes!(HighlightType, "highlight type", { Add = 0, Delete = 1 });

wire_codes!(LinkDirection, "link direction", { Down = 0, Up = 1 });

impl LinkDirection {
    pub fn from_downward(downward: bool) -> Self {
        if downward {
            LinkDirection::Down
        } else {
            LinkDirection::Up
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            LinkDirection::Down => LinkDirection::Up,
            LinkDirection::Up => LinkDirection::Down,
        }
    }
}

/// A highlighted span of a record's raw text, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HighlightRange {
    pub start: usize,
    pub length: usize,
    #[serde(rename = "type")]
    pub kind: HighlightType,
}

impl HighlightRange {
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Cross-reference between the two sides of a moved paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveLink {
    pub id: String,
    pub link_id: String,
    pub link_direction: LinkDirection,
}

/// One rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRecord {
    #[serde(rename = "type")]
    pub kind: DiffType,
    pub line_number: usize,
    pub section_title: Option<String>,
    pub move_info: Option<MoveLink>,
    pub text: String,
    pub highlight_ranges: Vec<HighlightRange>,
}

/// The document produced by a full comparison: `{"diff": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiffDocument {
    pub diff: Vec<DiffRecord>,
}

/// Parses a renderer body (comma-joined records without brackets).
pub fn parse_body(body: &str) -> serde_json::Result<Vec<DiffRecord>> {
    serde_json::from_str(&format!("[{}]", body))
}
