//! Region name matching
//!
//! Resolves free-text region names against an atlas's region table.
//!
//! # Chunking
//!
//! [`decode`] lower-cases the text and splits it into maximal runs of
//! letters or digits ("chunks"). A `.` between two digits stays inside the
//! numeric run, so `L4.5` chunks as `l`, `4.5`. A first chunk starting with
//! `left` or `right` sets the [`Side`](crate::atlas::Side) and is dropped.
//! Purely numeric text is a direct code lookup.
//!
//! # Scoring
//!
//! Every table entry is chunked the same way and scored per user chunk:
//!
//! | user chunk vs. best entry chunk      | score |
//! |--------------------------------------|-------|
//! | identical                            | 4     |
//! | user chunk is a shorter prefix       | 2     |
//! | entry chunk is a shorter prefix      | 1     |
//! | no prefix relation with any chunk    | -4    |
//!
//! Entries with more chunks than the query lose one point per extra chunk,
//! and gain one when the sides agree. See [`SearchResult`] for how the
//! ranking is classified.
//!
//! # Decorated strings
//!
//! [`decode_roi_string`] reads `ATLAS:label` and `ATLAS:side:label`.

mod chunk;
mod roi;
mod score;

pub use chunk::{decode, RegionSpec, MAX_LABEL_LENGTH};
pub use roi::{decode_roi_string, MAX_ATLAS_NAME_LENGTH};
pub use score::{
    chunk_score, find_regions, score_region, Candidate, ChunkedTable, MatchKind, SearchResult,
    MAX_GUESSES,
};

use thiserror::Error;

/// Errors raised while decoding user-supplied region text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Region text is empty")]
    Empty,

    #[error("Region text is {length} characters long (at most {max})")]
    TooLong { length: usize, max: usize },

    #[error("Region string has {count} ':' separators (at most 2)")]
    TooManySeparators { count: usize },

    #[error("Region string has no ':' separator")]
    MissingSeparator,

    #[error("Region string has no atlas name")]
    EmptyAtlas,

    #[error("Side '{0}' is not one of l, r, u, b")]
    BadSide(char),

    #[error("Region string '{0}' is too short")]
    TooShort(String),

    #[error("Region code '{0}' is out of range")]
    InvalidCode(String),
}
