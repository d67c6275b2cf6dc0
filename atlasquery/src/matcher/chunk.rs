//! Splitting region text into side and chunks.

use serde::Serialize;

use super::DecodeError;
use crate::atlas::Side;

/// Longest region text accepted by [`decode`], in characters.
pub const MAX_LABEL_LENGTH: usize = 62;

/// A decoded region name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionSpec {
    /// Text this was decoded from.
    pub original: String,
    pub side: Side,
    /// Lower-case letter or digit runs, side word removed.
    pub chunks: Vec<String>,
    /// Code given directly as a number, or the table code of a chunked entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    /// Atlas named by a decorated string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atlas: Option<String>,
}

impl RegionSpec {
    /// Chunks any label without validation. Used for region table entries.
    pub fn from_label(text: &str) -> Self {
        let mut spec = Self {
            original: text.to_string(),
            side: Side::Unknown,
            chunks: Vec::new(),
            code: None,
            atlas: None,
        };

        if let Some(code) = parse_code(text) {
            spec.code = code.ok();
            if spec.code.is_some() {
                return spec;
            }
        }

        let mut chunks = split_chunks(text);
        if let Some(first) = chunks.first() {
            let side = side_of_chunk(first);
            if side.is_lateral() {
                spec.side = side;
                chunks.remove(0);
            }
        }
        spec.chunks = chunks;
        spec
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// True for a direct code lookup.
    pub fn is_code(&self) -> bool {
        self.code.is_some() && self.chunks.is_empty()
    }

    /// Same chunks in the same order; side is ignored.
    pub fn same_chunks(&self, other: &RegionSpec) -> bool {
        self.chunks == other.chunks
    }

    /// Replaces the side found in the label.
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_atlas(mut self, atlas: impl Into<String>) -> Self {
        self.atlas = Some(atlas.into());
        self
    }
}

/// Decodes user-entered region text.
///
/// Empty text, text with no letters or digits, and text longer than
/// [`MAX_LABEL_LENGTH`] are rejected.
pub fn decode(text: &str) -> Result<RegionSpec, DecodeError> {
    if text.trim().is_empty() {
        return Err(DecodeError::Empty);
    }
    let length = text.chars().count();
    if length > MAX_LABEL_LENGTH {
        return Err(DecodeError::TooLong {
            length,
            max: MAX_LABEL_LENGTH,
        });
    }
    if let Some(Err(())) = parse_code(text) {
        return Err(DecodeError::InvalidCode(text.trim().to_string()));
    }

    let spec = RegionSpec::from_label(text);
    if !spec.is_code() && spec.chunks.is_empty() && spec.side == Side::Unknown {
        return Err(DecodeError::Empty);
    }
    Ok(spec)
}

/// `Some` when the trimmed text is all digits; `Err` if it overflows.
fn parse_code(text: &str) -> Option<Result<i32, ()>> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(trimmed.parse::<i32>().map_err(|_| ()))
}

fn side_of_chunk(chunk: &str) -> Side {
    if chunk.starts_with("left") {
        Side::Left
    } else if chunk.starts_with("right") {
        Side::Right
    } else {
        Side::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Letter,
    Digit,
    Separator,
}

fn split_chunks(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().map(|c| c.to_ascii_lowercase()).collect();
    let is_digit = |i: usize| chars.get(i).is_some_and(|c| c.is_ascii_digit());

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut class = CharClass::Separator;

    for (i, &c) in chars.iter().enumerate() {
        let next = if c.is_ascii_alphabetic() {
            CharClass::Letter
        } else if c.is_ascii_digit() || (c == '.' && i > 0 && is_digit(i - 1) && is_digit(i + 1)) {
            CharClass::Digit
        } else {
            CharClass::Separator
        };

        if next != class && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if next != CharClass::Separator {
            current.push(c);
        }
        class = next;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
