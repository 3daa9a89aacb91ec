//! Utilities for converting between `(row, col)` coordinates and "A1"-style cell ids.

use serde::{Deserialize, Serialize};

/// A 0-indexed cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Encode as an "A1"-style id.
    pub fn to_id(self) -> String {
        encode(self.row, self.col)
    }

    /// Whether the coordinate lies inside a `rows x cols` sheet.
    pub fn within(self, rows: u32, cols: u32) -> bool {
        self.row < rows && self.col < cols
    }
}

/// Convert a 0-based column index to column letters (A, B, ..., Z, AA, AB, ...).
pub fn col_to_letters(col: u32) -> String {
    let mut result = String::new();
    let mut n = u64::from(col) + 1; // Convert to 1-based
    while n > 0 {
        n -= 1;
        // n % 26 < 26, so the narrowing is lossless
        #[allow(clippy::cast_possible_truncation)]
        let c = char::from(b'A' + (n % 26) as u8);
        result.insert(0, c);
        n /= 26;
    }
    result
}

/// Convert uppercase column letters back to a 0-based column index.
///
/// Returns `None` for empty input, anything that is not `A-Z`, or overflow.
pub fn letters_to_col(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_uppercase() {
            return None;
        }
        col = col
            .checked_mul(26)?
            .checked_add(u32::from(b - b'A') + 1)?;
    }
    Some(col - 1)
}

/// Encode a 0-indexed `(row, col)` pair as a cell id like "B3".
pub fn encode(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letters(col), u64::from(row) + 1)
}

/// Decode a cell id like "B3" into a 0-indexed coordinate.
///
/// The id must be uppercase letters immediately followed by a 1-based row number
/// with no leading zero. Anything else decodes to `None` and callers treat it as
/// a cell that does not exist.
pub fn decode(id: &str) -> Option<CellCoord> {
    let split = id.find(|c: char| !c.is_ascii_uppercase())?;
    let (letters, digits) = id.split_at(split);
    let col = letters_to_col(letters)?;

    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let row_1based: u32 = digits.parse().ok()?;
    Some(CellCoord::new(row_1based - 1, col))
}

/// Parse a cell range like "A1:B10" or "A1" into its two corner coordinates.
pub fn parse_cell_range(range: &str) -> Option<(CellCoord, CellCoord)> {
    if let Some((start, end)) = range.split_once(':') {
        Some((decode(start.trim())?, decode(end.trim())?))
    } else {
        let start = decode(range.trim())?;
        Some((start, start))
    }
}
