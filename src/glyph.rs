//! Structural glyph decoding — fixed 4×27 blocks of seven-segment digits.
//!
//! # Signature scheme
//! Every digit cell is a 3×3 character subgrid.  Each occupied subcell
//! multiplies a per-position prime weight into the cell's signature; an
//! empty subcell contributes 1.  The seven distinct primes fingerprint the
//! seven possible strokes (top bar, the two verticals of each half, middle
//! bar, bottom bar), so the product uniquely identifies each of the ten
//! valid patterns.  The two top corner subcells can never hold a stroke
//! and carry weight 1.
//!
//! An unmatched product decodes to [`Digit::Illegible`]; nothing is lost
//! beyond "which strokes were seen", which is exactly what the repair
//! tables in [`crate::repair`] consume.

use crate::digit::{AccountNumber, Digit, ACCOUNT_LEN};
use thiserror::Error;

/// Rows per block.  The 4th row is a blank terminator, shape-checked only.
pub const BLOCK_HEIGHT: usize = 4;
/// Columns per block: nine 3-column digit cells.
pub const BLOCK_WIDTH: usize = 27;
/// Columns per digit cell.
pub const CELL_WIDTH: usize = 3;
/// Decoded rows per digit cell.
pub const CELL_HEIGHT: usize = 3;

// ── Frozen signature tables ──────────────────────────────────────────────────
//
// These values are permanent: they define the on-page format.  The weight
// grid must stay consistent with DIGIT_SIGNATURES, and both must stay
// consistent with the repair tables.

/// Prime weight for each subcell position within a digit cell.
/// The top corners are structurally always blank and weigh 1 (identity).
pub const STROKE_WEIGHTS: [[u32; CELL_WIDTH]; CELL_HEIGHT] = [
    [1, 2, 1],
    [3, 5, 7],
    [11, 13, 17],
];

/// The seven stroke primes in weight order.  Fixes the enumeration order
/// of single-stroke repairs.
pub const STROKE_PRIMES: [u32; 7] = [2, 3, 5, 7, 11, 13, 17];

/// Signature product for each digit 0–9, indexed by digit value.
pub const DIGIT_SIGNATURES: [u32; 10] = [
    2 * 3 * 7 * 11 * 13 * 17,     // 0
    7 * 17,                       // 1
    2 * 5 * 7 * 11 * 13,          // 2
    2 * 5 * 7 * 13 * 17,          // 3
    3 * 5 * 7 * 17,               // 4
    2 * 3 * 5 * 13 * 17,          // 5
    2 * 3 * 5 * 11 * 13 * 17,     // 6
    2 * 7 * 17,                   // 7
    2 * 3 * 5 * 7 * 11 * 13 * 17, // 8
    2 * 3 * 5 * 7 * 13 * 17,      // 9
];

/// Resolve a signature product to a digit.
/// Unmatched products decode to [`Digit::Illegible`].
pub fn digit_for_signature(signature: u32) -> Digit {
    match DIGIT_SIGNATURES.iter().position(|&s| s == signature) {
        Some(d) => Digit::Known(d as u8),
        None => Digit::Illegible,
    }
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The glyph block text was absent or empty.
    #[error("glyph block is missing")]
    InputMissing,
    #[error("glyph block must be {BLOCK_HEIGHT} rows, got {rows}")]
    BadRowCount { rows: usize },
    #[error("glyph block row {row} must be {BLOCK_WIDTH} columns, got {cols}")]
    BadRowWidth { row: usize, cols: usize },
}

// ── GlyphBlock ───────────────────────────────────────────────────────────────

/// One immutable, shape-validated scan block.
///
/// Only the three glyph rows are retained; the terminator row is consumed
/// during validation and never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBlock {
    rows: [[u8; BLOCK_WIDTH]; CELL_HEIGHT],
}

impl GlyphBlock {
    /// Validate and capture a raw text block.
    ///
    /// `text` must contain exactly [`BLOCK_HEIGHT`] lines of
    /// [`BLOCK_WIDTH`] columns each (line terminators not counted).  The
    /// terminator row may also be entirely empty, tolerating sources that
    /// strip trailing blanks.  Any non-space character counts as a stroke.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        if text.is_empty() {
            return Err(DecodeError::InputMissing);
        }
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() != BLOCK_HEIGHT {
            return Err(DecodeError::BadRowCount { rows: lines.len() });
        }
        Self::from_rows(&lines)
    }

    /// Validate a block already split into [`BLOCK_HEIGHT`] rows.
    pub fn from_rows(lines: &[&str]) -> Result<Self, DecodeError> {
        if lines.len() != BLOCK_HEIGHT {
            return Err(DecodeError::BadRowCount { rows: lines.len() });
        }
        let mut rows = [[b' '; BLOCK_WIDTH]; CELL_HEIGHT];
        for (i, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            // Terminator row: framing only, content ignored.
            if i == CELL_HEIGHT {
                if width != 0 && width != BLOCK_WIDTH {
                    return Err(DecodeError::BadRowWidth { row: i, cols: width });
                }
                continue;
            }
            if width != BLOCK_WIDTH {
                return Err(DecodeError::BadRowWidth { row: i, cols: width });
            }
            for (j, ch) in line.chars().enumerate() {
                rows[i][j] = if ch == ' ' { b' ' } else { b'#' };
            }
        }
        Ok(GlyphBlock { rows })
    }

    /// Signature product of one digit cell (0-based, left to right).
    pub fn signature(&self, cell: usize) -> u32 {
        debug_assert!(cell < ACCOUNT_LEN);
        let mut product = 1u32;
        for r in 0..CELL_HEIGHT {
            for c in 0..CELL_WIDTH {
                if self.rows[r][cell * CELL_WIDTH + c] != b' ' {
                    product *= STROKE_WEIGHTS[r][c];
                }
            }
        }
        product
    }

    /// Signatures for all nine cells.
    pub fn signatures(&self) -> [u32; ACCOUNT_LEN] {
        let mut sigs = [1u32; ACCOUNT_LEN];
        for (cell, sig) in sigs.iter_mut().enumerate() {
            *sig = self.signature(cell);
        }
        sigs
    }

    /// Decode the block into nine digit slots.  Pure: decoding the same
    /// block twice yields identical results.
    pub fn decode(&self) -> AccountNumber {
        let mut digits = [Digit::Illegible; ACCOUNT_LEN];
        for (cell, slot) in digits.iter_mut().enumerate() {
            *slot = digit_for_signature(self.signature(cell));
        }
        AccountNumber::new(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_are_distinct() {
        for (a, &sa) in DIGIT_SIGNATURES.iter().enumerate() {
            for (b, &sb) in DIGIT_SIGNATURES.iter().enumerate() {
                if a != b {
                    assert_ne!(sa, sb, "digits {a} and {b} share a signature");
                }
            }
        }
    }

    #[test]
    fn empty_input_is_missing() {
        assert_eq!(GlyphBlock::parse(""), Err(DecodeError::InputMissing));
    }

    #[test]
    fn blank_cell_is_illegible() {
        assert_eq!(digit_for_signature(1), Digit::Illegible);
    }
}
