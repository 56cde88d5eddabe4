//! Weighted positional checksum over nine-digit account numbers.
//!
//! checksum = (Σ digit[i] × (9 − i)) mod 11, positions counted from the
//! left — the leftmost digit weighs ×9, the rightmost ×1.  Zero means
//! structurally valid.  Illegible positions contribute nothing, so a
//! partially decoded number can still be screened.

use crate::digit::{AccountNumber, Digit, ACCOUNT_LEN};
use thiserror::Error;

pub const CHECKSUM_MODULUS: u32 = 11;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChecksumError {
    /// Wrong slice width reaching the validator is a programming error
    /// upstream, not a data-quality issue.
    #[error("account number must be {ACCOUNT_LEN} digits, got {0}")]
    BadLength(usize),
}

fn weighted_sum(digits: &[Digit]) -> u32 {
    digits
        .iter()
        .enumerate()
        .filter_map(|(i, d)| {
            d.value()
                .map(|v| v as u32 * (ACCOUNT_LEN - i) as u32)
        })
        .sum()
}

/// Checksum of a 9-wide digit slice.  Bounded arithmetic: the sum never
/// exceeds 9 × (9 + 8 + … + 1) = 405.
pub fn checksum(digits: &[Digit]) -> Result<u32, ChecksumError> {
    if digits.len() != ACCOUNT_LEN {
        return Err(ChecksumError::BadLength(digits.len()));
    }
    Ok(weighted_sum(digits) % CHECKSUM_MODULUS)
}

/// True iff the checksum is zero.
pub fn is_valid(digits: &[Digit]) -> Result<bool, ChecksumError> {
    Ok(checksum(digits)? == 0)
}

impl AccountNumber {
    /// Checksum of this number; the width invariant is carried by the type.
    pub fn checksum(&self) -> u32 {
        weighted_sum(self.digits()) % CHECKSUM_MODULUS
    }

    pub fn is_valid(&self) -> bool {
        self.checksum() == 0
    }
}
