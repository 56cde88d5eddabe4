//! Candidate generation and repair for failed scans.
//!
//! # How it works
//!
//! Two repair paths share one generator:
//!
//! - **Decoded but checksum-invalid** ([`repair_decoded`]): every position
//!   is offered the digits one stroke away from its decoded value (the
//!   [`CONFUSION`] table).  The full cross product is generated and the
//!   checksum filter alone prunes it — no guess is made about which
//!   position is "most likely" wrong.
//! - **Illegible** ([`repair_illegible`]): the raw stroke signature of
//!   each unreadable cell is re-examined; toggling each stroke prime in
//!   turn yields the digits the damaged glyph is one stroke away from.
//!   Only illegible positions receive alternates.
//!
//! Candidates enumerate in odometer order, the rightmost affected
//! position changing fastest, so results are reproducible.  An empty
//! result is a normal outcome meaning the record needs human review; the
//! caller decides how to present more than one survivor.

use std::collections::BTreeMap;

use crate::digit::{AccountNumber, Digit, ACCOUNT_LEN};
use crate::glyph::{digit_for_signature, GlyphBlock, STROKE_PRIMES};

// ── Confusion tables ─────────────────────────────────────────────────────────

/// Digits a decoded digit could plausibly have been, indexed by digit
/// value.  Each row lists the digits whose glyph differs by exactly one
/// stroke, keeping the decoded value itself where the glyph set does
/// (2 and 4 have no one-stroke neighbours at all).
pub const CONFUSION: [&[u8]; 10] = [
    &[0, 8],       // 0
    &[1, 7],       // 1
    &[2],          // 2
    &[3, 9],       // 3
    &[4],          // 4
    &[5, 6, 9],    // 5
    &[5, 6, 8],    // 6
    &[1, 7],       // 7
    &[0, 6, 8, 9], // 8
    &[3, 5, 8],    // 9
];

/// Coarse alternates for a decoded digit value (0–9).
#[inline]
pub fn alternates_for_digit(digit: u8) -> &'static [u8] {
    CONFUSION[digit as usize]
}

/// Fine-grained alternates for an unrecognized stroke signature: toggle
/// each stroke prime in weight order and keep every result that lands on
/// a known digit.  Divisibility by a prime is exactly "that stroke is
/// present", since each stroke carries a distinct prime.
pub fn alternates_for_signature(signature: u32) -> Vec<u8> {
    let mut out = Vec::new();
    for &p in STROKE_PRIMES.iter() {
        let toggled = if signature % p == 0 {
            signature / p
        } else {
            signature * p
        };
        if let Digit::Known(d) = digit_for_signature(toggled) {
            out.push(d);
        }
    }
    out
}

// ── Candidate generation ─────────────────────────────────────────────────────

/// Cross product of alternates over `base`.
///
/// Positions absent from the mapping keep the base digit.  An empty
/// mapping yields the base unchanged; a position mapped to an empty set
/// makes the product empty.  Enumeration is a multi-radix odometer with
/// the rightmost mapped position changing fastest.
pub fn candidates(
    base: &AccountNumber,
    alternates: &BTreeMap<usize, Vec<u8>>,
) -> Vec<AccountNumber> {
    if alternates.is_empty() {
        return vec![*base];
    }
    if alternates.values().any(|set| set.is_empty()) {
        return Vec::new();
    }
    let positions: Vec<usize> = alternates.keys().copied().collect();
    debug_assert!(positions.iter().all(|&p| p < ACCOUNT_LEN));
    let sets: Vec<&[u8]> = positions.iter().map(|p| alternates[p].as_slice()).collect();

    let mut indices = vec![0usize; positions.len()];
    let mut out = Vec::new();
    loop {
        let mut digits = *base.digits();
        for (k, &pos) in positions.iter().enumerate() {
            digits[pos] = Digit::Known(sets[k][indices[k]]);
        }
        out.push(AccountNumber::new(digits));

        let mut k = positions.len();
        loop {
            if k == 0 {
                return out;
            }
            k -= 1;
            indices[k] += 1;
            if indices[k] < sets[k].len() {
                break;
            }
            indices[k] = 0;
        }
    }
}

// ── Repair paths ─────────────────────────────────────────────────────────────

/// Repair a fully decoded number that fails its checksum.
///
/// Alternates are looked up for all nine positions (not just a suspect
/// one) and the checksum filter prunes the cross product.  The identity
/// candidate appears in the result whenever every digit's confusion row
/// contains itself and the number was already valid.  Illegible positions
/// get no alternates, so no legible candidate can emerge from them.
pub fn repair_decoded(number: &AccountNumber) -> Vec<AccountNumber> {
    let mut alternates = BTreeMap::new();
    for (i, d) in number.digits().iter().enumerate() {
        if let Some(v) = d.value() {
            alternates.insert(i, alternates_for_digit(v).to_vec());
        }
    }
    candidates(number, &alternates)
        .into_iter()
        .filter(|c| c.is_legible() && c.is_valid())
        .collect()
}

/// Repair a block whose decode produced one or more illegible digits.
///
/// Re-derives each illegible cell's stroke signature and substitutes the
/// digits one stroke toggle away; legible positions are left alone.
pub fn repair_illegible(block: &GlyphBlock) -> Vec<AccountNumber> {
    let decoded = block.decode();
    let signatures = block.signatures();
    let mut alternates = BTreeMap::new();
    for (i, d) in decoded.digits().iter().enumerate() {
        if !d.is_legible() {
            alternates.insert(i, alternates_for_signature(signatures[i]));
        }
    }
    candidates(&decoded, &alternates)
        .into_iter()
        .filter(|c| c.is_legible() && c.is_valid())
        .collect()
}

// ── Assessment ───────────────────────────────────────────────────────────────

/// Overall verdict for one scanned block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanVerdict {
    /// Decoded cleanly and the checksum holds.
    Valid,
    /// Repair found exactly one valid candidate.
    Repaired,
    /// Repair found several valid candidates; presenting the choice is
    /// the caller's job.
    Ambiguous,
    /// No candidate passed the checksum filter; human review required.
    Unreadable,
}

/// Complete result of assessing one block.
#[derive(Debug, Clone)]
pub struct RepairReport {
    /// The raw decode, possibly with illegible positions.
    pub decoded: AccountNumber,
    /// Checksum-valid candidates in generation order.  Empty for
    /// [`ScanVerdict::Valid`] (the decode itself is the answer) and for
    /// [`ScanVerdict::Unreadable`].
    pub candidates: Vec<AccountNumber>,
    pub verdict: ScanVerdict,
}

/// Decode a block and, if needed, run the appropriate repair path.
pub fn assess(block: &GlyphBlock) -> RepairReport {
    let decoded = block.decode();
    if decoded.is_legible() && decoded.is_valid() {
        return RepairReport {
            decoded,
            candidates: Vec::new(),
            verdict: ScanVerdict::Valid,
        };
    }
    let candidates = if decoded.is_legible() {
        repair_decoded(&decoded)
    } else {
        repair_illegible(block)
    };
    let verdict = match candidates.len() {
        0 => ScanVerdict::Unreadable,
        1 => ScanVerdict::Repaired,
        _ => ScanVerdict::Ambiguous,
    };
    RepairReport {
        decoded,
        candidates,
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mapping_returns_base_unchanged() {
        let base = AccountNumber::from_digits([1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let out = candidates(&base, &BTreeMap::new());
        assert_eq!(out, vec![base]);
    }

    #[test]
    fn empty_alternate_set_yields_nothing() {
        let base = AccountNumber::from_digits([0; 9]);
        let mut alternates = BTreeMap::new();
        alternates.insert(3, vec![]);
        assert!(candidates(&base, &alternates).is_empty());
    }

    #[test]
    fn odometer_varies_rightmost_position_fastest() {
        let base = AccountNumber::from_digits([0; 9]);
        let mut alternates = BTreeMap::new();
        alternates.insert(0, vec![1, 2]);
        alternates.insert(8, vec![7, 8]);
        let out: Vec<String> = candidates(&base, &alternates)
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(
            out,
            vec!["100000007", "100000008", "200000007", "200000008"]
        );
    }

    #[test]
    fn signature_alternates_follow_weight_order() {
        // Damaged five: top bar, middle bar, and both bottom-right strokes.
        // Adding the upper-left stroke gives 5, adding the upper-right
        // gives 3.
        assert_eq!(alternates_for_signature(2 * 5 * 13 * 17), vec![5, 3]);
        // Nine missing its top bar: restore it for 9, or drop the bottom
        // bar for 4.
        assert_eq!(alternates_for_signature(3 * 5 * 7 * 13 * 17), vec![9, 4]);
    }
}
