use std::collections::BTreeMap;

use proptest::prelude::*;
use segscan::checksum::{checksum, is_valid, ChecksumError};
use segscan::digit::{AccountNumber, Digit, ACCOUNT_LEN};
use segscan::glyph::GlyphBlock;
use segscan::repair::{candidates, repair_decoded, repair_illegible};

fn number(values: [u8; ACCOUNT_LEN]) -> AccountNumber {
    AccountNumber::from_digits(values)
}

fn rendered(list: &[AccountNumber]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}

fn block(rows: [&str; 3]) -> GlyphBlock {
    GlyphBlock::from_rows(&[rows[0], rows[1], rows[2], ""]).expect("fixture must parse")
}

// ── Checksum ─────────────────────────────────────────────────────────────────

#[test]
fn checksum_reference_vectors() {
    assert_eq!(number([1, 1, 1, 1, 1, 1, 1, 1, 1]).checksum(), 1);
    assert_eq!(number([1, 1, 1, 1, 1, 1, 1, 1, 0]).checksum(), 0);
    assert_eq!(number([9, 8, 7, 6, 5, 4, 0, 2, 0]).checksum(), 0);
}

#[test]
fn is_valid_agrees_with_checksum() {
    let samples = [
        [1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 0],
        [9, 8, 7, 6, 5, 4, 0, 2, 0],
        [4, 5, 7, 5, 0, 8, 0, 0, 0],
        [6, 6, 4, 3, 7, 1, 4, 9, 5],
    ];
    for values in samples {
        let n = number(values);
        assert_eq!(n.is_valid(), n.checksum() == 0, "sample {values:?}");
        assert_eq!(is_valid(n.digits()), Ok(n.is_valid()));
    }
}

#[test]
fn checksum_rejects_wrong_length() {
    let five = [Digit::Known(1); 5];
    assert_eq!(checksum(&five), Err(ChecksumError::BadLength(5)));
}

#[test]
fn checksum_skips_illegible_positions() {
    let mut digits = *number([4, 9, 0, 0, 6, 7, 7, 1, 5]).digits();
    digits[8] = Digit::Illegible;
    assert_eq!(checksum(&digits), Ok(2));
}

// ── General repair (decoded but checksum-invalid) ────────────────────────────

#[test]
fn all_ones_repair_yields_47_candidates() {
    let valid = repair_decoded(&number([1; 9]));
    assert_eq!(valid.len(), 47);
    assert_eq!(valid[0].to_string(), "111117771");
    assert_eq!(valid.last().unwrap().to_string(), "777777711");
}

#[test]
fn all_sevens_repair_yields_47_candidates() {
    // Same {1,7} substitution space as all-ones.
    assert_eq!(repair_decoded(&number([7; 9])).len(), 47);
}

#[test]
fn all_threes_repair_yields_47_candidates() {
    let valid = repair_decoded(&number([3; 9]));
    assert_eq!(valid.len(), 47);
    assert_eq!(valid[0].to_string(), "333333993");
}

#[test]
fn wider_confusion_rows_grow_the_candidate_space() {
    // Digits with three or four one-stroke neighbours explore 3^9 or 4^9
    // combinations; the checksum filter passes proportionally more.
    assert_eq!(repair_decoded(&number([5; 9])).len(), 1794);
    assert_eq!(repair_decoded(&number([6; 9])).len(), 1790);
    assert_eq!(repair_decoded(&number([9; 9])).len(), 1784);
    assert_eq!(repair_decoded(&number([8; 9])).len(), 23832);
}

#[test]
fn leading_two_repair() {
    // 2 and the 0s each have narrow confusion rows: 2^8 combinations.
    let valid = repair_decoded(&number([2, 0, 0, 0, 0, 0, 0, 0, 0]));
    assert_eq!(valid.len(), 23);
    assert_eq!(valid[0].to_string(), "200000888");
    assert_eq!(valid.last().unwrap().to_string(), "288880080");
}

#[test]
fn mixed_digit_repair() {
    let valid = repair_decoded(&number([4, 9, 0, 0, 6, 7, 7, 1, 5]));
    assert_eq!(valid.len(), 77);
    assert_eq!(valid[0].to_string(), "430051115");
    assert_eq!(valid.last().unwrap().to_string(), "488887119");
}

#[test]
fn already_valid_number_keeps_its_identity_candidate() {
    // Every digit of 111111110 sits in its own confusion row, so the
    // unmodified number is generated first and survives the filter.
    let valid = repair_decoded(&number([1, 1, 1, 1, 1, 1, 1, 1, 0]));
    assert_eq!(valid.len(), 49);
    assert_eq!(valid[0].to_string(), "111111110");
}

#[test]
fn repair_is_deterministic() {
    let base = number([1; 9]);
    assert_eq!(repair_decoded(&base), repair_decoded(&base));
}

// ── Illegible repair ─────────────────────────────────────────────────────────

#[test]
fn unrepairable_illegible_block_reports_empty() {
    // The damaged rightmost five toggles to 5 or 3, but the only valid
    // completion of 49006771_ is 9: nothing survives the filter, which
    // signals human review rather than an error.
    let b = block([
        "    _  _  _  _  _  _     _ ",
        "|_||_|| || ||_   |  |  | _ ",
        "  | _||_||_||_|  |  |  | _|",
    ]);
    assert!(repair_illegible(&b).is_empty());
}

#[test]
fn single_illegible_block_repairs_uniquely() {
    // A nine missing its top bar: structurally 9 or 4, and only 9 checks out.
    let b = block([
        "    _  _  _  _  _  _       ",
        "|_||_|| || ||_   |  |  ||_|",
        "  | _||_||_||_|  |  |  | _|",
    ]);
    assert_eq!(rendered(&repair_illegible(&b)), vec!["490067719"]);
}

#[test]
fn double_illegible_block_yields_two_candidates_in_order() {
    // Position 0 is one stroke from 1 or 4; position 8 is one stroke from
    // 9 or 4.  Two of the four combinations pass the checksum, emitted in
    // odometer order.
    let b = block([
        "    _  _     _  _  _  _    ",
        "| | _| _||_||_ |_   ||_||_|",
        "  ||_  _|  | _||_|  ||_| _|",
    ]);
    let decoded = b.decode();
    let illegible = decoded.digits().iter().filter(|d| !d.is_legible()).count();
    assert_eq!(illegible, 2);
    assert_eq!(
        rendered(&repair_illegible(&b)),
        vec!["123456789", "423456784"]
    );
}

// ── Candidate generation ─────────────────────────────────────────────────────

#[test]
fn empty_alternates_mapping_returns_base() {
    let base = number([1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(candidates(&base, &BTreeMap::new()), vec![base]);
}

proptest! {
    #[test]
    fn candidate_count_is_the_radix_product(
        values in proptest::array::uniform9(0u8..10),
        set_a in proptest::collection::vec(0u8..10, 1..4),
        set_b in proptest::collection::vec(0u8..10, 1..4),
        pos_a in 0usize..9,
        pos_b in 0usize..9,
    ) {
        prop_assume!(pos_a != pos_b);
        let base = number(values);
        let mut alternates = BTreeMap::new();
        alternates.insert(pos_a, set_a.clone());
        alternates.insert(pos_b, set_b.clone());
        let out = candidates(&base, &alternates);
        prop_assert_eq!(out.len(), set_a.len() * set_b.len());
        // Unmapped positions always keep the base digit.
        for c in &out {
            for i in 0..9 {
                if i != pos_a && i != pos_b {
                    prop_assert_eq!(c[i], base[i]);
                }
            }
        }
    }

    #[test]
    fn checksum_is_always_a_mod_11_residue(values in proptest::array::uniform9(0u8..10)) {
        prop_assert!(number(values).checksum() < 11);
    }

    #[test]
    fn every_repair_candidate_is_checksum_valid(values in proptest::array::uniform9(0u8..10)) {
        for c in repair_decoded(&number(values)) {
            prop_assert!(c.is_valid());
        }
    }
}
