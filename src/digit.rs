use std::fmt;

/// An account number is always exactly nine digits wide.
pub const ACCOUNT_LEN: usize = 9;

/// Placeholder written for illegible positions in textual renderings.
pub const DEFAULT_PLACEHOLDER: char = '?';

/// One decoded digit slot: a value 0–9, or the sentinel for a glyph whose
/// structural signature matched no known digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Digit {
    Known(u8),
    Illegible,
}

impl Digit {
    /// The numeric value, or `None` for [`Digit::Illegible`].
    #[inline]
    pub fn value(self) -> Option<u8> {
        match self {
            Digit::Known(v) => Some(v),
            Digit::Illegible => None,
        }
    }

    #[inline]
    pub fn is_legible(self) -> bool {
        matches!(self, Digit::Known(_))
    }
}

/// A fixed-width, immutable 9-digit account number.
///
/// Decoding may leave individual positions [`Digit::Illegible`]; repair
/// produces new `AccountNumber` values rather than mutating in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountNumber([Digit; ACCOUNT_LEN]);

impl AccountNumber {
    pub fn new(digits: [Digit; ACCOUNT_LEN]) -> Self {
        AccountNumber(digits)
    }

    /// Build from nine known digit values (each must be 0–9).
    pub fn from_digits(values: [u8; ACCOUNT_LEN]) -> Self {
        let mut digits = [Digit::Illegible; ACCOUNT_LEN];
        for (slot, &v) in digits.iter_mut().zip(values.iter()) {
            debug_assert!(v <= 9, "digit out of range");
            *slot = Digit::Known(v);
        }
        AccountNumber(digits)
    }

    #[inline]
    pub fn digits(&self) -> &[Digit; ACCOUNT_LEN] {
        &self.0
    }

    /// True iff no position is [`Digit::Illegible`].
    pub fn is_legible(&self) -> bool {
        self.0.iter().all(|d| d.is_legible())
    }

    /// Render left to right, substituting `placeholder` for illegible
    /// positions.
    pub fn render(&self, placeholder: char) -> String {
        self.0
            .iter()
            .map(|d| match d.value() {
                Some(v) => (b'0' + v) as char,
                None => placeholder,
            })
            .collect()
    }

    /// The number read left to right, most significant digit first.
    /// `None` if any position is illegible.
    pub fn value(&self) -> Option<u64> {
        self.0
            .iter()
            .try_fold(0u64, |acc, d| d.value().map(|v| acc * 10 + v as u64))
    }
}

impl std::ops::Index<usize> for AccountNumber {
    type Output = Digit;

    fn index(&self, i: usize) -> &Digit {
        &self.0[i]
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_PLACEHOLDER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_placeholder() {
        let mut digits = *AccountNumber::from_digits([4, 9, 0, 0, 6, 7, 7, 1, 5]).digits();
        digits[8] = Digit::Illegible;
        let n = AccountNumber::new(digits);
        assert_eq!(n.render('?'), "49006771?");
        assert!(!n.is_legible());
        assert_eq!(n.value(), None);
    }

    #[test]
    fn value_reads_most_significant_first() {
        let n = AccountNumber::from_digits([4, 9, 0, 0, 6, 7, 7, 1, 5]);
        assert_eq!(n.value(), Some(490_067_715));
        assert_eq!(n.to_string(), "490067715");
    }
}
