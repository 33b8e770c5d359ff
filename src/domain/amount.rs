//! Single point of truth for reading a free-form amount as a number.
//!
//! Amounts arrive as string-encoded integers, sometimes with grouping
//! separators (`"1,234,567"`), sometimes empty. Filtering, whale
//! classification and volume aggregation all go through [`parse_amount`] so
//! "what does this amount mean as a number" cannot drift between consumers.

/// Parses a free-form amount string into a non-negative integer magnitude.
///
/// Non-digit characters are stripped before parsing, which handles grouping
/// separators and stray signs alike. Unparseable input (empty string,
/// non-numeric garbage) yields 0 rather than an error. Magnitudes beyond
/// `u64::MAX` saturate.
#[must_use]
pub fn parse_amount(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn plain_integer() {
        assert_eq!(parse_amount("15000000"), 15_000_000);
    }

    #[test]
    fn grouping_separators_are_stripped() {
        assert_eq!(parse_amount("1,234,567"), 1_234_567);
        assert_eq!(parse_amount("1 234 567"), 1_234_567);
    }

    #[test]
    fn empty_and_garbage_yield_zero() {
        assert_eq!(parse_amount(""), 0);
        assert_eq!(parse_amount("not a number"), 0);
        assert_eq!(parse_amount("--"), 0);
    }

    #[test]
    fn sign_is_dropped() {
        // Magnitudes are non-negative by contract.
        assert_eq!(parse_amount("-500"), 500);
    }

    #[test]
    fn oversized_magnitude_saturates() {
        assert_eq!(parse_amount("99999999999999999999999999"), u64::MAX);
    }

    #[test]
    fn mixed_garbage_keeps_digits() {
        assert_eq!(parse_amount("qu1b2c3"), 123);
    }
}
