//! Coupon name normalization.

/// Normalize a coupon name for storage, lookup, and lock keys.
///
/// Uppercases the input, collapses every run of non-alphanumeric
/// characters to a single `_`, and strips leading/trailing `_`. All
/// spellings of one coupon must normalize identically so that they
/// contend on the same lease key.
pub fn normalize_coupon_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !name.is_empty() {
                name.push('_');
            }
            pending_separator = false;
            name.push(ch.to_ascii_uppercase());
        } else {
            pending_separator = true;
        }
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercases_and_trims() {
        assert_eq!(normalize_coupon_name("  summer10  "), "SUMMER10");
    }

    #[test]
    fn test_collapses_separator_runs() {
        assert_eq!(normalize_coupon_name("summer -- 10"), "SUMMER_10");
        assert_eq!(normalize_coupon_name("black!!friday"), "BLACK_FRIDAY");
    }

    #[test]
    fn test_strips_edge_separators() {
        assert_eq!(normalize_coupon_name("--promo--"), "PROMO");
    }

    #[test]
    fn test_empty_when_nothing_remains() {
        assert_eq!(normalize_coupon_name("!!!"), "");
        assert_eq!(normalize_coupon_name(""), "");
    }
}
