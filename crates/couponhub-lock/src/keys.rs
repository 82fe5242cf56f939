//! Lease key builders.
//!
//! Centralising key construction prevents typos and makes it easy to find
//! every key the application contends on. Keys are relative; the store
//! applies the configured prefix.

/// Lease key serializing all claim attempts for one coupon.
///
/// `name` must already be normalized; attempts for differently-spelled
/// variants of the same coupon must land on the same key.
pub fn coupon_claim(name: &str) -> String {
    format!("claim:coupon:{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupon_claim_key() {
        assert_eq!(coupon_claim("SUMMER_10"), "claim:coupon:SUMMER_10");
    }
}
