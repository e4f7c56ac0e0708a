//! Seed width conversions.
//!
//! Callers hold 64-bit seeds. The remote service accepts 32-bit seeds, so the
//! outbound copy is narrowed while results echo the original value.

/// Narrow a requested seed for the outbound request.
///
/// Values outside the `i32` range keep their low 32 bits.
///
/// # Examples
///
/// ```
/// use vermeer_core::narrow_seed;
///
/// assert_eq!(narrow_seed(Some(42)), Some(42));
/// assert_eq!(narrow_seed(None), None);
/// assert_eq!(narrow_seed(Some(i64::MAX)), Some(-1));
/// ```
pub fn narrow_seed(seed: Option<i64>) -> Option<i32> {
    seed.map(|s| s as i32)
}

/// The seed echoed on the result path; 0 when none was requested.
pub fn requested_seed(seed: Option<i64>) -> i64 {
    seed.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrowing_only_affects_outbound_copy() {
        let seed = Some(9_223_372_036_854_775_807_i64);
        assert_eq!(narrow_seed(seed), Some(-1));
        assert_eq!(requested_seed(seed), i64::MAX);
    }

    #[test]
    fn test_in_range_seeds_survive() {
        assert_eq!(narrow_seed(Some(i32::MIN as i64)), Some(i32::MIN));
        assert_eq!(narrow_seed(Some(-7)), Some(-7));
        assert_eq!(requested_seed(None), 0);
    }
}
