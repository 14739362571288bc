//! Derived metrics calculator
//!
//! Pure functions turning stored records into the numbers every dashboard
//! shows. Each fallback chain reports which tier produced the value.
//!
//! Precedence is fixed:
//! - counts: metrics record, then the submission's own field, then zero
//! - earnings: stored override, then `views * rate / 1000`

mod resolve;

pub use resolve::{
    resolve, resolve_earnings, resolve_views_and_likes, Resolution, Resolved, ResolvedCounts,
    Source,
};

use rust_decimal::{Decimal, RoundingStrategy};

const VIEWS_PER_RATE_UNIT: u64 = 1000;

/// Round to whole cents, halves away from zero
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Payout for `views` at `reward_rate` per 1,000 views, rounded to cents.
///
/// A zero or negative rate pays nothing. Results beyond the decimal range
/// saturate.
pub fn compute_earnings(views: u64, reward_rate: Decimal) -> Decimal {
    if views == 0 || reward_rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    Decimal::from(views)
        .checked_mul(reward_rate)
        .and_then(|gross| gross.checked_div(Decimal::from(VIEWS_PER_RATE_UNIT)))
        .map_or(Decimal::MAX, round2)
}

/// Likes as a percentage of views, two decimals; zero without views
pub fn engagement_rate(views: u64, likes: u64) -> Decimal {
    if views == 0 {
        return Decimal::ZERO;
    }

    Decimal::from(likes)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(Decimal::from(views)))
        .map_or(Decimal::ZERO, round2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_compute_earnings() {
        assert_eq!(compute_earnings(2000, dec("5")), dec("10.00"));
        assert_eq!(compute_earnings(3000, dec("5")), dec("15.00"));
        assert_eq!(compute_earnings(1234, dec("2.5")), dec("3.09"));
        assert_eq!(compute_earnings(1, dec("1")), dec("0.00"));
    }

    #[test]
    fn test_zero_rate_pays_nothing() {
        assert_eq!(compute_earnings(1_000_000, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(compute_earnings(1_000_000, dec("-3")), Decimal::ZERO);
        assert_eq!(compute_earnings(0, dec("5")), Decimal::ZERO);
    }

    #[test]
    fn test_round_half_up() {
        // 5 views at 1.00/1000 = 0.005
        assert_eq!(compute_earnings(5, dec("1")), dec("0.01"));
        assert_eq!(round2(dec("2.345")), dec("2.35"));
        assert_eq!(round2(dec("2.344")), dec("2.34"));
    }

    #[test]
    fn test_compute_matches_formula() {
        for (views, rate) in [(0_u64, "5"), (999, "0.1"), (2000, "7.25"), (15_000, "3.333")] {
            let rate = dec(rate);
            let expected = round2(Decimal::from(views) * rate / Decimal::from(1000));
            assert_eq!(compute_earnings(views, rate), expected);
        }
    }

    #[test]
    fn test_large_values_saturate() {
        assert_eq!(compute_earnings(u64::MAX, Decimal::MAX), Decimal::MAX);
    }

    #[test]
    fn test_engagement_rate() {
        assert_eq!(engagement_rate(0, 10), Decimal::ZERO);
        assert_eq!(engagement_rate(200, 10), dec("5.00"));
        assert_eq!(engagement_rate(3, 1), dec("33.33"));
        assert_eq!(engagement_rate(3, 2), dec("66.67"));
    }
}
