use crate::error::TypesError;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// Token amount in base units. The governance token has 18 decimals, so one
/// whole token is `10^18` base units.
///
/// Stored as `u128`: total supply at 18 decimals stays far below `u128::MAX`,
/// and every tally in the engine is bounded by total supply.
///
/// Serialized as a decimal string (JSON numbers cannot carry u128 precision).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    /// Decimal places of the governance token.
    pub const DECIMALS: u32 = 18;

    /// One whole token in base units.
    pub const TOKEN: Self = Self(1_000_000_000_000_000_000);

    pub const fn from_base(units: u128) -> Self {
        Self(units)
    }

    /// Whole tokens scaled to base units.
    pub const fn from_whole(tokens: u64) -> Self {
        Self(tokens as u128 * Self::TOKEN.0)
    }

    pub const fn base_units(&self) -> u128 {
        self.0
    }

    /// Whole-token part, truncating the fractional base units.
    pub const fn whole(&self) -> u128 {
        self.0 / Self::TOKEN.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for TokenAmount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub for TokenAmount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        // Clamps at zero rather than wrapping
        self.checked_sub(rhs).unwrap_or(Self::ZERO)
    }
}

impl AddAssign for TokenAmount {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(rhs);
    }
}

impl SubAssign for TokenAmount {
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.checked_sub(rhs).unwrap_or(Self::ZERO);
    }
}

impl Sum for TokenAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc.saturating_add(x))
    }
}

impl From<u64> for TokenAmount {
    fn from(val: u64) -> Self {
        Self(val as u128)
    }
}

impl From<u128> for TokenAmount {
    fn from(val: u128) -> Self {
        Self(val)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenAmount({})", self.0)
    }
}

impl FromStr for TokenAmount {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let units: u128 = s.trim().parse()?;
        Ok(Self(units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_whole_token_scaling() {
        let amount = TokenAmount::from_whole(5_000);
        assert_eq!(amount.base_units(), 5_000 * 10u128.pow(18));
        assert_eq!(amount.whole(), 5_000);
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = TokenAmount::from_base(100);
        let b = TokenAmount::from_base(30);

        assert_eq!(a.checked_add(b), Some(TokenAmount::from_base(130)));
        assert_eq!(a.checked_sub(b), Some(TokenAmount::from_base(70)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(TokenAmount::from_base(u128::MAX).checked_add(a), None);
    }

    #[test]
    fn test_saturating_operators() {
        let a = TokenAmount::from_base(100);
        let b = TokenAmount::from_base(30);

        assert_eq!(b - a, TokenAmount::ZERO);
        assert_eq!(
            TokenAmount::from_base(u128::MAX) + a,
            TokenAmount::from_base(u128::MAX)
        );

        let mut acc = TokenAmount::ZERO;
        acc += a;
        acc += b;
        assert_eq!(acc, TokenAmount::from_base(130));
        acc -= a;
        acc -= a;
        assert_eq!(acc, TokenAmount::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: TokenAmount = [1u64, 2, 3]
            .iter()
            .map(|&n| TokenAmount::from(n))
            .sum();
        assert_eq!(total, TokenAmount::from_base(6));
    }

    #[test]
    fn test_ordering() {
        assert!(TokenAmount::from_whole(2_000) < TokenAmount::from_whole(5_000));
        assert!(TokenAmount::ZERO < TokenAmount::TOKEN);
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("".parse::<TokenAmount>().is_err());
        assert!("-5".parse::<TokenAmount>().is_err());
        assert!("1.5".parse::<TokenAmount>().is_err());
    }

    proptest! {
        #[test]
        fn prop_parse_display_roundtrip(n in any::<u128>()) {
            let amount = TokenAmount::from_base(n);
            let parsed: TokenAmount = amount.to_string().parse().unwrap();
            prop_assert_eq!(amount, parsed);
        }

        #[test]
        fn prop_add_then_sub_is_identity(a in any::<u64>(), b in any::<u64>()) {
            let a = TokenAmount::from(a);
            let b = TokenAmount::from(b);
            prop_assert_eq!((a + b) - b, a);
        }

        #[test]
        fn prop_sum_matches_u128_sum(values in proptest::collection::vec(any::<u64>(), 0..32)) {
            let expected: u128 = values.iter().map(|&v| v as u128).sum();
            let total: TokenAmount = values.iter().map(|&v| TokenAmount::from(v)).sum();
            prop_assert_eq!(total.base_units(), expected);
        }
    }
}
