use std::fmt;

use thiserror::Error;

/// Largest value a single transaction output can carry.
pub const MAX_OUTPUT_VALUE: u64 = 1 << 63;

/// Fractional digits reserved by the ledger's amount convention.
pub const DECIMAL_PLACES: u32 = 2;

/// Base token deposit required to mint a custom token (1%).
pub const TOKEN_DEPOSIT_PERCENTAGE: DepositRatio = DepositRatio::new(1, 100);

/// Token id of the native token.
pub const BASE_TOKEN_ID: &str = "00";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstantsError {
    #[error("10^{0} does not fit in a 64-bit amount")]
    DecimalPlacesTooLarge(u32),

    #[error("deposit ratio has a zero denominator")]
    ZeroDenominator,

    #[error("deposit {deposit} exceeds the total supply {all_tokens}")]
    DepositExceedsSupply { deposit: u128, all_tokens: u64 },
}

/// Exact rational stand-in for a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositRatio {
    pub numerator: u64,
    pub denominator: u64,
}

impl DepositRatio {
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self { numerator, denominator }
    }
}

impl fmt::Display for DepositRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Amounts the large-values scenario is expected to have produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constants {
    pub max_output_value: u64,
    pub decimal_places: u32,
    pub deposit_ratio: DepositRatio,
    /// `max_output_value` floored to a whole number of display units.
    pub all_tokens: u64,
    /// Base token consumed to authorize minting `max_output_value` units.
    pub deposit_amount: u64,
    /// Base token returned to the sender once the deposit is taken.
    pub change_amount: u64,
}

impl Constants {
    /// Derives every amount with integer arithmetic. The deposit is the
    /// true ceiling of `all_tokens * ratio`.
    pub fn derive(
        max_output_value: u64,
        decimal_places: u32,
        deposit_ratio: DepositRatio,
    ) -> Result<Self, ConstantsError> {
        let unit = 10u64
            .checked_pow(decimal_places)
            .ok_or(ConstantsError::DecimalPlacesTooLarge(decimal_places))?;
        if deposit_ratio.denominator == 0 {
            return Err(ConstantsError::ZeroDenominator);
        }

        let all_tokens = max_output_value / unit * unit;

        // u64 * u64 always fits in u128
        let deposit = (u128::from(all_tokens) * u128::from(deposit_ratio.numerator))
            .div_ceil(u128::from(deposit_ratio.denominator));
        let deposit_amount = u64::try_from(deposit)
            .ok()
            .filter(|amount| *amount <= all_tokens)
            .ok_or(ConstantsError::DepositExceedsSupply { deposit, all_tokens })?;

        Ok(Self {
            max_output_value,
            decimal_places,
            deposit_ratio,
            all_tokens,
            deposit_amount,
            change_amount: all_tokens - deposit_amount,
        })
    }

    /// The amounts used by the large-values network scenario.
    pub fn large_values() -> Result<Self, ConstantsError> {
        Self::derive(MAX_OUTPUT_VALUE, DECIMAL_PLACES, TOKEN_DEPOSIT_PERCENTAGE)
    }
}
