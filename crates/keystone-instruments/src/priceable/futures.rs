//! Exchange-traded futures and options on rate futures.

use chrono::Weekday;
use keystone_core::daycounts::DayCountFraction;
use keystone_core::traits::MarketData;
use keystone_core::types::Date;
use rust_decimal::Decimal;

use super::{forward_rate, AssetCore, Priceable};
use crate::asset_type::OptionType;
use crate::error::{ConstructionError, ConstructionResult};
use crate::quotes::QuoteUnits;

/// CME month codes, January to December.
const MONTH_CODES: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];

/// Third Wednesday of a month.
pub fn imm_date(year: i32, month: u32) -> ConstructionResult<Date> {
    Ok(Date::nth_weekday(year, month, Weekday::Wed, 3)?)
}

/// Last trading date of a contract from its expiry code, e.g. `H5` or `Z25`.
///
/// The year digits select the first matching year whose contract has not yet
/// expired at `base_date`.
pub fn last_trading_date_from_code(code: &str, base_date: Date) -> ConstructionResult<Date> {
    let code = code.trim().to_uppercase();
    let invalid = |reason: &str| ConstructionError::invalid_property("ExpiryCode", format!("'{code}': {reason}"));

    let mut chars = code.chars();
    let letter = chars.next().ok_or_else(|| invalid("empty code"))?;
    let month = MONTH_CODES
        .iter()
        .position(|c| *c == letter)
        .ok_or_else(|| invalid("unknown month letter"))? as u32
        + 1;
    let digits = chars.as_str();
    if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected one or two year digits"));
    }
    let modulus = 10_i32.pow(digits.len() as u32);
    let wanted: i32 = digits.parse().map_err(|_| invalid("bad year digits"))?;

    let mut year = base_date.year() - base_date.year().rem_euclid(modulus) + wanted;
    loop {
        let date = imm_date(year, month)?;
        if year >= base_date.year() && date >= base_date {
            return Ok(date);
        }
        year += modulus;
    }
}

/// What a futures instrument delivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FutureContract {
    /// Short-term interest rate future.
    RateFuture,
    /// Option on a short-term interest rate future.
    RateFutureOption {
        /// Put or call.
        option_type: OptionType,
        /// Strike price, if quoted.
        strike: Option<Decimal>,
    },
    /// London Metal Exchange contract.
    Lme,
    /// Wheat.
    Wheat,
    /// Certified emission reductions.
    CarbonEmissionReduction,
    /// ICE Brent crude.
    IceBrent,
}

impl FutureContract {
    /// True for rate futures and their options.
    #[must_use]
    pub fn is_rate(&self) -> bool {
        matches!(self, FutureContract::RateFuture | FutureContract::RateFutureOption { .. })
    }
}

/// A futures position.
#[derive(Debug, Clone)]
pub struct FutureAsset {
    pub(crate) core: AssetCore,
    contract: FutureContract,
    exchange: String,
    contract_code: String,
    last_trading_date: Date,
    accrual_end: Date,
    contract_size: Decimal,
    day_count: DayCountFraction,
    spread: bool,
}

impl FutureAsset {
    /// Creates the position. `accrual_end` is the end of the underlying
    /// deposit for rate futures and equals `last_trading_date` otherwise.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        core: AssetCore,
        contract: FutureContract,
        exchange: impl Into<String>,
        contract_code: impl Into<String>,
        last_trading_date: Date,
        accrual_end: Date,
        contract_size: Decimal,
        day_count: DayCountFraction,
    ) -> Self {
        Self {
            core,
            contract,
            exchange: exchange.into(),
            contract_code: contract_code.into(),
            last_trading_date,
            accrual_end,
            contract_size,
            day_count,
            spread: false,
        }
    }

    /// Marks the position as a calendar spread.
    #[must_use]
    pub fn as_spread(mut self) -> Self {
        self.spread = true;
        self
    }

    /// Contract delivered.
    #[must_use]
    pub fn contract(&self) -> &FutureContract {
        &self.contract
    }

    /// Exchange MIC.
    #[must_use]
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Contract code.
    #[must_use]
    pub fn contract_code(&self) -> &str {
        &self.contract_code
    }

    /// Last trading date.
    #[must_use]
    pub fn last_trading_date(&self) -> Date {
        self.last_trading_date
    }

    /// Contract size.
    #[must_use]
    pub fn contract_size(&self) -> Decimal {
        self.contract_size
    }

    /// Number of contracts.
    #[must_use]
    pub fn position(&self) -> Decimal {
        self.core.notional()
    }

    /// True for a calendar spread.
    #[must_use]
    pub fn is_spread(&self) -> bool {
        self.spread
    }
}

impl Priceable for FutureAsset {
    fn core(&self) -> &AssetCore {
        &self.core
    }

    fn implied_quote(&self, market: &dyn MarketData) -> Option<f64> {
        if self.contract.is_rate() {
            forward_rate(market, self.last_trading_date, self.accrual_end, self.day_count)
        } else {
            market.forward_value(self.last_trading_date)
        }
    }

    fn implied_quote_units(&self) -> QuoteUnits {
        if self.contract.is_rate() {
            QuoteUnits::DecimalRate
        } else {
            QuoteUnits::Price
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_imm_dates() {
        assert_eq!(imm_date(2025, 3).unwrap(), d(2025, 3, 19));
        assert_eq!(imm_date(2025, 12).unwrap(), d(2025, 12, 17));
    }

    #[test]
    fn test_expiry_codes() {
        let base = d(2025, 1, 15);
        assert_eq!(last_trading_date_from_code("H5", base).unwrap(), d(2025, 3, 19));
        assert_eq!(last_trading_date_from_code("z25", base).unwrap(), d(2025, 12, 17));
        assert_eq!(last_trading_date_from_code("F5", base).unwrap(), d(2025, 1, 15));
        // January 2025 contract has expired
        assert_eq!(last_trading_date_from_code("F5", d(2025, 1, 20)).unwrap(), d(2035, 1, 17));
        assert_eq!(last_trading_date_from_code("H6", base).unwrap(), d(2026, 3, 18));
    }

    #[test]
    fn test_bad_expiry_codes() {
        let base = d(2025, 1, 15);
        for code in ["", "A5", "H", "H123", "HX"] {
            assert!(last_trading_date_from_code(code, base).is_err(), "{code}");
        }
    }
}
