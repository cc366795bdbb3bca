//! Market quotations and the unit normalizer.
//!
//! Quotes arrive in whatever units the market publishes them: futures as
//! prices (`95.50`), deposits as percentages (`4.5`), swaps already as
//! decimals. Instruments consume decimal rates, so every construction path
//! pushes its quotes through one of the helpers below.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ConstructionError, ConstructionResult};

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal,)* }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
            /// Any other spelling, kept verbatim.
            Other(String),
        }

        impl $name {
            /// Wire spelling.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)*
                    $name::Other(s) => s,
                }
            }

            /// Parses case-insensitively; unknown spellings become `Other`.
            #[must_use]
            pub fn parse(s: &str) -> Self {
                let s = s.trim();
                $(if s.eq_ignore_ascii_case($text) {
                    return $name::$variant;
                })*
                $name::Other(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name::parse(&s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name::parse(s)
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// What a quotation measures.
    MeasureType {
        /// The market rate or price of the instrument.
        MarketQuote => "MarketQuote",
        /// An option volatility.
        Volatility => "Volatility",
        /// An option strike.
        Strike => "Strike",
        /// A spread added to the market quote.
        Spread => "Spread",
        /// Quote implied by a curve, produced by valuation.
        ImpliedQuote => "ImpliedQuote",
        /// Discount factor at risk maturity, produced by valuation.
        DiscountFactorAtMaturity => "DiscountFactorAtMaturity",
    }
}

string_enum! {
    /// Units a quotation value is expressed in.
    QuoteUnits {
        /// Rate as a decimal, `0.045`.
        DecimalRate => "DecimalRate",
        /// Spread as a decimal.
        DecimalSpread => "DecimalSpread",
        /// Rate as a percentage, `4.5`.
        Rate => "Rate",
        /// Rate future price, `95.50`.
        IRFuturesPrice => "IRFuturesPrice",
        /// Generic futures price quoted like a rate future.
        FuturesPrice => "FuturesPrice",
        /// Clean price.
        Price => "Price",
        #[allow(missing_docs)]
        DirtyPrice => "DirtyPrice",
        #[allow(missing_docs)]
        Premium => "Premium",
        #[allow(missing_docs)]
        ForwardValue => "ForwardValue",
        #[allow(missing_docs)]
        FxRate => "FxRate",
        /// Volatility as a percentage.
        Volatility => "Volatility",
        #[allow(missing_docs)]
        DecimalVolatility => "DecimalVolatility",
        #[allow(missing_docs)]
        LognormalVolatility => "LognormalVolatility",
        #[allow(missing_docs)]
        NormalVolatility => "NormalVolatility",
        /// Plain decimal value.
        DecimalValue => "DecimalValue",
    }
}

/// A single quoted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicQuotation {
    /// What is measured.
    pub measure_type: MeasureType,
    /// The quoted value.
    pub value: Decimal,
    /// Units of `value`.
    pub quote_units: QuoteUnits,
}

impl BasicQuotation {
    /// Creates a quotation.
    #[must_use]
    pub fn new(measure_type: MeasureType, value: Decimal, quote_units: QuoteUnits) -> Self {
        Self {
            measure_type,
            value,
            quote_units,
        }
    }

    /// A market quote in the given units.
    #[must_use]
    pub fn market_quote(value: Decimal, quote_units: QuoteUnits) -> Self {
        Self::new(MeasureType::MarketQuote, value, quote_units)
    }

    /// A spread in decimal units.
    #[must_use]
    pub fn spread(value: Decimal) -> Self {
        Self::new(MeasureType::Spread, value, QuoteUnits::DecimalSpread)
    }
}

/// The set of quotations attached to one asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetValuation {
    /// Asset the quotes belong to.
    pub id: String,
    /// Quotations in the order supplied.
    pub quotes: Vec<BasicQuotation>,
}

impl AssetValuation {
    /// Creates a valuation.
    #[must_use]
    pub fn new(id: impl Into<String>, quotes: Vec<BasicQuotation>) -> Self {
        Self {
            id: id.into(),
            quotes,
        }
    }

    /// Builds a valuation from parallel value/measure/unit arrays.
    ///
    /// # Errors
    ///
    /// `InvalidProperty` when the arrays differ in length.
    pub fn from_parallel(
        id: impl Into<String>,
        values: &[Decimal],
        measure_types: &[&str],
        quote_units: &[&str],
    ) -> ConstructionResult<Self> {
        if values.len() != measure_types.len() || values.len() != quote_units.len() {
            return Err(ConstructionError::invalid_property(
                "quotes",
                format!(
                    "{} values, {} measure types and {} quote units",
                    values.len(),
                    measure_types.len(),
                    quote_units.len()
                ),
            ));
        }
        let quotes = values
            .iter()
            .zip(measure_types)
            .zip(quote_units)
            .map(|((value, measure), units)| {
                BasicQuotation::new(MeasureType::parse(measure), *value, QuoteUnits::parse(units))
            })
            .collect();
        Ok(Self::new(id, quotes))
    }

    /// Appends a quotation.
    #[must_use]
    pub fn with_quote(mut self, quote: BasicQuotation) -> Self {
        self.quotes.push(quote);
        self
    }
}

/// Finds the quotation for `measure`, comparing measure names case-insensitively.
///
/// # Errors
///
/// `AmbiguousMeasure` when more than one quotation matches.
pub fn find_quotation<'a>(
    measure: &MeasureType,
    quotes: &'a [BasicQuotation],
) -> ConstructionResult<Option<&'a BasicQuotation>> {
    let mut matches = quotes
        .iter()
        .filter(|q| q.measure_type.as_str().eq_ignore_ascii_case(measure.as_str()));
    let first = matches.next();
    if matches.next().is_some() {
        return Err(ConstructionError::AmbiguousMeasure {
            measure: measure.to_string(),
        });
    }
    Ok(first)
}

/// Like [`find_quotation`] but absence is an error.
pub fn require_quotation<'a>(
    measure: &MeasureType,
    quotes: &'a [BasicQuotation],
) -> ConstructionResult<&'a BasicQuotation> {
    find_quotation(measure, quotes)?.ok_or_else(|| ConstructionError::measure_not_found(measure.as_str()))
}

/// Converts a market quote into `target` units.
///
/// Only `MarketQuote` measures are converted and only towards `DecimalRate`
/// or `DecimalValue`; anything else comes back unchanged.
#[must_use]
pub fn normalise_price_units(quote: &BasicQuotation, target: &QuoteUnits) -> BasicQuotation {
    let convertible = quote.measure_type == MeasureType::MarketQuote
        && matches!(target, QuoteUnits::DecimalRate | QuoteUnits::DecimalValue);
    if !convertible {
        return quote.clone();
    }
    let value = match quote.quote_units {
        QuoteUnits::IRFuturesPrice | QuoteUnits::FuturesPrice => {
            (Decimal::ONE_HUNDRED - quote.value) / Decimal::ONE_HUNDRED
        }
        QuoteUnits::Rate | QuoteUnits::Volatility => quote.value / Decimal::ONE_HUNDRED,
        _ => quote.value,
    };
    BasicQuotation::new(MeasureType::MarketQuote, value, target.clone())
}

/// Inverse of [`normalise_price_units`]: expresses a decimal market quote in
/// `units` for display.
#[must_use]
pub fn denormalise_price_units(quote: &BasicQuotation, units: &QuoteUnits) -> BasicQuotation {
    if quote.measure_type != MeasureType::MarketQuote {
        return quote.clone();
    }
    let value = match units {
        QuoteUnits::IRFuturesPrice | QuoteUnits::FuturesPrice => {
            Decimal::ONE_HUNDRED - quote.value * Decimal::ONE_HUNDRED
        }
        QuoteUnits::Rate | QuoteUnits::Volatility => quote.value * Decimal::ONE_HUNDRED,
        _ => quote.value,
    };
    BasicQuotation::new(MeasureType::MarketQuote, value, units.clone())
}

fn value_or_zero(measure: &MeasureType, quotes: &[BasicQuotation], target: &QuoteUnits) -> ConstructionResult<Decimal> {
    Ok(find_quotation(measure, quotes)?
        .map(|q| normalise_price_units(q, target).value)
        .unwrap_or_default())
}

/// Normalised market quote plus spread, in `DecimalRate`. Missing entries
/// count as zero.
pub fn market_quote_add_spread_and_normalise(quotes: &[BasicQuotation]) -> ConstructionResult<BasicQuotation> {
    let target = QuoteUnits::DecimalRate;
    let quote = value_or_zero(&MeasureType::MarketQuote, quotes, &target)?;
    let spread = value_or_zero(&MeasureType::Spread, quotes, &target)?;
    Ok(BasicQuotation::market_quote(quote + spread, target))
}

/// As [`market_quote_add_spread_and_normalise`] with the market quote negated
/// first. Used when the quoted leg is the opposite of the modelled leg.
pub fn inverse_market_quote_add_spread_and_normalise(
    quotes: &[BasicQuotation],
) -> ConstructionResult<BasicQuotation> {
    let target = QuoteUnits::DecimalRate;
    let quote = value_or_zero(&MeasureType::MarketQuote, quotes, &target)?;
    let spread = value_or_zero(&MeasureType::Spread, quotes, &target)?;
    Ok(BasicQuotation::market_quote(-quote + spread, target))
}

/// Price-based variant: market quote plus spread, labelled `Price`.
pub fn market_quote_price_add_spread_and_normalise(
    quotes: &[BasicQuotation],
) -> ConstructionResult<BasicQuotation> {
    let target = QuoteUnits::Price;
    let quote = value_or_zero(&MeasureType::MarketQuote, quotes, &target)?;
    let spread = value_or_zero(&MeasureType::Spread, quotes, &target)?;
    Ok(BasicQuotation::market_quote(quote + spread, target))
}

/// The named measure normalised to `DecimalRate`, or a zero quotation of that
/// measure when absent.
pub fn market_quote_and_normalise(
    measure: &MeasureType,
    quotes: &[BasicQuotation],
) -> ConstructionResult<BasicQuotation> {
    let target = QuoteUnits::DecimalRate;
    Ok(match find_quotation(measure, quotes)? {
        Some(q) => normalise_price_units(q, &target),
        None => BasicQuotation::new(measure.clone(), Decimal::ZERO, target),
    })
}

/// Folds the spread into the market quote and zeroes the spread entry. Other
/// quotations are passed through.
pub fn market_quote_remove_spread_and_normalise(
    quotes: &[BasicQuotation],
) -> ConstructionResult<Vec<BasicQuotation>> {
    let combined = market_quote_add_spread_and_normalise(quotes)?;
    let mut out: Vec<BasicQuotation> = quotes
        .iter()
        .filter(|q| {
            !matches!(q.measure_type, MeasureType::MarketQuote | MeasureType::Spread)
        })
        .cloned()
        .collect();
    out.insert(0, combined);
    out.insert(1, BasicQuotation::spread(Decimal::ZERO));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn mq(value: Decimal, units: QuoteUnits) -> BasicQuotation {
        BasicQuotation::market_quote(value, units)
    }

    #[test]
    fn test_futures_price_to_decimal_rate() {
        let n = normalise_price_units(&mq(dec!(95.50), QuoteUnits::IRFuturesPrice), &QuoteUnits::DecimalRate);
        assert_eq!(n.value, dec!(0.045));
        assert_eq!(n.quote_units, QuoteUnits::DecimalRate);
    }

    #[test]
    fn test_percentage_units() {
        let n = normalise_price_units(&mq(dec!(4.5), QuoteUnits::Rate), &QuoteUnits::DecimalRate);
        assert_eq!(n.value, dec!(0.045));
        let v = normalise_price_units(&mq(dec!(20), QuoteUnits::Volatility), &QuoteUnits::DecimalValue);
        assert_eq!(v.value, dec!(0.2));
        assert_eq!(v.quote_units, QuoteUnits::DecimalValue);
    }

    #[test]
    fn test_non_market_quote_untouched() {
        let vol = BasicQuotation::new(MeasureType::Volatility, dec!(20), QuoteUnits::Volatility);
        assert_eq!(normalise_price_units(&vol, &QuoteUnits::DecimalRate), vol);
        let q = mq(dec!(95.5), QuoteUnits::IRFuturesPrice);
        assert_eq!(normalise_price_units(&q, &QuoteUnits::Price), q);
    }

    #[test]
    fn test_normalisation_idempotent() {
        let once = normalise_price_units(&mq(dec!(4.5), QuoteUnits::Rate), &QuoteUnits::DecimalRate);
        let twice = normalise_price_units(&once, &QuoteUnits::DecimalRate);
        assert_eq!(once, twice);

        let quotes = vec![once.clone()];
        assert_eq!(market_quote_add_spread_and_normalise(&quotes).unwrap(), once);
    }

    #[test]
    fn test_add_spread() {
        let quotes = vec![mq(dec!(4.5), QuoteUnits::Rate), BasicQuotation::spread(dec!(0.001))];
        let n = market_quote_add_spread_and_normalise(&quotes).unwrap();
        assert_eq!(n.value, dec!(0.046));
        let inv = inverse_market_quote_add_spread_and_normalise(&quotes).unwrap();
        assert_eq!(inv.value, dec!(-0.044));
    }

    #[test]
    fn test_missing_market_quote_is_zero() {
        let n = market_quote_add_spread_and_normalise(&[]).unwrap();
        assert_eq!(n.value, Decimal::ZERO);
        let vol = market_quote_and_normalise(&MeasureType::Volatility, &[]).unwrap();
        assert_eq!(vol.measure_type, MeasureType::Volatility);
        assert_eq!(vol.value, Decimal::ZERO);
    }

    #[test]
    fn test_find_quotation_case_insensitive_and_ambiguous() {
        let quotes = vec![BasicQuotation::new(
            MeasureType::Other("marketquote".to_string()),
            dec!(1),
            QuoteUnits::DecimalRate,
        )];
        assert!(find_quotation(&MeasureType::MarketQuote, &quotes).unwrap().is_some());

        let dup = vec![mq(dec!(1), QuoteUnits::DecimalRate), mq(dec!(2), QuoteUnits::DecimalRate)];
        assert!(matches!(
            find_quotation(&MeasureType::MarketQuote, &dup),
            Err(ConstructionError::AmbiguousMeasure { .. })
        ));
        assert!(matches!(
            require_quotation(&MeasureType::Strike, &dup),
            Err(ConstructionError::MeasureNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_spread() {
        let quotes = vec![
            mq(dec!(4.5), QuoteUnits::Rate),
            BasicQuotation::spread(dec!(0.002)),
            BasicQuotation::new(MeasureType::Strike, dec!(0.05), QuoteUnits::DecimalRate),
        ];
        let out = market_quote_remove_spread_and_normalise(&quotes).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].value, dec!(0.047));
        assert_eq!(out[1].measure_type, MeasureType::Spread);
        assert_eq!(out[1].value, Decimal::ZERO);
        assert_eq!(out[2].measure_type, MeasureType::Strike);
    }

    #[test]
    fn test_denormalise_inverts() {
        let price = mq(dec!(95.50), QuoteUnits::IRFuturesPrice);
        let n = normalise_price_units(&price, &QuoteUnits::DecimalRate);
        assert_eq!(denormalise_price_units(&n, &QuoteUnits::IRFuturesPrice).value, dec!(95.50));
        let rate = normalise_price_units(&mq(dec!(4.5), QuoteUnits::Rate), &QuoteUnits::DecimalRate);
        assert_eq!(denormalise_price_units(&rate, &QuoteUnits::Rate).value, dec!(4.5));
    }

    #[test]
    fn test_from_parallel() {
        let v = AssetValuation::from_parallel(
            "AUD-Deposit-3M",
            &[dec!(0.045), dec!(0.001)],
            &["MarketQuote", "Spread"],
            &["DecimalRate", "DecimalSpread"],
        )
        .unwrap();
        assert_eq!(v.quotes[1].measure_type, MeasureType::Spread);
        assert!(AssetValuation::from_parallel("X", &[dec!(1)], &[], &[]).is_err());
    }

    #[test]
    fn test_measure_serde_as_string() {
        let q = mq(dec!(0.5), QuoteUnits::DecimalRate);
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"MarketQuote\""));
        let back: BasicQuotation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }
}
