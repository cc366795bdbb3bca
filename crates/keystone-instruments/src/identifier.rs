//! Asset identifier parsing and property-bag construction.
//!
//! An identifier such as `AUD-IRSwap-3Y-6M` names a currency, an asset type
//! and a type-specific list of terms. [`build_properties`] is the single
//! validation gate before any instrument is constructed: unknown tags and
//! structurally incomplete identifiers are rejected here.

use std::str::FromStr;

use keystone_core::types::{Currency, Date, Period, Properties};
use keystone_store::Namespace;
use rust_decimal::Decimal;

use crate::asset_type::{AssetType, OptionType};
use crate::error::{ConstructionError, ConstructionResult};
use crate::keys;

/// How the tokens after the asset-type tag are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schema {
    /// `StartTerm-IndexTerm`
    Fra,
    /// `StartTerm-IndexTerm[-Strike]`
    StartOption,
    /// `Term-IndexTerm[-Strike]`
    TermOption,
    /// `Term[-IndexTerm]`
    Swap,
    /// `Term`, validated as a tenor
    RateTerm,
    /// `Term`, free text
    Term,
    /// `Underlying[-ExpiryTerm]`
    ForwardExpiry,
    /// `Underlying[-ExpiryTerm[-UnderlyingTenor]]`
    AverageForward,
    /// `Contract-ExpiryCode`
    Future,
    /// `Contract-ExpiryCode[-Strike]`
    FutureOption,
    /// `BondType.x.x.Coupon.Maturity`
    Bond,
    /// `BondReference[-ForwardTerm]`
    BondForward,
}

impl Schema {
    fn of(asset_type: AssetType) -> Schema {
        use AssetType::*;
        match asset_type {
            SimpleFra | Fra | BillFra | SpreadFra => Schema::Fra,
            Caplet | Floorlet | BillCaplet | BillFloorlet => Schema::StartOption,
            IRCap | IRFloor => Schema::TermOption,
            IRSwap | BasisSwap | XccyBasisSwap | ResettableXccyBasisSwap | OISSwap
            | ClearedIRSwap => Schema::Swap,
            Deposit | SpreadDeposit | XccyDepo | BankBill | Repo | RepoSpread | Xibor | OIS
            | ZeroRate | CPISwap | XccySwap | ZCCPISwap | CPIndex => Schema::RateTerm,
            FxSpot | FxForward | CommoditySpot | Equity | BondSpot => Schema::Term,
            EquityForward | CommodityForward | CommoditySpread => Schema::ForwardExpiry,
            CommodityAverageForward => Schema::AverageForward,
            IRFuture | CommodityFuture | CommodityFutureSpread => Schema::Future,
            IRFutureOption | IRPutFutureOption | IRCallFutureOption => Schema::FutureOption,
            Bond => Schema::Bond,
            BondForward => Schema::BondForward,
        }
    }

    /// (minimum, maximum) number of term tokens.
    fn arity(self) -> (usize, usize) {
        match self {
            Schema::Fra => (2, 2),
            Schema::StartOption | Schema::TermOption => (2, 3),
            Schema::Swap => (1, 2),
            Schema::RateTerm | Schema::Term | Schema::Bond => (1, 1),
            Schema::ForwardExpiry | Schema::BondForward => (1, 2),
            Schema::AverageForward => (1, 3),
            Schema::Future => (2, 2),
            Schema::FutureOption => (2, 3),
        }
    }
}

/// A parsed and normalized asset identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetIdentifier {
    /// Leading currency.
    pub currency: Currency,
    /// Counter currency when the leading token is a pair such as `AUDUSD`.
    pub counter_currency: Option<Currency>,
    /// Canonical asset type. Put/call future option tags collapse to
    /// [`AssetType::IRFutureOption`].
    pub asset_type: AssetType,
    /// Option side of a rate future option. A bare `IRFutureOption` tag is a
    /// put.
    pub option_type: Option<OptionType>,
    /// Normalized term tokens following the asset-type tag.
    pub terms: Vec<String>,
}

impl AssetIdentifier {
    /// Parses an identifier.
    ///
    /// # Errors
    ///
    /// `UnknownAssetType` when the second token is not a known tag, `Parse`
    /// for anything else structurally wrong.
    pub fn parse(identifier: &str) -> ConstructionResult<Self> {
        let tokens: Vec<&str> = identifier.trim().split('-').map(str::trim).collect();
        if tokens.len() < 3 {
            return Err(ConstructionError::parse(
                identifier,
                format!("expected at least 3 '-' separated tokens, found {}", tokens.len()),
            ));
        }
        if let Some(pos) = tokens.iter().position(|t| t.is_empty()) {
            return Err(ConstructionError::parse(identifier, format!("token {pos} is empty")));
        }

        let tagged = AssetType::from_tag(tokens[1]).ok_or_else(|| {
            ConstructionError::UnknownAssetType {
                tag: tokens[1].to_string(),
                identifier: identifier.to_string(),
            }
        })?;
        let (currency, counter_currency) = parse_currency(identifier, tokens[0])?;
        let (asset_type, option_type) = match tagged {
            AssetType::IRPutFutureOption => (AssetType::IRFutureOption, Some(OptionType::Put)),
            AssetType::IRCallFutureOption => (AssetType::IRFutureOption, Some(OptionType::Call)),
            AssetType::IRFutureOption => (AssetType::IRFutureOption, Some(OptionType::Put)),
            other => (other, None),
        };

        let schema = Schema::of(asset_type);
        let raw_terms = &tokens[2..];
        let (min, max) = schema.arity();
        if raw_terms.len() < min || raw_terms.len() > max {
            return Err(ConstructionError::parse(
                identifier,
                format!(
                    "{asset_type} takes {min} to {max} terms after the asset type, found {}",
                    raw_terms.len()
                ),
            ));
        }

        let terms = raw_terms
            .iter()
            .enumerate()
            .map(|(idx, token)| normalize_term(identifier, schema, idx, token))
            .collect::<ConstructionResult<Vec<_>>>()?;

        Ok(Self {
            currency,
            counter_currency,
            asset_type,
            option_type,
            terms,
        })
    }

    /// Canonical spelling: uppercase currency, canonical tag, normalized terms.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut parts = vec![self.currency_token(), self.tag().to_string()];
        parts.extend(self.terms.iter().cloned());
        parts.join("-")
    }

    /// Type-specific fields only, as [`build_properties`] writes them when no
    /// amount is supplied.
    pub fn schema_properties(&self) -> ConstructionResult<Properties> {
        let mut props = Properties::new();
        self.write_schema_fields(&mut props, None)?;
        Ok(props)
    }

    fn currency_token(&self) -> String {
        match self.counter_currency {
            Some(counter) => format!("{}{}", self.currency, counter),
            None => self.currency.to_string(),
        }
    }

    fn tag(&self) -> &'static str {
        match (self.asset_type, self.option_type) {
            (AssetType::IRFutureOption, Some(OptionType::Put)) => AssetType::IRPutFutureOption.as_str(),
            (AssetType::IRFutureOption, Some(OptionType::Call)) => {
                AssetType::IRCallFutureOption.as_str()
            }
            (t, _) => t.as_str(),
        }
    }

    fn term(&self, idx: usize) -> Option<&str> {
        self.terms.get(idx).map(String::as_str)
    }

    /// Writes the type-specific fields into `props`.
    fn write_schema_fields(&self, props: &mut Properties, amount: Option<Decimal>) -> ConstructionResult<()> {
        let t2 = self.term(0).unwrap_or_default();
        match Schema::of(self.asset_type) {
            Schema::Fra => {
                props.set(keys::START_TERM, t2);
                props.set(keys::EXTRA_ITEM, self.term(1).unwrap_or_default());
            }
            Schema::StartOption => {
                props.set(keys::START_TERM, t2);
                props.set(keys::EXTRA_ITEM, self.term(1).unwrap_or_default());
                self.write_strike(props, 2)?;
            }
            Schema::TermOption => {
                props.set(keys::TERM, t2);
                props.set(keys::EXTRA_ITEM, self.term(1).unwrap_or_default());
                self.write_strike(props, 2)?;
            }
            Schema::Swap => {
                props.set(keys::TERM, t2);
                match self.term(1) {
                    Some(index_term) => {
                        props.set(keys::INDEX_TERM, index_term);
                        props.set(keys::EXTRA_ITEM, format!("{t2}.{index_term}"));
                    }
                    None => props.set(keys::EXTRA_ITEM, t2),
                }
            }
            Schema::RateTerm | Schema::Term => {
                props.set(keys::EXTRA_ITEM, t2);
                props.set(keys::TERM, t2);
            }
            Schema::ForwardExpiry | Schema::AverageForward => {
                props.set(keys::EXTRA_ITEM, t2);
                if let Some(expiry) = self.term(1) {
                    props.set(keys::EXPIRY_TERM, expiry);
                }
                if let Some(tenor) = self.term(2) {
                    props.set(keys::UNDERLYING_TENOR, tenor);
                }
            }
            Schema::Future | Schema::FutureOption => {
                props.set(keys::EXTRA_ITEM, t2);
                props.set(keys::EXPIRY_CODE, self.term(1).unwrap_or_default());
                if let Some(position) = amount {
                    props.set(keys::POSITION, position);
                }
                if let Some(option_type) = self.option_type {
                    props.set(keys::OPTION_TYPE, option_type.as_str());
                }
                self.write_strike(props, 2)?;
            }
            Schema::Bond => {
                props.set(keys::START_TERM, t2);
                props.set(keys::EXTRA_ITEM, t2);
                let fields: Vec<&str> = t2.split('.').collect();
                props.set(keys::BOND_TYPE, fields[0]);
                if fields.len() > 4 {
                    props.set(keys::COUPON, parse_decimal(t2, fields[3])? / Decimal::ONE_HUNDRED);
                    let maturity = Date::parse(fields[4]).map_err(|e| {
                        ConstructionError::parse(t2, format!("bond maturity: {e}"))
                    })?;
                    props.set(keys::MATURITY, maturity);
                }
            }
            Schema::BondForward => {
                props.set(keys::BOND_TYPE, t2);
                if let Some(forward_term) = self.term(1) {
                    props.set(keys::EXTRA_ITEM, forward_term);
                }
            }
        }
        Ok(())
    }

    fn write_strike(&self, props: &mut Properties, idx: usize) -> ConstructionResult<()> {
        if let Some(strike) = self.term(idx) {
            props.set(keys::STRIKE, parse_decimal(strike, strike)?);
        }
        Ok(())
    }
}

fn parse_currency(identifier: &str, token: &str) -> ConstructionResult<(Currency, Option<Currency>)> {
    let bad = |e: keystone_core::CoreError| ConstructionError::parse(identifier, e.to_string());
    match token.len() {
        3 => Ok((Currency::from_str(token).map_err(bad)?, None)),
        6 if token.is_ascii() => {
            let base = Currency::from_str(&token[..3]).map_err(bad)?;
            let counter = Currency::from_str(&token[3..]).map_err(bad)?;
            Ok((base, Some(counter)))
        }
        _ => Err(ConstructionError::parse(
            identifier,
            format!("'{token}' is not a currency code or pair"),
        )),
    }
}

fn parse_decimal(context: &str, text: &str) -> ConstructionResult<Decimal> {
    Decimal::from_str(&text.replace(',', "."))
        .map_err(|_| ConstructionError::parse(context, format!("'{text}' is not a decimal number")))
}

/// Validates and normalizes one term token.
fn normalize_term(identifier: &str, schema: Schema, idx: usize, token: &str) -> ConstructionResult<String> {
    let tenor = |token: &str| -> ConstructionResult<String> {
        Period::parse(token).map_err(|e| ConstructionError::parse(identifier, e.to_string()))?;
        Ok(token.to_uppercase())
    };
    let strike = |token: &str| -> ConstructionResult<String> {
        Ok(parse_decimal(identifier, token)?.normalize().to_string())
    };

    match (schema, idx) {
        (Schema::Fra | Schema::Swap | Schema::RateTerm, _) => tenor(token),
        (Schema::StartOption | Schema::TermOption, 0 | 1) => tenor(token),
        (Schema::StartOption | Schema::TermOption | Schema::FutureOption, 2) => strike(token),
        (Schema::BondForward, 1) => tenor(token),
        (Schema::Future | Schema::FutureOption, 1) => Ok(token.to_uppercase()),
        _ => Ok(token.to_string()),
    }
}

/// Parses `identifier` and builds its property bag.
///
/// Always sets `AssetType`, `Currency1`, `AssetId` (the canonical identifier),
/// `BaseDate`, `NameSpace`, `DataGroup` and `UniqueIdentifier`, plus
/// `Notional` when an amount is supplied. The remaining keys depend on the
/// asset type.
///
/// # Example
///
/// ```rust
/// use keystone_instruments::identifier::build_properties;
/// use keystone_core::types::Date;
/// use keystone_store::Namespace;
///
/// let base = Date::from_ymd(2025, 1, 15).unwrap();
/// let props = build_properties(&Namespace::new("Orion"), "AUD-IRSwap-3Y", base, None).unwrap();
/// assert_eq!(props.get_str("Currency1"), Some("AUD"));
/// assert_eq!(props.get_str("AssetType"), Some("IRSwap"));
/// assert_eq!(props.get_str("Term"), Some("3Y"));
/// ```
pub fn build_properties(
    namespace: &Namespace,
    identifier: &str,
    base_date: Date,
    amount: Option<Decimal>,
) -> ConstructionResult<Properties> {
    let parsed = AssetIdentifier::parse(identifier)?;

    let mut props = Properties::new();
    props.set(keys::ASSET_TYPE, parsed.asset_type.as_str());
    props.set(keys::CURRENCY, parsed.currency.code());
    if let Some(counter) = parsed.counter_currency {
        props.set(keys::CURRENCY2, counter.code());
    }
    props.set(keys::ASSET_ID, parsed.canonical());
    props.set(keys::BASE_DATE, base_date);
    props.set(keys::NAMESPACE, namespace.as_str());
    if let Some(notional) = amount {
        props.set(keys::NOTIONAL, notional);
    }
    parsed.write_schema_fields(&mut props, amount)?;

    props.set(keys::DATA_GROUP, keys::DEFAULT_DATA_GROUP);
    let unique = unique_identifier(&props, None)?;
    props.set(keys::UNIQUE_IDENTIFIER, unique);
    Ok(props)
}

/// Builds bond properties with an explicitly supplied coupon and maturity,
/// overriding anything embedded in the identifier.
pub fn build_properties_for_bond(
    namespace: &Namespace,
    identifier: &str,
    base_date: Date,
    coupon: Decimal,
    maturity: Date,
    amount: Option<Decimal>,
) -> ConstructionResult<Properties> {
    let mut props = build_properties(namespace, identifier, base_date, amount)?;
    props.set(keys::COUPON, coupon);
    props.set(keys::MATURITY, maturity);
    let unique = unique_identifier(&props, None)?;
    props.set(keys::UNIQUE_IDENTIFIER, unique);
    Ok(props)
}

/// Rebuilds the canonical identifier from the required keys of a bag.
///
/// Feeding the result back through [`build_properties`] with the same base
/// date, namespace and amount reproduces the bag.
pub fn canonical_identifier(props: &Properties) -> ConstructionResult<String> {
    let text = |key: &str| -> ConstructionResult<String> {
        props
            .get(key)
            .map(ToString::to_string)
            .ok_or_else(|| ConstructionError::missing_property(key, "identifier"))
    };
    let optional = |key: &str| props.get(key).map(ToString::to_string);

    let tag = text(keys::ASSET_TYPE)?;
    let asset_type = AssetType::from_tag(&tag).ok_or_else(|| ConstructionError::UnsupportedAssetType {
        asset_type: tag.clone(),
    })?;
    let option_type = props.get_str(keys::OPTION_TYPE).and_then(OptionType::from_name);

    let mut currency = text(keys::CURRENCY)?;
    if let Some(counter) = optional(keys::CURRENCY2) {
        currency.push_str(&counter);
    }

    let mut terms: Vec<String> = Vec::new();
    match Schema::of(asset_type) {
        Schema::Fra => {
            terms.push(text(keys::START_TERM)?);
            terms.push(text(keys::EXTRA_ITEM)?);
        }
        Schema::StartOption => {
            terms.push(text(keys::START_TERM)?);
            terms.push(text(keys::EXTRA_ITEM)?);
            terms.extend(optional(keys::STRIKE));
        }
        Schema::TermOption => {
            terms.push(text(keys::TERM)?);
            terms.push(text(keys::EXTRA_ITEM)?);
            terms.extend(optional(keys::STRIKE));
        }
        Schema::Swap => {
            terms.push(text(keys::TERM)?);
            terms.extend(optional(keys::INDEX_TERM));
        }
        Schema::RateTerm | Schema::Term => terms.push(text(keys::TERM)?),
        Schema::ForwardExpiry | Schema::AverageForward => {
            terms.push(text(keys::EXTRA_ITEM)?);
            terms.extend(optional(keys::EXPIRY_TERM));
            terms.extend(optional(keys::UNDERLYING_TENOR));
        }
        Schema::Future | Schema::FutureOption => {
            terms.push(text(keys::EXTRA_ITEM)?);
            terms.push(text(keys::EXPIRY_CODE)?);
            terms.extend(optional(keys::STRIKE));
        }
        Schema::Bond => terms.push(text(keys::EXTRA_ITEM)?),
        Schema::BondForward => {
            terms.push(text(keys::BOND_TYPE)?);
            terms.extend(optional(keys::EXTRA_ITEM));
        }
    }

    let tag = match (asset_type, option_type) {
        (AssetType::IRFutureOption, Some(OptionType::Put)) => AssetType::IRPutFutureOption,
        (AssetType::IRFutureOption, Some(OptionType::Call)) => AssetType::IRCallFutureOption,
        (t, _) => t,
    };
    let mut parts = vec![currency, tag.as_str().to_string()];
    parts.extend(terms);
    Ok(parts.join("-"))
}

/// Composes the store id of an asset:
/// `{DataGroup}.{AssetId}[-{distinguishing}]-{BaseDate}`, or
/// `{DataGroup}.{AssetId}-{Coupon}-{Maturity}` for bonds carrying both.
pub fn unique_identifier(props: &Properties, distinguishing: Option<&str>) -> ConstructionResult<String> {
    let data_group = props.get_str(keys::DATA_GROUP).unwrap_or(keys::DEFAULT_DATA_GROUP);
    let asset_id = props
        .get_str(keys::ASSET_ID)
        .ok_or_else(|| ConstructionError::missing_property(keys::ASSET_ID, "unique identifier"))?;

    if let (Some(coupon), Some(maturity)) = (props.get(keys::COUPON), props.get(keys::MATURITY)) {
        return Ok(format!("{data_group}.{asset_id}-{coupon}-{maturity}"));
    }

    let base_date = props
        .get(keys::BASE_DATE)
        .ok_or_else(|| ConstructionError::missing_property(keys::BASE_DATE, "unique identifier"))?;
    Ok(match distinguishing {
        Some(value) => format!("{data_group}.{asset_id}-{value}-{base_date}"),
        None => format!("{data_group}.{asset_id}-{base_date}"),
    })
}

/// Sets `UniqueIdentifier` from the first quote value unless one is already
/// present. Returns the identifier in effect.
pub fn assign_unique_identifier(props: &mut Properties, first_value: Decimal) -> ConstructionResult<String> {
    if let Some(existing) = props.get_str(keys::UNIQUE_IDENTIFIER) {
        return Ok(existing.to_string());
    }
    if !props.contains_key(keys::DATA_GROUP) {
        props.set(keys::DATA_GROUP, keys::DEFAULT_DATA_GROUP);
    }
    let value = first_value.normalize().to_string();
    let unique = unique_identifier(props, Some(&value))?;
    props.set(keys::UNIQUE_IDENTIFIER, unique.clone());
    Ok(unique)
}
