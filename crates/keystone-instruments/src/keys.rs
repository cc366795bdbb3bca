//! Property keys read and written by the parser and the factory.

/// Canonical asset-type tag.
pub const ASSET_TYPE: &str = "AssetType";
/// Leading currency of the identifier.
pub const CURRENCY: &str = "Currency1";
/// Counter currency of an FX pair identifier.
pub const CURRENCY2: &str = "Currency2";
/// Canonical asset identifier.
pub const ASSET_ID: &str = "AssetId";
/// Valuation base date.
pub const BASE_DATE: &str = "BaseDate";
/// Client namespace.
pub const NAMESPACE: &str = "NameSpace";
/// Forward start term (FRAs, caplets, bonds).
pub const START_TERM: &str = "StartTerm";
/// Type-specific distinguishing item, also used to pick the template.
pub const EXTRA_ITEM: &str = "ExtraItem";
/// Maturity term.
pub const TERM: &str = "Term";
/// Forecast index term of a swap.
pub const INDEX_TERM: &str = "IndexTerm";
/// Option strike.
pub const STRIKE: &str = "Strike";
/// Notional amount.
pub const NOTIONAL: &str = "Notional";
/// Futures position.
pub const POSITION: &str = "Position";
/// Futures expiry code, e.g. `H5`.
pub const EXPIRY_CODE: &str = "ExpiryCode";
/// Forward expiry term.
pub const EXPIRY_TERM: &str = "ExpiryTerm";
/// Averaging tenor of an average forward.
pub const UNDERLYING_TENOR: &str = "UnderlyingTenor";
/// `Put` or `Call`.
pub const OPTION_TYPE: &str = "OptionType";
/// Bond maturity date.
pub const MATURITY: &str = "Maturity";
/// Bond coupon as a decimal rate.
pub const COUPON: &str = "Coupon";
/// Bond reference prefix.
pub const BOND_TYPE: &str = "BondType";
/// Store id of the built asset.
pub const UNIQUE_IDENTIFIER: &str = "UniqueIdentifier";
/// Data group prefix of the unique identifier.
pub const DATA_GROUP: &str = "DataGroup";

/// Data group used when none is supplied.
pub const DEFAULT_DATA_GROUP: &str = "Local.PriceableAsset";
