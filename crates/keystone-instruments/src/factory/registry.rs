//! The recipe table: one entry per asset type.
//!
//! A recipe states what a build needs (property keys, template shape,
//! calendars, quote treatment) and which builder produces the instrument.
//! The factory validates all of it before the builder runs.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::builders::{self, BuildFn};
use crate::asset_type::AssetType;
use crate::keys::{
    BASE_DATE, BOND_TYPE, COUPON, EXPIRY_CODE, EXPIRY_TERM, EXTRA_ITEM, MATURITY, START_TERM, TERM,
};
use crate::template::NodeShape;

/// Which calendars a build resolves when the caller supplies none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarNeeds {
    /// Fixing or spot calendar, from the template's fixing centers.
    pub fixing: bool,
    /// Payment calendar, from the template's payment centers.
    pub payment: bool,
}

const BOTH: CalendarNeeds = CalendarNeeds { fixing: true, payment: true };
const FIXING: CalendarNeeds = CalendarNeeds { fixing: true, payment: false };
const PAYMENT: CalendarNeeds = CalendarNeeds { fixing: false, payment: true };

/// How the supplied quotations become the instrument's market quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotePolicy {
    /// Market quote plus spread as a decimal rate.
    Rate,
    /// As `Rate`, negated when the margin leg pays at a different frequency
    /// from the index tenor.
    InverseOnTenorMismatch,
    /// Market quote plus spread as a price.
    Price,
    /// Volatility quote, with the strike taken from properties or quotes.
    Volatility,
}

/// Everything the factory needs to build one asset type.
#[derive(Clone)]
pub struct Recipe {
    /// Asset type built.
    pub asset_type: AssetType,
    /// Keys that must be present, beyond the common ones.
    pub required_keys: &'static [&'static str],
    /// Shape the template must have.
    pub shape: NodeShape,
    /// Calendars resolved when not supplied.
    pub calendars: CalendarNeeds,
    /// Quote treatment.
    pub quote_policy: QuotePolicy,
    pub(crate) build: BuildFn,
}

impl std::fmt::Debug for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recipe")
            .field("asset_type", &self.asset_type)
            .field("required_keys", &self.required_keys)
            .field("shape", &self.shape)
            .field("calendars", &self.calendars)
            .field("quote_policy", &self.quote_policy)
            .finish_non_exhaustive()
    }
}

/// Keys every recipe needs.
pub const COMMON_KEYS: &[&str] = &[crate::keys::ASSET_TYPE, crate::keys::CURRENCY, crate::keys::ASSET_ID, BASE_DATE];

fn recipe(
    asset_type: AssetType,
    required_keys: &'static [&'static str],
    shape: NodeShape,
    calendars: CalendarNeeds,
    quote_policy: QuotePolicy,
    build: BuildFn,
) -> Recipe {
    Recipe {
        asset_type,
        required_keys,
        shape,
        calendars,
        quote_policy,
        build,
    }
}

static RECIPES: Lazy<HashMap<AssetType, Recipe>> = Lazy::new(|| {
    use AssetType::*;
    use NodeShape as S;
    use QuotePolicy as Q;

    let term: &'static [&'static str] = &[TERM];
    let fra: &'static [&'static str] = &[START_TERM, EXTRA_ITEM];
    let cap: &'static [&'static str] = &[TERM, EXTRA_ITEM];
    let future: &'static [&'static str] = &[EXTRA_ITEM, EXPIRY_CODE];
    let bond: &'static [&'static str] = &[COUPON, MATURITY];
    let forward: &'static [&'static str] = &[EXTRA_ITEM, EXPIRY_TERM];

    let table = vec![
        // Cash and FRAs
        recipe(Deposit, term, S::Deposit, BOTH, Q::Rate, builders::cash),
        recipe(SpreadDeposit, term, S::Deposit, BOTH, Q::Rate, builders::cash),
        recipe(XccyDepo, term, S::Deposit, BOTH, Q::Rate, builders::cash),
        recipe(BankBill, term, S::Deposit, BOTH, Q::Rate, builders::cash),
        recipe(Repo, term, S::Deposit, BOTH, Q::Rate, builders::cash),
        recipe(RepoSpread, term, S::Deposit, BOTH, Q::Rate, builders::cash),
        recipe(SimpleFra, fra, S::Deposit, BOTH, Q::Rate, builders::fra),
        recipe(Fra, fra, S::Deposit, BOTH, Q::Rate, builders::fra),
        recipe(BillFra, fra, S::Deposit, BOTH, Q::Rate, builders::fra),
        recipe(SpreadFra, fra, S::Deposit, BOTH, Q::Rate, builders::fra),
        // Caps and floors
        recipe(Caplet, fra, S::RateOption, BOTH, Q::Volatility, builders::caplet),
        recipe(Floorlet, fra, S::RateOption, BOTH, Q::Volatility, builders::caplet),
        recipe(BillCaplet, fra, S::RateOption, BOTH, Q::Volatility, builders::caplet),
        recipe(BillFloorlet, fra, S::RateOption, BOTH, Q::Volatility, builders::caplet),
        recipe(IRCap, cap, S::RateOption, BOTH, Q::Volatility, builders::cap),
        recipe(IRFloor, cap, S::RateOption, BOTH, Q::Volatility, builders::cap),
        // Swaps
        recipe(IRSwap, term, S::Swap, BOTH, Q::Rate, builders::swap),
        recipe(XccySwap, term, S::Swap, BOTH, Q::Rate, builders::swap),
        recipe(OISSwap, term, S::Swap, BOTH, Q::Rate, builders::swap),
        recipe(ClearedIRSwap, term, S::Swap, BOTH, Q::Rate, builders::swap),
        recipe(CPISwap, term, S::Swap, BOTH, Q::Rate, builders::swap),
        recipe(ZCCPISwap, term, S::Swap, BOTH, Q::Rate, builders::swap),
        recipe(BasisSwap, term, S::BasisSwap, BOTH, Q::InverseOnTenorMismatch, builders::basis_swap),
        recipe(XccyBasisSwap, term, S::BasisSwap, BOTH, Q::InverseOnTenorMismatch, builders::basis_swap),
        recipe(
            ResettableXccyBasisSwap,
            term,
            S::BasisSwap,
            BOTH,
            Q::InverseOnTenorMismatch,
            builders::basis_swap,
        ),
        // Rate indices
        recipe(Xibor, term, S::RateIndex, BOTH, Q::Rate, builders::rate_index),
        recipe(OIS, term, S::RateIndex, BOTH, Q::Rate, builders::rate_index),
        recipe(CPIndex, term, S::RateIndex, BOTH, Q::Rate, builders::rate_index),
        recipe(ZeroRate, term, S::ZeroRate, PAYMENT, Q::Rate, builders::zero_rate),
        // Futures
        recipe(IRFuture, future, S::Future, FIXING, Q::Rate, builders::future),
        recipe(IRFutureOption, future, S::Future, FIXING, Q::Volatility, builders::future),
        recipe(IRPutFutureOption, future, S::Future, FIXING, Q::Volatility, builders::future),
        recipe(IRCallFutureOption, future, S::Future, FIXING, Q::Volatility, builders::future),
        recipe(CommodityFuture, future, S::Future, FIXING, Q::Price, builders::future),
        recipe(CommodityFutureSpread, future, S::Future, FIXING, Q::Price, builders::future),
        // Bonds
        recipe(Bond, bond, S::Bond, BOTH, Q::Price, builders::bond),
        recipe(BondSpot, bond, S::Bond, BOTH, Q::Price, builders::bond),
        recipe(BondForward, &[BOND_TYPE, COUPON, MATURITY], S::Bond, BOTH, Q::Price, builders::bond),
        // FX
        recipe(FxSpot, term, S::Fx, FIXING, Q::Price, builders::fx),
        recipe(FxForward, term, S::Fx, FIXING, Q::Price, builders::fx),
        // Commodities
        recipe(CommoditySpot, term, S::Commodity, FIXING, Q::Price, builders::commodity),
        recipe(CommodityForward, forward, S::Commodity, FIXING, Q::Price, builders::commodity),
        recipe(CommodityAverageForward, forward, S::Commodity, FIXING, Q::Price, builders::commodity),
        recipe(CommoditySpread, forward, S::Commodity, FIXING, Q::Price, builders::commodity),
        // Equities
        recipe(Equity, term, S::Equity, BOTH, Q::Price, builders::equity),
        recipe(EquityForward, forward, S::Equity, BOTH, Q::Price, builders::equity),
    ];

    table.into_iter().map(|r| (r.asset_type, r)).collect()
});

/// The recipe for `asset_type`.
#[must_use]
pub fn recipe_for(asset_type: AssetType) -> Option<&'static Recipe> {
    RECIPES.get(&asset_type)
}

/// Number of registered recipes.
#[must_use]
pub fn recipe_count() -> usize {
    RECIPES.len()
}
