//! Shared fixtures: an in-memory store seeded with AUD templates and AUSY
//! holidays.

#![allow(dead_code)]

use std::sync::Arc;

use keystone_core::calendars::{BusinessCenters, BusinessDayConvention};
use keystone_core::daycounts::DayCountFraction;
use keystone_core::types::{Currency, Date, Period, PeriodUnit};
use keystone_instruments::asset_type::AssetType;
use keystone_instruments::calendar::{CalendarResolver, StoreHolidaySource};
use keystone_instruments::template::*;
use keystone_instruments::PriceableAssetFactory;
use keystone_store::{InMemoryStore, Namespace, ObjectStore};
use rust_decimal_macros::dec;

pub const NS: &str = "Test";

pub fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

pub fn base_date() -> Date {
    d(2025, 1, 15)
}

fn days(n: i32) -> Period {
    Period::new(n, PeriodUnit::Day)
}

fn months(n: i32) -> Period {
    Period::new(n, PeriodUnit::Month)
}

fn ausy() -> BusinessCenters {
    BusinessCenters::parse("AUSY")
}

fn spot(lag: i32) -> RelativeDateOffset {
    RelativeDateOffset::new(days(lag), ausy(), BusinessDayConvention::Following)
}

fn adjustments() -> BusinessDayAdjustments {
    BusinessDayAdjustments::new(BusinessDayConvention::ModifiedFollowing, ausy())
}

pub fn deposit_template() -> InstrumentTemplate {
    InstrumentTemplate::new(
        "AUD-Deposit",
        Currency::AUD,
        InstrumentNode::Deposit(DepositNode {
            term: None,
            start_term: None,
            spot_offset: spot(0),
            payment_adjustments: adjustments(),
            day_count: DayCountFraction::Act365Fixed,
        }),
    )
}

pub fn swap_template() -> InstrumentTemplate {
    InstrumentTemplate::new(
        "AUD-IRSwap",
        Currency::AUD,
        InstrumentNode::Swap(SwapNode {
            term: None,
            index_term: Some(months(6)),
            fixed_frequency: months(6),
            spot_offset: spot(1),
            payment_adjustments: adjustments(),
            day_count: DayCountFraction::Act365Fixed,
            notional: None,
        }),
    )
}

pub fn basis_template() -> InstrumentTemplate {
    let leg = |frequency: Period, index: Period| LegSpec {
        payment_frequency: frequency,
        index_term: Some(index),
        day_count: DayCountFraction::Act365Fixed,
        currency: None,
    };
    InstrumentTemplate::new(
        "AUD-BasisSwap",
        Currency::AUD,
        InstrumentNode::BasisSwap(BasisSwapNode {
            term: None,
            margin_leg: leg(months(3), months(3)),
            index_leg: leg(months(6), months(6)),
            spot_offset: spot(1),
            payment_adjustments: adjustments(),
            resettable: false,
            notional: None,
        }),
    )
}

pub fn caplet_template() -> InstrumentTemplate {
    InstrumentTemplate::new(
        "AUD-Caplet",
        Currency::AUD,
        InstrumentNode::RateOption(RateOptionNode {
            term: None,
            index_term: None,
            strike: None,
            fixing_offset: spot(0),
            payment_adjustments: adjustments(),
            day_count: DayCountFraction::Act365Fixed,
            notional: None,
        }),
    )
}

pub fn future_template(exchange: &str, code: &str) -> InstrumentTemplate {
    InstrumentTemplate::new(
        format!("AUD-Future-{exchange}"),
        Currency::AUD,
        InstrumentNode::Future(FutureNode {
            exchange: exchange.to_string(),
            contract_code: code.to_string(),
            underlying_term: months(3),
            contract_size: dec!(1000000),
            fixing_offset: spot(0),
            day_count: DayCountFraction::Act365Fixed,
        }),
    )
}

pub fn bond_template() -> InstrumentTemplate {
    InstrumentTemplate::new(
        "AUD-Bond",
        Currency::AUD,
        InstrumentNode::Bond(BondNode {
            settlement_date: spot(3),
            coupon_frequency: months(6),
            coupon_rate: None,
            maturity: None,
            face_amount: dec!(100),
            day_count: DayCountFraction::Act365Fixed,
            payment_adjustments: adjustments(),
            forward_term: None,
        }),
    )
}

pub fn fx_template() -> InstrumentTemplate {
    InstrumentTemplate::new(
        "AUD-FxForward",
        Currency::AUD,
        InstrumentNode::Fx(FxNode {
            counter_currency: Some(Currency::USD),
            spot_offset: spot(2),
            forward_term: None,
        }),
    )
}

pub fn equity_template() -> InstrumentTemplate {
    InstrumentTemplate::new(
        "AUD-Equity",
        Currency::AUD,
        InstrumentNode::Equity(EquityNode {
            settlement_offset: spot(2),
            forward_term: None,
            payment_adjustments: adjustments(),
        }),
    )
}

/// Store, resolver and factory wired together.
pub struct Fixture {
    pub store: Arc<dyn ObjectStore>,
    pub templates: Arc<TemplateStore>,
    pub resolver: Arc<CalendarResolver>,
    pub factory: PriceableAssetFactory,
    pub namespace: Namespace,
}

pub fn fixture() -> Fixture {
    let store: Arc<dyn ObjectStore> = Arc::new(InMemoryStore::new());
    let namespace = Namespace::new(NS);

    let holidays = StoreHolidaySource::new(Arc::clone(&store));
    holidays
        .save_holidays(&namespace, "AUSY", &[d(2025, 1, 1), d(2025, 1, 27), d(2025, 4, 18), d(2025, 4, 21)])
        .unwrap();

    let templates = Arc::new(TemplateStore::new(Arc::clone(&store)));
    let save = |asset_type: AssetType, extra: Option<&str>, template: InstrumentTemplate| {
        templates.save_template(&namespace, asset_type, extra, &template).unwrap();
    };
    save(AssetType::Deposit, None, deposit_template());
    save(AssetType::IRSwap, None, swap_template());
    save(AssetType::BasisSwap, None, basis_template());
    save(AssetType::Caplet, None, caplet_template());
    save(AssetType::IRFuture, None, future_template("XSFE", "IR"));
    save(AssetType::IRFutureOption, None, future_template("XSFE", "IR"));
    save(AssetType::CommodityFuture, Some("LME.AH"), future_template("XLME", "AH"));
    save(AssetType::CommodityFuture, None, future_template("IFEU", "B"));
    save(AssetType::Bond, None, bond_template());
    save(AssetType::FxForward, None, fx_template());
    save(AssetType::EquityForward, None, equity_template());

    let resolver = Arc::new(CalendarResolver::new(Arc::new(holidays), namespace.clone()));
    let factory = PriceableAssetFactory::new(Arc::clone(&templates), resolver.clone());
    Fixture {
        store,
        templates,
        resolver,
        factory,
        namespace,
    }
}
