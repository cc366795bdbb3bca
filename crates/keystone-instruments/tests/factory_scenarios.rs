//! End-to-end construction through the store-backed factory.

mod common;

use std::sync::Arc;

use common::{base_date, d, fixture};
use keystone_core::types::{Currency, Properties};
use keystone_instruments::asset_type::{AssetType, OptionType};
use keystone_instruments::calendar::CalendarCache;
use keystone_instruments::factory::BUILD_SUCCESS_MESSAGE;
use keystone_instruments::identifier::build_properties;
use keystone_instruments::keys;
use keystone_instruments::priceable::{FutureContract, FxKind, PriceableAsset, SwapKind};
use keystone_instruments::quotes::{AssetValuation, BasicQuotation, MeasureType, QuoteUnits};
use keystone_instruments::template::InstrumentNode;
use keystone_instruments::ConstructionError;
use rust_decimal_macros::dec;

fn rate_quote(value: rust_decimal::Decimal) -> AssetValuation {
    AssetValuation::new("q", vec![BasicQuotation::market_quote(value, QuoteUnits::DecimalRate)])
}

#[test]
fn test_deposit_from_identifier() {
    let fx = fixture();
    let asset = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-Deposit-3M", base_date(), &rate_quote(dec!(0.05)), None, None)
        .unwrap();

    assert_eq!(asset.id(), "AUD-Deposit-3M");
    assert_eq!(asset.asset_type(), AssetType::Deposit);
    assert_eq!(asset.risk_maturity_date(), d(2025, 4, 15));
    assert_eq!(asset.market_quote().map(|q| q.value), Some(dec!(0.05)));
    assert!(asset.valuation().is_some());
}

#[test]
fn test_overnight_deposit_skips_holiday() {
    let fx = fixture();
    // Friday before the 27 January holiday.
    let asset = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-Deposit-ON", d(2025, 1, 24), &rate_quote(dec!(0.04)), None, None)
        .unwrap();

    let PriceableAsset::SimpleRate(deposit) = &asset else {
        panic!("expected a simple rate asset");
    };
    assert_eq!(deposit.start_date(), d(2025, 1, 24));
    assert_eq!(deposit.end_date(), d(2025, 1, 28));
}

#[test]
fn test_swap_leaves_template_untouched() {
    let fx = fixture();
    let shared = fx.templates.get_instrument_configuration(&fx.namespace, "AUD-IRSwap-3Y").unwrap();
    let asset = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-IRSwap-3Y", base_date(), &rate_quote(dec!(0.04)), None, None)
        .unwrap();

    assert_eq!(asset.core().template().id(), "AUD-IRSwap-3Y");
    match asset.core().template().node() {
        InstrumentNode::Swap(n) => assert_eq!(n.term.map(|t| t.to_string()), Some("3Y".to_string())),
        other => panic!("unexpected node {other:?}"),
    }

    assert_eq!(shared.id(), "AUD-IRSwap");
    match shared.node() {
        InstrumentNode::Swap(n) => assert!(n.term.is_none()),
        other => panic!("unexpected node {other:?}"),
    }
    assert_eq!(*shared, common::swap_template());
}

#[test]
fn test_swap_dates() {
    let fx = fixture();
    let asset = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-IRSwap-3Y", base_date(), &rate_quote(dec!(0.04)), None, None)
        .unwrap();

    let PriceableAsset::Swap(swap) = &asset else {
        panic!("expected a swap");
    };
    assert_eq!(swap.kind(), SwapKind::Vanilla);
    assert_eq!(swap.start_date(), d(2025, 1, 16));
    assert_eq!(swap.payment_dates().len(), 6);
    // 16 January 2028 is a Sunday.
    assert_eq!(asset.risk_maturity_date(), d(2028, 1, 17));
}

#[test]
fn test_unknown_asset_type_on_create() {
    let fx = fixture();
    let template = fx.templates.get_instrument_configuration(&fx.namespace, "AUD-Deposit-3M").unwrap();
    let props = Properties::new()
        .with(keys::ASSET_TYPE, "Widget")
        .with(keys::CURRENCY, "AUD")
        .with(keys::ASSET_ID, "AUD-Widget-3M")
        .with(keys::BASE_DATE, base_date());

    let err = fx
        .factory
        .create(&template, &rate_quote(dec!(0.05)), &props, None, None)
        .unwrap_err();
    assert!(matches!(err, ConstructionError::UnsupportedAssetType { ref asset_type } if asset_type == "Widget"));
    assert!(!err.is_recoverable());
}

#[test]
fn test_missing_required_property() {
    let fx = fixture();
    let template = fx.templates.get_instrument_configuration(&fx.namespace, "AUD-Deposit-3M").unwrap();
    let mut props = build_properties(&fx.namespace, "AUD-Deposit-3M", base_date(), None).unwrap();
    props.remove(keys::TERM);

    let err = fx
        .factory
        .create(&template, &rate_quote(dec!(0.05)), &props, None, None)
        .unwrap_err();
    assert!(matches!(err, ConstructionError::MissingRequiredProperty { ref key, .. } if key == keys::TERM));
}

#[test]
fn test_shape_mismatch_is_recoverable() {
    let fx = fixture();
    let deposit = fx.templates.get_instrument_configuration(&fx.namespace, "AUD-Deposit-3M").unwrap();
    let props = build_properties(&fx.namespace, "AUD-IRSwap-5Y", base_date(), None).unwrap();

    let err = fx
        .factory
        .create(&deposit, &rate_quote(dec!(0.04)), &props, None, None)
        .unwrap_err();
    assert!(matches!(err, ConstructionError::TemplateShapeMismatch { .. }));
    assert!(err.is_recoverable());
}

#[test]
fn test_template_not_found() {
    let fx = fixture();
    let err = fx
        .factory
        .create_from_identifier(&fx.namespace, "NZD-Deposit-3M", base_date(), &rate_quote(dec!(0.05)), None, None)
        .unwrap_err();
    assert!(matches!(err, ConstructionError::TemplateNotFound { .. }));
}

#[test]
fn test_create_is_deterministic() {
    let fx = fixture();
    let build = || {
        fx.factory
            .create_from_identifier(&fx.namespace, "AUD-IRSwap-5Y", base_date(), &rate_quote(dec!(0.04)), None, None)
            .unwrap()
    };
    let (a, b) = (build(), build());
    assert_eq!(a.id(), b.id());
    assert_eq!(a.risk_maturity_date(), b.risk_maturity_date());
    assert_eq!(a.core().template(), b.core().template());
    assert_eq!(a.market_quote(), b.market_quote());
}

#[test]
fn test_basis_swap_quote_inversion() {
    let fx = fixture();
    let quotes = rate_quote(dec!(0.25));

    // Template margin leg pays 3M against a 6M index.
    let inverted = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-BasisSwap-5Y", base_date(), &quotes, None, None)
        .unwrap();
    assert_eq!(inverted.market_quote().map(|q| q.value), Some(dec!(-0.25)));

    // Index term overridden to match the margin leg.
    let straight = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-BasisSwap-5Y-3M", base_date(), &quotes, None, None)
        .unwrap();
    assert_eq!(straight.market_quote().map(|q| q.value), Some(dec!(0.25)));

    let PriceableAsset::Swap(swap) = &inverted else {
        panic!("expected a swap");
    };
    assert!(swap.is_inverted());
    assert!(matches!(swap.kind(), SwapKind::Basis { cross_currency: false, .. }));
}

#[test]
fn test_caplet_takes_strike_and_volatility() {
    let fx = fixture();
    let valuation = AssetValuation::from_parallel("q", &[dec!(0.2)], &["Volatility"], &["DecimalVolatility"]).unwrap();
    let asset = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-Caplet-1Y-3M-0.05", base_date(), &valuation, None, None)
        .unwrap();

    let PriceableAsset::RateOption(caplet) = &asset else {
        panic!("expected a rate option");
    };
    assert_eq!(caplet.strike(), Some(dec!(0.05)));
    assert!(!caplet.is_floor());
    let quote = asset.market_quote().unwrap();
    assert_eq!(quote.measure_type, MeasureType::Volatility);
    assert_eq!(quote.value, dec!(0.2));
}

#[test]
fn test_futures_dispatch() {
    let fx = fixture();
    let price = AssetValuation::from_parallel("q", &[dec!(95.5)], &["MarketQuote"], &["IRFuturesPrice"]).unwrap();

    let ir = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-IRFuture-IR-H5", base_date(), &price, None, None)
        .unwrap();
    let PriceableAsset::Future(ir) = &ir else {
        panic!("expected a future");
    };
    assert_eq!(ir.contract(), &FutureContract::RateFuture);
    assert_eq!(ir.last_trading_date(), d(2025, 3, 19));

    let lme = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-CommodityFuture-LME.AH-Z5", base_date(), &price, None, None)
        .unwrap();
    let PriceableAsset::Future(lme) = &lme else {
        panic!("expected a future");
    };
    assert_eq!(lme.contract(), &FutureContract::Lme);
    assert_eq!(lme.exchange(), "XLME");

    let brent = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-CommodityFuture-ICE.B-Z5", base_date(), &price, None, None)
        .unwrap();
    let PriceableAsset::Future(brent) = &brent else {
        panic!("expected a future");
    };
    assert_eq!(brent.contract(), &FutureContract::IceBrent);

    let err = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-CommodityFuture-CBOT.C-Z5", base_date(), &price, None, None)
        .unwrap_err();
    assert!(matches!(err, ConstructionError::UnsupportedFuturesCode { ref code, .. } if code == "C"));
}

#[test]
fn test_future_option_side_from_tag() {
    let fx = fixture();
    let valuation = AssetValuation::from_parallel("q", &[dec!(0.25)], &["Volatility"], &["DecimalVolatility"]).unwrap();
    let asset = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-IRPutFutureOption-IR-M5-96.5", base_date(), &valuation, None, None)
        .unwrap();

    let PriceableAsset::Future(option) = &asset else {
        panic!("expected a future");
    };
    assert_eq!(
        option.contract(),
        &FutureContract::RateFutureOption {
            option_type: OptionType::Put,
            strike: Some(dec!(96.5)),
        }
    );
}

#[test]
fn test_bond_from_identifier() {
    let fx = fixture();
    let price = AssetValuation::from_parallel("q", &[dec!(101.5)], &["MarketQuote"], &["DirtyPrice"]).unwrap();
    let asset = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-Bond-Govt.AU.Fixed.5,25.15/03/2030", base_date(), &price, None, None)
        .unwrap();

    let PriceableAsset::Bond(bond) = &asset else {
        panic!("expected a bond");
    };
    assert_eq!(bond.coupon_rate(), dec!(0.0525));
    assert_eq!(bond.maturity(), d(2030, 3, 15));
    assert_eq!(bond.settlement_date(), d(2025, 1, 20));
    assert_eq!(asset.risk_maturity_date(), d(2030, 3, 15));
}

#[test]
fn test_bond_without_notional_keeps_template_face_amount() {
    let fx = fixture();
    let price = AssetValuation::from_parallel("q", &[dec!(101.5)], &["MarketQuote"], &["DirtyPrice"]).unwrap();
    let asset = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-Bond-Govt.AU.Fixed.5,25.15/03/2030", base_date(), &price, None, None)
        .unwrap();

    let PriceableAsset::Bond(bond) = &asset else {
        panic!("expected a bond");
    };
    assert_eq!(bond.face_amount(), dec!(100));
    assert_eq!(asset.core().notional(), dec!(100));
}

#[test]
fn test_bond_notional_overrides_face_amount() {
    let fx = fixture();
    let price = AssetValuation::from_parallel("q", &[dec!(101.5)], &["MarketQuote"], &["DirtyPrice"]).unwrap();
    let props = build_properties(
        &fx.namespace,
        "AUD-Bond-Govt.AU.Fixed.5,25.15/03/2030",
        base_date(),
        Some(dec!(1000000)),
    )
    .unwrap();
    let asset = fx.factory.create_from_store(&fx.namespace, &price, &props, None, None).unwrap();

    let PriceableAsset::Bond(bond) = &asset else {
        panic!("expected a bond");
    };
    assert_eq!(bond.face_amount(), dec!(1000000));
}

#[test]
fn test_swap_without_notional_keeps_template_notional() {
    let fx = fixture();
    let asset = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-IRSwap-3Y", base_date(), &rate_quote(dec!(0.04)), None, None)
        .unwrap();

    match asset.core().template().node() {
        InstrumentNode::Swap(n) => assert!(n.notional.is_none()),
        other => panic!("unexpected node {other:?}"),
    }
}

#[test]
fn test_bare_future_option_builds_a_put() {
    let fx = fixture();
    let valuation = AssetValuation::from_parallel("q", &[dec!(0.25)], &["Volatility"], &["DecimalVolatility"]).unwrap();
    let asset = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUD-IRFutureOption-IR-M5-96.5", base_date(), &valuation, None, None)
        .unwrap();

    let PriceableAsset::Future(option) = &asset else {
        panic!("expected a future");
    };
    assert_eq!(
        option.contract(),
        &FutureContract::RateFutureOption {
            option_type: OptionType::Put,
            strike: Some(dec!(96.5)),
        }
    );
    assert_eq!(asset.core().template().id(), "AUD-IRPutFutureOption-IR-M5-96.5");
}

#[test]
fn test_fx_forward_pair() {
    let fx = fixture();
    let rate = AssetValuation::from_parallel("q", &[dec!(0.625)], &["MarketQuote"], &["FxRate"]).unwrap();
    let asset = fx
        .factory
        .create_from_identifier(&fx.namespace, "AUDUSD-FxForward-3M", base_date(), &rate, None, None)
        .unwrap();

    let PriceableAsset::Fx(forward) = &asset else {
        panic!("expected an fx asset");
    };
    assert_eq!(forward.kind(), FxKind::Forward);
    assert_eq!(forward.counter_currency(), Some(Currency::USD));
    assert_eq!(forward.value_date(), d(2025, 4, 17));
}

#[test]
fn test_batch_resolves_calendar_once() {
    let fx = fixture();
    let factory = fx
        .factory
        .with_calendar_provider(Arc::new(CalendarCache::new(fx.resolver.clone())));

    let terms = ["1W", "2W", "1M", "2M", "3M", "4M", "5M", "6M", "9M", "12M"];
    for i in 0..50 {
        let id = format!("AUD-Deposit-{}", terms[i % terms.len()]);
        factory
            .create_from_identifier(&fx.namespace, &id, base_date(), &rate_quote(dec!(0.05)), None, None)
            .unwrap();
    }
    assert_eq!(fx.resolver.builds(), 1);
}

#[test]
fn test_build_priceable_asset_reports_success() {
    let fx = fixture();
    let mut props = build_properties(&fx.namespace, "AUD-Deposit-3M", base_date(), None).unwrap();
    props.remove(keys::UNIQUE_IDENTIFIER);

    let built = fx
        .factory
        .build_priceable_asset(
            &fx.namespace,
            &[dec!(0.05), dec!(0.001)],
            &["MarketQuote", "Spread"],
            &["DecimalRate", "DecimalSpread"],
            &props,
            None,
            None,
        )
        .unwrap();

    assert_eq!(built.message, BUILD_SUCCESS_MESSAGE);
    assert!(built.unique_identifier.starts_with("Local.PriceableAsset.AUD-Deposit-3M-0.05"));
    assert!(built.unique_identifier.ends_with("2025-01-15"));
    assert_eq!(built.asset.market_quote().map(|q| q.value), Some(dec!(0.051)));
}

#[test]
fn test_build_priceable_asset_rejects_ragged_quotes() {
    let fx = fixture();
    let props = build_properties(&fx.namespace, "AUD-Deposit-3M", base_date(), None).unwrap();
    let err = fx
        .factory
        .build_priceable_asset(&fx.namespace, &[dec!(0.05)], &["MarketQuote", "Spread"], &["DecimalRate"], &props, None, None)
        .unwrap_err();
    assert!(matches!(err, ConstructionError::InvalidProperty { .. }));
}
