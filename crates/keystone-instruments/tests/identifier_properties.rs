//! Property tests for identifier parsing and canonical spelling.

use keystone_core::types::Date;
use keystone_instruments::asset_type::AssetType;
use keystone_instruments::identifier::{build_properties, canonical_identifier, AssetIdentifier};
use keystone_instruments::keys;
use keystone_instruments::ConstructionError;
use keystone_store::Namespace;
use proptest::prelude::*;

fn arb_currency() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["AUD", "USD", "EUR", "GBP", "JPY", "NZD"])
}

fn arb_tenor() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["1W", "1M", "3M", "6M", "9M", "1Y", "2Y", "5Y", "10Y", "30Y"]),
        any::<bool>(),
    )
        .prop_map(|(t, lower)| if lower { t.to_lowercase() } else { t.to_string() })
}

fn arb_strike() -> impl Strategy<Value = String> {
    (1u32..1000, 0u32..3).prop_map(|(bp, pad)| format!("0.{bp:04}{}", "0".repeat(pad as usize)))
}

fn arb_identifier() -> impl Strategy<Value = String> {
    prop_oneof![
        (arb_currency(), arb_tenor()).prop_map(|(c, t)| format!("{c}-Deposit-{t}")),
        (arb_currency(), arb_tenor()).prop_map(|(c, t)| format!("{c}-Xibor-{t}")),
        (arb_currency(), arb_tenor(), prop::option::of(arb_tenor()))
            .prop_map(|(c, t, i)| match i {
                Some(i) => format!("{c}-IRSwap-{t}-{i}"),
                None => format!("{c}-IRSwap-{t}"),
            }),
        (arb_currency(), arb_tenor(), arb_tenor()).prop_map(|(c, s, i)| format!("{c}-Fra-{s}-{i}")),
        (arb_currency(), arb_tenor(), arb_tenor(), prop::option::of(arb_strike()))
            .prop_map(|(c, s, i, k)| match k {
                Some(k) => format!("{c}-Caplet-{s}-{i}-{k}"),
                None => format!("{c}-Caplet-{s}-{i}"),
            }),
        (arb_currency(), prop::sample::select(vec!["h5", "M6", "u7", "Z8"]))
            .prop_map(|(c, code)| format!("{c}-IRFuture-IR-{code}")),
        (
            arb_currency(),
            prop::sample::select(vec!["IRFutureOption", "IRPutFutureOption", "IRCallFutureOption"]),
            prop::sample::select(vec!["h5", "M6"]),
            prop::option::of(prop::sample::select(vec!["96.5", "95.250", "0.95"])),
        )
            .prop_map(|(c, tag, code, k)| match k {
                Some(k) => format!("{c}-{tag}-IR-{code}-{k}"),
                None => format!("{c}-{tag}-IR-{code}"),
            }),
        (arb_currency(), arb_currency(), prop::sample::select(vec!["SP", "TN", "3M", "1Y"]))
            .prop_filter("distinct pair", |(b, c, _)| b != c)
            .prop_map(|(b, c, t)| format!("{b}{c}-FxForward-{t}")),
        (arb_currency(), 1u32..15, 0u32..100, 2026i32..2050).prop_map(|(c, whole, frac, year)| {
            format!("{c}-Bond-Govt.{}.Fixed.{whole},{frac:02}.15/03/{year}", &c[..2])
        }),
    ]
}

/// One spelling per asset-type tag, aliases included.
const EVERY_TAG: &[&str] = &[
    "AUD-Deposit-3M",
    "AUD-SpreadDeposit-6M",
    "USDAUD-XccyDepo-3M",
    "AUD-BankBill-3M",
    "AUD-Repo-1W",
    "AUD-RepoSpread-1M",
    "AUD-SimpleFra-3M-3M",
    "AUD-Fra-6M-3M",
    "AUD-BillFra-3M-3M",
    "AUD-SpreadFra-1Y-6M",
    "AUD-Caplet-1Y-3M-0.05",
    "AUD-Floorlet-1Y-3M",
    "AUD-BillCaplet-6M-3M-0.045",
    "AUD-BillFloorlet-6M-3M-0.02",
    "AUD-IRCap-5Y-3M-0.05",
    "AUD-IRFloor-2Y-6M",
    "AUD-IRSwap-3Y",
    "AUD-XccySwap-5Y",
    "AUD-BasisSwap-5Y-3M",
    "AUDUSD-XccyBasisSwap-10Y",
    "AUDUSD-ResettableXccyBasisSwap-5Y-3M",
    "AUD-OISSwap-1Y",
    "AUD-ClearedIRSwap-7Y-6M",
    "AUD-CPISwap-10Y",
    "AUD-ZCCPISwap-5Y",
    "AUD-Xibor-6M",
    "AUD-OIS-1D",
    "AUD-CPIndex-3M",
    "AUD-ZeroRate-2Y",
    "AUD-IRFuture-IR-H5",
    "AUD-IRFutureOption-IR-M5-96.5",
    "AUD-IRPutFutureOption-IR-H5-0.95",
    "AUD-IRCallFutureOption-IR-U5",
    "AUD-CommodityFuture-CBOT.W-Z5",
    "AUD-CommodityFutureSpread-CBOT.W-H6",
    "AUD-Bond-Govt.AU.Fixed.5,25.15/03/2030",
    "AUD-BondSpot-Govt.AU",
    "AUD-BondForward-Govt.AU-3M",
    "AUDUSD-FxSpot-SP",
    "AUDUSD-FxForward-TN",
    "AUD-CommoditySpot-Wheat",
    "AUD-CommodityForward-Wheat-3M",
    "AUD-CommodityAverageForward-Wheat-3M-1M",
    "AUD-CommoditySpread-Wheat.Corn-6M",
    "AUD-Equity-BHP",
    "AUD-EquityForward-BHP-1Y",
];

fn assert_roundtrip(identifier: &str) {
    let ns = Namespace::new("Test");
    let props = build_properties(&ns, identifier, base(), None)
        .unwrap_or_else(|e| panic!("{identifier}: {e}"));
    let canonical = canonical_identifier(&props).unwrap_or_else(|e| panic!("{identifier}: {e}"));
    assert_eq!(props.get_str(keys::ASSET_ID), Some(canonical.as_str()), "{identifier}");

    let rebuilt = build_properties(&ns, &canonical, base(), None).unwrap_or_else(|e| panic!("{canonical}: {e}"));
    assert_eq!(rebuilt, props, "{identifier}");
    assert_eq!(canonical_identifier(&rebuilt).unwrap(), canonical, "{identifier}");
}

#[test]
fn test_every_tag_roundtrips() {
    for tag in AssetType::ALL {
        assert!(
            EVERY_TAG.iter().any(|id| id.split('-').nth(1) == Some(tag.as_str())),
            "no identifier for {tag}"
        );
    }
    for identifier in EVERY_TAG {
        assert_roundtrip(identifier);
    }
}

fn base() -> Date {
    Date::from_ymd(2025, 1, 15).unwrap()
}

proptest! {
    /// Rebuilding from the canonical identifier yields the same property bag.
    #[test]
    fn canonical_identifier_roundtrip(identifier in arb_identifier()) {
        let ns = Namespace::new("Test");
        let props = build_properties(&ns, &identifier, base(), None).unwrap();
        let canonical = canonical_identifier(&props).unwrap();
        prop_assert_eq!(props.get_str(keys::ASSET_ID), Some(canonical.as_str()));

        let rebuilt = build_properties(&ns, &canonical, base(), None).unwrap();
        prop_assert_eq!(&rebuilt, &props);
        prop_assert_eq!(canonical_identifier(&rebuilt).unwrap(), canonical);
    }

    /// Canonicalization is idempotent at the parser level too.
    #[test]
    fn canonical_spelling_is_stable(identifier in arb_identifier()) {
        let once = AssetIdentifier::parse(&identifier).unwrap().canonical();
        let twice = AssetIdentifier::parse(&once).unwrap().canonical();
        prop_assert_eq!(once, twice);
    }

    /// An unknown tag is always reported as such, never as a parse failure.
    #[test]
    fn unknown_tags_are_classified(currency in arb_currency(), tag in "[A-Z][a-z]{3,8}Thing", tenor in arb_tenor()) {
        let identifier = format!("{currency}-{tag}-{tenor}");
        let err = AssetIdentifier::parse(&identifier).unwrap_err();
        let is_unknown = matches!(err, ConstructionError::UnknownAssetType { .. });
        prop_assert!(is_unknown);
    }

    /// Too few tokens is a parse error whatever the content.
    #[test]
    fn short_identifiers_fail_to_parse(currency in arb_currency(), tag in "[A-Za-z]{1,10}") {
        let err = AssetIdentifier::parse(&format!("{currency}-{tag}")).unwrap_err();
        let is_parse = matches!(err, ConstructionError::Parse { .. });
        prop_assert!(is_parse);
    }
}
