//! Property tests for tenor parsing and date arithmetic.

use keystone_core::calendars::{BusinessDayConvention, Calendar, HolidayCalendar};
use keystone_core::types::{Date, Period, PeriodUnit};
use proptest::prelude::*;

fn arb_unit() -> impl Strategy<Value = PeriodUnit> {
    prop_oneof![
        Just(PeriodUnit::Day),
        Just(PeriodUnit::Week),
        Just(PeriodUnit::Month),
        Just(PeriodUnit::Year),
    ]
}

fn arb_date() -> impl Strategy<Value = Date> {
    (2000i32..2060, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| Date::from_ymd(y, m, d).unwrap())
}

proptest! {
    /// Display output of a period parses back to the same period.
    #[test]
    fn period_display_roundtrip(multiplier in 0i32..600, unit in arb_unit()) {
        let period = Period::new(multiplier, unit);
        prop_assert_eq!(Period::parse(&period.to_string()).unwrap(), period);
        prop_assert_eq!(Period::parse(&period.to_string().to_lowercase()).unwrap(), period);
    }

    /// Adjusted dates are always business days, whatever the convention.
    #[test]
    fn adjusted_dates_are_business_days(date in arb_date(), offset in 0i64..10) {
        let cal = HolidayCalendar::new("TEST", [date.add_days(offset)]);
        for convention in [
            BusinessDayConvention::Following,
            BusinessDayConvention::ModifiedFollowing,
            BusinessDayConvention::Preceding,
            BusinessDayConvention::ModifiedPreceding,
        ] {
            prop_assert!(cal.is_business_day(cal.adjust(date, convention)));
        }
    }

    /// Month arithmetic never lands past the end of the target month.
    #[test]
    fn add_months_stays_in_target_month(date in arb_date(), months in -120i32..120) {
        let rolled = date.add_months(months).unwrap();
        let expected_index = date.year() * 12 + date.month() as i32 - 1 + months;
        prop_assert_eq!(rolled.year() * 12 + rolled.month() as i32 - 1, expected_index);
    }
}
