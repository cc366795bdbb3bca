//! Domain types shared across Keystone crates.

mod currency;
mod date;
mod period;
mod properties;

pub use currency::Currency;
pub use date::Date;
pub use period::{Period, PeriodUnit};
pub use properties::{Properties, PropertyValue};
