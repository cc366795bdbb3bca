//! # Keystone Core
//!
//! Core types shared by the Keystone instrument factory and curve resolver.
//!
//! This crate provides the foundational building blocks used throughout Keystone:
//!
//! - **Types**: `Date`, `Currency`, `Period` and the typed `Properties` bag
//! - **Business Day Calendars**: the `Calendar` trait, adjustment conventions and
//!   holiday calendars built from business centers
//! - **Day Counts**: the small set of year-fraction conventions instruments need
//! - **Traits**: the `MarketData` view instruments are valued against
//!
//! ## Example
//!
//! ```rust
//! use keystone_core::prelude::*;
//!
//! let base = Date::from_ymd(2025, 1, 15).unwrap();
//! let term = Period::parse("3M").unwrap();
//! assert_eq!(base.add_period(term).unwrap(), Date::from_ymd(2025, 4, 15).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        BusinessCenters, BusinessDayConvention, Calendar, HolidayCalendar, WeekendCalendar,
    };
    pub use crate::daycounts::DayCountFraction;
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::traits::MarketData;
    pub use crate::types::{Currency, Date, Period, PeriodUnit, Properties, PropertyValue};
}

pub use error::{CoreError, CoreResult};
