//! Business calendar resolution.
//!
//! A template names business centers (`AUSY`, `GBLO-USNY`); a
//! [`CalendarProvider`] turns such a set into a shared [`Calendar`]. The
//! [`CalendarResolver`] builds a fresh calendar on every call. Batch callers
//! wrap it in a [`CalendarCache`] so each distinct set is built once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use keystone_core::calendars::{BusinessCenters, Calendar, HolidayCalendar};
use keystone_core::types::{Date, Properties};
use keystone_store::{Namespace, ObjectStore, ObjectStoreExt};
use parking_lot::Mutex;
use tracing::debug;

use crate::error::ConstructionResult;

/// Id prefix of holiday lists in the store.
pub const HOLIDAY_PREFIX: &str = "BusinessCenterCalendar";

/// Supplies the holiday dates of a single business center.
pub trait HolidaySource: Send + Sync {
    /// Holidays of `center`, or `None` if the center is unknown.
    fn holidays(&self, namespace: &Namespace, center: &str) -> ConstructionResult<Option<Vec<Date>>>;
}

/// Reads holiday lists saved as `BusinessCenterCalendar.{center}` items.
pub struct StoreHolidaySource {
    store: Arc<dyn ObjectStore>,
}

impl StoreHolidaySource {
    /// Creates a source over `store`.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Saves the holiday list of a center.
    pub fn save_holidays(&self, namespace: &Namespace, center: &str, holidays: &[Date]) -> ConstructionResult<()> {
        let center = center.trim().to_uppercase();
        let key = namespace.key(format!("{HOLIDAY_PREFIX}.{center}"));
        let props = Properties::new().with("BusinessCenter", center.as_str());
        self.store.save_object(key, holidays, props, None)?;
        Ok(())
    }
}

impl HolidaySource for StoreHolidaySource {
    fn holidays(&self, namespace: &Namespace, center: &str) -> ConstructionResult<Option<Vec<Date>>> {
        let key = namespace.key(format!("{HOLIDAY_PREFIX}.{center}"));
        Ok(self.store.load_object::<Vec<Date>>(&key)?.map(|(dates, _)| dates))
    }
}

/// Turns a business-center set into a calendar.
pub trait CalendarProvider: Send + Sync {
    /// Calendar observing the holidays of every center in `centers`.
    fn calendar_for(&self, centers: &BusinessCenters) -> ConstructionResult<Arc<dyn Calendar>>;
}

/// Builds [`HolidayCalendar`]s from a [`HolidaySource`]. No caching.
pub struct CalendarResolver {
    source: Arc<dyn HolidaySource>,
    namespace: Namespace,
    builds: AtomicUsize,
}

impl CalendarResolver {
    /// Creates a resolver reading holidays from `namespace`.
    pub fn new(source: Arc<dyn HolidaySource>, namespace: Namespace) -> Self {
        Self {
            source,
            namespace,
            builds: AtomicUsize::new(0),
        }
    }

    /// Number of calendars built so far.
    #[must_use]
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

impl CalendarProvider for CalendarResolver {
    fn calendar_for(&self, centers: &BusinessCenters) -> ConstructionResult<Arc<dyn Calendar>> {
        let mut holidays = Vec::new();
        for center in centers.iter() {
            match self.source.holidays(&self.namespace, center)? {
                Some(dates) => holidays.extend(dates),
                None => debug!(center, namespace = %self.namespace, "No holidays stored for business center"),
            }
        }
        self.builds.fetch_add(1, Ordering::Relaxed);
        let calendar = HolidayCalendar::new(centers.to_string(), holidays);
        debug!(calendar = calendar.name(), holidays = calendar.holiday_count(), "Built calendar");
        Ok(Arc::new(calendar))
    }
}

/// Memoizes another provider by business-center set.
///
/// Meant to live for one batch; the wrapped provider is hit once per distinct
/// set.
pub struct CalendarCache {
    inner: Arc<dyn CalendarProvider>,
    built: Mutex<HashMap<BusinessCenters, Arc<dyn Calendar>>>,
}

impl CalendarCache {
    /// Wraps `inner`.
    pub fn new(inner: Arc<dyn CalendarProvider>) -> Self {
        Self {
            inner,
            built: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct sets resolved.
    #[must_use]
    pub fn len(&self) -> usize {
        self.built.lock().len()
    }

    /// True before the first resolution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.built.lock().is_empty()
    }
}

impl CalendarProvider for CalendarCache {
    fn calendar_for(&self, centers: &BusinessCenters) -> ConstructionResult<Arc<dyn Calendar>> {
        let mut built = self.built.lock();
        if let Some(calendar) = built.get(centers) {
            return Ok(Arc::clone(calendar));
        }
        let calendar = self.inner.calendar_for(centers)?;
        built.insert(centers.clone(), Arc::clone(&calendar));
        Ok(calendar)
    }
}
