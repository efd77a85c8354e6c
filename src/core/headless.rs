//! In-memory data source collaborators for tests and headless usage.
//!
//! `RecordingDimension` keeps a log of every filter call and the currently
//! installed filter, so callers can assert exactly what a chart pushed into
//! the data source. `StaticGroup` serves a fixed set of records.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::data_source::{DataGroup, Dimension, FilterPredicate};
use super::filters::PredicateFilter;
use super::types::{Datum, GroupRecord};

/// One call received by a [`RecordingDimension`].
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionCall {
    FilterAll,
    FilterExact(Datum),
    FilterRange(PredicateFilter),
    FilterFunction,
}

#[derive(Clone, Default)]
enum ActiveFilter {
    #[default]
    None,
    Exact(Datum),
    Range(PredicateFilter),
    Function(FilterPredicate),
}

pub struct RecordingDimension {
    calls: Vec<DimensionCall>,
    active: ActiveFilter,
    filterable: bool,
}

impl RecordingDimension {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            active: ActiveFilter::None,
            filterable: true,
        }
    }

    /// A dimension that reports no filtering capability.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            filterable: false,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn calls(&self) -> &[DimensionCall] {
        &self.calls
    }

    #[must_use]
    pub fn last_call(&self) -> Option<&DimensionCall> {
        self.calls.last()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !matches!(self.active, ActiveFilter::None)
    }

    /// Whether a record with `key` passes the currently installed filter.
    #[must_use]
    pub fn accepts(&self, key: &Datum) -> bool {
        match &self.active {
            ActiveFilter::None => true,
            ActiveFilter::Exact(value) => value == key,
            ActiveFilter::Range(range) => range.is_filtered(key),
            ActiveFilter::Function(predicate) => predicate(key),
        }
    }
}

impl Default for RecordingDimension {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordingDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingDimension")
            .field("calls", &self.calls)
            .field("filtered", &self.is_filtered())
            .field("filterable", &self.filterable)
            .finish()
    }
}

impl Dimension for RecordingDimension {
    fn filter_all(&mut self) {
        self.calls.push(DimensionCall::FilterAll);
        self.active = ActiveFilter::None;
    }

    fn filter_exact(&mut self, value: &Datum) {
        self.calls.push(DimensionCall::FilterExact(value.clone()));
        self.active = ActiveFilter::Exact(value.clone());
    }

    fn filter_range(&mut self, range: &PredicateFilter) {
        self.calls.push(DimensionCall::FilterRange(range.clone()));
        self.active = ActiveFilter::Range(range.clone());
    }

    fn filter_function(&mut self, predicate: FilterPredicate) {
        self.calls.push(DimensionCall::FilterFunction);
        self.active = ActiveFilter::Function(predicate);
    }

    fn supports_filtering(&self) -> bool {
        self.filterable
    }
}

/// Group returning the same records on every call.
#[derive(Debug, Clone, Default)]
pub struct StaticGroup {
    records: Vec<GroupRecord>,
}

impl StaticGroup {
    #[must_use]
    pub fn new(records: Vec<GroupRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }
}

impl DataGroup for StaticGroup {
    fn all(&self) -> Vec<GroupRecord> {
        self.records.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{DimensionCall, RecordingDimension};
    use crate::core::{Datum, Dimension, FilterValue};

    #[test]
    fn recording_dimension_tracks_active_filter() {
        let mut dimension = RecordingDimension::new();
        assert!(dimension.accepts(&Datum::from(1)));

        dimension.filter_exact(&Datum::from(2));
        assert!(!dimension.accepts(&Datum::from(1)));
        assert!(dimension.accepts(&Datum::from(2)));

        dimension.filter_function(Rc::new(|key: &Datum| key.as_number() == Some(7.0)));
        assert!(dimension.accepts(&Datum::from(7)));

        dimension.filter_all();
        assert!(!dimension.is_filtered());
        assert_eq!(
            dimension.calls(),
            &[
                DimensionCall::FilterExact(Datum::from(2)),
                DimensionCall::FilterFunction,
                DimensionCall::FilterAll,
            ]
        );
    }

    #[test]
    fn range_call_uses_predicate_bounds() {
        let mut dimension = RecordingDimension::new();
        let range = FilterValue::ranged(0, 10);
        dimension.filter_range(range.as_predicate().expect("predicate"));
        assert!(dimension.accepts(&Datum::from(9)));
        assert!(!dimension.accepts(&Datum::from(10)));
    }
}
