use std::rc::Rc;

use crate::core::{Datum, Dimension, FilterKind, FilterPredicate, FilterValue};

/// `has(filters, probe)`; a `None` probe asks whether anything is filtered.
pub type HasFilterHandler = Rc<dyn Fn(&[FilterValue], Option<&FilterValue>) -> bool>;
pub type AddFilterHandler = Rc<dyn Fn(Vec<FilterValue>, FilterValue) -> Vec<FilterValue>>;
pub type RemoveFilterHandler = Rc<dyn Fn(Vec<FilterValue>, &FilterValue) -> Vec<FilterValue>>;
pub type ResetFilterHandler = Rc<dyn Fn(Vec<FilterValue>) -> Vec<FilterValue>>;
/// Pushes a filter set into the dimension. A returned list replaces the
/// chart's filter set, letting the adapter normalize what it received.
pub type ApplyFilterHandler =
    Rc<dyn Fn(&mut dyn Dimension, &[FilterValue]) -> Option<Vec<FilterValue>>>;

/// The pluggable filter semantics of a chart.
///
/// Uniqueness inside a filter set is a contract between `has`, `add` and
/// `remove`; the chart itself never deduplicates.
#[derive(Clone)]
pub struct FilterHandlers {
    pub has: HasFilterHandler,
    pub add: AddFilterHandler,
    pub remove: RemoveFilterHandler,
    pub reset: ResetFilterHandler,
    pub apply: ApplyFilterHandler,
}

impl Default for FilterHandlers {
    fn default() -> Self {
        Self {
            has: Rc::new(default_has_filter),
            add: Rc::new(default_add_filter),
            remove: Rc::new(default_remove_filter),
            reset: Rc::new(default_reset_filter),
            apply: Rc::new(default_apply_filter),
        }
    }
}

impl FilterHandlers {
    #[must_use]
    pub fn with_has(mut self, handler: HasFilterHandler) -> Self {
        self.has = handler;
        self
    }

    #[must_use]
    pub fn with_add(mut self, handler: AddFilterHandler) -> Self {
        self.add = handler;
        self
    }

    #[must_use]
    pub fn with_remove(mut self, handler: RemoveFilterHandler) -> Self {
        self.remove = handler;
        self
    }

    #[must_use]
    pub fn with_reset(mut self, handler: ResetFilterHandler) -> Self {
        self.reset = handler;
        self
    }

    #[must_use]
    pub fn with_apply(mut self, handler: ApplyFilterHandler) -> Self {
        self.apply = handler;
        self
    }
}

/// Membership under the closed-range test, so a plain value is never
/// covered by a range that merely contains it.
pub fn default_has_filter(filters: &[FilterValue], probe: Option<&FilterValue>) -> bool {
    match probe {
        None => !filters.is_empty(),
        Some(probe) => filters.iter().any(|filter| filter.closed_range_eq(probe)),
    }
}

pub fn default_add_filter(mut filters: Vec<FilterValue>, value: FilterValue) -> Vec<FilterValue> {
    filters.push(value);
    filters
}

pub fn default_remove_filter(
    mut filters: Vec<FilterValue>,
    value: &FilterValue,
) -> Vec<FilterValue> {
    let position = filters
        .iter()
        .position(|filter| filter.closed_range_eq(value));
    if let Some(position) = position {
        filters.remove(position);
    }
    filters
}

pub fn default_reset_filter(_filters: Vec<FilterValue>) -> Vec<FilterValue> {
    Vec::new()
}

/// Default bridge to the data source:
/// - no filters clear the dimension,
/// - one plain value becomes an exact match,
/// - one ranged filter becomes a range filter,
/// - anything else installs a predicate accepting a key when any filter does.
pub fn default_apply_filter(
    dimension: &mut dyn Dimension,
    filters: &[FilterValue],
) -> Option<Vec<FilterValue>> {
    match filters {
        [] => dimension.filter_all(),
        [FilterValue::Plain(value)] => dimension.filter_exact(value),
        [FilterValue::Predicate(range)] if range.kind() == FilterKind::Ranged => {
            dimension.filter_range(range);
        }
        _ => {
            let accepted = filters.to_vec();
            let predicate: FilterPredicate =
                Rc::new(move |key: &Datum| accepted.iter().any(|filter| filter.accepts(key)));
            dimension.filter_function(predicate);
        }
    }
    Some(filters.to_vec())
}

#[cfg(test)]
mod tests {
    use super::{default_apply_filter, default_has_filter, default_remove_filter};
    use crate::core::{Datum, DimensionCall, FilterValue, RecordingDimension};

    #[test]
    fn has_filter_without_probe_is_non_empty_test() {
        assert!(!default_has_filter(&[], None));
        assert!(default_has_filter(&[FilterValue::from(1)], None));
    }

    #[test]
    fn has_filter_uses_the_closed_range_test() {
        let filters = [FilterValue::from(5), FilterValue::ranged(10, 20)];
        assert!(default_has_filter(&filters, Some(&FilterValue::from(5.0))));
        assert!(!default_has_filter(&filters, Some(&FilterValue::from(15))));
        assert!(!default_has_filter(&filters, Some(&FilterValue::from("5"))));
    }

    #[test]
    fn has_filter_compares_predicate_probes_structurally() {
        let filters = [FilterValue::ranged(10, 20)];
        assert!(default_has_filter(&filters, Some(&FilterValue::ranged(10, 20))));
        assert!(!default_has_filter(&filters, Some(&FilterValue::ranged(12, 18))));
    }

    #[test]
    fn remove_drops_first_match_only() {
        let filters = vec![
            FilterValue::from(1),
            FilterValue::from(2),
            FilterValue::from(1),
        ];
        let remaining = default_remove_filter(filters, &FilterValue::from(1));
        assert_eq!(remaining, vec![FilterValue::from(2), FilterValue::from(1)]);
    }

    #[test]
    fn remove_with_plain_probe_keeps_a_covering_range() {
        let filters = vec![FilterValue::ranged(10, 20), FilterValue::from(12)];
        let remaining = default_remove_filter(filters, &FilterValue::from(12));
        assert_eq!(remaining, vec![FilterValue::ranged(10, 20)]);
    }

    #[test]
    fn apply_maps_filter_shapes_to_dimension_calls() {
        let mut dimension = RecordingDimension::new();

        default_apply_filter(&mut dimension, &[]);
        default_apply_filter(&mut dimension, &[FilterValue::from(5)]);
        default_apply_filter(&mut dimension, &[FilterValue::ranged(1, 5)]);

        assert_eq!(
            dimension.calls(),
            &[
                DimensionCall::FilterAll,
                DimensionCall::FilterExact(Datum::from(5)),
                DimensionCall::FilterRange(
                    FilterValue::ranged(1, 5)
                        .as_predicate()
                        .cloned()
                        .expect("ranged predicate")
                ),
            ]
        );
    }

    #[test]
    fn apply_installs_any_match_predicate_for_multiple_filters() {
        let mut dimension = RecordingDimension::new();
        let filters = [FilterValue::from(5), FilterValue::from(9)];
        let applied = default_apply_filter(&mut dimension, &filters);

        assert_eq!(applied.as_deref(), Some(&filters[..]));
        assert_eq!(dimension.last_call(), Some(&DimensionCall::FilterFunction));
        assert!(dimension.accepts(&Datum::from(5)));
        assert!(dimension.accepts(&Datum::from(9)));
        assert!(!dimension.accepts(&Datum::from(7)));
    }

    #[test]
    fn single_non_ranged_predicate_goes_through_function_filter() {
        let mut dimension = RecordingDimension::new();
        default_apply_filter(&mut dimension, &[FilterValue::hierarchy(["a"])]);
        assert_eq!(dimension.last_call(), Some(&DimensionCall::FilterFunction));
        assert!(dimension.accepts(&Datum::from(vec!["a", "b"])));
    }
}
