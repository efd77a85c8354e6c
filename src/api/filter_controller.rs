use tracing::debug;

use crate::core::{Datum, FilterArg, FilterValue};
use crate::extensions::{Channel, EventPayload};
use crate::render::{ChartDrawer, FilterIndicator};

use super::filter_handlers::{
    AddFilterHandler, ApplyFilterHandler, FilterHandlers, HasFilterHandler, RemoveFilterHandler,
    ResetFilterHandler,
};
use super::BaseChart;

fn toggle(
    handlers: &FilterHandlers,
    filters: Vec<FilterValue>,
    value: &FilterValue,
) -> Vec<FilterValue> {
    if (handlers.has)(&filters, Some(value)) {
        (handlers.remove)(filters, value)
    } else {
        (handlers.add)(filters, value.clone())
    }
}

fn toggle_arg(
    handlers: &FilterHandlers,
    filters: Vec<FilterValue>,
    arg: &FilterArg,
) -> Vec<FilterValue> {
    match arg {
        FilterArg::Clear => (handlers.reset)(filters),
        FilterArg::Value(value) => toggle(handlers, filters, value),
        FilterArg::Batch(values) => values
            .iter()
            .fold(filters, |filters, value| toggle(handlers, filters, value)),
    }
}

impl<D: ChartDrawer> BaseChart<D> {
    /// Toggles `arg` in the filter set and applies the result.
    ///
    /// A batch toggles each of its values within the same mutation; `Clear`
    /// resets the set.
    pub fn filter(&mut self, arg: impl Into<FilterArg>) {
        let arg = arg.into();
        let handlers = self.config.handlers.clone();
        let current = std::mem::take(&mut self.filters);
        let next = toggle_arg(&handlers, current, &arg);
        self.commit_filters(next, arg);
    }

    /// Resets the filter set, then toggles `arg`, applying to the
    /// dimension once.
    pub fn replace_filter(&mut self, arg: impl Into<FilterArg>) {
        let arg = arg.into();
        let handlers = self.config.handlers.clone();
        let current = std::mem::take(&mut self.filters);
        let next = toggle_arg(&handlers, (handlers.reset)(current), &arg);
        self.commit_filters(next, arg);
    }

    pub fn filter_all(&mut self) {
        self.filter(FilterArg::Clear);
    }

    /// Active filters in toggle order.
    #[must_use]
    pub fn filters(&self) -> &[FilterValue] {
        &self.filters
    }

    /// Most recently toggled filter.
    #[must_use]
    pub fn current_filter(&self) -> Option<&FilterValue> {
        self.filters.last()
    }

    /// With no probe, whether anything is filtered; otherwise asks the
    /// has-handler whether `probe` is a member of the filter set.
    ///
    /// Membership is what toggling uses. To ask whether a record key is let
    /// through, use [`BaseChart::filters_accept`].
    #[must_use]
    pub fn has_filter(&self, probe: Option<&FilterValue>) -> bool {
        match probe {
            None => !self.filters.is_empty(),
            Some(probe) => (self.config.handlers.has)(&self.filters, Some(probe)),
        }
    }

    /// Whether any active filter accepts `key`: predicates through their own
    /// test, plain values through the closed-range test.
    #[must_use]
    pub fn filters_accept(&self, key: &Datum) -> bool {
        self.filters.iter().any(|filter| filter.accepts(key))
    }

    pub fn set_has_filter_handler(&mut self, handler: HasFilterHandler) {
        self.config.handlers.has = handler;
    }

    pub fn set_add_filter_handler(&mut self, handler: AddFilterHandler) {
        self.config.handlers.add = handler;
    }

    pub fn set_remove_filter_handler(&mut self, handler: RemoveFilterHandler) {
        self.config.handlers.remove = handler;
    }

    pub fn set_reset_filter_handler(&mut self, handler: ResetFilterHandler) {
        self.config.handlers.reset = handler;
    }

    pub fn set_apply_filter_handler(&mut self, handler: ApplyFilterHandler) {
        self.config.handlers.apply = handler;
    }

    fn commit_filters(&mut self, next: Vec<FilterValue>, origin: FilterArg) {
        self.filters = next;

        let mut applied = false;
        if let Some(dimension) = self.dimension.clone() {
            let mut dimension = dimension.borrow_mut();
            if dimension.supports_filtering() {
                applied = true;
                if let Some(canonical) = (self.config.handlers.apply)(&mut *dimension, &self.filters)
                {
                    self.filters = canonical;
                }
            }
        }

        debug!(
            chart_id = %self.id,
            filters = self.filters.len(),
            applied,
            "filters changed"
        );

        self.fire(Channel::Filtered, EventPayload::Filter(origin));
        self.update_filter_indicator();
    }

    fn update_filter_indicator(&self) {
        let Some(surface) = self.root() else {
            return;
        };
        let active = self.has_filter(None);
        let text = if active {
            (self.config.filter_printer)(&self.filters)
        } else {
            String::new()
        };
        surface.borrow_mut().set_filter_indicator(FilterIndicator {
            active,
            text,
            use_visibility: self.config.settings.controls_use_visibility,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::api::{Anchor, BaseChart};
    use crate::core::{
        Datum, Dimension, DimensionCall, FilterArg, FilterValue, RecordingDimension,
    };
    use crate::extensions::{ChartEvent, EventPayload};
    use crate::render::{HeadlessSurface, NullDrawer};

    fn filtered_chart() -> (BaseChart<NullDrawer>, Rc<RefCell<RecordingDimension>>) {
        let dimension = RecordingDimension::new().shared();
        let mut chart = BaseChart::new(NullDrawer::default());
        chart.set_dimension(dimension.clone());
        (chart, dimension)
    }

    #[test]
    fn toggling_twice_restores_the_empty_set() {
        let (mut chart, dimension) = filtered_chart();
        chart.filter(18);
        assert_eq!(chart.filters(), &[FilterValue::from(18)]);
        assert!(chart.has_filter(None));

        chart.filter(18);
        assert!(chart.filters().is_empty());
        assert!(!chart.has_filter(None));
        assert_eq!(dimension.borrow().last_call(), Some(&DimensionCall::FilterAll));
    }

    #[test]
    fn replace_applies_exactly_once() {
        let (mut chart, dimension) = filtered_chart();
        chart.filter(FilterArg::batch([1, 2, 3]));
        dimension.borrow_mut().clear_calls();

        chart.replace_filter(7);

        assert_eq!(chart.filters(), &[FilterValue::from(7)]);
        assert_eq!(
            dimension.borrow().calls(),
            &[DimensionCall::FilterExact(7.into())]
        );
    }

    #[test]
    fn read_only_dimension_is_never_filtered() {
        let dimension = RecordingDimension::read_only().shared();
        let mut chart = BaseChart::new(NullDrawer::default());
        chart.set_dimension(dimension.clone());

        chart.filter("MA");

        assert_eq!(chart.filters(), &[FilterValue::from("MA")]);
        assert!(dimension.borrow().calls().is_empty());
    }

    #[test]
    fn apply_result_becomes_canonical_filter_set() {
        let (mut chart, _dimension) = filtered_chart();
        chart.set_apply_filter_handler(Rc::new(|_dimension: &mut dyn Dimension, filters: &[FilterValue]| {
            Some(filters.iter().rev().cloned().collect())
        }));
        chart.filter(FilterArg::batch([1, 2]));
        assert_eq!(chart.filters(), &[FilterValue::from(2), FilterValue::from(1)]);
    }

    #[test]
    fn filtered_event_carries_the_originating_arg() {
        let (mut chart, _dimension) = filtered_chart();
        let payloads = Rc::new(RefCell::new(Vec::new()));
        let sink = payloads.clone();
        chart.on(
            "filtered",
            Some(Rc::new(move |event: &ChartEvent| {
                sink.borrow_mut().push(event.payload.clone())
            })),
        );

        chart.filter(18);
        chart.filter_all();

        assert_eq!(
            *payloads.borrow(),
            vec![
                EventPayload::Filter(FilterArg::from(18)),
                EventPayload::Filter(FilterArg::Clear),
            ]
        );
    }

    #[test]
    fn indicator_follows_filter_state() {
        let surface = HeadlessSurface::new().shared();
        let (mut chart, _dimension) = filtered_chart();
        chart
            .anchor(Some(Anchor::element("chart", surface.clone())))
            .expect("anchor");
        chart.set_controls_use_visibility(true);

        chart.filter(FilterValue::ranged(1.5, 4));
        {
            let surface = surface.borrow();
            let indicator = surface.indicator().expect("indicator set");
            assert!(indicator.active);
            assert_eq!(indicator.text, "[1.50 -> 4]");
            assert!(indicator.use_visibility);
        }

        chart.filter_all();
        let surface = surface.borrow();
        let indicator = surface.indicator().expect("indicator set");
        assert!(!indicator.active);
        assert!(indicator.text.is_empty());
    }

    #[test]
    fn has_filter_with_probe_uses_the_handler() {
        let (mut chart, _dimension) = filtered_chart();
        chart.filter(FilterValue::ranged(10, 20));
        assert!(chart.has_filter(Some(&FilterValue::ranged(10, 20))));
        assert!(!chart.has_filter(Some(&FilterValue::from(12))));

        chart.set_has_filter_handler(Rc::new(
            |_filters: &[FilterValue], _probe: Option<&FilterValue>| false,
        ));
        assert!(!chart.has_filter(Some(&FilterValue::ranged(10, 20))));
        assert_eq!(chart.current_filter(), Some(&FilterValue::ranged(10, 20)));
    }

    #[test]
    fn filters_accept_tests_keys_against_every_filter() {
        let (mut chart, _dimension) = filtered_chart();
        chart.filter(FilterArg::batch([
            FilterValue::from(5),
            FilterValue::ranged(10, 20),
        ]));
        assert!(chart.filters_accept(&Datum::from(5.0)));
        assert!(chart.filters_accept(&Datum::from(12)));
        assert!(!chart.filters_accept(&Datum::from(20)));
        assert!(!chart.filters_accept(&Datum::from("5")));
    }

    #[test]
    fn toggling_a_value_inside_an_active_range_is_its_own_inverse() {
        let (mut chart, dimension) = filtered_chart();
        chart.filter(FilterValue::ranged(10, 20));

        chart.filter(15);
        assert_eq!(
            chart.filters(),
            &[FilterValue::ranged(10, 20), FilterValue::from(15)]
        );
        chart.filter(15);

        assert_eq!(chart.filters(), &[FilterValue::ranged(10, 20)]);
        assert_eq!(
            dimension.borrow().last_call(),
            Some(&DimensionCall::FilterRange(
                FilterValue::ranged(10, 20)
                    .as_predicate()
                    .cloned()
                    .expect("ranged predicate")
            ))
        );
    }
}
