use std::cmp::Ordering;
use std::rc::Rc;

use crate::core::{DataGroup, Datum, FilterValue, GroupRecord, SharedGroup, print_filters};
use crate::render::ChartDrawer;

use super::{BaseChart, ChartConfig};

pub type KeyAccessor = Rc<dyn Fn(&GroupRecord) -> Datum>;
pub type ValueAccessor = Rc<dyn Fn(&GroupRecord) -> Datum>;
pub type TextAccessor = Rc<dyn Fn(&GroupRecord) -> String>;
pub type OrderingComparator = Rc<dyn Fn(&GroupRecord, &GroupRecord) -> Ordering>;
pub type DataCallback = Rc<dyn Fn(&dyn DataGroup) -> Vec<GroupRecord>>;
pub type FilterPrinter = Rc<dyn Fn(&[FilterValue]) -> String>;

pub(super) fn default_key_accessor() -> KeyAccessor {
    Rc::new(|record: &GroupRecord| record.key.clone())
}

pub(super) fn default_value_accessor() -> ValueAccessor {
    Rc::new(|record: &GroupRecord| record.value.clone())
}

pub(super) fn default_title() -> TextAccessor {
    Rc::new(|record: &GroupRecord| format!("{}: {}", record.key, record.value))
}

pub(super) fn default_label() -> TextAccessor {
    Rc::new(|record: &GroupRecord| record.key.to_string())
}

/// Orders by key; incomparable keys keep their relative order.
pub(super) fn default_ordering() -> OrderingComparator {
    Rc::new(|left: &GroupRecord, right: &GroupRecord| {
        left.key.partial_cmp(&right.key).unwrap_or(Ordering::Equal)
    })
}

pub(super) fn default_data_callback() -> DataCallback {
    Rc::new(|group: &dyn DataGroup| group.all())
}

pub(super) fn default_filter_printer() -> FilterPrinter {
    Rc::new(print_filters)
}

pub(crate) fn compute_data(config: &ChartConfig, group: Option<&SharedGroup>) -> Vec<GroupRecord> {
    match group {
        Some(group) => (config.data_callback)(&**group),
        None => Vec::new(),
    }
}

pub(crate) fn compute_ordered_data(
    config: &ChartConfig,
    mut records: Vec<GroupRecord>,
) -> Vec<GroupRecord> {
    let ordering = config.ordering.clone();
    records.sort_by(|left, right| ordering(left, right));
    records
}

impl<D: ChartDrawer> BaseChart<D> {
    /// Evaluates the data callback against the bound group.
    ///
    /// Nothing is cached: a replaced callback or accessor is picked up by
    /// the next call.
    #[must_use]
    pub fn data(&self) -> Vec<GroupRecord> {
        compute_data(&self.config, self.group.as_ref())
    }

    #[must_use]
    pub fn ordered_data(&self) -> Vec<GroupRecord> {
        compute_ordered_data(&self.config, self.data())
    }

    pub fn set_data_callback(&mut self, callback: DataCallback) {
        self.config.data_callback = callback;
    }

    #[must_use]
    pub fn key_of(&self, record: &GroupRecord) -> Datum {
        (self.config.key_accessor)(record)
    }

    #[must_use]
    pub fn value_of(&self, record: &GroupRecord) -> Datum {
        (self.config.value_accessor)(record)
    }

    #[must_use]
    pub fn title_of(&self, record: &GroupRecord) -> String {
        (self.config.title)(record)
    }

    #[must_use]
    pub fn label_of(&self, record: &GroupRecord) -> String {
        (self.config.label)(record)
    }

    pub fn set_key_accessor(&mut self, accessor: KeyAccessor) {
        self.config.key_accessor = accessor;
    }

    pub fn set_value_accessor(&mut self, accessor: ValueAccessor) {
        self.config.value_accessor = accessor;
    }

    pub fn set_title(&mut self, title: TextAccessor) {
        self.config.title = title;
    }

    pub fn set_label(&mut self, label: TextAccessor) {
        self.config.label = label;
    }

    pub fn set_ordering(&mut self, ordering: OrderingComparator) {
        self.config.ordering = ordering;
    }

    pub fn set_filter_printer(&mut self, printer: FilterPrinter) {
        self.config.filter_printer = printer;
    }
}
