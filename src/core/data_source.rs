use std::cell::RefCell;
use std::rc::Rc;

use super::filters::PredicateFilter;
use super::types::{Datum, GroupRecord};

/// Record predicate installed on a dimension by general filters.
pub type FilterPredicate = Rc<dyn Fn(&Datum) -> bool>;

/// Filterable side of the shared data source.
///
/// Every chart viewing the same dataset holds the same dimension, so filter
/// calls made by one chart are visible to all of them.
pub trait Dimension {
    /// Removes any filter on this dimension.
    fn filter_all(&mut self);

    /// Keeps only records whose key equals `value`.
    fn filter_exact(&mut self, value: &Datum);

    /// Keeps only records inside the range filter.
    fn filter_range(&mut self, range: &PredicateFilter);

    /// Keeps only records accepted by `predicate`.
    fn filter_function(&mut self, predicate: FilterPredicate);

    /// Whether the dimension accepts filter calls at all.
    fn supports_filtering(&self) -> bool {
        true
    }
}

/// Aggregated read side of the shared data source.
pub trait DataGroup {
    fn all(&self) -> Vec<GroupRecord>;
}

pub type SharedDimension = Rc<RefCell<dyn Dimension>>;
pub type SharedGroup = Rc<dyn DataGroup>;
