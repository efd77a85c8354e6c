pub mod data_source;
pub mod filters;
pub mod headless;
pub mod types;

pub use data_source::{DataGroup, Dimension, FilterPredicate, SharedDimension, SharedGroup};
pub use filters::{FilterArg, FilterKind, FilterValue, PredicateFilter, print_filters};
pub use headless::{DimensionCall, RecordingDimension, StaticGroup};
pub use types::{Datum, GroupRecord};
