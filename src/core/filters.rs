use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::Datum;

/// Discriminant of a predicate filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    Ranged,
    TwoDimensional,
    RangedTwoDimensional,
    Hierarchy,
}

/// Filter that carries its own acceptance test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredicateFilter {
    /// Half-open range `low <= v < high`.
    Ranged { low: Datum, high: Datum },
    /// Exact two-element key `[x, y]`.
    TwoDimensional { x: Datum, y: Datum },
    /// Half-open box over numeric two-element keys.
    RangedTwoDimensional {
        x_range: (f64, f64),
        y_range: (f64, f64),
    },
    /// Prefix match on list keys.
    Hierarchy { path: Vec<Datum> },
}

impl PredicateFilter {
    #[must_use]
    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Ranged { .. } => FilterKind::Ranged,
            Self::TwoDimensional { .. } => FilterKind::TwoDimensional,
            Self::RangedTwoDimensional { .. } => FilterKind::RangedTwoDimensional,
            Self::Hierarchy { .. } => FilterKind::Hierarchy,
        }
    }

    #[must_use]
    pub fn is_filtered(&self, value: &Datum) -> bool {
        match self {
            Self::Ranged { low, high } => value >= low && value < high,
            Self::TwoDimensional { x, y } => match value.as_list() {
                Some([vx, vy]) => vx == x && vy == y,
                _ => false,
            },
            Self::RangedTwoDimensional { x_range, y_range } => {
                let (x, y) = match value {
                    Datum::List(items) => match items.as_slice() {
                        [Datum::Number(x), Datum::Number(y)] => (*x, *y),
                        _ => return false,
                    },
                    Datum::Number(x) => (*x, y_range.0),
                    _ => return false,
                };
                x >= x_range.0 && x < x_range.1 && y >= y_range.0 && y < y_range.1
            }
            Self::Hierarchy { path } => match value.as_list() {
                Some(items) if items.len() >= path.len() => {
                    items.iter().zip(path).all(|(item, step)| item == step)
                }
                _ => false,
            },
        }
    }
}

impl PartialOrd for PredicateFilter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (
                Self::Ranged { low, high },
                Self::Ranged {
                    low: other_low,
                    high: other_high,
                },
            ) => (low, high).partial_cmp(&(other_low, other_high)),
            (Self::TwoDimensional { x, y }, Self::TwoDimensional { x: ox, y: oy }) => {
                (x, y).partial_cmp(&(ox, oy))
            }
            (
                Self::RangedTwoDimensional { x_range, y_range },
                Self::RangedTwoDimensional {
                    x_range: other_x,
                    y_range: other_y,
                },
            ) => (x_range, y_range).partial_cmp(&(other_x, other_y)),
            (Self::Hierarchy { path }, Self::Hierarchy { path: other_path }) => {
                path.partial_cmp(other_path)
            }
            _ => None,
        }
    }
}

/// One entry of a chart's filter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    Plain(Datum),
    Predicate(PredicateFilter),
}

impl FilterValue {
    #[must_use]
    pub fn plain(value: impl Into<Datum>) -> Self {
        Self::Plain(value.into())
    }

    #[must_use]
    pub fn ranged(low: impl Into<Datum>, high: impl Into<Datum>) -> Self {
        Self::Predicate(PredicateFilter::Ranged {
            low: low.into(),
            high: high.into(),
        })
    }

    #[must_use]
    pub fn two_dimensional(x: impl Into<Datum>, y: impl Into<Datum>) -> Self {
        Self::Predicate(PredicateFilter::TwoDimensional {
            x: x.into(),
            y: y.into(),
        })
    }

    /// Box filter from two opposite corners; corners are normalized so the
    /// order of the points does not matter.
    #[must_use]
    pub fn ranged_two_dimensional(corner: (f64, f64), opposite: (f64, f64)) -> Self {
        Self::Predicate(PredicateFilter::RangedTwoDimensional {
            x_range: (corner.0.min(opposite.0), corner.0.max(opposite.0)),
            y_range: (corner.1.min(opposite.1), corner.1.max(opposite.1)),
        })
    }

    /// Box filter spanning an x interval and the whole y axis.
    #[must_use]
    pub fn ranged_x(low: f64, high: f64) -> Self {
        Self::Predicate(PredicateFilter::RangedTwoDimensional {
            x_range: (low, high),
            y_range: (f64::NEG_INFINITY, f64::INFINITY),
        })
    }

    #[must_use]
    pub fn hierarchy<T: Into<Datum>>(path: impl IntoIterator<Item = T>) -> Self {
        Self::Predicate(PredicateFilter::Hierarchy {
            path: path.into_iter().map(Into::into).collect(),
        })
    }

    #[must_use]
    pub fn as_predicate(&self) -> Option<&PredicateFilter> {
        match self {
            Self::Predicate(predicate) => Some(predicate),
            Self::Plain(_) => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> Option<FilterKind> {
        self.as_predicate().map(PredicateFilter::kind)
    }

    /// Closed-range comparison between two filter values:
    /// `self <= other && self >= other`.
    #[must_use]
    pub fn closed_range_eq(&self, other: &FilterValue) -> bool {
        self <= other && self >= other
    }

    /// Whether this filter accepts a record key.
    ///
    /// Predicate filters use their own test, plain values the closed-range
    /// test against the key.
    #[must_use]
    pub fn accepts(&self, value: &Datum) -> bool {
        match self {
            Self::Predicate(predicate) => predicate.is_filtered(value),
            Self::Plain(plain) => plain.closed_range_eq(value),
        }
    }

}

impl PartialOrd for FilterValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Plain(left), Self::Plain(right)) => left.partial_cmp(right),
            (Self::Predicate(left), Self::Predicate(right)) => left.partial_cmp(right),
            _ => None,
        }
    }
}

impl From<Datum> for FilterValue {
    fn from(value: Datum) -> Self {
        Self::Plain(value)
    }
}

impl From<PredicateFilter> for FilterValue {
    fn from(value: PredicateFilter) -> Self {
        Self::Predicate(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Plain(value.into())
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Plain(value.into())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Plain(value.into())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Plain(value.into())
    }
}

fn print_single_value(value: &Datum) -> String {
    match value {
        Datum::Number(number) if number.fract() != 0.0 => format!("{number:.2}"),
        Datum::Date(date) => date.format("%m/%d/%Y").to_string(),
        other => other.to_string(),
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(value) => f.write_str(&print_single_value(value)),
            Self::Predicate(PredicateFilter::Ranged { low, high }) => write!(
                f,
                "[{} -> {}]",
                print_single_value(low),
                print_single_value(high)
            ),
            Self::Predicate(PredicateFilter::TwoDimensional { x, y }) => write!(
                f,
                "[{} -> {}]",
                print_single_value(x),
                print_single_value(y)
            ),
            Self::Predicate(PredicateFilter::RangedTwoDimensional { x_range, y_range }) => {
                write!(
                    f,
                    "[{:.2},{:.2} -> {:.2},{:.2}]",
                    x_range.0, y_range.0, x_range.1, y_range.1
                )
            }
            Self::Predicate(PredicateFilter::Hierarchy { path }) => {
                let parts: Vec<String> = path.iter().map(print_single_value).collect();
                f.write_str(&parts.join("/"))
            }
        }
    }
}

/// Default filter printer: every filter printed on its own, joined by `, `.
#[must_use]
pub fn print_filters(filters: &[FilterValue]) -> String {
    filters
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Argument of a filter mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterArg {
    /// The null probe: resets the filter set.
    Clear,
    /// A single value toggled as a whole.
    Value(FilterValue),
    /// Values toggled one by one inside the same mutation.
    Batch(Vec<FilterValue>),
}

impl FilterArg {
    #[must_use]
    pub fn batch<T: Into<FilterValue>>(values: impl IntoIterator<Item = T>) -> Self {
        Self::Batch(values.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }
}

impl From<FilterValue> for FilterArg {
    fn from(value: FilterValue) -> Self {
        Self::Value(value)
    }
}

impl From<Option<FilterValue>> for FilterArg {
    fn from(value: Option<FilterValue>) -> Self {
        value.map_or(Self::Clear, Self::Value)
    }
}

impl From<Datum> for FilterArg {
    fn from(value: Datum) -> Self {
        Self::Value(value.into())
    }
}

impl From<f64> for FilterArg {
    fn from(value: f64) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for FilterArg {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for FilterArg {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for FilterArg {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterArg, FilterKind, FilterValue, print_filters};
    use crate::core::Datum;

    #[test]
    fn ranged_filter_is_half_open() {
        let filter = FilterValue::ranged(1, 5);
        assert_eq!(filter.kind(), Some(FilterKind::Ranged));
        assert!(filter.accepts(&Datum::from(1)));
        assert!(filter.accepts(&Datum::from(4.99)));
        assert!(!filter.accepts(&Datum::from(5)));
    }

    #[test]
    fn two_dimensional_filter_requires_exact_pair() {
        let filter = FilterValue::two_dimensional("a", 3);
        assert!(filter.accepts(&Datum::from(vec![Datum::from("a"), Datum::from(3)])));
        assert!(!filter.accepts(&Datum::from(vec![Datum::from("a"), Datum::from(4)])));
        assert!(!filter.accepts(&Datum::from("a")));
    }

    #[test]
    fn ranged_two_dimensional_normalizes_corners() {
        let filter = FilterValue::ranged_two_dimensional((10.0, 10.0), (0.0, 0.0));
        assert!(filter.accepts(&Datum::from(vec![0.0, 9.0])));
        assert!(!filter.accepts(&Datum::from(vec![10.0, 5.0])));
        assert!(filter.accepts(&Datum::from(5.0)));
    }

    #[test]
    fn hierarchy_filter_matches_prefix() {
        let filter = FilterValue::hierarchy(["root", "branch"]);
        assert!(filter.accepts(&Datum::from(vec!["root", "branch", "leaf"])));
        assert!(!filter.accepts(&Datum::from(vec!["root"])));
        assert!(!filter.accepts(&Datum::from(vec!["root", "other"])));
    }

    #[test]
    fn predicates_compare_structurally_and_never_against_plain_values() {
        assert!(FilterValue::ranged(1, 5).closed_range_eq(&FilterValue::ranged(1, 5)));
        assert!(!FilterValue::ranged(1, 5).closed_range_eq(&FilterValue::ranged(1, 6)));
        assert!(!FilterValue::ranged(1, 5).closed_range_eq(&FilterValue::from(3)));
    }

    #[test]
    fn printer_formats_values_and_ranges() {
        let printed = print_filters(&[
            FilterValue::from(3),
            FilterValue::from(2.5),
            FilterValue::ranged(1, 5),
        ]);
        assert_eq!(printed, "3, 2.50, [1 -> 5]");
    }

    #[test]
    fn none_converts_to_clear() {
        assert!(FilterArg::from(None::<FilterValue>).is_clear());
    }
}
