use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::render::ChartDrawer;

use super::BaseChart;

/// Custom size calculator; receives the root's bounding box when laid out.
pub type SizeCalculator = Rc<dyn Fn(Option<(f64, f64)>) -> f64>;

/// How a chart derives its width or height.
#[derive(Clone, Default)]
pub enum SizeSpec {
    /// Root bounding box, floored at the configured minimum.
    #[default]
    Default,
    Fixed(f64),
    Computed(SizeCalculator),
}

impl fmt::Debug for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<f64> for SizeSpec {
    fn from(value: f64) -> Self {
        Self::Fixed(value)
    }
}

impl From<Option<f64>> for SizeSpec {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Default, Self::Fixed)
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Width,
    Height,
}

impl SizeSpec {
    fn resolve(&self, axis: Axis, bounding_box: Option<(f64, f64)>, minimum: f64) -> f64 {
        match self {
            Self::Default => {
                let measured = bounding_box.map(|(width, height)| match axis {
                    Axis::Width => width,
                    Axis::Height => height,
                });
                match measured {
                    Some(measured) if measured > minimum => measured,
                    _ => minimum,
                }
            }
            Self::Fixed(value) => *value,
            Self::Computed(calculator) => calculator(bounding_box),
        }
    }
}

/// Size calculators plus the lazily filled cache.
#[derive(Debug, Default)]
pub(super) struct SizeState {
    width: SizeSpec,
    height: SizeSpec,
    cached_width: Cell<Option<f64>>,
    cached_height: Cell<Option<f64>>,
}

impl SizeState {
    pub(super) fn invalidate(&self) {
        self.cached_width.set(None);
        self.cached_height.set(None);
    }
}

impl<D: ChartDrawer> BaseChart<D> {
    /// Current width, computed on first access after an invalidation.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.cached_size(Axis::Width)
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.cached_size(Axis::Height)
    }

    pub fn set_width(&mut self, spec: impl Into<SizeSpec>) {
        self.sizing.width = spec.into();
        self.sizing.cached_width.set(None);
    }

    pub fn set_height(&mut self, spec: impl Into<SizeSpec>) {
        self.sizing.height = spec.into();
        self.sizing.cached_height.set(None);
    }

    /// Drops the cached size so the next access recomputes it.
    pub fn reset_size(&self) {
        self.sizing.invalidate();
    }

    #[must_use]
    pub fn min_width(&self) -> f64 {
        self.config.settings.min_width
    }

    pub fn set_min_width(&mut self, min_width: f64) {
        self.config.settings.min_width = min_width;
    }

    #[must_use]
    pub fn min_height(&self) -> f64 {
        self.config.settings.min_height
    }

    pub fn set_min_height(&mut self, min_height: f64) {
        self.config.settings.min_height = min_height;
    }

    fn cached_size(&self, axis: Axis) -> f64 {
        let (cache, spec, minimum) = match axis {
            Axis::Width => (
                &self.sizing.cached_width,
                &self.sizing.width,
                self.config.settings.min_width,
            ),
            Axis::Height => (
                &self.sizing.cached_height,
                &self.sizing.height,
                self.config.settings.min_height,
            ),
        };
        if let Some(size) = cache.get() {
            return size;
        }
        let bounding_box = self
            .root()
            .and_then(|surface| surface.borrow().bounding_box());
        let size = spec.resolve(axis, bounding_box, minimum);
        trace!(chart_id = %self.id, ?axis, size, "size computed");
        cache.set(Some(size));
        size
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::SizeSpec;
    use crate::api::{Anchor, BaseChart};
    use crate::render::{HeadlessSurface, NullDrawer};

    #[test]
    fn unanchored_chart_uses_minimum_size() {
        let chart = BaseChart::new(NullDrawer::default());
        assert_eq!(chart.width(), 200.0);
        assert_eq!(chart.height(), 200.0);
    }

    #[test]
    fn default_size_is_floored_at_minimum() {
        let surface = HeadlessSurface::with_bounding_box(640.0, 120.0).shared();
        let mut chart = BaseChart::new(NullDrawer::default());
        chart
            .anchor(Some(Anchor::element("#chart", surface)))
            .expect("anchor");
        assert_eq!(chart.width(), 640.0);
        assert_eq!(chart.height(), 200.0);
    }

    #[test]
    fn cached_size_survives_layout_changes_until_reset() {
        let surface = HeadlessSurface::with_bounding_box(640.0, 480.0).shared();
        let mut chart = BaseChart::new(NullDrawer::default());
        chart
            .anchor(Some(Anchor::element("chart", surface.clone())))
            .expect("anchor");
        assert_eq!(chart.width(), 640.0);

        surface.borrow_mut().set_bounding_box(Some((800.0, 480.0)));
        assert_eq!(chart.width(), 640.0);

        chart.reset_size();
        assert_eq!(chart.width(), 800.0);
    }

    #[test]
    fn fixed_and_computed_specs_replace_the_calculator() {
        let mut chart = BaseChart::new(NullDrawer::default());
        chart.set_width(120.0);
        assert_eq!(chart.width(), 120.0);

        chart.set_width(SizeSpec::Computed(Rc::new(|bounding_box: Option<(f64, f64)>| {
            bounding_box.map_or(42.0, |(width, _)| width / 2.0)
        })));
        assert_eq!(chart.width(), 42.0);

        chart.set_width(SizeSpec::Default);
        assert_eq!(chart.width(), 200.0);
    }
}
