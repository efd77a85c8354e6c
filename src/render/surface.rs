use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing of the visual transition started by a render or redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTiming {
    pub duration: Duration,
    pub delay: Duration,
}

impl TransitionTiming {
    #[must_use]
    pub fn from_millis(duration_ms: u64, delay_ms: u64) -> Self {
        Self {
            duration: Duration::from_millis(duration_ms),
            delay: Duration::from_millis(delay_ms),
        }
    }

    #[must_use]
    pub fn is_animated(self) -> bool {
        !self.duration.is_zero()
    }
}

/// Visual "filter active" indicator shown next to a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterIndicator {
    pub active: bool,
    /// Printed filter set, empty when inactive.
    pub text: String,
    /// Toggle visibility instead of display so layout stays stable.
    pub use_visibility: bool,
}

/// Continuation run once a visual transition has finished.
pub type TransitionContinuation = Box<dyn FnOnce()>;

/// Drawing surface a chart is anchored to.
///
/// The surface owns the root element and the generated svg; the chart core
/// only sizes it, toggles the filter indicator and waits for transitions.
pub trait Surface {
    /// On-screen box `(width, height)` of the root element, if laid out.
    fn bounding_box(&self) -> Option<(f64, f64)>;

    /// Drops the previous drawing and creates an empty svg.
    fn reset_svg(&mut self, width: f64, height: f64);

    /// Resizes an existing svg.
    fn resize(&mut self, width: f64, height: f64);

    fn set_filter_indicator(&mut self, indicator: FilterIndicator);

    /// Schedules `continuation` to run after a transition with `timing` ends.
    ///
    /// A surface that finishes the transition right away hands the
    /// continuation back instead of calling it; the chart runs it once the
    /// surface is no longer borrowed.
    fn after_transition(
        &mut self,
        timing: TransitionTiming,
        continuation: TransitionContinuation,
    ) -> Option<TransitionContinuation>;
}

pub type SharedSurface = Rc<RefCell<dyn Surface>>;
