use std::cell::RefCell;
use std::rc::Rc;

use super::surface::{FilterIndicator, Surface, TransitionContinuation, TransitionTiming};

/// Transition scheduled on a [`HeadlessSurface`] and not yet finished.
pub struct PendingTransition {
    pub timing: TransitionTiming,
    continuation: TransitionContinuation,
}

impl PendingTransition {
    pub fn finish(self) {
        (self.continuation)();
    }
}

/// Surface without a display, used by tests and headless engine usage.
///
/// Transitions queue up until [`finish_transitions`] is called, which makes
/// deferred events observable step by step. A surface built with
/// [`HeadlessSurface::finishing_immediately`] completes them on schedule.
#[derive(Default)]
pub struct HeadlessSurface {
    bounding_box: Option<(f64, f64)>,
    svg_size: Option<(f64, f64)>,
    svg_resets: usize,
    indicator: Option<FilterIndicator>,
    pending: Vec<PendingTransition>,
    finish_immediately: bool,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bounding_box(width: f64, height: f64) -> Self {
        Self {
            bounding_box: Some((width, height)),
            ..Self::default()
        }
    }

    /// Completes every transition as soon as it is scheduled.
    #[must_use]
    pub fn finishing_immediately(mut self) -> Self {
        self.finish_immediately = true;
        self
    }

    #[must_use]
    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    pub fn set_bounding_box(&mut self, bounding_box: Option<(f64, f64)>) {
        self.bounding_box = bounding_box;
    }

    #[must_use]
    pub fn svg_size(&self) -> Option<(f64, f64)> {
        self.svg_size
    }

    #[must_use]
    pub fn svg_resets(&self) -> usize {
        self.svg_resets
    }

    #[must_use]
    pub fn indicator(&self) -> Option<&FilterIndicator> {
        self.indicator.as_ref()
    }

    #[must_use]
    pub fn pending_transitions(&self) -> usize {
        self.pending.len()
    }

    pub fn take_pending(&mut self) -> Vec<PendingTransition> {
        std::mem::take(&mut self.pending)
    }
}

impl Surface for HeadlessSurface {
    fn bounding_box(&self) -> Option<(f64, f64)> {
        self.bounding_box
    }

    fn reset_svg(&mut self, width: f64, height: f64) {
        self.svg_resets += 1;
        self.svg_size = Some((width, height));
    }

    fn resize(&mut self, width: f64, height: f64) {
        if self.svg_size.is_some() {
            self.svg_size = Some((width, height));
        }
    }

    fn set_filter_indicator(&mut self, indicator: FilterIndicator) {
        self.indicator = Some(indicator);
    }

    fn after_transition(
        &mut self,
        timing: TransitionTiming,
        continuation: TransitionContinuation,
    ) -> Option<TransitionContinuation> {
        if self.finish_immediately {
            return Some(continuation);
        }
        self.pending.push(PendingTransition {
            timing,
            continuation,
        });
        None
    }
}

/// Finishes every queued transition, in scheduling order.
///
/// Continuations run after the surface borrow is released, so listeners
/// they trigger may use the surface again. Returns how many ran.
pub fn finish_transitions(surface: &RefCell<HeadlessSurface>) -> usize {
    let pending = surface.borrow_mut().take_pending();
    let count = pending.len();
    for transition in pending {
        transition.finish();
    }
    count
}
