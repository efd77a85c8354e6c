mod drawer;
mod headless_surface;
mod surface;

pub use drawer::{ChartDrawer, DrawContext, NullDrawer};
pub use headless_surface::{HeadlessSurface, PendingTransition, finish_transitions};
pub use surface::{
    FilterIndicator, SharedSurface, Surface, TransitionContinuation, TransitionTiming,
};
