//! Observation hooks around the chart core: lifecycle listeners and legends.
//!
//! Both are attached from the outside and never mutate chart internals
//! directly.

pub mod events;
pub mod legend;

pub use events::{Channel, ChartEvent, EventDispatcher, EventPayload, Listener};
pub use legend::{Legend, LegendItem};
