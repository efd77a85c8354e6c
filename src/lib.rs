//! linked-charts: coordination core for dashboards of linked charts.
//!
//! Every chart keeps a toggle-based filter set that is pushed into a shared,
//! filterable data source, runs a render/redraw lifecycle around a
//! chart-specific draw step, and redraws together with the other charts of
//! its chart group.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod telemetry;

pub use api::{BaseChart, ChartHandle, ChartId, ChartRegistry};
pub use error::{ChartError, ChartResult, CommitError};
