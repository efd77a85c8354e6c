use serde::{Deserialize, Serialize};

use crate::api::ChartId;
use crate::error::ChartResult;

/// One entry a chart offers to its legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub name: String,
    pub color: Option<String>,
    #[serde(default)]
    pub hidden: bool,
}

impl LegendItem {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            hidden: false,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Legend widget attached to a chart.
///
/// Layout is up to the implementation; the chart only hands over its items
/// after every render and redraw.
pub trait Legend {
    fn render(&mut self, chart_id: ChartId, items: &[LegendItem]) -> ChartResult<()>;
}
