use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::render::{ChartDrawer, SharedSurface};

use super::{BaseChart, ChartId};

/// Where a chart is attached.
#[derive(Clone)]
pub enum Anchor {
    /// Top-level chart owning its root element.
    Element { name: String, surface: SharedSurface },
    /// Sub-chart of a composite chart, drawing into the parent's surface.
    Parent {
        parent_id: ChartId,
        anchor_name: String,
        surface: SharedSurface,
    },
}

impl Anchor {
    #[must_use]
    pub fn element(name: impl Into<String>, surface: SharedSurface) -> Self {
        Self::Element {
            name: name.into(),
            surface,
        }
    }

    /// Anchor inside an already anchored composite chart.
    pub fn child_of<P: ChartDrawer>(parent: &BaseChart<P>) -> ChartResult<Self> {
        let surface = parent.root().cloned().ok_or_else(|| ChartError::MissingAnchor {
            chart: parent.anchor_name(),
        })?;
        Ok(Self::Parent {
            parent_id: parent.chart_id(),
            anchor_name: parent.anchor_name(),
            surface,
        })
    }

    fn surface(&self) -> &SharedSurface {
        match self {
            Self::Element { surface, .. } | Self::Parent { surface, .. } => surface,
        }
    }
}

impl<D: ChartDrawer> BaseChart<D> {
    /// Attaches the chart to a surface.
    ///
    /// Registration in a chart group is done by [`super::ChartHandle::anchor`];
    /// this only records the attachment. Re-anchoring drops the generated svg.
    pub fn anchor(&mut self, anchor: Option<Anchor>) -> ChartResult<()> {
        let Some(anchor) = anchor else {
            return Err(ChartError::MissingAnchor {
                chart: self.anchor_name(),
            });
        };
        self.anchor = Some(anchor);
        self.svg_generated = false;
        self.sizing.invalidate();
        debug!(
            chart_id = %self.id,
            anchor = %self.anchor_name(),
            child = self.is_child(),
            "chart anchored"
        );
        Ok(())
    }

    #[must_use]
    pub fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }

    /// Attachment name without a leading `#`; falls back to `dc-chart{id}`.
    #[must_use]
    pub fn anchor_name(&self) -> String {
        match &self.anchor {
            Some(Anchor::Element { name, .. }) => {
                name.strip_prefix('#').unwrap_or(name).to_owned()
            }
            Some(Anchor::Parent { anchor_name, .. }) => anchor_name.clone(),
            None => format!("dc-chart{}", self.id),
        }
    }

    /// Parent of a sub-chart.
    #[must_use]
    pub fn parent_anchor(&self) -> Option<ChartId> {
        match &self.anchor {
            Some(Anchor::Parent { parent_id, .. }) => Some(*parent_id),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_child(&self) -> bool {
        self.parent_anchor().is_some()
    }

    #[must_use]
    pub fn root(&self) -> Option<&SharedSurface> {
        self.anchor.as_ref().map(Anchor::surface)
    }

    /// Whether a draw step has generated an svg since the last anchoring.
    #[must_use]
    pub fn svg(&self) -> bool {
        self.svg_generated
    }
}
