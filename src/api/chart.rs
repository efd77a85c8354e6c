use std::rc::Rc;

use tracing::trace;

use crate::core::{FilterValue, SharedDimension, SharedGroup};
use crate::error::ChartResult;
use crate::extensions::{
    Channel, ChartEvent, EventDispatcher, EventPayload, Legend, LegendItem, Listener,
};
use crate::render::ChartDrawer;

use super::chart_group::DEFAULT_CHART_GROUP;
use super::sizing::SizeState;
use super::{Anchor, ChartConfig, ChartId};

/// Stateful core shared by every chart type.
///
/// `BaseChart` owns the filter set, configuration, lifecycle state and
/// listeners of one chart; the chart-type specific drawing is delegated to
/// `D`. Group-wide operations live on [`super::ChartHandle`], which wraps a
/// shared `BaseChart` together with its registry.
pub struct BaseChart<D: ChartDrawer> {
    pub(super) id: ChartId,
    pub(super) drawer: D,
    pub(super) config: ChartConfig,
    pub(super) filters: Vec<FilterValue>,
    pub(super) dimension: Option<SharedDimension>,
    pub(super) group: Option<SharedGroup>,
    pub(super) group_name: Option<String>,
    pub(super) sizing: SizeState,
    pub(super) anchor: Option<Anchor>,
    pub(super) svg_generated: bool,
    pub(super) legend: Option<Box<dyn Legend>>,
    pub(super) chart_group: String,
    pub(super) dispatcher: Rc<EventDispatcher>,
}

impl<D: ChartDrawer> BaseChart<D> {
    #[must_use]
    pub fn new(drawer: D) -> Self {
        Self::with_config(drawer, ChartConfig::default())
    }

    #[must_use]
    pub fn with_config(drawer: D, config: ChartConfig) -> Self {
        let id = ChartId::next();
        trace!(chart_id = %id, "chart created");
        Self {
            id,
            drawer,
            config,
            filters: Vec::new(),
            dimension: None,
            group: None,
            group_name: None,
            sizing: SizeState::default(),
            anchor: None,
            svg_generated: false,
            legend: None,
            chart_group: DEFAULT_CHART_GROUP.to_owned(),
            dispatcher: Rc::new(EventDispatcher::new()),
        }
    }

    #[must_use]
    pub fn chart_id(&self) -> ChartId {
        self.id
    }

    #[must_use]
    pub fn drawer(&self) -> &D {
        &self.drawer
    }

    pub fn drawer_mut(&mut self) -> &mut D {
        &mut self.drawer
    }

    #[must_use]
    pub fn dimension(&self) -> Option<&SharedDimension> {
        self.dimension.as_ref()
    }

    /// Binds the dimension filters are applied to.
    ///
    /// Already active filters are not re-applied to the new dimension.
    pub fn set_dimension(&mut self, dimension: SharedDimension) {
        self.dimension = Some(dimension);
    }

    #[must_use]
    pub fn group(&self) -> Option<&SharedGroup> {
        self.group.as_ref()
    }

    /// Name given to the group when it was bound, used by legends and
    /// stacked chart types.
    #[must_use]
    pub fn group_name(&self) -> Option<&str> {
        self.group_name.as_deref()
    }

    pub fn set_group(&mut self, group: SharedGroup, name: Option<&str>) {
        self.group = Some(group);
        self.group_name = name.map(str::to_owned);
    }

    #[must_use]
    pub fn chart_group(&self) -> &str {
        &self.chart_group
    }

    /// Only records the name; registry membership is kept in sync by
    /// [`super::ChartHandle`].
    pub(super) fn assign_chart_group(&mut self, name: &str) {
        self.chart_group = name.to_owned();
    }

    #[must_use]
    pub fn legend(&self) -> Option<&dyn Legend> {
        self.legend.as_deref()
    }

    pub fn set_legend(&mut self, legend: Option<Box<dyn Legend>>) {
        self.legend = legend;
    }

    /// Legend entries contributed by the drawer.
    #[must_use]
    pub fn legendables(&self) -> Vec<LegendItem> {
        self.drawer.legendables()
    }

    /// Registers a listener under `channel` or `channel.key`; `None`
    /// removes it.
    pub fn on(&self, spec: &str, listener: Option<Listener>) {
        self.dispatcher.on(spec, listener);
    }

    #[must_use]
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub(super) fn event(&self, channel: Channel, payload: EventPayload) -> ChartEvent {
        ChartEvent {
            chart_id: self.id,
            anchor_name: self.anchor_name(),
            channel,
            payload,
        }
    }

    pub(super) fn fire(&self, channel: Channel, payload: EventPayload) {
        self.dispatcher.fire(&self.event(channel, payload));
    }

    pub(super) fn render_legend(&mut self) -> ChartResult<()> {
        let Some(legend) = self.legend.as_mut() else {
            return Ok(());
        };
        let items = self.drawer.legendables();
        legend.render(self.id, &items)
    }
}
