use crate::api::accessors::{compute_data, compute_ordered_data};
use crate::api::{ChartConfig, ChartId};
use crate::core::{FilterValue, GroupRecord, SharedGroup};
use crate::error::ChartResult;
use crate::extensions::{Channel, ChartEvent, EventDispatcher, EventPayload, LegendItem};

use super::surface::SharedSurface;

/// Chart-type specific drawing, called by the render/redraw lifecycle.
///
/// Every concrete chart type implements this; the core never draws by
/// itself. Composite containers with nothing of their own to draw use
/// [`NullDrawer`].
pub trait ChartDrawer {
    /// Full draw after the chart was (re)built.
    fn do_render(&mut self, ctx: &mut DrawContext<'_>) -> ChartResult<()>;

    /// Incremental draw reusing the existing svg.
    fn do_redraw(&mut self, ctx: &mut DrawContext<'_>) -> ChartResult<()>;

    /// Answers chart-type specific mandatory attributes
    /// (see `MandatoryAttribute::Drawer`).
    fn has_attribute(&self, _name: &str) -> bool {
        false
    }

    fn legendables(&self) -> Vec<LegendItem> {
        Vec::new()
    }
}

/// Everything a drawer may read or touch during one draw step.
pub struct DrawContext<'a> {
    pub(crate) chart_id: ChartId,
    pub(crate) anchor_name: &'a str,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) config: &'a ChartConfig,
    pub(crate) filters: &'a [FilterValue],
    pub(crate) group: Option<&'a SharedGroup>,
    pub(crate) surface: Option<&'a SharedSurface>,
    pub(crate) svg_generated: &'a mut bool,
    pub(crate) dispatcher: &'a EventDispatcher,
}

impl DrawContext<'_> {
    #[must_use]
    pub fn chart_id(&self) -> ChartId {
        self.chart_id
    }

    #[must_use]
    pub fn anchor_name(&self) -> &str {
        self.anchor_name
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        self.config
    }

    #[must_use]
    pub fn filters(&self) -> &[FilterValue] {
        self.filters
    }

    #[must_use]
    pub fn has_filter(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Records produced by the data callback (by default `group.all()`).
    #[must_use]
    pub fn data(&self) -> Vec<GroupRecord> {
        compute_data(self.config, self.group)
    }

    /// Records sorted with the configured ordering accessor.
    #[must_use]
    pub fn ordered_data(&self) -> Vec<GroupRecord> {
        compute_ordered_data(self.config, self.data())
    }

    #[must_use]
    pub fn surface(&self) -> Option<&SharedSurface> {
        self.surface
    }

    /// Discards the previous svg and generates a fresh one at the current size.
    pub fn reset_svg(&mut self) {
        if let Some(surface) = self.surface {
            surface.borrow_mut().reset_svg(self.width, self.height);
            *self.svg_generated = true;
        }
    }

    #[must_use]
    pub fn has_svg(&self) -> bool {
        *self.svg_generated
    }

    /// Fires the `zoomed` channel, for drawers that change their focus.
    pub fn notify_zoomed(&self) {
        self.fire(Channel::Zoomed, EventPayload::None);
    }

    /// Fires a caller-defined channel with a JSON payload.
    pub fn fire_custom(&self, name: &str, payload: serde_json::Value) {
        self.fire(Channel::parse(name), EventPayload::Custom(payload));
    }

    fn fire(&self, channel: Channel, payload: EventPayload) {
        self.dispatcher.fire(&ChartEvent {
            chart_id: self.chart_id,
            anchor_name: self.anchor_name.to_owned(),
            channel,
            payload,
        });
    }
}

/// No-op drawer for composite charts and headless usage.
///
/// It still counts calls so tests can check the lifecycle reached the draw
/// step.
#[derive(Debug, Default)]
pub struct NullDrawer {
    pub render_count: usize,
    pub redraw_count: usize,
}

impl ChartDrawer for NullDrawer {
    fn do_render(&mut self, _ctx: &mut DrawContext<'_>) -> ChartResult<()> {
        self.render_count += 1;
        Ok(())
    }

    fn do_redraw(&mut self, _ctx: &mut DrawContext<'_>) -> ChartResult<()> {
        self.redraw_count += 1;
        Ok(())
    }
}
