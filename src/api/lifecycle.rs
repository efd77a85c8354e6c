use tracing::{debug, debug_span};

use crate::error::ChartResult;
use crate::extensions::{Channel, EventPayload};
use crate::render::{ChartDrawer, DrawContext};

use super::BaseChart;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawPhase {
    Render,
    Redraw,
}

impl<D: ChartDrawer> BaseChart<D> {
    /// Full render: fresh size, mandatory attribute check, draw step,
    /// legend, then the `postRender` renderlets.
    ///
    /// A missing mandatory attribute fails before the draw step runs.
    pub fn render(&mut self) -> ChartResult<()> {
        let _span = debug_span!("render", chart_id = %self.id).entered();
        self.sizing.invalidate();
        self.fire(Channel::PreRender, EventPayload::None);
        self.check_mandatory_attributes()?;
        self.draw(DrawPhase::Render)?;
        self.render_legend()?;
        self.activate_renderlets(Channel::PostRender);
        Ok(())
    }

    /// Incremental redraw reusing the cached size.
    pub fn redraw(&mut self) -> ChartResult<()> {
        let _span = debug_span!("redraw", chart_id = %self.id).entered();
        self.size_svg();
        self.fire(Channel::PreRedraw, EventPayload::None);
        self.draw(DrawPhase::Redraw)?;
        self.render_legend()?;
        self.activate_renderlets(Channel::PostRedraw);
        Ok(())
    }

    fn size_svg(&self) {
        if !self.svg_generated {
            return;
        }
        if let Some(surface) = self.root() {
            let (width, height) = (self.width(), self.height());
            surface.borrow_mut().resize(width, height);
        }
    }

    fn draw(&mut self, phase: DrawPhase) -> ChartResult<()> {
        let width = self.width();
        let height = self.height();
        let anchor_name = self.anchor_name();
        let surface = self.root().cloned();
        let mut ctx = DrawContext {
            chart_id: self.id,
            anchor_name: &anchor_name,
            width,
            height,
            config: &self.config,
            filters: &self.filters,
            group: self.group.as_ref(),
            surface: surface.as_ref(),
            svg_generated: &mut self.svg_generated,
            dispatcher: &self.dispatcher,
        };
        debug!(?phase, width, height, "draw step");
        match phase {
            DrawPhase::Render => self.drawer.do_render(&mut ctx),
            DrawPhase::Redraw => self.drawer.do_redraw(&mut ctx),
        }
    }

    /// Fires `pretransition` now; `renderlet` and `terminal` either follow
    /// immediately or once the surface's transition has finished.
    fn activate_renderlets(&self, terminal: Channel) {
        self.fire(Channel::Pretransition, EventPayload::None);

        let timing = self.transition_timing();
        let animated_surface = self
            .root()
            .filter(|_| self.svg_generated && timing.is_animated());

        match animated_surface {
            Some(surface) => {
                let dispatcher = self.dispatcher.clone();
                let deferred = [
                    self.event(Channel::Renderlet, EventPayload::None),
                    self.event(terminal, EventPayload::None),
                ];
                debug!(
                    duration_ms = timing.duration.as_millis() as u64,
                    delay_ms = timing.delay.as_millis() as u64,
                    "renderlets deferred until transition end"
                );
                let finished = surface.borrow_mut().after_transition(
                    timing,
                    Box::new(move || {
                        for event in &deferred {
                            dispatcher.fire(event);
                        }
                    }),
                );
                if let Some(continuation) = finished {
                    continuation();
                }
            }
            None => {
                self.fire(Channel::Renderlet, EventPayload::None);
                self.fire(terminal, EventPayload::None);
            }
        }
    }
}
