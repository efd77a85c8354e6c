use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::{FilterArg, GroupRecord};
use crate::error::{ChartResult, CommitError};
use crate::extensions::Listener;
use crate::render::ChartDrawer;

use super::chart_group::{ChartRegistry, CommitKind, GroupMember};
use super::{Anchor, BaseChart, ChartId};

/// Shared chart bound to the registry of its chart group.
///
/// Group-wide operations go through the handle so the chart is never
/// borrowed while its group fans out to members, itself included.
pub struct ChartHandle<D: ChartDrawer + 'static> {
    chart: Rc<RefCell<BaseChart<D>>>,
    registry: Rc<ChartRegistry>,
}

impl<D: ChartDrawer + 'static> Clone for ChartHandle<D> {
    fn clone(&self) -> Self {
        Self {
            chart: Rc::clone(&self.chart),
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<D: ChartDrawer + 'static> ChartHandle<D> {
    #[must_use]
    pub fn new(drawer: D, registry: Rc<ChartRegistry>) -> Self {
        Self::from_chart(BaseChart::new(drawer), registry)
    }

    #[must_use]
    pub fn from_chart(chart: BaseChart<D>, registry: Rc<ChartRegistry>) -> Self {
        Self {
            chart: Rc::new(RefCell::new(chart)),
            registry,
        }
    }

    /// Borrows the chart. Panics if the chart is currently mutably
    /// borrowed, e.g. from inside one of its own listeners.
    #[must_use]
    pub fn chart(&self) -> Ref<'_, BaseChart<D>> {
        self.chart.borrow()
    }

    #[must_use]
    pub fn chart_mut(&self) -> RefMut<'_, BaseChart<D>> {
        self.chart.borrow_mut()
    }

    #[must_use]
    pub fn registry(&self) -> &Rc<ChartRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn chart_id(&self) -> ChartId {
        self.chart.borrow().chart_id()
    }

    #[must_use]
    pub fn as_member(&self) -> Rc<dyn GroupMember> {
        self.chart.clone()
    }

    /// Anchors the chart and, for top-level charts, registers it in
    /// `group` (or its current chart group).
    ///
    /// A chart re-anchored into another group, or as a sub-chart, leaves
    /// the group it was registered in.
    pub fn anchor(&self, anchor: Option<Anchor>, group: Option<&str>) -> ChartResult<()> {
        let (chart_id, previous, is_child, current) = {
            let mut chart = self.chart.borrow_mut();
            let previous = (chart.is_anchored() && !chart.is_child())
                .then(|| chart.chart_group().to_owned());
            chart.anchor(anchor)?;
            if let Some(group) = group {
                chart.assign_chart_group(group);
            }
            (
                chart.chart_id(),
                previous,
                chart.is_child(),
                chart.chart_group().to_owned(),
            )
        };
        if let Some(previous) = previous.filter(|previous| is_child || *previous != current) {
            self.registry.deregister(chart_id, &previous);
            debug!(%chart_id, from = %previous, "chart left its group on re-anchor");
        }
        if !is_child {
            self.registry.register(self.as_member(), &current);
        }
        Ok(())
    }

    /// Moves a top-level chart to another chart group.
    pub fn set_chart_group(&self, group: &str) {
        let previous = self.chart.borrow().chart_group().to_owned();
        self.chart.borrow_mut().assign_chart_group(group);
        self.sync_chart_group(&previous);
    }

    pub fn render(&self) -> ChartResult<()> {
        self.chart.borrow_mut().render()
    }

    pub fn redraw(&self) -> ChartResult<()> {
        self.chart.borrow_mut().redraw()
    }

    pub fn filter(&self, arg: impl Into<FilterArg>) {
        self.chart.borrow_mut().filter(arg);
    }

    pub fn on(&self, spec: &str, listener: Option<Listener>) {
        self.chart.borrow().on(spec, listener);
    }

    /// Renders every chart of this chart's group, gated by the commit
    /// handler when one is configured.
    pub fn render_group(&self) -> ChartResult<()> {
        self.commit_group(CommitKind::Render)
    }

    pub fn redraw_group(&self) -> ChartResult<()> {
        self.commit_group(CommitKind::Redraw)
    }

    /// Toggles the key of a clicked record and redraws the group.
    pub fn on_click(&self, record: &GroupRecord) -> ChartResult<()> {
        {
            let mut chart = self.chart.borrow_mut();
            let key = chart.key_of(record);
            chart.filter(key);
        }
        self.redraw_group()
    }

    /// [`BaseChart::options`], keeping registry membership in sync with a
    /// changed `chartGroup`.
    pub fn options(&self, options: &Map<String, Value>) -> ChartResult<()> {
        let previous = self.chart.borrow().chart_group().to_owned();
        let result = self.chart.borrow_mut().options(options);
        self.sync_chart_group(&previous);
        result
    }

    fn sync_chart_group(&self, previous: &str) {
        let (chart_id, is_child, current) = {
            let chart = self.chart.borrow();
            (chart.chart_id(), chart.is_child(), chart.chart_group().to_owned())
        };
        if is_child || previous == current {
            return;
        }
        self.registry.deregister(chart_id, previous);
        self.registry.register(self.as_member(), &current);
        debug!(%chart_id, from = previous, to = %current, "chart group changed");
    }

    fn commit_group(&self, kind: CommitKind) -> ChartResult<()> {
        let (chart_id, group, commit_handler) = {
            let chart = self.chart.borrow();
            (
                chart.chart_id(),
                chart.chart_group().to_owned(),
                chart.commit_handler().cloned(),
            )
        };
        let registry = Rc::clone(&self.registry);
        let fan_out = move || match kind {
            CommitKind::Render => registry.render_all(&group),
            CommitKind::Redraw => registry.redraw_all(&group),
        };

        let Some(commit_handler) = commit_handler else {
            return fan_out();
        };
        commit_handler(
            kind,
            Box::new(move |result: Result<(), CommitError>| match result {
                Ok(()) => fan_out(),
                Err(error) => {
                    warn!(%chart_id, ?kind, %error, "commit failed, skipping group update");
                    Ok(())
                }
            }),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::ChartHandle;
    use crate::api::chart_group::DEFAULT_CHART_GROUP;
    use crate::api::{Anchor, ChartRegistry, CommitCallback, CommitKind};
    use crate::render::{HeadlessSurface, NullDrawer};

    fn anchored(registry: &Rc<ChartRegistry>, group: Option<&str>) -> ChartHandle<NullDrawer> {
        let handle = ChartHandle::new(NullDrawer::default(), registry.clone());
        handle
            .anchor(
                Some(Anchor::element("chart", HeadlessSurface::new().shared())),
                group,
            )
            .expect("anchor");
        handle
    }

    #[test]
    fn anchoring_registers_top_level_charts_only() {
        let registry = ChartRegistry::shared();
        let parent = anchored(&registry, None);

        let child = ChartHandle::new(NullDrawer::default(), registry.clone());
        let child_anchor = Anchor::child_of(&*parent.chart()).expect("parent anchored");
        child.anchor(Some(child_anchor), None).expect("anchor child");

        assert_eq!(registry.chart_ids(DEFAULT_CHART_GROUP), vec![parent.chart_id()]);
        assert!(!registry.has_chart(child.chart_id()));
    }

    #[test]
    fn set_chart_group_moves_membership() {
        let registry = ChartRegistry::shared();
        let handle = anchored(&registry, Some("left"));
        handle.set_chart_group("right");

        assert!(registry.chart_ids("left").is_empty());
        assert_eq!(registry.chart_ids("right"), vec![handle.chart_id()]);
        assert_eq!(handle.chart().chart_group(), "right");
    }

    #[test]
    fn re_anchoring_into_another_group_moves_membership() {
        let registry = ChartRegistry::shared();
        let handle = anchored(&registry, Some("left"));
        handle
            .anchor(
                Some(Anchor::element("chart", HeadlessSurface::new().shared())),
                Some("right"),
            )
            .expect("re-anchor");

        assert!(registry.chart_ids("left").is_empty());
        assert_eq!(registry.chart_ids("right"), vec![handle.chart_id()]);
    }

    #[test]
    fn re_anchoring_as_a_sub_chart_leaves_the_group() {
        let registry = ChartRegistry::shared();
        let parent = anchored(&registry, Some("main"));
        let chart = anchored(&registry, Some("side"));

        let child_anchor = Anchor::child_of(&*parent.chart()).expect("parent anchored");
        chart.anchor(Some(child_anchor), None).expect("anchor child");

        assert!(registry.chart_ids("side").is_empty());
        assert_eq!(registry.chart_ids("main"), vec![parent.chart_id()]);
        assert!(!registry.has_chart(chart.chart_id()));
    }

    #[test]
    fn deferred_commit_fans_out_when_completed() {
        let registry = ChartRegistry::shared();
        let handle = anchored(&registry, None);
        handle.chart_mut().set_mandatory_attributes(Vec::new());

        let parked = Rc::new(RefCell::new(None));
        let slot = parked.clone();
        handle
            .chart_mut()
            .set_commit_handler(Some(Rc::new(move |_kind: CommitKind, done: CommitCallback| {
                *slot.borrow_mut() = Some(done);
            })));

        handle.redraw_group().expect("commit scheduled");
        assert_eq!(handle.chart().drawer().redraw_count, 0);

        let done = parked.borrow_mut().take().expect("callback parked");
        done(Ok(())).expect("fan out");
        assert_eq!(handle.chart().drawer().redraw_count, 1);
    }
}
