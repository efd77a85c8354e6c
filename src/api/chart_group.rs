use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ChartResult, CommitError};
use crate::render::ChartDrawer;

use super::{BaseChart, ChartId};

/// Group every top-level chart joins unless told otherwise.
pub const DEFAULT_CHART_GROUP: &str = "__default_chart_group__";

/// Which group-wide operation a commit gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitKind {
    Render,
    Redraw,
}

/// One-shot completion handed to the commit handler.
pub type CommitCallback = Box<dyn FnOnce(Result<(), CommitError>) -> ChartResult<()>>;

/// Asynchronous commit step run before a group-wide render or redraw.
///
/// The handler may call the callback right away or keep it and call it
/// later; the fan-out happens whenever it is called with `Ok`.
pub type CommitHandler = Rc<dyn Fn(CommitKind, CommitCallback)>;

/// A chart as seen by its group.
pub trait GroupMember {
    fn member_id(&self) -> ChartId;
    fn render_member(&self) -> ChartResult<()>;
    fn redraw_member(&self) -> ChartResult<()>;
    fn filter_all_member(&self);
}

impl<D: ChartDrawer> GroupMember for RefCell<BaseChart<D>> {
    fn member_id(&self) -> ChartId {
        self.borrow().chart_id()
    }

    fn render_member(&self) -> ChartResult<()> {
        self.borrow_mut().render()
    }

    fn redraw_member(&self) -> ChartResult<()> {
        self.borrow_mut().redraw()
    }

    fn filter_all_member(&self) {
        self.borrow_mut().filter_all();
    }
}

/// Named chart groups, created lazily on first registration.
///
/// Groups are never torn down implicitly; [`ChartRegistry::clear`] is the
/// only way to drop one.
#[derive(Default)]
pub struct ChartRegistry {
    groups: RefCell<IndexMap<String, Vec<Rc<dyn GroupMember>>>>,
}

impl ChartRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Adds `chart` to `group`; registering twice keeps one entry.
    pub fn register(&self, chart: Rc<dyn GroupMember>, group: &str) {
        let chart_id = chart.member_id();
        let mut groups = self.groups.borrow_mut();
        let members = groups.entry(group.to_owned()).or_default();
        if members.iter().any(|member| member.member_id() == chart_id) {
            return;
        }
        members.push(chart);
        trace!(%chart_id, group, members = members.len(), "chart registered");
    }

    pub fn deregister(&self, chart_id: ChartId, group: &str) {
        if let Some(members) = self.groups.borrow_mut().get_mut(group) {
            members.retain(|member| member.member_id() != chart_id);
            trace!(%chart_id, group, "chart deregistered");
        }
    }

    #[must_use]
    pub fn has_chart(&self, chart_id: ChartId) -> bool {
        self.groups
            .borrow()
            .values()
            .flatten()
            .any(|member| member.member_id() == chart_id)
    }

    /// Members of `group` in registration order.
    #[must_use]
    pub fn charts(&self, group: &str) -> Vec<Rc<dyn GroupMember>> {
        self.groups
            .borrow()
            .get(group)
            .cloned()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn chart_ids(&self, group: &str) -> Vec<ChartId> {
        self.charts(group)
            .iter()
            .map(|member| member.member_id())
            .collect()
    }

    #[must_use]
    pub fn group_names(&self) -> Vec<String> {
        self.groups.borrow().keys().cloned().collect()
    }

    /// Drops one group, or every group with `None`.
    pub fn clear(&self, group: Option<&str>) {
        let mut groups = self.groups.borrow_mut();
        match group {
            Some(group) => {
                groups.shift_remove(group);
            }
            None => groups.clear(),
        }
    }

    /// Renders every member in registration order; the first failure stops
    /// the iteration.
    pub fn render_all(&self, group: &str) -> ChartResult<()> {
        let members = self.charts(group);
        debug!(group, members = members.len(), "render group");
        members.iter().try_for_each(|member| member.render_member())
    }

    pub fn redraw_all(&self, group: &str) -> ChartResult<()> {
        let members = self.charts(group);
        debug!(group, members = members.len(), "redraw group");
        members.iter().try_for_each(|member| member.redraw_member())
    }

    /// Clears the filters of every member without redrawing.
    pub fn filter_all(&self, group: &str) {
        for member in self.charts(group) {
            member.filter_all_member();
        }
    }
}
