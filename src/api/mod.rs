pub mod accessors;
mod anchor;
mod chart;
mod chart_config;
mod chart_group;
mod chart_id;
mod filter_controller;
mod filter_handlers;
mod handle;
mod lifecycle;
mod mandatory;
mod options;
mod sizing;

pub use accessors::{
    DataCallback, FilterPrinter, KeyAccessor, OrderingComparator, TextAccessor, ValueAccessor,
};
pub use anchor::Anchor;
pub use chart::BaseChart;
pub use chart_config::{ChartConfig, ChartSettings, ConfigPatch};
pub use chart_group::{
    ChartRegistry, CommitCallback, CommitHandler, CommitKind, DEFAULT_CHART_GROUP, GroupMember,
};
pub use chart_id::ChartId;
pub use filter_handlers::{
    AddFilterHandler, ApplyFilterHandler, FilterHandlers, HasFilterHandler, RemoveFilterHandler,
    ResetFilterHandler, default_add_filter, default_apply_filter, default_has_filter,
    default_remove_filter, default_reset_filter,
};
pub use handle::ChartHandle;
pub use mandatory::MandatoryAttribute;
pub use options::VARIADIC_OPTIONS;
pub use sizing::{SizeCalculator, SizeSpec};
