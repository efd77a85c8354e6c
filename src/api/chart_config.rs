use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::render::{ChartDrawer, TransitionTiming};

use super::accessors::{
    DataCallback, FilterPrinter, KeyAccessor, OrderingComparator, TextAccessor, ValueAccessor,
    default_data_callback, default_filter_printer, default_key_accessor, default_label,
    default_ordering, default_title, default_value_accessor,
};
use super::chart_group::CommitHandler;
use super::filter_handlers::FilterHandlers;
use super::mandatory::MandatoryAttribute;
use super::BaseChart;

/// Plain, serializable chart settings.
///
/// Host applications can persist these next to their dashboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartSettings {
    #[serde(default = "default_min_size")]
    pub min_width: f64,
    #[serde(default = "default_min_size")]
    pub min_height: f64,
    #[serde(default = "default_transition_duration_ms")]
    pub transition_duration_ms: u64,
    #[serde(default)]
    pub transition_delay_ms: u64,
    #[serde(default)]
    pub render_label: bool,
    #[serde(default = "default_render_title")]
    pub render_title: bool,
    #[serde(default)]
    pub controls_use_visibility: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            min_width: default_min_size(),
            min_height: default_min_size(),
            transition_duration_ms: default_transition_duration_ms(),
            transition_delay_ms: 0,
            render_label: false,
            render_title: default_render_title(),
            controls_use_visibility: false,
        }
    }
}

impl ChartSettings {
    #[must_use]
    pub fn with_min_size(mut self, min_width: f64, min_height: f64) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    #[must_use]
    pub fn with_transition(mut self, duration_ms: u64, delay_ms: u64) -> Self {
        self.transition_duration_ms = duration_ms;
        self.transition_delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_render_label(mut self, render_label: bool) -> Self {
        self.render_label = render_label;
        self
    }

    #[must_use]
    pub fn with_render_title(mut self, render_title: bool) -> Self {
        self.render_title = render_title;
        self
    }

    #[must_use]
    pub fn with_controls_use_visibility(mut self, use_visibility: bool) -> Self {
        self.controls_use_visibility = use_visibility;
        self
    }

    #[must_use]
    pub fn transition_timing(&self) -> TransitionTiming {
        TransitionTiming::from_millis(self.transition_duration_ms, self.transition_delay_ms)
    }
}

fn default_min_size() -> f64 {
    200.0
}

fn default_transition_duration_ms() -> u64 {
    750
}

fn default_render_title() -> bool {
    true
}

/// Complete configuration record owned by one chart.
#[derive(Clone)]
pub struct ChartConfig {
    pub settings: ChartSettings,
    pub key_accessor: KeyAccessor,
    pub value_accessor: ValueAccessor,
    pub title: TextAccessor,
    pub label: TextAccessor,
    pub ordering: OrderingComparator,
    pub data_callback: DataCallback,
    pub filter_printer: FilterPrinter,
    pub handlers: FilterHandlers,
    pub mandatory_attributes: Vec<MandatoryAttribute>,
    pub commit_handler: Option<CommitHandler>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::from_settings(ChartSettings::default())
    }
}

impl ChartConfig {
    #[must_use]
    pub fn from_settings(settings: ChartSettings) -> Self {
        Self {
            settings,
            key_accessor: default_key_accessor(),
            value_accessor: default_value_accessor(),
            title: default_title(),
            label: default_label(),
            ordering: default_ordering(),
            data_callback: default_data_callback(),
            filter_printer: default_filter_printer(),
            handlers: FilterHandlers::default(),
            mandatory_attributes: MandatoryAttribute::defaults(),
            commit_handler: None,
        }
    }

    /// Shallow merge: every key set in `patch` overwrites, every other key
    /// is kept. Nested values (the handler bundle, the mandatory list) are
    /// replaced whole.
    pub fn merge(&mut self, patch: ConfigPatch) {
        let ConfigPatch {
            min_width,
            min_height,
            transition_duration_ms,
            transition_delay_ms,
            render_label,
            render_title,
            controls_use_visibility,
            key_accessor,
            value_accessor,
            title,
            label,
            ordering,
            data_callback,
            filter_printer,
            handlers,
            mandatory_attributes,
            commit_handler,
        } = patch;

        merge_value(&mut self.settings.min_width, min_width);
        merge_value(&mut self.settings.min_height, min_height);
        merge_value(
            &mut self.settings.transition_duration_ms,
            transition_duration_ms,
        );
        merge_value(&mut self.settings.transition_delay_ms, transition_delay_ms);
        merge_value(&mut self.settings.render_label, render_label);
        merge_value(&mut self.settings.render_title, render_title);
        merge_value(
            &mut self.settings.controls_use_visibility,
            controls_use_visibility,
        );
        merge_value(&mut self.key_accessor, key_accessor);
        merge_value(&mut self.value_accessor, value_accessor);
        merge_value(&mut self.title, title);
        merge_value(&mut self.label, label);
        merge_value(&mut self.ordering, ordering);
        merge_value(&mut self.data_callback, data_callback);
        merge_value(&mut self.filter_printer, filter_printer);
        merge_value(&mut self.handlers, handlers);
        merge_value(&mut self.mandatory_attributes, mandatory_attributes);
        if let Some(commit_handler) = commit_handler {
            self.commit_handler = commit_handler;
        }
    }
}

fn merge_value<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Partial configuration applied with [`BaseChart::configure`].
///
/// `None` means "keep the current value".
#[derive(Clone, Default)]
pub struct ConfigPatch {
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub transition_duration_ms: Option<u64>,
    pub transition_delay_ms: Option<u64>,
    pub render_label: Option<bool>,
    pub render_title: Option<bool>,
    pub controls_use_visibility: Option<bool>,
    pub key_accessor: Option<KeyAccessor>,
    pub value_accessor: Option<ValueAccessor>,
    pub title: Option<TextAccessor>,
    pub label: Option<TextAccessor>,
    pub ordering: Option<OrderingComparator>,
    pub data_callback: Option<DataCallback>,
    pub filter_printer: Option<FilterPrinter>,
    pub handlers: Option<FilterHandlers>,
    pub mandatory_attributes: Option<Vec<MandatoryAttribute>>,
    /// `Some(None)` removes the commit handler.
    pub commit_handler: Option<Option<CommitHandler>>,
}

impl ConfigPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_min_size(mut self, min_width: f64, min_height: f64) -> Self {
        self.min_width = Some(min_width);
        self.min_height = Some(min_height);
        self
    }

    #[must_use]
    pub fn with_transition_duration_ms(mut self, duration_ms: u64) -> Self {
        self.transition_duration_ms = Some(duration_ms);
        self
    }

    #[must_use]
    pub fn with_transition_delay_ms(mut self, delay_ms: u64) -> Self {
        self.transition_delay_ms = Some(delay_ms);
        self
    }

    #[must_use]
    pub fn with_render_label(mut self, render_label: bool) -> Self {
        self.render_label = Some(render_label);
        self
    }

    #[must_use]
    pub fn with_render_title(mut self, render_title: bool) -> Self {
        self.render_title = Some(render_title);
        self
    }

    #[must_use]
    pub fn with_controls_use_visibility(mut self, use_visibility: bool) -> Self {
        self.controls_use_visibility = Some(use_visibility);
        self
    }

    #[must_use]
    pub fn with_key_accessor(mut self, accessor: KeyAccessor) -> Self {
        self.key_accessor = Some(accessor);
        self
    }

    #[must_use]
    pub fn with_value_accessor(mut self, accessor: ValueAccessor) -> Self {
        self.value_accessor = Some(accessor);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: TextAccessor) -> Self {
        self.title = Some(title);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: TextAccessor) -> Self {
        self.label = Some(label);
        self
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: OrderingComparator) -> Self {
        self.ordering = Some(ordering);
        self
    }

    #[must_use]
    pub fn with_data_callback(mut self, callback: DataCallback) -> Self {
        self.data_callback = Some(callback);
        self
    }

    #[must_use]
    pub fn with_filter_printer(mut self, printer: FilterPrinter) -> Self {
        self.filter_printer = Some(printer);
        self
    }

    #[must_use]
    pub fn with_handlers(mut self, handlers: FilterHandlers) -> Self {
        self.handlers = Some(handlers);
        self
    }

    #[must_use]
    pub fn with_mandatory_attributes(mut self, attributes: Vec<MandatoryAttribute>) -> Self {
        self.mandatory_attributes = Some(attributes);
        self
    }

    #[must_use]
    pub fn with_commit_handler(mut self, handler: Option<CommitHandler>) -> Self {
        self.commit_handler = Some(handler);
        self
    }
}

impl<D: ChartDrawer> BaseChart<D> {
    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn settings(&self) -> ChartSettings {
        self.config.settings
    }

    /// Merges `patch` into the configuration. Accessor changes apply from
    /// the next render or redraw on; nothing already drawn is recomputed.
    pub fn configure(&mut self, patch: ConfigPatch) {
        let size_changed = patch.min_width.is_some() || patch.min_height.is_some();
        self.config.merge(patch);
        if size_changed {
            self.sizing.invalidate();
        }
        trace!(chart_id = %self.id, "configuration merged");
    }

    #[must_use]
    pub fn handlers(&self) -> &FilterHandlers {
        &self.config.handlers
    }

    pub fn set_handlers(&mut self, handlers: FilterHandlers) {
        self.config.handlers = handlers;
    }

    #[must_use]
    pub fn transition_timing(&self) -> TransitionTiming {
        self.config.settings.transition_timing()
    }

    pub fn set_transition_duration_ms(&mut self, duration_ms: u64) {
        self.config.settings.transition_duration_ms = duration_ms;
    }

    pub fn set_transition_delay_ms(&mut self, delay_ms: u64) {
        self.config.settings.transition_delay_ms = delay_ms;
    }

    pub fn set_render_label(&mut self, render_label: bool) {
        self.config.settings.render_label = render_label;
    }

    pub fn set_render_title(&mut self, render_title: bool) {
        self.config.settings.render_title = render_title;
    }

    pub fn set_controls_use_visibility(&mut self, use_visibility: bool) {
        self.config.settings.controls_use_visibility = use_visibility;
    }

    #[must_use]
    pub fn commit_handler(&self) -> Option<&CommitHandler> {
        self.config.commit_handler.as_ref()
    }

    pub fn set_commit_handler(&mut self, handler: Option<CommitHandler>) {
        self.config.commit_handler = handler;
    }
}
