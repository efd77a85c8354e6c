use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::api::ChartId;
use crate::core::FilterArg;

/// Named lifecycle channel a listener can subscribe to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    PreRender,
    PostRender,
    PreRedraw,
    PostRedraw,
    Filtered,
    Zoomed,
    Renderlet,
    Pretransition,
    Custom(String),
}

impl Channel {
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "preRender" => Self::PreRender,
            "postRender" => Self::PostRender,
            "preRedraw" => Self::PreRedraw,
            "postRedraw" => Self::PostRedraw,
            "filtered" => Self::Filtered,
            "zoomed" => Self::Zoomed,
            "renderlet" => Self::Renderlet,
            "pretransition" => Self::Pretransition,
            other => Self::Custom(other.to_owned()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::PreRender => "preRender",
            Self::PostRender => "postRender",
            Self::PreRedraw => "preRedraw",
            Self::PostRedraw => "postRedraw",
            Self::Filtered => "filtered",
            Self::Zoomed => "zoomed",
            Self::Renderlet => "renderlet",
            Self::Pretransition => "pretransition",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Event-specific data delivered with a [`ChartEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    None,
    /// The value that originated a filter mutation.
    Filter(FilterArg),
    Custom(serde_json::Value),
}

/// What every listener receives.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartEvent {
    pub chart_id: ChartId,
    pub anchor_name: String,
    pub channel: Channel,
    pub payload: EventPayload,
}

pub type Listener = Rc<dyn Fn(&ChartEvent)>;

struct ListenerEntry {
    key: Option<String>,
    listener: Listener,
}

/// Per-chart listener registry.
///
/// Listeners are addressed as `channel` or `channel.key`. A keyed
/// registration replaces the listener with the same key in place; an
/// unkeyed one appends.
#[derive(Default)]
pub struct EventDispatcher {
    channels: RefCell<IndexMap<Channel, SmallVec<[ListenerEntry; 4]>>>,
}

impl EventDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers, replaces or (with `None`) removes a listener.
    ///
    /// Removing with a bare channel name drops every unkeyed listener of
    /// that channel.
    pub fn on(&self, spec: &str, listener: Option<Listener>) {
        let (channel_name, key) = match spec.split_once('.') {
            Some((channel, key)) => (channel, Some(key.to_owned())),
            None => (spec, None),
        };
        let channel = Channel::parse(channel_name);
        let mut channels = self.channels.borrow_mut();
        let entries = channels.entry(channel).or_default();

        let existing = key
            .as_ref()
            .and_then(|key| entries.iter().position(|entry| entry.key.as_ref() == Some(key)));

        match (listener, existing) {
            (Some(listener), Some(position)) => entries[position].listener = listener,
            (Some(listener), None) => entries.push(ListenerEntry { key, listener }),
            (None, Some(position)) => {
                entries.remove(position);
            }
            (None, None) => {
                if key.is_none() {
                    entries.retain(|entry| entry.key.is_some());
                }
            }
        }
    }

    #[must_use]
    pub fn listener_count(&self, channel: &Channel) -> usize {
        self.channels
            .borrow()
            .get(channel)
            .map_or(0, |entries| entries.len())
    }

    /// Invokes every listener of `event.channel` in registration order.
    ///
    /// The listener list is snapshotted first, so listeners may register or
    /// remove listeners while being invoked.
    pub fn fire(&self, event: &ChartEvent) {
        let listeners: SmallVec<[Listener; 4]> = match self.channels.borrow().get(&event.channel) {
            Some(entries) => entries.iter().map(|entry| entry.listener.clone()).collect(),
            None => return,
        };
        trace!(
            chart_id = %event.chart_id,
            channel = %event.channel,
            listeners = listeners.len(),
            "fire chart event"
        );
        for listener in listeners {
            listener(event);
        }
    }
}
