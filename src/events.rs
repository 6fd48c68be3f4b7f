use std::collections::HashMap;
use std::fmt;

use crate::dom::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EventType {
    Click,
    Input,
    Submit,
    KeyDown,
    Focus,
    Blur,
    MouseEnter,
    MouseLeave,
    Scroll,
    Resize,
    Load,
}

impl EventType {
    pub(crate) fn bubbles(self) -> bool {
        matches!(self, Self::Click | Self::Input | Self::Submit | Self::KeyDown)
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Input => "input",
            Self::Submit => "submit",
            Self::KeyDown => "keydown",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::Load => "load",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyInput {
    pub(crate) key: String,
    pub(crate) shift: bool,
}

impl KeyInput {
    pub(crate) fn is_tab(&self) -> bool {
        self.key == "Tab"
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: EventType,
    /// `None` for events fired at the window.
    pub(crate) target: Option<NodeId>,
    pub(crate) current_target: Option<NodeId>,
    pub(crate) key: Option<KeyInput>,
    pub(crate) default_prevented: bool,
}

impl EventState {
    pub(crate) fn new(event_type: EventType, target: Option<NodeId>) -> Self {
        Self {
            event_type,
            target,
            current_target: target,
            key: None,
            default_prevented: false,
        }
    }

    pub(crate) fn with_key(mut self, key: KeyInput) -> Self {
        self.key = Some(key);
        self
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Registered handlers per node and event, plus the window's own list.
#[derive(Debug, Clone)]
pub(crate) struct ListenerStore<H> {
    nodes: HashMap<NodeId, HashMap<EventType, Vec<H>>>,
    window: HashMap<EventType, Vec<H>>,
}

impl<H> Default for ListenerStore<H> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
            window: HashMap::new(),
        }
    }
}

impl<H: Clone> ListenerStore<H> {
    pub(crate) fn add(&mut self, node_id: NodeId, event: EventType, handler: H) {
        self.nodes
            .entry(node_id)
            .or_default()
            .entry(event)
            .or_default()
            .push(handler);
    }

    pub(crate) fn add_window(&mut self, event: EventType, handler: H) {
        self.window.entry(event).or_default().push(handler);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: EventType) -> Vec<H> {
        self.nodes
            .get(&node_id)
            .and_then(|events| events.get(&event))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn get_window(&self, event: EventType) -> Vec<H> {
        self.window.get(&event).cloned().unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn count(&self, node_id: NodeId, event: EventType) -> usize {
        self.nodes
            .get(&node_id)
            .and_then(|events| events.get(&event))
            .map_or(0, Vec::len)
    }
}
