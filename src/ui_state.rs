//! UI state per controller and the adapters that write it to the DOM.
//!
//! Controllers decide on a state; only the functions here turn a state into
//! class, attribute and child-node mutations. Reading a state back goes
//! through the DOM as well, so nothing is cached outside of it.

use crate::Result;
use crate::dom::{Dom, NodeId};

pub(crate) const ACTIVE_CLASS: &str = "active";
pub(crate) const VISIBLE_CLASS: &str = "visible";
pub(crate) const SCROLLED_CLASS: &str = "scrolled";
pub(crate) const ERROR_CLASS: &str = "error";
pub(crate) const ERROR_MESSAGE_CLASS: &str = "error-message";
pub(crate) const LAZY_CLASS: &str = "lazy";
pub(crate) const LOADED_CLASS: &str = "loaded";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }

    pub(crate) fn read(dom: &Dom, menu: NodeId) -> Self {
        if dom.class_contains(menu, ACTIVE_CLASS) {
            Self::Open
        } else {
            Self::Closed
        }
    }

    pub(crate) fn apply(self, dom: &mut Dom, menu: NodeId, hamburger: NodeId) -> Result<()> {
        let open = self.is_open();
        dom.class_set(menu, ACTIVE_CLASS, open)?;
        dom.class_set(hamburger, ACTIVE_CLASS, open)?;
        dom.set_attr(hamburger, "aria-expanded", if open { "true" } else { "false" })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
    Valid,
    Invalid(String),
}

impl FieldState {
    pub(crate) fn read(dom: &Dom, field: NodeId) -> Result<Self> {
        if !dom.class_contains(field, ERROR_CLASS) {
            return Ok(Self::Valid);
        }
        let message = error_message_node(dom, field)?
            .map(|node| dom.text_content(node))
            .unwrap_or_default();
        Ok(Self::Invalid(message))
    }

    /// Ensures exactly one error message sibling while invalid, none while valid.
    pub(crate) fn apply(&self, dom: &mut Dom, field: NodeId) -> Result<()> {
        match self {
            Self::Invalid(message) => {
                dom.class_add(field, ERROR_CLASS)?;
                let Some(container) = dom.parent(field) else {
                    return Ok(());
                };
                let node = match error_message_node(dom, field)? {
                    Some(node) => node,
                    None => {
                        let node = dom.create_detached_element("div");
                        dom.set_attr(node, "class", ERROR_MESSAGE_CLASS)?;
                        dom.append_child(container, node)?;
                        node
                    }
                };
                dom.set_text_content(node, message)
            }
            Self::Valid => {
                dom.class_remove(field, ERROR_CLASS)?;
                if let Some(node) = error_message_node(dom, field)? {
                    dom.remove_node(node)?;
                }
                Ok(())
            }
        }
    }
}

fn error_message_node(dom: &Dom, field: NodeId) -> Result<Option<NodeId>> {
    let Some(container) = dom.parent(field) else {
        return Ok(None);
    };
    dom.query_selector_from(container, &format!(".{ERROR_MESSAGE_CLASS}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    #[default]
    Pending,
    Done,
}

impl RevealState {
    pub(crate) fn read(dom: &Dom, node: NodeId) -> Self {
        if dom.class_contains(node, VISIBLE_CLASS) {
            Self::Done
        } else {
            Self::Pending
        }
    }

    pub(crate) fn apply(self, dom: &mut Dom, node: NodeId) -> Result<()> {
        dom.class_set(node, VISIBLE_CLASS, self == Self::Done)
    }
}
