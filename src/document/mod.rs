//! Host document abstraction.
//!
//! The renderer only talks to the live document through [`Document`], so the
//! same tree can be mounted into the in-process [`MemoryDocument`] or, with
//! the `web` feature, into the browser DOM.

pub mod events;
pub mod html;
pub mod memory;
pub mod selector;
#[cfg(feature = "web")]
pub mod web;

use crate::result::UiResult;
use std::fmt::Debug;

pub use events::{DomEvent, EventDetail, Listener};
pub use memory::{MemoryDocument, NodeId};
#[cfg(feature = "web")]
pub use web::WebDocument;

/// Value assigned to a DOM property, as opposed to a (string) attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    Bool(bool),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

pub trait Document {
    /// Handle to an element or text node owned by this document.
    type Node: Clone + Debug;

    /// First element in document order matching `selector`.
    fn query_selector(&self, selector: &str) -> UiResult<Option<Self::Node>>;
    fn head(&self) -> UiResult<Self::Node>;

    fn create_element(&mut self, tag: &str) -> UiResult<Self::Node>;
    fn create_text_node(&mut self, text: &str) -> UiResult<Self::Node>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> UiResult<()>;
    fn set_property(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: PropertyValue,
    ) -> UiResult<()>;
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str) -> UiResult<()>;
    fn set_text_content(&mut self, node: &Self::Node, text: &str) -> UiResult<()>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> UiResult<()>;
    /// Remove every child of `node`. Removed subtrees are never reused by the
    /// renderer, so hosts may release them.
    fn clear_children(&mut self, node: &Self::Node) -> UiResult<()>;

    fn add_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        listener: Listener,
    ) -> UiResult<()>;
}
