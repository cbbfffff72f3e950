use crate::document::events::{DomEvent, Listener};
use crate::document::html;
use crate::document::selector::{parse_selector, SelectorElement, SelectorList};
use crate::document::{Document, PropertyValue};
use crate::{bail, err};
use crate::result::UiResult;
use itertools::Itertools;
use phf::phf_set;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use tracing::trace;

/// Properties whose assignment is mirrored into the attribute of the same
/// name, as the browser does for these element properties.
static REFLECTED_PROPERTIES: phf::Set<&'static str> = phf_set! {
    "type",
    "placeholder",
    "disabled",
    "checked",
    "src",
    "alt",
};

/// Handle to a node slot. The generation makes handles of released nodes
/// stale instead of aliasing whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Debug)]
enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Default)]
struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    properties: BTreeMap<String, PropertyValue>,
    listeners: Vec<(String, Listener)>,
}

impl ElementData {
    fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(key, _)| key != name);
    }
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<NodeData>,
}

/// In-process document: an arena of element and text nodes rooted in an
/// `<html>` element with `<head>` and `<body>`.
///
/// Children removed by [`Document::clear_children`] are released together
/// with their descendants and listeners, and their slots are reused. Nodes
/// that are merely detached (created but not yet appended, or moved) stay
/// alive and are ignored by selector queries.
///
/// Selectors are limited to the subset described in
/// [`selector`](crate::document::selector).
#[derive(Debug)]
pub struct MemoryDocument {
    slots: Vec<Slot>,
    free_slots: Vec<usize>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let placeholder = NodeId {
            index: 0,
            generation: 0,
        };
        let mut document = Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
            root: placeholder,
            head: placeholder,
            body: placeholder,
        };
        let root = document.insert_element("html");
        let head = document.insert_element("head");
        let body = document.insert_element("body");
        document.link(root, head);
        document.link(root, body);
        document.root = root;
        document.head = head;
        document.body = body;
        document
    }

    fn insert(&mut self, kind: NodeKind) -> NodeId {
        let node = NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        };
        if let Some(index) = self.free_slots.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Drop `id` and all of its descendants, freeing their slots.
    fn release(&mut self, id: NodeId) {
        let mut todo = vec![id];
        let mut released = 0;
        while let Some(current) = todo.pop() {
            let Some(slot) = self.slots.get_mut(current.index) else {
                continue;
            };
            if slot.generation != current.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free_slots.push(current.index);
                todo.extend(node.children);
                released += 1;
            }
        }
        trace!("Released {} nodes under {}", released, id);
    }

    fn data(&self, id: NodeId) -> Option<&NodeData> {
        let slot = self.slots.get(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn insert_element(&mut self, tag: &str) -> NodeId {
        self.insert(NodeKind::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }))
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.data_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.data_mut(parent) {
            node.children.push(child);
        }
    }

    fn node(&self, id: NodeId) -> UiResult<&NodeData> {
        self.data(id)
            .ok_or_else(|| err!(Host, "Unknown node {}", id))
    }

    fn node_mut(&mut self, id: NodeId) -> UiResult<&mut NodeData> {
        self.data_mut(id)
            .ok_or_else(|| err!(Host, "Unknown node {}", id))
    }

    fn element_mut(&mut self, id: NodeId) -> UiResult<&mut ElementData> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(element) => Ok(element),
            NodeKind::Text(_) => Err(err!(Host, "Node {} is a text node, not an element", id)),
        }
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.data(id)?.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    fn detach(&mut self, id: NodeId) -> UiResult<()> {
        if let Some(parent) = self.node_mut(id)?.parent.take() {
            self.node_mut(parent)?.children.retain(|child| *child != id);
        }
        Ok(())
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head_node(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Number of live nodes, attached or detached.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free_slots.len()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.data(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Element children only, skipping text nodes.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.tag.as_str())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.data(id)?.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        self.element(id)
            .map(|element| element.attributes.as_slice())
            .unwrap_or_default()
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)?
            .styles
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn property(&self, id: NodeId, name: &str) -> Option<&PropertyValue> {
        self.element(id)?.properties.get(name)
    }

    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        self.element(id)
            .map(|element| {
                element
                    .listeners
                    .iter()
                    .filter(|(kind, _)| kind == event)
                    .count()
            })
            .unwrap_or_default()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut content = String::new();
        let mut todo = vec![id];
        while let Some(current) = todo.pop() {
            if let Some(text) = self.text(current) {
                content.push_str(text);
            }
            todo.extend(self.children(current).iter().rev());
        }
        content
    }

    /// Every node attached under the root, in document (pre-)order.
    fn attached_nodes(&self) -> Vec<NodeId> {
        let mut ordered = vec![];
        let mut todo = vec![self.root];
        while let Some(current) = todo.pop() {
            ordered.push(current);
            todo.extend(self.children(current).iter().rev());
        }
        ordered
    }

    fn matching(&self, selector: &SelectorList) -> impl Iterator<Item = NodeId> + '_ {
        let selector = selector.clone();
        self.attached_nodes().into_iter().filter(move |id| {
            self.element(*id).is_some()
                && selector.matches(&ElementRef {
                    document: self,
                    id: *id,
                })
        })
    }

    pub fn query_selector_all(&self, selector: &str) -> UiResult<Vec<NodeId>> {
        let selector = parse_selector(selector)?;
        Ok(self.matching(&selector).collect())
    }

    /// Deliver `event` to every listener of its kind registered on `target`.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch_event(&self, target: NodeId, event: DomEvent) -> UiResult<usize> {
        let Some(element) = self.element(target) else {
            bail!(
                Host,
                "Cannot dispatch '{}' to non-element node {}",
                event.kind(),
                target
            );
        };
        let target_value = match element.properties.get("value") {
            Some(PropertyValue::Text(value)) => Some(value.clone()),
            _ => self.attribute(target, "value").map(str::to_string),
        };
        let event = event.with_target_value(target_value);
        let listeners: Vec<Listener> = element
            .listeners
            .iter()
            .filter(|(kind, _)| kind == event.kind())
            .map(|(_, listener)| listener.clone())
            .collect();
        trace!(
            "Dispatching '{}' to {} ({} listeners)",
            event.kind(),
            target,
            listeners.len()
        );
        for listener in &listeners {
            listener.handle(&event);
        }
        Ok(listeners.len())
    }

    /// Assign the `value` property and fire a native `input` event, as typing
    /// into a form control does.
    pub fn type_into(&mut self, target: NodeId, value: &str) -> UiResult<usize> {
        self.set_property(&target, "value", PropertyValue::from(value))?;
        self.dispatch_event(target, DomEvent::input())
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        html::outer_html(self, id)
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        html::inner_html(self, id)
    }

    pub fn pretty_html(&self, id: NodeId) -> String {
        html::pretty_html(self, id)
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn query_selector(&self, selector: &str) -> UiResult<Option<NodeId>> {
        let selector = parse_selector(selector)?;
        let found = self.matching(&selector).next();
        Ok(found)
    }

    fn head(&self) -> UiResult<NodeId> {
        Ok(self.head)
    }

    fn create_element(&mut self, tag: &str) -> UiResult<NodeId> {
        Ok(self.insert_element(tag))
    }

    fn create_text_node(&mut self, text: &str) -> UiResult<NodeId> {
        Ok(self.insert(NodeKind::Text(text.to_string())))
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> UiResult<()> {
        self.element_mut(*node)?.set_attribute(name, value);
        Ok(())
    }

    fn set_property(&mut self, node: &NodeId, name: &str, value: PropertyValue) -> UiResult<()> {
        let element = self.element_mut(*node)?;
        if REFLECTED_PROPERTIES.contains(name) {
            match &value {
                PropertyValue::Text(text) => element.set_attribute(name, text),
                PropertyValue::Bool(true) => element.set_attribute(name, ""),
                PropertyValue::Bool(false) => element.remove_attribute(name),
            }
        }
        element.properties.insert(name.to_string(), value);
        Ok(())
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) -> UiResult<()> {
        let element = self.element_mut(*node)?;
        match element.styles.iter_mut().find(|(key, _)| key == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => element
                .styles
                .push((property.to_string(), value.to_string())),
        }
        let style = element
            .styles
            .iter()
            .map(|(key, value)| format!("{}: {};", key, value))
            .join(" ");
        element.set_attribute("style", &style);
        Ok(())
    }

    fn set_text_content(&mut self, node: &NodeId, text: &str) -> UiResult<()> {
        self.element_mut(*node)?;
        self.clear_children(node)?;
        if !text.is_empty() {
            let text_node = self.create_text_node(text)?;
            self.link(*node, text_node);
        }
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> UiResult<()> {
        self.element_mut(*parent)?;
        self.node(*child)?;
        if self.is_inclusive_ancestor(*child, *parent) {
            bail!(Host, "Cannot append {} to its own descendant {}", child, parent);
        }
        self.detach(*child)?;
        self.link(*parent, *child);
        Ok(())
    }

    fn clear_children(&mut self, node: &NodeId) -> UiResult<()> {
        let children = std::mem::take(&mut self.node_mut(*node)?.children);
        for child in children {
            self.release(child);
        }
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        listener: Listener,
    ) -> UiResult<()> {
        self.element_mut(*node)?
            .listeners
            .push((event.to_string(), listener));
        Ok(())
    }
}

struct ElementRef<'a> {
    document: &'a MemoryDocument,
    id: NodeId,
}

impl SelectorElement for ElementRef<'_> {
    fn tag_name(&self) -> &str {
        self.document.tag_name(self.id).unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.document.attribute(self.id, name)
    }

    fn parent_element(&self) -> Option<Self> {
        let parent = self.document.parent(self.id)?;
        self.document.element(parent)?;
        Some(ElementRef {
            document: self.document,
            id: parent,
        })
    }
}
