use crate::document::events::{DomEvent, EventDetail, Listener};
use crate::document::{Document, PropertyValue};
use crate::err;
use crate::result::{UiError, UiResult};
use std::fmt::{Debug, Formatter};
use tracing::trace;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, Element, Event, HtmlElement, Node};

fn host_error(action: &'static str) -> impl FnOnce(JsValue) -> UiError {
    move |value| err!(Host, "{} failed: {:?}", action, value)
}

fn as_element(node: &Node) -> UiResult<&Element> {
    node.dyn_ref::<Element>()
        .ok_or_else(|| err!(Host, "Node '{}' is not an element", node.node_name()))
}

fn string_field(object: &JsValue, name: &str) -> Option<String> {
    js_sys::Reflect::get(object, &JsValue::from_str(name))
        .ok()?
        .as_string()
}

fn bool_field(object: &JsValue, name: &str) -> Option<bool> {
    js_sys::Reflect::get(object, &JsValue::from_str(name))
        .ok()?
        .as_bool()
}

fn to_dom_event(event: &Event) -> DomEvent {
    let mut dom_event = DomEvent::new(event.type_());
    if let Some(custom) = event.dyn_ref::<CustomEvent>() {
        let detail = custom.detail();
        if detail.is_object() {
            dom_event = dom_event.with_detail(EventDetail {
                value: string_field(&detail, "value"),
                checked: bool_field(&detail, "checked"),
            });
        }
    }
    let target_value = event
        .target()
        .and_then(|target| string_field(target.as_ref(), "value"));
    dom_event.with_target_value(target_value)
}

struct RegisteredListener {
    node: Node,
    event: String,
    closure: Closure<dyn FnMut(Event)>,
}

/// The browser DOM of the current window.
///
/// Event closures are owned by the document and dropped once their element
/// is removed through [`Document::clear_children`].
pub struct WebDocument {
    document: web_sys::Document,
    listeners: Vec<RegisteredListener>,
}

impl Debug for WebDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDocument")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl WebDocument {
    pub fn new() -> UiResult<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| err!(Host, "No window document"))?;
        Ok(Self::from_document(document))
    }

    pub fn from_document(document: web_sys::Document) -> Self {
        Self {
            document,
            listeners: Vec::new(),
        }
    }

    /// Number of event closures currently held.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn release_listeners_under(&mut self, removed: &Node) {
        let (released, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.listeners)
            .into_iter()
            .partition(|registered| removed.contains(Some(&registered.node)));
        self.listeners = kept;
        for registered in released {
            let _ = registered.node.remove_event_listener_with_callback(
                &registered.event,
                registered.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

impl Document for WebDocument {
    type Node = Node;

    fn query_selector(&self, selector: &str) -> UiResult<Option<Node>> {
        let element = self.document.query_selector(selector).map_err(|value| {
            if string_field(&value, "name").as_deref() == Some("SyntaxError") {
                err!(InvalidSelector, "'{}' is not a valid selector", selector)
            } else {
                host_error("querySelector")(value)
            }
        })?;
        Ok(element.map(Node::from))
    }

    fn head(&self) -> UiResult<Node> {
        self.document
            .head()
            .map(Node::from)
            .ok_or_else(|| err!(Host, "Document has no <head>"))
    }

    fn create_element(&mut self, tag: &str) -> UiResult<Node> {
        let element = self
            .document
            .create_element(tag)
            .map_err(host_error("createElement"))?;
        Ok(element.into())
    }

    fn create_text_node(&mut self, text: &str) -> UiResult<Node> {
        Ok(self.document.create_text_node(text).into())
    }

    fn set_attribute(&mut self, node: &Node, name: &str, value: &str) -> UiResult<()> {
        as_element(node)?
            .set_attribute(name, value)
            .map_err(host_error("setAttribute"))
    }

    fn set_property(&mut self, node: &Node, name: &str, value: PropertyValue) -> UiResult<()> {
        let value = match value {
            PropertyValue::Text(text) => JsValue::from_str(&text),
            PropertyValue::Bool(flag) => JsValue::from_bool(flag),
        };
        js_sys::Reflect::set(node.as_ref(), &JsValue::from_str(name), &value)
            .map_err(host_error("property assignment"))?;
        Ok(())
    }

    fn set_style(&mut self, node: &Node, property: &str, value: &str) -> UiResult<()> {
        let element = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| err!(Host, "Node '{}' has no inline style", node.node_name()))?;
        element
            .style()
            .set_property(property, value)
            .map_err(host_error("style.setProperty"))
    }

    fn set_text_content(&mut self, node: &Node, text: &str) -> UiResult<()> {
        as_element(node)?;
        self.clear_children(node)?;
        node.set_text_content(Some(text));
        Ok(())
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> UiResult<()> {
        parent
            .append_child(child)
            .map_err(host_error("appendChild"))?;
        Ok(())
    }

    fn clear_children(&mut self, node: &Node) -> UiResult<()> {
        while let Some(child) = node.first_child() {
            node.remove_child(&child)
                .map_err(host_error("removeChild"))?;
            self.release_listeners_under(&child);
        }
        trace!("{} event closures held after clear", self.listeners.len());
        Ok(())
    }

    fn add_event_listener(&mut self, node: &Node, event: &str, listener: Listener) -> UiResult<()> {
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            listener.handle(&to_dom_event(&event));
        });
        node.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(host_error("addEventListener"))?;
        self.listeners.push(RegisteredListener {
            node: node.clone(),
            event: event.to_string(),
            closure,
        });
        Ok(())
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::builder::{col, UiBuilder};
    use crate::loader::DependencyCache;
    use crate::nodes::Callback;
    use crate::result::UiErrorKind;
    use crate::types::{ButtonVariant, InputType};
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mounted_document(id: &str) -> (WebDocument, Node) {
        let mut document = WebDocument::new().unwrap();
        let mount = document.create_element("div").unwrap();
        document.set_attribute(&mount, "id", id).unwrap();
        let body: Node = document.document.body().unwrap().into();
        document.append_child(&body, &mount).unwrap();
        (document, mount)
    }

    fn dispatch_value_change(target: &Node, value: &str) {
        let detail = js_sys::Object::new();
        js_sys::Reflect::set(&detail, &"value".into(), &value.into()).unwrap();
        let init = web_sys::CustomEventInit::new();
        init.set_detail(&detail);
        let event = CustomEvent::new_with_event_init_dict("change", &init).unwrap();
        target.dispatch_event(&event).unwrap();
    }

    #[wasm_bindgen_test]
    fn mount_not_found_leaves_document_untouched() {
        let mut document = WebDocument::new().unwrap();
        let mut dependencies = DependencyCache::default();
        let head_children = document.head().unwrap().child_nodes().length();
        let mut builder = col(0);
        builder.button("Go", false, ButtonVariant::Solid, None);
        let error = builder
            .render_into(&mut document, &mut dependencies, "#nowhere-to-be-found")
            .unwrap_err();
        assert!(error.is_mount_not_found());
        assert_eq!(document.head().unwrap().child_nodes().length(), head_children);
    }

    #[wasm_bindgen_test]
    fn css_selectors_reach_the_browser() {
        let (document, mount) = mounted_document("web-selectors");
        let found = document
            .query_selector("body > div#web-selectors:not(.hidden)")
            .unwrap();
        assert_eq!(found, Some(mount));
        let error = document.query_selector("div >").unwrap_err();
        assert!(matches!(error.kind(), UiErrorKind::InvalidSelector(_)));
    }

    #[wasm_bindgen_test]
    fn full_replace_releases_listeners() {
        let (mut document, mount) = mounted_document("web-replace");
        let mut dependencies = DependencyCache::default();
        for label in ["first", "second", "third"] {
            let mut builder = UiBuilder::new();
            builder.button(label, false, ButtonVariant::Flat, Some(Callback::new(|()| {})));
            builder
                .render_into(&mut document, &mut dependencies, "#web-replace")
                .unwrap();
        }
        assert_eq!(mount.child_nodes().length(), 1);
        assert_eq!(mount.text_content().as_deref(), Some("third"));
        assert_eq!(document.listener_count(), 1);
    }

    #[wasm_bindgen_test]
    fn custom_event_value_reaches_callback() {
        let (mut document, mount) = mounted_document("web-events");
        let mut dependencies = DependencyCache::default();
        let received = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = received.clone();
        let mut builder = UiBuilder::new();
        builder.input(
            InputType::Text,
            "",
            "",
            false,
            Some(Callback::new(move |value| sink.borrow_mut().push(value))),
        );
        builder
            .render_into(&mut document, &mut dependencies, "#web-events")
            .unwrap();
        let input = mount.first_child().unwrap();
        dispatch_value_change(&input, "hello");
        assert_eq!(*received.borrow(), vec!["hello".to_string()]);
    }
}
