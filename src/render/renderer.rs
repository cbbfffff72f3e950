use crate::document::Document;
use crate::loader::DependencyCache;
use crate::nodes::{Container, ContainerKind, NodeDescriptor};
use crate::render::context::RenderContext;
use crate::render::styling::{container_style, gap_value};
use crate::render::widgets;
use crate::result::{UiError, UiErrorKind, UiResult};
use tracing::debug;

/// Replace the content of the element matching `selector` with `nodes`.
///
/// The selector is resolved before anything is touched, and the new subtree
/// is built detached, so a failure never leaves a half-rendered mount point.
/// Every call starts from scratch: nothing of the previous content survives.
pub fn render_tree<D: Document>(
    document: &mut D,
    dependencies: &mut DependencyCache,
    selector: &str,
    nodes: &[NodeDescriptor],
) -> UiResult<D::Node> {
    let Some(mount) = document.query_selector(selector)? else {
        return Err(UiError::new(UiErrorKind::MountNotFound {
            selector: selector.to_string(),
        }));
    };
    debug!("Rendering {} root nodes into '{}'", nodes.len(), selector);

    let mut render_context = RenderContext::new(document, dependencies);
    let elements = nodes
        .iter()
        .map(|node| render_node(&mut render_context, node))
        .collect::<UiResult<Vec<_>>>()?;

    document.clear_children(&mount)?;
    for element in &elements {
        document.append_child(&mount, element)?;
    }
    Ok(mount)
}

pub fn render_node<D: Document>(
    render_context: &mut RenderContext<D>,
    node: &NodeDescriptor,
) -> UiResult<D::Node> {
    match node {
        NodeDescriptor::Column(container) => {
            render_container(render_context, ContainerKind::Column, container)
        }
        NodeDescriptor::Row(container) => {
            render_container(render_context, ContainerKind::Row, container)
        }
        NodeDescriptor::Button(button) => widgets::render_button(render_context, button),
        NodeDescriptor::Input(input) => widgets::render_input(render_context, input),
        NodeDescriptor::Text(text) => widgets::render_text(render_context, text),
        NodeDescriptor::Alert(alert) => widgets::render_alert(render_context, alert),
        NodeDescriptor::Image(image) => widgets::render_image(render_context, image),
        NodeDescriptor::Checkbox(checkbox) => widgets::render_checkbox(render_context, checkbox),
        NodeDescriptor::Select(select) => widgets::render_select(render_context, select),
        NodeDescriptor::Separator => widgets::render_separator(render_context),
    }
}

fn render_container<D: Document>(
    render_context: &mut RenderContext<D>,
    kind: ContainerKind,
    container: &Container,
) -> UiResult<D::Node> {
    let element = render_context.create_element("div")?;
    render_context.set_styles(&element, container_style(kind))?;
    render_context.set_style(&element, "gap", &gap_value(container.gap_px))?;
    for child in &container.children {
        let child_element = render_node(render_context, child)?;
        render_context.append_child(&element, &child_element)?;
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{col, UiBuilder};
    use crate::document::{DomEvent, EventDetail, MemoryDocument};
    use crate::nodes::Callback;
    use crate::test::{mounted_document, render_builder};
    use crate::types::{ButtonVariant, InputType, TextLevel};
    use expect_test::expect;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_render_layout() {
        let (mut document, mount) = mounted_document();
        let mut builder = col(16);
        builder
            .text("Title", TextLevel::H1)
            .row(8)
            .text("left", TextLevel::P)
            .text("right", TextLevel::P)
            .end_row()
            .unwrap()
            .separator();
        render_builder(&mut document, &mut builder);
        expect![[r#"
            <div id="app">
              <div style="display: flex; flex-direction: column; align-items: stretch; justify-content: flex-start; gap: 16px;">
                <h1>
                  Title
                </h1>
                <div style="display: flex; flex-direction: row; align-items: center; justify-content: center; gap: 8px;">
                  <p>
                    left
                  </p>
                  <p>
                    right
                  </p>
                </div>
                <hr style="width: 100%; border: none; border-top: 1px solid #e0e0e0; margin: 8px 0;">
              </div>
            </div>
        "#]]
        .assert_eq(&document.pretty_html(mount));
    }

    #[test]
    fn test_children_follow_call_order() {
        let (mut document, mount) = mounted_document();
        let mut builder = UiBuilder::new();
        builder.row(0);
        for label in ["one", "two", "three", "four"] {
            builder.text(label, TextLevel::P);
        }
        render_builder(&mut document, &mut builder);
        let row = document.children(mount)[0];
        let texts: Vec<String> = document
            .children(row)
            .iter()
            .map(|child| document.text_content(*child))
            .collect();
        assert_eq!(texts, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn test_full_replace() {
        let (mut document, mount) = mounted_document();
        let mut dependencies = DependencyCache::default();
        let mut first = UiBuilder::new();
        first
            .text("from A", TextLevel::H2)
            .button("A", false, ButtonVariant::Solid, None);
        first
            .render_into(&mut document, &mut dependencies, "#app")
            .unwrap();

        let mut second = UiBuilder::new();
        second.separator();
        second
            .render_into(&mut document, &mut dependencies, "#app")
            .unwrap();

        assert_eq!(document.children(mount).len(), 1);
        assert_eq!(document.tag_name(document.children(mount)[0]), Some("hr"));
        assert!(!document.inner_html(mount).contains("from A"));
        assert!(document.query_selector("weave-button").unwrap().is_none());
    }

    #[test]
    fn test_rerender_same_tree_is_identical() {
        let (mut document, mount) = mounted_document();
        let mut dependencies = DependencyCache::default();
        let build = || {
            let mut builder = col(4);
            builder
                .checkbox("Remember me", true, false, None)
                .button("Save", false, ButtonVariant::Solid, None);
            builder.commit()
        };
        build()
            .render_into(&mut document, &mut dependencies, "#app")
            .unwrap();
        let first = document.inner_html(mount);
        let head_children = document.children(document.head_node()).len();
        build()
            .render_into(&mut document, &mut dependencies, "#app")
            .unwrap();
        assert_eq!(document.inner_html(mount), first);
        assert_eq!(document.children(document.head_node()).len(), head_children);
    }

    #[test]
    fn test_input_change_invokes_callback_once() {
        let (mut document, _mount) = mounted_document();
        let received = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = received.clone();
        let mut builder = UiBuilder::new();
        builder
            .col(0)
            .row(0)
            .input(
                InputType::Text,
                "x",
                "",
                false,
                Some(Callback::new(move |value| sink.borrow_mut().push(value))),
            )
            .end_row()
            .unwrap()
            .end_col()
            .unwrap();
        render_builder(&mut document, &mut builder);

        let input = document
            .query_selector("#app weave-input")
            .unwrap()
            .unwrap();
        assert_eq!(document.listener_count(input, "change"), 1);
        let invoked = document
            .dispatch_event(input, DomEvent::custom("change", EventDetail::value("hello")))
            .unwrap();
        assert_eq!(invoked, 1);
        assert_eq!(*received.borrow(), vec!["hello".to_string()]);
        assert_eq!(
            document
                .query_selector_all("#app > div > div > weave-input")
                .unwrap(),
            vec![input]
        );
    }

    #[test]
    fn test_mismatched_close_renders_nothing() {
        let (mut document, mount) = mounted_document();
        let mut dependencies = DependencyCache::default();
        let mut builder = UiBuilder::new();
        let error = builder.col(0).end_row().unwrap_err();
        assert!(error.is_structural());

        builder
            .commit()
            .render_into(&mut document, &mut dependencies, "#app")
            .unwrap();
        assert!(document.children(mount).is_empty());
        assert!(document.query_selector("#app div").unwrap().is_none());
    }

    #[test]
    fn test_poisoned_builder_refuses_render() {
        let (mut document, mount) = mounted_document();
        let mut dependencies = DependencyCache::default();
        let existing = document.create_element("span").unwrap();
        document.append_child(&mount, &existing).unwrap();

        let mut builder = UiBuilder::new();
        assert!(builder.end_col().is_err());
        let error = builder
            .render_into(&mut document, &mut dependencies, "#app")
            .unwrap_err();
        assert!(error.is_structural());
        assert_eq!(document.children(mount), &[existing]);
    }

    #[test]
    fn test_missing_mount() {
        let (mut document, _mount) = mounted_document();
        let mut dependencies = DependencyCache::default();
        let before = document.outer_html(document.root());
        let node_count = document.node_count();

        let mut builder = col(0);
        builder
            .button("Go", false, ButtonVariant::Solid, None)
            .text("hi", TextLevel::P);
        let error = builder
            .render_into(&mut document, &mut dependencies, "#nowhere")
            .unwrap_err();

        assert!(error.is_mount_not_found());
        assert_eq!(
            error.kind(),
            &UiErrorKind::MountNotFound {
                selector: "#nowhere".to_string()
            }
        );
        assert_eq!(document.outer_html(document.root()), before);
        assert_eq!(document.node_count(), node_count);
        assert!(!dependencies.base_styles_loaded());
    }

    #[test]
    fn test_invalid_selector() {
        let mut document = MemoryDocument::new();
        let mut dependencies = DependencyCache::default();
        let error = render_tree(&mut document, &mut dependencies, "##", &[]).unwrap_err();
        assert!(matches!(error.kind(), UiErrorKind::InvalidSelector(_)));
    }

    #[test]
    fn test_empty_tree_clears_mount() {
        let (mut document, mount) = mounted_document();
        let mut dependencies = DependencyCache::default();
        let leftover = document.create_text_node("stale").unwrap();
        document.append_child(&mount, &leftover).unwrap();
        render_tree(&mut document, &mut dependencies, "#app", &[]).unwrap();
        assert_eq!(document.inner_html(mount), "");
    }
}
