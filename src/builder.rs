use crate::document::Document;
use crate::loader::DependencyCache;
use crate::nodes::descriptor::print_nodes;
use crate::nodes::{
    AlertNode, ButtonNode, CheckboxNode, CheckedCallback, ClickCallback, Container,
    ContainerKind, ImageNode, InputNode, NodeDescriptor, SelectNode, TextNode, ValueCallback,
};
use crate::render::renderer::render_tree;
use crate::result::UiResult;
use crate::{bail, err};
use crate::types::{AlertType, ButtonVariant, InputType, SelectOption, TextLevel};
use tracing::{debug, trace, warn};

/// Committed, immutable descriptor tree.
#[derive(Debug, Clone, Default)]
pub struct UiTree {
    nodes: Vec<NodeDescriptor>,
}

impl UiTree {
    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn print_tree(&self) -> String {
        print_nodes(&self.nodes)
    }

    pub fn render_into<D: Document>(
        &self,
        document: &mut D,
        dependencies: &mut DependencyCache,
        selector: &str,
    ) -> UiResult<D::Node> {
        render_tree(document, dependencies, selector, &self.nodes)
    }
}

#[derive(Debug)]
struct OpenContainer {
    kind: ContainerKind,
    gap_px: u32,
    children: Vec<NodeDescriptor>,
}

impl OpenContainer {
    fn close(self) -> NodeDescriptor {
        NodeDescriptor::container(
            self.kind,
            Container {
                gap_px: self.gap_px,
                children: self.children,
            },
        )
    }
}

/// Fluent builder for descriptor trees.
///
/// Open containers live on a stack and are attached to their parent when
/// they are closed, so each container still ends up at the position it was
/// opened at. Closing a container that is not open, or of the wrong kind, is
/// a structural error; containers left open are closed by [`commit`].
///
/// [`commit`]: UiBuilder::commit
#[derive(Debug, Default)]
pub struct UiBuilder {
    root_nodes: Vec<NodeDescriptor>,
    stack: Vec<OpenContainer>,
    poisoned: Option<String>,
}

/// Start a tree inside a root column.
pub fn col(gap_px: u32) -> UiBuilder {
    let mut builder = UiBuilder::new();
    builder.col(gap_px);
    builder
}

/// Start a tree inside a root row.
pub fn row(gap_px: u32) -> UiBuilder {
    let mut builder = UiBuilder::new();
    builder.row(gap_px);
    builder
}

impl UiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open containers.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    fn current(&mut self) -> &mut Vec<NodeDescriptor> {
        match self.stack.last_mut() {
            Some(open) => &mut open.children,
            None => &mut self.root_nodes,
        }
    }

    fn push(&mut self, node: NodeDescriptor) -> &mut Self {
        if self.poisoned.is_some() {
            trace!("Ignoring {} on poisoned builder", node.type_name());
            return self;
        }
        self.current().push(node);
        self
    }

    fn open(&mut self, kind: ContainerKind, gap_px: u32) -> &mut Self {
        if self.poisoned.is_some() {
            trace!("Ignoring {} on poisoned builder", kind);
            return self;
        }
        trace!("Opening {} at depth {}", kind, self.stack.len());
        self.stack.push(OpenContainer {
            kind,
            gap_px,
            children: Vec::new(),
        });
        self
    }

    fn close(&mut self, kind: ContainerKind, method: &str, opener: &str) -> UiResult<&mut Self> {
        if let Some(message) = &self.poisoned {
            bail!(
                Structural,
                "{}() called after an earlier structural error: {}",
                method,
                message
            );
        }
        let message = match self.stack.last().map(|top| top.kind) {
            None => format!("{}() called without matching {}()", method, opener),
            Some(top_kind) if top_kind != kind => format!(
                "{}() called but current container is '{}'",
                method, top_kind
            ),
            Some(_) => {
                if let Some(open) = self.stack.pop() {
                    let node = open.close();
                    self.current().push(node);
                }
                return Ok(self);
            }
        };
        warn!("Structural error: {}", message);
        self.poisoned = Some(message.clone());
        Err(err!(Structural, "{}", message))
    }

    /// Open a nested column.
    pub fn col(&mut self, gap_px: u32) -> &mut Self {
        self.open(ContainerKind::Column, gap_px)
    }

    /// Close the current column.
    pub fn end_col(&mut self) -> UiResult<&mut Self> {
        self.close(ContainerKind::Column, "end_col", "col")
    }

    /// Open a nested row.
    pub fn row(&mut self, gap_px: u32) -> &mut Self {
        self.open(ContainerKind::Row, gap_px)
    }

    /// Close the current row.
    pub fn end_row(&mut self) -> UiResult<&mut Self> {
        self.close(ContainerKind::Row, "end_row", "row")
    }

    pub fn button(
        &mut self,
        label: &str,
        disabled: bool,
        variant: ButtonVariant,
        on_click: Option<ClickCallback>,
    ) -> &mut Self {
        self.push(NodeDescriptor::Button(ButtonNode {
            label: label.to_string(),
            disabled,
            variant,
            on_click,
        }))
    }

    pub fn input(
        &mut self,
        input_type: InputType,
        placeholder: &str,
        value: &str,
        disabled: bool,
        on_change: Option<ValueCallback>,
    ) -> &mut Self {
        self.push(NodeDescriptor::Input(InputNode {
            input_type,
            placeholder: placeholder.to_string(),
            value: value.to_string(),
            disabled,
            on_change,
        }))
    }

    /// Add a heading, paragraph or code block.
    pub fn text(&mut self, text: &str, level: TextLevel) -> &mut Self {
        self.push(NodeDescriptor::Text(TextNode {
            text: text.to_string(),
            level,
        }))
    }

    /// Add an alert banner. An empty `title` is treated as no title.
    pub fn alert(&mut self, text: &str, alert_type: AlertType, title: Option<&str>) -> &mut Self {
        self.push(NodeDescriptor::Alert(AlertNode {
            text: text.to_string(),
            alert_type,
            title: non_empty(title),
        }))
    }

    /// Add an image. An empty `alt` is treated as no alt text.
    pub fn img(&mut self, src: &str, alt: Option<&str>) -> &mut Self {
        self.push(NodeDescriptor::Image(ImageNode {
            src: src.to_string(),
            alt: non_empty(alt),
        }))
    }

    pub fn checkbox(
        &mut self,
        label: &str,
        checked: bool,
        disabled: bool,
        on_change: Option<CheckedCallback>,
    ) -> &mut Self {
        self.push(NodeDescriptor::Checkbox(CheckboxNode {
            label: label.to_string(),
            checked,
            disabled,
            on_change,
        }))
    }

    pub fn select(
        &mut self,
        options: impl IntoIterator<Item = SelectOption>,
        value: &str,
        placeholder: &str,
        disabled: bool,
        on_change: Option<ValueCallback>,
    ) -> &mut Self {
        self.push(NodeDescriptor::Select(SelectNode {
            options: options.into_iter().collect(),
            value: value.to_string(),
            placeholder: placeholder.to_string(),
            disabled,
            on_change,
        }))
    }

    pub fn separator(&mut self) -> &mut Self {
        self.push(NodeDescriptor::Separator)
    }

    /// Close every container still open and hand out the finished tree,
    /// leaving the builder empty.
    ///
    /// A poisoned builder commits an empty tree.
    pub fn commit(&mut self) -> UiTree {
        if self.poisoned.is_some() {
            debug!("Discarding tree of poisoned builder");
            self.stack.clear();
            self.root_nodes.clear();
            return UiTree::default();
        }
        if !self.stack.is_empty() {
            debug!("Implicitly closing {} open containers", self.stack.len());
        }
        while let Some(open) = self.stack.pop() {
            let node = open.close();
            self.current().push(node);
        }
        UiTree {
            nodes: std::mem::take(&mut self.root_nodes),
        }
    }

    /// Commit and render into the element matching `selector`.
    pub fn render_into<D: Document>(
        &mut self,
        document: &mut D,
        dependencies: &mut DependencyCache,
        selector: &str,
    ) -> UiResult<D::Node> {
        if let Some(message) = &self.poisoned {
            bail!(Structural, "Cannot render after structural error: {}", message);
        }
        self.commit().render_into(document, dependencies, selector)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Callback;
    use crate::result::UiErrorKind;
    use assertables::assert_contains;
    use expect_test::expect;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        OpenCol,
        OpenRow,
        EndCol,
        EndRow,
    }

    /// Reference model: a plain stack of container kinds.
    fn expected_close(model: &[ContainerKind], kind: ContainerKind) -> bool {
        model.last() == Some(&kind)
    }

    #[test]
    fn test_balanced_nesting_against_model() {
        use Op::*;
        let sequences: &[&[Op]] = &[
            &[OpenCol, EndCol],
            &[OpenCol, OpenRow, EndRow, EndCol],
            &[EndCol],
            &[EndRow],
            &[OpenCol, EndRow],
            &[OpenRow, EndCol],
            &[OpenCol, OpenRow, EndCol],
            &[OpenRow, OpenRow, EndRow, EndRow, EndRow],
            &[OpenCol, OpenCol, OpenRow, EndRow, EndCol, EndCol],
            &[OpenRow, EndRow, OpenCol, EndCol, OpenRow],
        ];
        for sequence in sequences {
            let mut builder = UiBuilder::new();
            let mut model: Vec<ContainerKind> = vec![];
            for op in *sequence {
                match op {
                    OpenCol => {
                        builder.col(0);
                        model.push(ContainerKind::Column);
                    }
                    OpenRow => {
                        builder.row(0);
                        model.push(ContainerKind::Row);
                    }
                    EndCol | EndRow => {
                        let kind = if matches!(op, EndCol) {
                            ContainerKind::Column
                        } else {
                            ContainerKind::Row
                        };
                        let should_succeed = expected_close(&model, kind);
                        let depth_before = builder.depth();
                        let result = match kind {
                            ContainerKind::Column => builder.end_col().map(|_| ()),
                            ContainerKind::Row => builder.end_row().map(|_| ()),
                        };
                        assert_eq!(result.is_ok(), should_succeed, "{:?} in {:?}", op, sequence);
                        if should_succeed {
                            model.pop();
                            assert_eq!(builder.depth(), depth_before - 1);
                        } else {
                            assert!(result.unwrap_err().is_structural());
                            assert_eq!(builder.depth(), depth_before);
                            break;
                        }
                    }
                }
                assert_eq!(builder.depth(), model.len());
            }
        }
    }

    #[test]
    fn test_close_without_open() {
        let mut builder = UiBuilder::new();
        let error = builder.end_col().unwrap_err();
        assert_eq!(
            error.kind(),
            &UiErrorKind::Structural("end_col() called without matching col()".to_string())
        );
    }

    #[test]
    fn test_close_kind_mismatch() {
        let mut builder = UiBuilder::new();
        builder.col(0);
        let error = builder.end_row().unwrap_err();
        assert_contains!(
            error.to_string(),
            "end_row() called but current container is 'column'"
        );
    }

    #[test]
    fn test_mismatch_poisons_builder() {
        let mut builder = UiBuilder::new();
        builder.col(0).text("lost", TextLevel::P);
        assert!(builder.end_row().is_err());
        assert!(builder.is_poisoned());
        builder.separator().row(4);
        assert_eq!(builder.depth(), 1);
        assert!(builder.end_row().unwrap_err().is_structural());
        assert!(builder.commit().is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let mut builder = UiBuilder::new();
        builder
            .text("first", TextLevel::H1)
            .row(8)
            .button("a", false, ButtonVariant::Solid, None)
            .button("b", true, ButtonVariant::Flat, None)
            .end_row()
            .unwrap()
            .separator()
            .text("last", TextLevel::P);
        let tree = builder.commit();
        let types: Vec<&str> = tree.nodes().iter().map(NodeDescriptor::type_name).collect();
        assert_eq!(types, vec!["text", "row", "separator", "text"]);
        let labels: Vec<&str> = tree.nodes()[1]
            .children()
            .iter()
            .map(|child| match child {
                NodeDescriptor::Button(button) => button.label.as_str(),
                _ => "?",
            })
            .collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn test_commit_closes_open_containers() {
        let mut builder = col(12);
        builder
            .row(4)
            .checkbox("keep", true, false, None)
            .col(0)
            .text("deep", TextLevel::Code);
        assert_eq!(builder.depth(), 3);
        let tree = builder.commit();
        assert_eq!(builder.depth(), 0);
        expect![[r#"
            root
            └── column gap=12
                └── row gap=4
                    ├── checkbox "keep" checked
                    └── column gap=0
                        └── code "deep"
        "#]]
        .assert_eq(&tree.print_tree());
        assert!(builder.commit().is_empty());
    }

    #[test]
    fn test_leaf_arguments_stored() {
        let clicked = Callback::new(|()| {});
        let mut builder = row(0);
        builder
            .button("Go", false, ButtonVariant::Outlined, Some(clicked.clone()))
            .input(InputType::Email, "you@example.com", "", true, None)
            .alert("Careful", AlertType::Warning, Some(""))
            .alert("Broken", AlertType::Error, Some("Oops"))
            .img("cat.png", None)
            .img("dog.png", Some("A dog"))
            .select(
                vec![SelectOption::new("a", "Alpha"), SelectOption::new("b", "Beta")],
                "b",
                "Pick one",
                false,
                Some(Callback::new(|_value: String| {})),
            );
        let tree = builder.commit();
        expect![[r#"
            root
            └── row gap=0
                ├── button "Go" outlined @
                ├── input email "" placeholder="you@example.com" disabled
                ├── alert warning "Careful"
                ├── alert error "Broken" title="Oops"
                ├── image "cat.png"
                ├── image "dog.png" alt="A dog"
                └── select "b" @
                    ├── option "a" "Alpha"
                    └── option "b" "Beta"
        "#]]
        .assert_eq(&tree.print_tree());
        let NodeDescriptor::Button(button) = &tree.nodes()[0].children()[0] else {
            panic!("expected button");
        };
        assert!(button
            .on_click
            .as_ref()
            .is_some_and(|stored| stored.ptr_eq(&clicked)));
    }

    #[test]
    fn test_builder_never_invokes_callbacks() {
        use std::cell::Cell;
        use std::rc::Rc;
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut builder = UiBuilder::new();
        builder.checkbox(
            "x",
            false,
            false,
            Some(Callback::new(move |_| counter.set(counter.get() + 1))),
        );
        builder.commit();
        assert_eq!(calls.get(), 0);
    }
}
