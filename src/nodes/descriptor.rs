use crate::nodes::types::{CheckedCallback, ClickCallback, ValueCallback};
use crate::types::{AlertType, ButtonVariant, InputType, SelectOption, TextLevel};
use std::fmt::{Display, Formatter};
use termtree::Tree;

/// One UI element to be rendered.
///
/// The variant set is closed: the renderer matches on it exhaustively, so a
/// new widget kind does not compile until every match handles it.
#[derive(Debug, Clone)]
pub enum NodeDescriptor {
    Column(Container),
    Row(Container),
    Button(ButtonNode),
    Input(InputNode),
    Text(TextNode),
    Alert(AlertNode),
    Image(ImageNode),
    Checkbox(CheckboxNode),
    Select(SelectNode),
    Separator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Column,
    Row,
}

impl ContainerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Column => "column",
            Self::Row => "row",
        }
    }
}

impl Display for ContainerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Container {
    pub gap_px: u32,
    pub children: Vec<NodeDescriptor>,
}

#[derive(Debug, Clone)]
pub struct ButtonNode {
    pub label: String,
    pub disabled: bool,
    pub variant: ButtonVariant,
    pub on_click: Option<ClickCallback>,
}

#[derive(Debug, Clone)]
pub struct InputNode {
    pub input_type: InputType,
    pub placeholder: String,
    pub value: String,
    pub disabled: bool,
    pub on_change: Option<ValueCallback>,
}

#[derive(Debug, Clone)]
pub struct TextNode {
    pub text: String,
    pub level: TextLevel,
}

#[derive(Debug, Clone)]
pub struct AlertNode {
    pub text: String,
    pub alert_type: AlertType,
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImageNode {
    pub src: String,
    pub alt: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CheckboxNode {
    pub label: String,
    pub checked: bool,
    pub disabled: bool,
    pub on_change: Option<CheckedCallback>,
}

#[derive(Debug, Clone)]
pub struct SelectNode {
    pub options: Vec<SelectOption>,
    pub value: String,
    pub placeholder: String,
    pub disabled: bool,
    pub on_change: Option<ValueCallback>,
}

impl NodeDescriptor {
    pub fn container(kind: ContainerKind, container: Container) -> Self {
        match kind {
            ContainerKind::Column => Self::Column(container),
            ContainerKind::Row => Self::Row(container),
        }
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Self::Column(_) => Some(ContainerKind::Column),
            Self::Row(_) => Some(ContainerKind::Row),
            _ => None,
        }
    }

    pub fn children(&self) -> &[NodeDescriptor] {
        match self {
            Self::Column(container) | Self::Row(container) => &container.children,
            _ => &[],
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Column(_) => "column",
            Self::Row(_) => "row",
            Self::Button(_) => "button",
            Self::Input(_) => "input",
            Self::Text(_) => "text",
            Self::Alert(_) => "alert",
            Self::Image(_) => "image",
            Self::Checkbox(_) => "checkbox",
            Self::Select(_) => "select",
            Self::Separator => "separator",
        }
    }
}

/// Render a descriptor forest as an indented text tree.
pub fn print_nodes(nodes: &[NodeDescriptor]) -> String {
    let mut tree = Tree::new("root".to_string());
    for node in nodes {
        tree.push(node_to_tree(node));
    }
    format!("{}", tree)
}

fn handler_marker<T>(handler: &Option<T>) -> &'static str {
    if handler.is_some() {
        " @"
    } else {
        ""
    }
}

fn node_to_tree(node: &NodeDescriptor) -> Tree<String> {
    let label = match node {
        NodeDescriptor::Column(container) | NodeDescriptor::Row(container) => {
            let mut tree = Tree::new(format!("{} gap={}", node.type_name(), container.gap_px));
            for child in &container.children {
                tree.push(node_to_tree(child));
            }
            return tree;
        }
        NodeDescriptor::Button(button) => format!(
            "button {:?} {}{}{}",
            button.label,
            button.variant,
            if button.disabled { " disabled" } else { "" },
            handler_marker(&button.on_click)
        ),
        NodeDescriptor::Input(input) => format!(
            "input {} {:?} placeholder={:?}{}{}",
            input.input_type,
            input.value,
            input.placeholder,
            if input.disabled { " disabled" } else { "" },
            handler_marker(&input.on_change)
        ),
        NodeDescriptor::Text(text) => format!("{} {:?}", text.level, text.text),
        NodeDescriptor::Alert(alert) => match &alert.title {
            Some(title) => format!("alert {} {:?} title={:?}", alert.alert_type, alert.text, title),
            None => format!("alert {} {:?}", alert.alert_type, alert.text),
        },
        NodeDescriptor::Image(image) => match &image.alt {
            Some(alt) => format!("image {:?} alt={:?}", image.src, alt),
            None => format!("image {:?}", image.src),
        },
        NodeDescriptor::Checkbox(checkbox) => format!(
            "checkbox {:?}{}{}{}",
            checkbox.label,
            if checkbox.checked { " checked" } else { "" },
            if checkbox.disabled { " disabled" } else { "" },
            handler_marker(&checkbox.on_change)
        ),
        NodeDescriptor::Select(select) => {
            let mut tree = Tree::new(format!(
                "select {:?}{}{}",
                select.value,
                if select.disabled { " disabled" } else { "" },
                handler_marker(&select.on_change)
            ));
            for option in &select.options {
                tree.push(Tree::new(format!("option {:?} {:?}", option.value, option.label)));
            }
            return tree;
        }
        NodeDescriptor::Separator => "separator".to_string(),
    };
    Tree::new(label)
}
