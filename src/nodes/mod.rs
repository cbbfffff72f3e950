pub mod descriptor;
pub mod types;

pub use descriptor::{
    AlertNode, ButtonNode, CheckboxNode, Container, ContainerKind, ImageNode, InputNode,
    NodeDescriptor, SelectNode, TextNode,
};
pub use types::{Callback, CheckedCallback, ClickCallback, ValueCallback};
