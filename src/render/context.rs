use crate::document::{Document, Listener, PropertyValue};
use crate::loader::{DependencyCache, WidgetKind};
use crate::render::styling::StyleDeclarations;
use crate::result::UiResult;

/// Borrowed state for one render pass: the target document and the
/// dependency cache of that document.
pub struct RenderContext<'a, D: Document> {
    document: &'a mut D,
    dependencies: &'a mut DependencyCache,
}

impl<'a, D: Document> RenderContext<'a, D> {
    pub fn new(document: &'a mut D, dependencies: &'a mut DependencyCache) -> Self {
        Self {
            document,
            dependencies,
        }
    }
}

impl<D: Document> RenderContext<'_, D> {
    pub fn ensure_base_styles(&mut self) -> UiResult<()> {
        self.dependencies.ensure_base_styles(self.document)
    }

    pub fn ensure_widget(&mut self, kind: WidgetKind) -> UiResult<()> {
        self.dependencies.ensure_widget(self.document, kind)
    }

    pub fn create_element(&mut self, tag: &str) -> UiResult<D::Node> {
        self.document.create_element(tag)
    }

    pub fn create_text_node(&mut self, text: &str) -> UiResult<D::Node> {
        self.document.create_text_node(text)
    }

    pub fn set_attribute(&mut self, node: &D::Node, name: &str, value: &str) -> UiResult<()> {
        self.document.set_attribute(node, name, value)
    }

    /// Set a boolean attribute: present (empty) when `enabled`, untouched otherwise.
    pub fn set_flag(&mut self, node: &D::Node, name: &str, enabled: bool) -> UiResult<()> {
        if enabled {
            self.document.set_attribute(node, name, "")?;
        }
        Ok(())
    }

    pub fn set_property(
        &mut self,
        node: &D::Node,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> UiResult<()> {
        self.document.set_property(node, name, value.into())
    }

    pub fn set_style(&mut self, node: &D::Node, property: &str, value: &str) -> UiResult<()> {
        self.document.set_style(node, property, value)
    }

    pub fn set_styles(&mut self, node: &D::Node, declarations: StyleDeclarations) -> UiResult<()> {
        for (property, value) in declarations {
            self.document.set_style(node, property, value)?;
        }
        Ok(())
    }

    pub fn set_text_content(&mut self, node: &D::Node, text: &str) -> UiResult<()> {
        self.document.set_text_content(node, text)
    }

    pub fn append_child(&mut self, parent: &D::Node, child: &D::Node) -> UiResult<()> {
        self.document.append_child(parent, child)
    }

    pub fn listen(&mut self, node: &D::Node, event: &str, listener: Listener) -> UiResult<()> {
        self.document.add_event_listener(node, event, listener)
    }
}
