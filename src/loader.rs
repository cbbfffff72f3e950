use crate::config::LoaderConfig;
use crate::document::Document;
use crate::result::UiResult;
use log::{debug, info};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Widget implementations provided by the external component runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Button,
    Input,
    Banner,
    Checkbox,
    Select,
    Toggle,
    Slider,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 7] = [
        Self::Button,
        Self::Input,
        Self::Banner,
        Self::Checkbox,
        Self::Select,
        Self::Toggle,
        Self::Slider,
    ];

    pub fn component_path(self, config: &LoaderConfig) -> &str {
        let components = &config.components;
        match self {
            Self::Button => &components.button,
            Self::Input => &components.input,
            Self::Banner => &components.banner,
            Self::Checkbox => &components.checkbox,
            Self::Select => &components.select,
            Self::Toggle => &components.toggle,
            Self::Slider => &components.slider,
        }
    }
}

impl Display for WidgetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Button => "button",
            Self::Input => "input",
            Self::Banner => "banner",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::Toggle => "toggle",
            Self::Slider => "slider",
        })
    }
}

/// Record of the stylesheet and component scripts already injected into a
/// host document.
///
/// Create one per document (page) and keep it for as long as the document
/// lives. There is no reset. Loading is fire-and-forget: a tag is inserted
/// and nothing observes the network.
#[derive(Debug, Default)]
pub struct DependencyCache {
    config: LoaderConfig,
    base_styles_loaded: bool,
    loaded_scripts: HashSet<String>,
}

impl DependencyCache {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            base_styles_loaded: false,
            loaded_scripts: HashSet::new(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn base_styles_loaded(&self) -> bool {
        self.base_styles_loaded
    }

    pub fn is_component_loaded(&self, component_path: &str) -> bool {
        self.loaded_scripts.contains(component_path)
    }

    pub fn loaded_component_count(&self) -> usize {
        self.loaded_scripts.len()
    }

    pub fn ensure_base_styles<D: Document>(&mut self, document: &mut D) -> UiResult<()> {
        if self.base_styles_loaded {
            return Ok(());
        }
        self.base_styles_loaded = true;

        let href = self.config.stylesheet_url();
        info!("Injecting base stylesheet '{}'", href);
        let link = document.create_element("link")?;
        document.set_attribute(&link, "rel", "stylesheet")?;
        document.set_attribute(&link, "href", &href)?;
        let head = document.head()?;
        document.append_child(&head, &link)
    }

    pub fn ensure_component<D: Document>(
        &mut self,
        document: &mut D,
        component_path: &str,
    ) -> UiResult<()> {
        self.ensure_base_styles(document)?;

        if !self.loaded_scripts.insert(component_path.to_string()) {
            debug!("Component '{}' already requested", component_path);
            return Ok(());
        }

        let src = self.config.component_url(component_path);
        info!("Injecting component script '{}'", src);
        let script = document.create_element("script")?;
        document.set_attribute(&script, "type", "module")?;
        document.set_attribute(&script, "src", &src)?;
        let head = document.head()?;
        document.append_child(&head, &script)
    }

    pub fn ensure_widget<D: Document>(
        &mut self,
        document: &mut D,
        kind: WidgetKind,
    ) -> UiResult<()> {
        let component_path = kind.component_path(&self.config).to_string();
        self.ensure_component(document, &component_path)
    }
}
