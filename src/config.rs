use crate::err;
use crate::result::{context, UiError, UiResult};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://app.autodeskforma.eu/design-system/v2";

/// Where the external component runtime is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    pub base_url: String,
    pub styles_path: String,
    pub components_dir: String,
    pub components: ComponentPaths,
}

/// Module path of every widget kind, relative to the components directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComponentPaths {
    pub button: String,
    pub input: String,
    pub banner: String,
    pub checkbox: String,
    pub select: String,
    pub toggle: String,
    pub slider: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            styles_path: "forma/styles/base.css".to_string(),
            components_dir: "weave/components".to_string(),
            components: ComponentPaths::default(),
        }
    }
}

impl Default for ComponentPaths {
    fn default() -> Self {
        Self {
            button: "button/weave-button.js".to_string(),
            input: "input/weave-input.js".to_string(),
            banner: "banner/weave-banner.js".to_string(),
            checkbox: "checkbox/weave-checkbox.js".to_string(),
            select: "dropdown/weave-select.js".to_string(),
            toggle: "toggle/weave-toggle.js".to_string(),
            slider: "slider/weave-slider.js".to_string(),
        }
    }
}

impl LoaderConfig {
    pub fn from_ron_str(source: &str) -> UiResult<Self> {
        Ok(ron::from_str(source)?)
    }

    pub fn from_yaml_str(source: &str) -> UiResult<Self> {
        Ok(serde_yml::from_str(source)?)
    }

    /// Load from a `.ron`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> UiResult<Self> {
        let path = path.as_ref();
        debug!("Loading loader config from '{}'", path.display());
        let source: String = context!("read loader config '{}'", path.display() => {
            std::fs::read_to_string(path).map_err(UiError::from)
        })?;
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("ron") => Self::from_ron_str(&source),
            Some("yaml" | "yml") => Self::from_yaml_str(&source),
            _ => Err(err!(
                Config,
                "Unsupported config file extension: '{}'",
                path.display()
            )),
        }
    }

    pub fn stylesheet_url(&self) -> String {
        join_url(&self.base_url, &self.styles_path)
    }

    pub fn component_url(&self, component_path: &str) -> String {
        join_url(&join_url(&self.base_url, &self.components_dir), component_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::UiErrorKind;
    use assertables::assert_contains;

    #[test]
    fn test_default_urls() {
        let config = LoaderConfig::default();
        assert_eq!(
            config.stylesheet_url(),
            "https://app.autodeskforma.eu/design-system/v2/forma/styles/base.css"
        );
        assert_eq!(
            config.component_url(&config.components.select),
            "https://app.autodeskforma.eu/design-system/v2/weave/components/dropdown/weave-select.js"
        );
    }

    #[test]
    fn test_from_ron_partial() {
        let config = LoaderConfig::from_ron_str(
            r#"(base_url: "http://localhost:8080/", components: (button: "custom/button.js"))"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/");
        assert_eq!(config.components.button, "custom/button.js");
        assert_eq!(config.components.input, "input/weave-input.js");
        assert_eq!(
            config.stylesheet_url(),
            "http://localhost:8080/forma/styles/base.css"
        );
    }

    #[test]
    fn test_from_yaml() {
        let config = LoaderConfig::from_yaml_str(
            "base_url: https://cdn.example.com/ds\nstyles_path: theme.css\n",
        )
        .unwrap();
        assert_eq!(config.stylesheet_url(), "https://cdn.example.com/ds/theme.css");
        assert_eq!(config.components, ComponentPaths::default());
    }

    #[test]
    fn test_from_ron_unknown_field() {
        let error = LoaderConfig::from_ron_str("(bogus: 1)").unwrap_err();
        assert!(matches!(error.kind(), UiErrorKind::Config(_)));
        assert_contains!(error.to_string(), "RON Error");
    }

    #[test]
    fn test_load_unsupported_extension() {
        let path = std::env::temp_dir().join("weave-ui-loader-config.txt");
        std::fs::write(&path, "").unwrap();
        let error = LoaderConfig::load(&path).unwrap_err();
        assert!(matches!(error.kind(), UiErrorKind::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let error = LoaderConfig::load("/definitely/not/here.ron").unwrap_err();
        assert_contains!(
            error.to_string(),
            "Failed to read loader config '/definitely/not/here.ron'"
        );
    }

    #[test]
    fn test_load_ron_file() {
        let path = std::env::temp_dir().join("weave-ui-loader-config.ron");
        std::fs::write(&path, r#"(components_dir: "wc")"#).unwrap();
        let config = LoaderConfig::load(&path).unwrap();
        assert_eq!(
            config.component_url("x.js"),
            format!("{}/wc/x.js", DEFAULT_BASE_URL)
        );
    }
}
