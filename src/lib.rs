pub mod builder;
pub mod config;
pub mod document;
pub mod loader;
pub mod logging;
pub mod nodes;
pub mod render;
pub mod result;
pub mod types;

pub use builder::{col, row, UiBuilder, UiTree};
pub use config::LoaderConfig;
pub use document::{Document, MemoryDocument};
pub use loader::{DependencyCache, WidgetKind};
pub use result::{UiError, UiErrorKind, UiResult};
