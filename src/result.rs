use error_stack::Report;
use ron::de::SpannedError;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UiErrorKind {
    #[error("Structural Error: {0}")]
    Structural(String),
    #[error("Mount Not Found: element not found for selector '{selector}'")]
    MountNotFound { selector: String },
    #[error("Invalid Selector: {0}")]
    InvalidSelector(String),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("Host Document Error: {0}")]
    Host(String),
    #[error("General Error: {0}")]
    General(String),
}

#[derive(Debug)]
pub struct UiError(pub Report<UiErrorKind>);

impl Display for UiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl UiError {
    #[track_caller]
    pub fn new(error: UiErrorKind) -> UiError {
        UiError(Report::new(error))
    }

    #[track_caller]
    pub fn change_context<S: Into<String>>(self, message: S) -> Self {
        Self(self.0.change_context(UiErrorKind::General(message.into())))
    }

    pub fn kind(&self) -> &UiErrorKind {
        self.0.current_context()
    }

    pub fn is_structural(&self) -> bool {
        matches!(self.kind(), UiErrorKind::Structural(_))
    }

    pub fn is_mount_not_found(&self) -> bool {
        matches!(self.kind(), UiErrorKind::MountNotFound { .. })
    }
}

pub type UiResult<T> = Result<T, UiError>;

impl<T> From<T> for UiError
where
    for<'a> &'a T: Into<UiErrorKind>,
    T: Error + Send + Sync + 'static,
{
    #[track_caller]
    fn from(error: T) -> Self {
        let kind: UiErrorKind = (&error).into();
        let report = Report::new(error);
        let report = report.change_context(kind);
        Self(report)
    }
}

impl From<&std::io::Error> for UiErrorKind {
    #[track_caller]
    fn from(error: &std::io::Error) -> Self {
        Self::General(error.to_string())
    }
}

impl From<&serde_yml::Error> for UiErrorKind {
    #[track_caller]
    fn from(error: &serde_yml::Error) -> Self {
        Self::Config(format!("YAML Error: {}", error))
    }
}

impl From<&SpannedError> for UiErrorKind {
    #[track_caller]
    fn from(error: &SpannedError) -> Self {
        Self::Config(format!("RON Error: {}", error))
    }
}

/// Return early with an error of the given kind, e.g. `bail!(Structural, "...")`.
#[macro_export]
macro_rules! bail {
    ($kind:ident, $($args:tt)+) => {
        return Err($crate::err!($kind, $($args)+))
    };
}

#[macro_export]
macro_rules! err {
    ($kind:ident, $($args:tt)+) => {
        $crate::result::UiError::new($crate::result::UiErrorKind::$kind(format!($($args)+)))
    };
}

#[macro_export]
macro_rules! context {
    ($fmt:expr $(, $($args:expr),+)? => $block:block) => {
        {
            $block
        }.map_err(|e: $crate::result::UiError| e.change_context(format!(concat!("Failed to ",$fmt) $(, $($args)+)?)))
    };
}
pub use context;
