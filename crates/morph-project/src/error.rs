use std::io;

use camino::Utf8PathBuf;
use morph_syntax::SyntaxKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A named or predicated lookup found nothing.
    #[error("{message}")]
    NotFound { message: String },
    #[error("attempted to use a {kind:?} node that was removed or forgotten")]
    InvalidatedNode { kind: SyntaxKind },
    #[error("the declarations of symbol '{name}' no longer exist")]
    StaleSymbol { name: String },
    #[error("index {index} is out of range, expected at most {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("a source file already exists at `{path}`")]
    FileAlreadyExists { path: Utf8PathBuf },
    #[error("no source file exists at `{path}`")]
    FileNotFound { path: Utf8PathBuf },
    #[error("{message}")]
    InvalidManipulation { message: String },
    #[error("{message}")]
    InvariantViolation { message: String },
    #[error("failed to access `{path}`")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Coarse classes of failure, each with its own recovery story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Recoverable; the plain accessor returns `None` instead.
    NotFound,
    /// The wrapper must be re-acquired from a live ancestor or the file.
    InvalidatedNodeAccess,
    /// Rejected before any text changed.
    InvalidManipulationRequest,
    StructuralInvariantViolation,
    Io,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidatedNode { .. } | Self::StaleSymbol { .. } => {
                ErrorCategory::InvalidatedNodeAccess
            }
            Self::IndexOutOfRange { .. }
            | Self::FileAlreadyExists { .. }
            | Self::FileNotFound { .. }
            | Self::InvalidManipulation { .. } => ErrorCategory::InvalidManipulationRequest,
            Self::InvariantViolation { .. } => ErrorCategory::StructuralInvariantViolation,
            Self::Io { .. } => ErrorCategory::Io,
        }
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { message: message.into() }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidManipulation { message: message.into() }
    }
}

/// Turns the `None` of a plain accessor into a descriptive [`Error::NotFound`].
pub(crate) trait OrNotFound<T> {
    fn or_not_found(self, message: impl FnOnce() -> String) -> Result<T>;
}

impl<T> OrNotFound<T> for Option<T> {
    fn or_not_found(self, message: impl FnOnce() -> String) -> Result<T> {
        self.ok_or_else(|| Error::not_found(message()))
    }
}

impl<T> OrNotFound<T> for Result<Option<T>> {
    fn or_not_found(self, message: impl FnOnce() -> String) -> Result<T> {
        self?.or_not_found(message)
    }
}
