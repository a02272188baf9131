//! Error types for the widget system.
//!
//! Construction problems ([`ToppingError`]) are programmer mistakes and are
//! returned to the caller. Everything else is recovered from close to where it
//! happens and only reaches the log.

use std::fmt;
use std::path::PathBuf;

/// Errors raised while constructing or attaching widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToppingError {
    /// No kind with this name is registered.
    UnknownKind {
        /// The requested kind name.
        kind: String,
    },

    /// A required construction argument was not supplied.
    MissingArgument {
        /// Kind being constructed.
        kind: String,
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// A construction argument had the wrong shape.
    InvalidArgument {
        /// Kind being constructed.
        kind: String,
        /// Name of the offending argument.
        argument: &'static str,
        /// Human readable description of what was expected.
        expected: &'static str,
    },

    /// A sibling with the same name already exists under the parent.
    DuplicateName {
        /// The colliding name.
        name: String,
    },

    /// The widget already has a parent or belongs to a tree.
    AlreadyAttached {
        /// Kind of the widget that was being attached.
        kind: String,
    },

    /// Attaching would make a widget its own ancestor.
    WouldCreateCycle,

    /// The operation needs a widget that belongs to this tree.
    NotAttached,
}

impl fmt::Display for ToppingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToppingError::UnknownKind { kind } => write!(f, "Unknown widget kind: {}", kind),
            ToppingError::MissingArgument { kind, argument } => {
                write!(f, "{} requires the '{}' argument", kind, argument)
            }
            ToppingError::InvalidArgument {
                kind,
                argument,
                expected,
            } => write!(f, "{}: argument '{}' must be {}", kind, argument, expected),
            ToppingError::DuplicateName { name } => {
                write!(f, "A sibling named '{}' already exists", name)
            }
            ToppingError::AlreadyAttached { kind } => {
                write!(f, "{} widget is already attached", kind)
            }
            ToppingError::WouldCreateCycle => {
                write!(f, "Cannot attach a widget below itself")
            }
            ToppingError::NotAttached => write!(f, "Widget does not belong to this tree"),
        }
    }
}

impl std::error::Error for ToppingError {}

/// Result type for widget construction.
pub type ToppingResult<T> = Result<T, ToppingError>;

/// A widget failed to produce its markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    /// Description of the failure.
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Render failed: {}", self.message)
    }
}

impl std::error::Error for RenderError {}

/// A value getter could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    /// Description of the failure.
    pub message: String,
}

impl ValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value getter failed: {}", self.message)
    }
}

impl std::error::Error for ValueError {}

/// Errors produced while turning an image input into an embeddable payload.
#[derive(Debug)]
pub enum ImageError {
    /// The input is not a path, encoded bytes or a bitmap.
    UnsupportedInput {
        /// Short description of what was received.
        found: &'static str,
    },

    /// The image file could not be read.
    Io {
        /// The path that failed to load.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Decoding, resizing or encoding failed.
    Processing {
        /// Description of the failure.
        message: String,
    },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::UnsupportedInput { found } => {
                write!(f, "Unsupported image input: {}", found)
            }
            ImageError::Io { path, source } => {
                write!(f, "IO error loading '{}': {}", path.display(), source)
            }
            ImageError::Processing { message } => write!(f, "Image processing failed: {}", message),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<image::ImageError> for ImageError {
    fn from(err: image::ImageError) -> Self {
        ImageError::Processing {
            message: err.to_string(),
        }
    }
}

/// Result type for image operations.
pub type ImageResult<T> = Result<T, ImageError>;
