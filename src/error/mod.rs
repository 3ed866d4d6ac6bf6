use std::error;
use std::fmt;
use std::io;

use backtrace::Backtrace;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    backtrace: Option<Backtrace>,
}

#[derive(Debug)]
pub enum ErrorKind {
    // Stored value or key could not be parsed back to its expected kind.
    InvalidFormat { description: String },
    // Structurally invalid filter expression.
    InvalidFilter { description: String },
    // Free-text term that can not be turned into a query.
    UnsupportedSearchTerm { term: String },
    // Live index introspection lacks a key the comparison relies on.
    ConfigurationMismatch { key: String },
    // Index name not declared in the configuration.
    UnknownIndex { name: String },
    Store(redis::RedisError),
    Io(io::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            ErrorKind::InvalidFormat { description } => {
                write!(f, "invalid format. {}", description)
            }
            ErrorKind::InvalidFilter { description } => {
                write!(f, "invalid filter. {}", description)
            }
            ErrorKind::UnsupportedSearchTerm { term } => {
                write!(f, "unsupported search term {:?}", term)
            }
            ErrorKind::ConfigurationMismatch { key } => {
                write!(f, "index introspection has no mapping for {:?}", key)
            }
            ErrorKind::UnknownIndex { name } => {
                write!(f, "index {:?} is not configured", name)
            }
            ErrorKind::Store(err) => err.fmt(f),
            ErrorKind::Io(err) => err.fmt(f),
            ErrorKind::Yaml(err) => err.fmt(f),
            ErrorKind::Json(err) => err.fmt(f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::with_backtrace(kind)
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::from(ErrorKind::Store(err))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::from(ErrorKind::Io(err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::from(ErrorKind::Yaml(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::from(ErrorKind::Json(err))
    }
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.backtrace.as_ref()
    }

    pub(crate) fn invalid_format(description: impl Into<String>) -> Self {
        Error::from(ErrorKind::InvalidFormat {
            description: description.into(),
        })
    }

    pub(crate) fn invalid_filter(description: impl Into<String>) -> Self {
        Error::from(ErrorKind::InvalidFilter {
            description: description.into(),
        })
    }

    pub(crate) fn configuration_mismatch(key: impl Into<String>) -> Self {
        Error::from(ErrorKind::ConfigurationMismatch { key: key.into() })
    }

    pub fn is_invalid_format(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidFormat { .. })
    }

    pub fn is_invalid_filter(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidFilter { .. })
    }

    pub fn is_unsupported_search_term(&self) -> bool {
        matches!(self.kind(), ErrorKind::UnsupportedSearchTerm { .. })
    }

    pub fn is_configuration_mismatch(&self) -> bool {
        matches!(self.kind(), ErrorKind::ConfigurationMismatch { .. })
    }

    pub fn is_unknown_index(&self) -> bool {
        matches!(self.kind(), ErrorKind::UnknownIndex { .. })
    }

    fn with_backtrace(kind: ErrorKind) -> Self {
        Self {
            kind,
            backtrace: Some(Backtrace::new()),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Store(err) => Some(err),
            ErrorKind::Io(err) => Some(err),
            ErrorKind::Yaml(err) => Some(err),
            ErrorKind::Json(err) => Some(err),
            _ => None,
        }
    }
}
