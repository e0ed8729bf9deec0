//! Error enum
use std::fmt;
use std::path::PathBuf;

use quick_xml::events::attributes::AttrError;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Xml(quick_xml::Error),
    Structure(StructureError),
    /// Conversations that were never closed by an author block.
    Alignment { unlabeled: usize },
    Cache(CacheError),
    AvroError(avro_rs::Error),
    Serde(serde_json::Error),
    Custom(String),
}

/// Fatal problems in the markup layout or its attributes.
///
/// `position` is the byte offset of the offending element in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    MissingAttribute {
        attribute: &'static str,
        position: u64,
    },
    UnknownCategory {
        attribute: &'static str,
        value: String,
        position: u64,
    },
    UnexpectedNesting {
        element: &'static str,
        parent: &'static str,
        position: u64,
    },
    UnclosedElement {
        element: &'static str,
    },
    /// Conversation text that is not valid UTF-8.
    InvalidText {
        position: u64,
    },
}

/// Problems with a cached corpus artifact.
///
/// These are never folded into an empty corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    Missing(PathBuf),
    Corrupt(String),
    VersionMismatch { expected: String, found: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Xml(e) => write!(f, "malformed markup: {e}"),
            Error::Structure(e) => write!(f, "{e}"),
            Error::Alignment { unlabeled } => write!(
                f,
                "{unlabeled} conversation(s) are not enclosed by any author block"
            ),
            Error::Cache(e) => write!(f, "{e}"),
            Error::AvroError(e) => write!(f, "avro error: {e}"),
            Error::Serde(e) => write!(f, "serialization error: {e}"),
            Error::Custom(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::MissingAttribute {
                attribute,
                position,
            } => write!(
                f,
                "author at byte {position} has no `{attribute}` attribute"
            ),
            StructureError::UnknownCategory {
                attribute,
                value,
                position,
            } => write!(
                f,
                "author at byte {position}: `{value}` is not a known `{attribute}` category"
            ),
            StructureError::UnexpectedNesting {
                element,
                parent,
                position,
            } => write!(
                f,
                "<{element}> at byte {position} cannot be nested in <{parent}>"
            ),
            StructureError::UnclosedElement { element } => {
                write!(f, "input ended inside an open <{element}>")
            }
            StructureError::InvalidText { position } => {
                write!(f, "conversation text at byte {position} is not valid UTF-8")
            }
        }
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Missing(p) => write!(f, "no cached corpus at {p:?}"),
            CacheError::Corrupt(reason) => write!(f, "cached corpus is unreadable: {reason}"),
            CacheError::VersionMismatch { expected, found } => write!(
                f,
                "cached corpus has an incompatible format (expected {expected}, found {found})"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Xml(e) => Some(e),
            Error::AvroError(e) => Some(e),
            Error::Serde(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Error {
        Error::Xml(e)
    }
}

impl From<AttrError> for Error {
    fn from(e: AttrError) -> Error {
        Error::Xml(e.into())
    }
}

impl From<StructureError> for Error {
    fn from(e: StructureError) -> Error {
        Error::Structure(e)
    }
}

impl From<CacheError> for Error {
    fn from(e: CacheError) -> Error {
        Error::Cache(e)
    }
}

impl From<avro_rs::Error> for Error {
    fn from(v: avro_rs::Error) -> Self {
        Self::AvroError(v)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}
