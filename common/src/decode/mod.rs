//! Decoders turning resource bytes into key/value entries.
//!
//! Each file-backed [`crate::ResourceFormat`] has a [`Decoder`]. The
//! text-properties decoder honours the configured character encoding; the XML
//! decoder ignores it because the document declares its own.

use std::collections::BTreeMap;
use std::io::{self, Read};

use thiserror::Error;

use crate::error::ResolveError;

mod charset;
mod properties;
mod xml;

pub use charset::Charset;
pub use properties::PropertiesDecoder;
pub use xml::XmlPropertiesDecoder;

/// Decoded key/value pairs, ordered by key.
pub type Entries = BTreeMap<String, String>;

/// Failures raised while decoding a single resource.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The requested encoding label is unknown.
    #[error("unsupported character encoding `{name}`")]
    UnsupportedEncoding {
        /// The rejected label.
        name: String,
    },

    /// The bytes are not valid for the format or encoding.
    #[error("{reason}")]
    Malformed {
        /// Description of the problem.
        reason: String,
    },

    /// Reading the stream failed.
    #[error("failed to read resource stream")]
    Io(#[from] io::Error),
}

impl DecodeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Attach the resource path, producing a resolver error.
    #[must_use]
    pub fn at(self, path: &str) -> ResolveError {
        match self {
            Self::UnsupportedEncoding { name } => ResolveError::UnsupportedEncoding {
                name,
                path: path.to_owned(),
            },
            Self::Malformed { reason } => ResolveError::Decode {
                path: path.to_owned(),
                reason,
            },
            Self::Io(source) => ResolveError::Provider {
                path: path.to_owned(),
                source,
            },
        }
    }
}

/// Turns a resource stream into entries.
pub trait Decoder: Send + Sync {
    /// Decode `stream`, using `encoding` when the format relies on an
    /// externally supplied character set.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the encoding is unknown, the bytes are
    /// malformed, or the stream cannot be read.
    fn decode(&self, stream: &mut dyn Read, encoding: Option<&str>) -> Result<Entries, DecodeError>;
}

fn read_bytes(stream: &mut dyn Read) -> Result<Vec<u8>, DecodeError> {
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    Ok(bytes)
}
