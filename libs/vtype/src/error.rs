use std::borrow::Cow;

use crate::scalar::ScalarKind;

/// Error type returned by custom hooks (`TextCodec`, `Setter`, `Callback`).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Leaf kind of a conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Codec,
    Setter,
    Callback,
    Unsupported,
    NotIndirectable,
}

/// Why a conversion failed.
#[derive(Debug, thiserror::Error)]
pub enum Cause {
    #[error("parse {kind} from {raw:?}: {source}")]
    ParseFailure {
        kind: ScalarKind,
        raw: String,
        source: BoxError,
    },

    #[error("text codec: {0}")]
    CodecFailure(#[source] BoxError),

    #[error("setter: {0}")]
    SetterFailure(#[source] BoxError),

    #[error("callback: {0}")]
    CallbackFailure(#[source] BoxError),

    #[error("unsupported type")]
    UnsupportedType,

    #[error("not indirectable: empty layer around a value that cannot be materialized")]
    NotIndirectable,

    /// Failure of one element inside a sequence conversion.
    #[error("element {index}: {source}")]
    Element {
        index: usize,
        source: Box<ConvertError>,
    },
}

impl Cause {
    /// Leaf kind, looking through `Element` wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Cause::ParseFailure { .. } => ErrorKind::Parse,
            Cause::CodecFailure(_) => ErrorKind::Codec,
            Cause::SetterFailure(_) => ErrorKind::Setter,
            Cause::CallbackFailure(_) => ErrorKind::Callback,
            Cause::UnsupportedType => ErrorKind::Unsupported,
            Cause::NotIndirectable => ErrorKind::NotIndirectable,
            Cause::Element { source, .. } => source.kind(),
        }
    }
}

/// Conversion error, wrapped with the destination's type.
///
/// Produces: `"vtype: convert (type: i32): parse i32 from \"x\": ..."`.
#[derive(Debug, thiserror::Error)]
#[error("vtype: convert (type: {type_name}): {cause}")]
pub struct ConvertError {
    type_name: Cow<'static, str>,
    #[source]
    cause: Cause,
}

impl ConvertError {
    pub fn new(type_name: impl Into<Cow<'static, str>>, cause: Cause) -> Self {
        Self {
            type_name: type_name.into(),
            cause,
        }
    }

    /// Display name of the destination that failed to convert.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    pub fn kind(&self) -> ErrorKind {
        self.cause.kind()
    }

    /// Re-wrap an element failure with the enclosing sequence's identity.
    pub fn in_sequence(self, sequence_type: impl Into<Cow<'static, str>>, index: usize) -> Self {
        Self::new(
            sequence_type,
            Cause::Element {
                index,
                source: Box::new(self),
            },
        )
    }
}

/// Configuration loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Parse(#[from] toml::de::Error),
}
