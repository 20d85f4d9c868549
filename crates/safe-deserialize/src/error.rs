//! Error types for guarded deserialization.

use std::error::Error as StdError;

use crate::pipeline::Format;

/// Coarse classification of a [`DeserializeError`].
///
/// Field-level shape violations map onto the same kind as their top-level
/// counterpart, so a dynamic struct field reports [`ErrorKind::InterfaceTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input had zero bytes.
    EmptyData,
    /// Input exceeded the configured size limit.
    DataTooLarge,
    /// Destination was absent.
    NilTarget,
    /// Destination was not a mutable reference.
    NotPointer,
    /// Destination, or one of its fields, is a dynamic type.
    InterfaceTarget,
    /// Destination, or one of its fields, is a map with dynamic values.
    MapInterfaceTarget,
    /// Destination, or one of its fields, is a sequence of dynamic elements.
    SliceInterfaceTarget,
    /// Destination type is missing from a non-empty whitelist.
    TypeNotAllowed,
    /// JSON nesting went past the depth limit.
    MaxDepthExceeded,
    /// Reading from the input stream failed.
    Read,
    /// The format decoder rejected the input.
    Decode,
}

impl ErrorKind {
    /// Input was rejected by a resource limit before decoding.
    pub fn is_limit_violation(self) -> bool {
        matches!(
            self,
            Self::EmptyData | Self::DataTooLarge | Self::MaxDepthExceeded
        )
    }

    /// The destination's type shape was rejected.
    pub fn is_target_rejection(self) -> bool {
        matches!(
            self,
            Self::NilTarget
                | Self::NotPointer
                | Self::InterfaceTarget
                | Self::MapInterfaceTarget
                | Self::SliceInterfaceTarget
                | Self::TypeNotAllowed
        )
    }

    /// The external decoder failed (malformed input or unknown field).
    pub fn is_decode_failure(self) -> bool {
        matches!(self, Self::Decode)
    }
}

/// Errors returned by the guarded decode pipelines.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    /// Input had zero bytes.
    #[error("input data is empty")]
    EmptyData,

    /// Input is larger than the size limit.
    #[error("data exceeds maximum allowed size: size {size} exceeds limit {limit}")]
    DataTooLarge { size: usize, limit: usize },

    /// Destination was absent.
    #[error("destination cannot be null")]
    NilTarget,

    /// Destination was not a mutable reference.
    #[error("destination must be a mutable reference")]
    NotPointer,

    /// Destination is a dynamic type.
    #[error("cannot deserialize into dynamic type {type_name}; use a concrete type")]
    InterfaceTarget { type_name: String },

    /// Destination is a map with dynamic values.
    #[error("cannot deserialize into map with dynamic values: {type_name}")]
    MapInterfaceTarget { type_name: String },

    /// Destination is a sequence of dynamic elements.
    #[error("cannot deserialize into sequence of dynamic elements: {type_name}")]
    SliceInterfaceTarget { type_name: String },

    /// A record field is a dynamic type.
    #[error("struct field {record}.{field} is a dynamic type")]
    DynamicField { record: String, field: String },

    /// A record field is a map with dynamic values.
    #[error("struct field {record}.{field} contains a map with dynamic values")]
    DynamicMapField { record: String, field: String },

    /// A record field is a sequence of dynamic elements.
    #[error("struct field {record}.{field} is a sequence of dynamic elements")]
    DynamicSliceField { record: String, field: String },

    /// Destination type is not whitelisted.
    #[error("type not in allowed types list: {type_name}")]
    TypeNotAllowed { type_name: String },

    /// JSON nesting is deeper than the depth limit.
    #[error("maximum nesting depth exceeded: depth {depth} exceeds limit {limit}")]
    MaxDepthExceeded { depth: usize, limit: usize },

    /// Reading from the input stream failed.
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),

    /// The format decoder rejected the input.
    #[error("{format} decode error: {source}")]
    Decode {
        format: Format,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Strict mode found a field the destination does not declare.
    #[error("{format} decode error: unknown field `{path}`")]
    UnknownField { format: Format, path: String },
}

impl DeserializeError {
    /// Wrap an external decoder failure.
    pub(crate) fn decode<E>(format: Format, err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Decode {
            format,
            source: err.into(),
        }
    }

    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyData => ErrorKind::EmptyData,
            Self::DataTooLarge { .. } => ErrorKind::DataTooLarge,
            Self::NilTarget => ErrorKind::NilTarget,
            Self::NotPointer => ErrorKind::NotPointer,
            Self::InterfaceTarget { .. } | Self::DynamicField { .. } => ErrorKind::InterfaceTarget,
            Self::MapInterfaceTarget { .. } | Self::DynamicMapField { .. } => {
                ErrorKind::MapInterfaceTarget
            }
            Self::SliceInterfaceTarget { .. } | Self::DynamicSliceField { .. } => {
                ErrorKind::SliceInterfaceTarget
            }
            Self::TypeNotAllowed { .. } => ErrorKind::TypeNotAllowed,
            Self::MaxDepthExceeded { .. } => ErrorKind::MaxDepthExceeded,
            Self::Read(_) => ErrorKind::Read,
            Self::Decode { .. } | Self::UnknownField { .. } => ErrorKind::Decode,
        }
    }

    /// Format whose decoder produced the error, if any.
    pub fn format(&self) -> Option<Format> {
        match self {
            Self::Decode { format, .. } | Self::UnknownField { format, .. } => Some(*format),
            _ => None,
        }
    }
}

/// Result type for guarded deserialization.
pub type DeserializeResult<T> = Result<T, DeserializeError>;
