//! Guarded deserialization for untrusted input (CWE-502).
//!
//! This crate wraps `serde_json`, `serde_yaml`, `quick-xml` and `bincode`
//! with a fixed sequence of checks that run before any decoder touches the
//! input:
//!
//! - Empty and oversized input is rejected
//! - Destinations that would let the input choose its own runtime shape
//!   (`serde_json::Value`, maps of dynamic values, ...) are rejected
//! - Record fields are scanned recursively for the same shapes in strict mode
//! - An optional whitelist restricts destination types
//! - JSON nesting depth is bounded in strict mode
//! - Unknown fields are rejected in strict mode (JSON, YAML)
//!
//! # Quick Start
//!
//! ```
//! use safe_deserialize::{shaped, Decoder, ErrorKind, OptionOverride, TypeRegistry};
//! use serde::Deserialize;
//!
//! shaped! {
//!     #[derive(Debug, Default, Deserialize)]
//!     pub struct User {
//!         pub id: u64,
//!         pub name: String,
//!         pub email: String,
//!     }
//! }
//!
//! let registry = TypeRegistry::new();
//! registry.register_type::<User>();
//!
//! let decoder = Decoder::new([registry.as_option(), OptionOverride::MaxSize(4096)]);
//!
//! let mut user = User::default();
//! decoder.json(br#"{"id":1,"name":"a","email":"a@b.c"}"#, &mut user)?;
//! assert_eq!(user.name, "a");
//!
//! let mut anything = serde_json::Value::Null;
//! let err = decoder.json(b"{}", &mut anything).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InterfaceTarget);
//! # Ok::<(), safe_deserialize::DeserializeError>(())
//! ```
//!
//! # Destinations
//!
//! Decoding writes through a [`Destination`]: `&mut T`, or `Option<&mut T>`
//! where `None` is rejected as a null destination. `T` must implement
//! [`Shaped`]; use the [`shaped!`] macro for your own records.
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `SAFE_DESERIALIZE_MAX_SIZE` | Max input size in bytes (default: 1 MiB) |
//! | `SAFE_DESERIALIZE_MAX_DEPTH` | Max JSON nesting depth (default: 32) |
//! | `SAFE_DESERIALIZE_STRICT` | Strict mode (default: true) |
//! | `SAFE_DESERIALIZE_ALLOWED_TYPES` | Comma-separated type whitelist |
//! | `SAFE_DESERIALIZE_ALLOW_DYNAMIC_MAPS` | Permit maps with dynamic values |
//! | `SAFE_DESERIALIZE_ALLOW_DYNAMIC_SLICES` | Permit sequences of dynamic elements |
//!
//! Environment variables are only read by [`Options::from_env`].

pub mod decoder;
pub mod depth;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod registry;
pub mod shape;
pub mod validate;

pub use decoder::Decoder;
pub use depth::measure_depth;
pub use error::{DeserializeError, DeserializeResult, ErrorKind};
pub use options::{OptionOverride, Options, DEFAULT_MAX_DEPTH, DEFAULT_MAX_SIZE};
pub use pipeline::{
    binary, binary_reader, json, json_reader, xml, xml_reader, yaml, yaml_reader, Format,
};
pub use registry::TypeRegistry;
pub use shape::{Field, Kind, Shape, ShapeFn, Shaped};
pub use validate::{scan_fields, validate_target, validate_type, Destination, TargetRef};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
