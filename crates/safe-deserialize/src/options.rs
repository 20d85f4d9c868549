//! Guard configuration.
//!
//! [`Options`] always starts from the defaults below; overrides are applied in
//! order and invalid values (zero size or depth) are ignored, leaving the
//! previous value in place.
//!
//! | Setting | Default |
//! |---------|---------|
//! | max size | 1 MiB |
//! | max depth | 32 |
//! | allowed types | empty (no whitelist) |
//! | strict mode | on |
//! | dynamic map values | rejected |
//! | dynamic slice elements | rejected |

use std::collections::BTreeSet;
use std::str::FromStr;

use tracing::warn;

/// Default maximum input size in bytes (1 MiB).
pub const DEFAULT_MAX_SIZE: usize = 1 << 20;

/// Default maximum nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Environment variables read by [`Options::from_env`].
pub const ENV_MAX_SIZE: &str = "SAFE_DESERIALIZE_MAX_SIZE";
pub const ENV_MAX_DEPTH: &str = "SAFE_DESERIALIZE_MAX_DEPTH";
pub const ENV_STRICT: &str = "SAFE_DESERIALIZE_STRICT";
pub const ENV_ALLOWED_TYPES: &str = "SAFE_DESERIALIZE_ALLOWED_TYPES";
pub const ENV_ALLOW_DYNAMIC_MAPS: &str = "SAFE_DESERIALIZE_ALLOW_DYNAMIC_MAPS";
pub const ENV_ALLOW_DYNAMIC_SLICES: &str = "SAFE_DESERIALIZE_ALLOW_DYNAMIC_SLICES";

/// Immutable guard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    max_size: usize,
    max_depth: usize,
    allowed_types: BTreeSet<String>,
    strict_mode: bool,
    allow_dynamic_map_values: bool,
    allow_dynamic_slice_elements: bool,
}

/// A single configuration override.
///
/// Lets option lists be built up front (or produced by a
/// [`TypeRegistry`](crate::TypeRegistry)) and applied later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionOverride {
    /// Maximum input size in bytes.
    MaxSize(usize),
    /// Maximum JSON nesting depth.
    MaxDepth(usize),
    /// Replaces the whole whitelist.
    AllowedTypes(Vec<String>),
    /// Reject fields the destination does not declare.
    StrictMode(bool),
    /// Permit maps whose values are dynamic.
    AllowDynamicMapValues(bool),
    /// Permit sequences whose elements are dynamic.
    AllowDynamicSliceElements(bool),
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            allowed_types: BTreeSet::new(),
            strict_mode: true,
            allow_dynamic_map_values: false,
            allow_dynamic_slice_elements: false,
        }
    }
}

impl Options {
    /// Apply overrides, in order, on top of the defaults.
    pub fn from_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = OptionOverride>,
    {
        overrides.into_iter().fold(Self::default(), Self::apply)
    }

    /// Build options from environment variables on top of the defaults.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `SAFE_DESERIALIZE_MAX_SIZE` | Max input size in bytes |
    /// | `SAFE_DESERIALIZE_MAX_DEPTH` | Max JSON nesting depth |
    /// | `SAFE_DESERIALIZE_STRICT` | Strict mode (`true`/`false`) |
    /// | `SAFE_DESERIALIZE_ALLOWED_TYPES` | Comma-separated type whitelist |
    /// | `SAFE_DESERIALIZE_ALLOW_DYNAMIC_MAPS` | Permit maps with dynamic values |
    /// | `SAFE_DESERIALIZE_ALLOW_DYNAMIC_SLICES` | Permit sequences of dynamic elements |
    ///
    /// Malformed values are logged and ignored.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Some(size) = env_value::<usize>(ENV_MAX_SIZE) {
            options = options.with_max_size(size);
        }
        if let Some(depth) = env_value::<usize>(ENV_MAX_DEPTH) {
            options = options.with_max_depth(depth);
        }
        if let Some(strict) = env_flag(ENV_STRICT) {
            options = options.with_strict_mode(strict);
        }
        if let Ok(raw) = std::env::var(ENV_ALLOWED_TYPES) {
            options = options.with_allowed_types(
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty()),
            );
        }
        if let Some(allow) = env_flag(ENV_ALLOW_DYNAMIC_MAPS) {
            options = options.with_allow_dynamic_map_values(allow);
        }
        if let Some(allow) = env_flag(ENV_ALLOW_DYNAMIC_SLICES) {
            options = options.with_allow_dynamic_slice_elements(allow);
        }

        options
    }

    /// Apply one override.
    pub fn apply(self, setting: OptionOverride) -> Self {
        match setting {
            OptionOverride::MaxSize(size) => self.with_max_size(size),
            OptionOverride::MaxDepth(depth) => self.with_max_depth(depth),
            OptionOverride::AllowedTypes(types) => self.with_allowed_types(types),
            OptionOverride::StrictMode(strict) => self.with_strict_mode(strict),
            OptionOverride::AllowDynamicMapValues(allow) => {
                self.with_allow_dynamic_map_values(allow)
            }
            OptionOverride::AllowDynamicSliceElements(allow) => {
                self.with_allow_dynamic_slice_elements(allow)
            }
        }
    }

    /// Set the maximum input size in bytes. Zero is ignored.
    pub fn with_max_size(mut self, size: usize) -> Self {
        if size > 0 {
            self.max_size = size;
        }
        self
    }

    /// Set the maximum nesting depth. Zero is ignored.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        if depth > 0 {
            self.max_depth = depth;
        }
        self
    }

    /// Replace the type whitelist. An empty list disables whitelisting.
    pub fn with_allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable strict mode.
    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Permit maps whose values are dynamic. Use with caution.
    pub fn with_allow_dynamic_map_values(mut self, allow: bool) -> Self {
        self.allow_dynamic_map_values = allow;
        self
    }

    /// Permit sequences whose elements are dynamic. Use with caution.
    pub fn with_allow_dynamic_slice_elements(mut self, allow: bool) -> Self {
        self.allow_dynamic_slice_elements = allow;
        self
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn allowed_types(&self) -> &BTreeSet<String> {
        &self.allowed_types
    }

    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    pub fn allows_dynamic_map_values(&self) -> bool {
        self.allow_dynamic_map_values
    }

    pub fn allows_dynamic_slice_elements(&self) -> bool {
        self.allow_dynamic_slice_elements
    }

    /// Whether `type_name` passes the whitelist (always true when it is empty).
    pub fn is_type_allowed(&self, type_name: &str) -> bool {
        self.allowed_types.is_empty() || self.allowed_types.contains(type_name)
    }
}

fn env_value<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring malformed option override");
            None
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(key, value = %raw, "ignoring malformed option override");
            None
        }
    }
}
