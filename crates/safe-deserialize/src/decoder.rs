//! Reusable decoder with a fixed configuration.

use std::io::Read;

use serde::de::DeserializeOwned;

use crate::error::DeserializeResult;
use crate::options::{OptionOverride, Options};
use crate::pipeline;
use crate::validate::Destination;

/// Decoder bound to one [`Options`] snapshot.
///
/// The configuration is resolved once at construction. A whitelist taken
/// from a [`TypeRegistry`](crate::TypeRegistry) is a snapshot too; later
/// registrations are not seen by an existing decoder.
///
/// `Decoder` is `Send + Sync` and can be shared across threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoder {
    options: Options,
}

impl Decoder {
    /// Create a decoder from overrides applied on top of the defaults.
    pub fn new<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = OptionOverride>,
    {
        Self::with_options(Options::from_overrides(overrides))
    }

    pub fn with_options(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn json<D>(&self, data: &[u8], dest: D) -> DeserializeResult<()>
    where
        D: Destination,
        D::Value: DeserializeOwned,
    {
        pipeline::json(data, dest, &self.options)
    }

    pub fn json_reader<D, R>(&self, reader: R, dest: D) -> DeserializeResult<()>
    where
        D: Destination,
        D::Value: DeserializeOwned,
        R: Read,
    {
        pipeline::json_reader(reader, dest, &self.options)
    }

    pub fn yaml<D>(&self, data: &[u8], dest: D) -> DeserializeResult<()>
    where
        D: Destination,
        D::Value: DeserializeOwned,
    {
        pipeline::yaml(data, dest, &self.options)
    }

    pub fn yaml_reader<D, R>(&self, reader: R, dest: D) -> DeserializeResult<()>
    where
        D: Destination,
        D::Value: DeserializeOwned,
        R: Read,
    {
        pipeline::yaml_reader(reader, dest, &self.options)
    }

    pub fn xml<D>(&self, data: &[u8], dest: D) -> DeserializeResult<()>
    where
        D: Destination,
        D::Value: DeserializeOwned,
    {
        pipeline::xml(data, dest, &self.options)
    }

    pub fn xml_reader<D, R>(&self, reader: R, dest: D) -> DeserializeResult<()>
    where
        D: Destination,
        D::Value: DeserializeOwned,
        R: Read,
    {
        pipeline::xml_reader(reader, dest, &self.options)
    }

    pub fn binary<D>(&self, data: &[u8], dest: D) -> DeserializeResult<()>
    where
        D: Destination,
        D::Value: DeserializeOwned,
    {
        pipeline::binary(data, dest, &self.options)
    }

    pub fn binary_reader<D, R>(&self, reader: R, dest: D) -> DeserializeResult<()>
    where
        D: Destination,
        D::Value: DeserializeOwned,
        R: Read,
    {
        pipeline::binary_reader(reader, dest, &self.options)
    }
}
