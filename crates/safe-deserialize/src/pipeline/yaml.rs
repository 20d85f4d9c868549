//! YAML pipeline (`serde_yaml`).

use std::io::Read;

use serde::de::DeserializeOwned;

use super::{decode_reader, decode_slice, reject_unknown, Codec, Format};
use crate::error::{DeserializeError, DeserializeResult};
use crate::options::Options;
use crate::validate::Destination;

pub(crate) struct Yaml;

impl Codec for Yaml {
    const FORMAT: Format = Format::Yaml;

    fn decode<T: DeserializeOwned>(data: &[u8], options: &Options) -> DeserializeResult<T> {
        if options.strict_mode() {
            reject_unknown(Format::Yaml, serde_yaml::Deserializer::from_slice(data))
        } else {
            serde_yaml::from_slice(data).map_err(|err| DeserializeError::decode(Format::Yaml, err))
        }
    }
}

/// Decode YAML bytes into `dest`.
pub fn yaml<D>(data: &[u8], dest: D, options: &Options) -> DeserializeResult<()>
where
    D: Destination,
    D::Value: DeserializeOwned,
{
    decode_slice::<Yaml, D>(data, dest, options)
}

/// Decode YAML from a reader into `dest`, reading at most `max_size + 1` bytes.
pub fn yaml_reader<D, R>(reader: R, dest: D, options: &Options) -> DeserializeResult<()>
where
    D: Destination,
    D::Value: DeserializeOwned,
    R: Read,
{
    decode_reader::<Yaml, D, R>(reader, dest, options)
}
