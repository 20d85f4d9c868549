//! Guarded decode pipelines.
//!
//! Every format runs the same preamble before its decoder is called:
//!
//! 1. empty input is rejected
//! 2. input longer than `max_size` is rejected
//! 3. the destination is validated
//! 4. format-specific guards run (JSON depth in strict mode)
//! 5. the decoder runs, and only a complete value is written to the destination
//!
//! Stream entry points validate the destination, read at most
//! `max_size + 1` bytes and hand the buffer to the byte entry point, so an
//! oversized stream is reported as [`DeserializeError::DataTooLarge`].

mod binary;
mod json;
mod xml;
mod yaml;

use std::error::Error as StdError;
use std::fmt;
use std::io::Read;

use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use tracing::debug;

use crate::error::{DeserializeError, DeserializeResult};
use crate::options::Options;
use crate::validate::{validate_target, Destination};

pub use binary::{binary, binary_reader};
pub use json::{json, json_reader};
pub use xml::{xml, xml_reader};
pub use yaml::{yaml, yaml_reader};

/// Wire formats with a guarded pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Xml,
    Binary,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Xml => "XML",
            Self::Binary => "binary",
        })
    }
}

/// A format's decoder plus any pre-decode checks it needs.
pub(crate) trait Codec {
    const FORMAT: Format;

    /// Content checks that run after destination validation.
    fn guard(_data: &[u8], _options: &Options) -> DeserializeResult<()> {
        Ok(())
    }

    fn decode<T: DeserializeOwned>(data: &[u8], options: &Options) -> DeserializeResult<T>;
}

/// Byte entry point shared by all formats.
pub(crate) fn decode_slice<C, D>(
    data: &[u8],
    mut dest: D,
    options: &Options,
) -> DeserializeResult<()>
where
    C: Codec,
    D: Destination,
    D::Value: DeserializeOwned,
{
    debug!(
        format = %C::FORMAT,
        size = data.len(),
        strict = options.strict_mode(),
        "decoding"
    );

    if data.is_empty() {
        debug!(format = %C::FORMAT, "rejected empty input");
        return Err(DeserializeError::EmptyData);
    }

    if data.len() > options.max_size() {
        debug!(
            format = %C::FORMAT,
            size = data.len(),
            limit = options.max_size(),
            "rejected oversized input"
        );
        return Err(DeserializeError::DataTooLarge {
            size: data.len(),
            limit: options.max_size(),
        });
    }

    validate(C::FORMAT, &dest, options)?;
    C::guard(data, options)?;

    // Decoder messages quote the offending input, so only the kind is logged.
    let value = C::decode::<D::Value>(data, options).map_err(|err| {
        debug!(format = %C::FORMAT, kind = ?err.kind(), "decode failed");
        err
    })?;

    let slot = dest.slot().ok_or(DeserializeError::NilTarget)?;
    *slot = value;
    Ok(())
}

/// Stream entry point shared by all formats.
pub(crate) fn decode_reader<C, D, R>(
    reader: R,
    dest: D,
    options: &Options,
) -> DeserializeResult<()>
where
    C: Codec,
    D: Destination,
    D::Value: DeserializeOwned,
    R: Read,
{
    validate(C::FORMAT, &dest, options)?;
    let data = read_bounded(reader, options.max_size())?;
    decode_slice::<C, D>(&data, dest, options)
}

fn validate<D: Destination>(format: Format, dest: &D, options: &Options) -> DeserializeResult<()> {
    validate_target(dest.target(), options).map_err(|err| {
        debug!(format = %format, reason = %err, "rejected destination");
        err
    })
}

/// Read at most `limit + 1` bytes, enough to tell an oversized stream apart.
fn read_bounded<R: Read>(reader: R, limit: usize) -> DeserializeResult<Vec<u8>> {
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut data = Vec::new();
    reader.take(cap).read_to_end(&mut data)?;
    Ok(data)
}

/// Deserialize and fail on the first field the target type does not know.
pub(crate) fn reject_unknown<'de, T, D>(format: Format, deserializer: D) -> DeserializeResult<T>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
    D::Error: StdError + Send + Sync + 'static,
{
    let mut unknown: Option<String> = None;
    let value = serde_ignored::deserialize(deserializer, |path| {
        if unknown.is_none() {
            unknown = Some(path.to_string());
        }
    })
    .map_err(|err| DeserializeError::decode(format, err))?;

    match unknown {
        Some(path) => Err(DeserializeError::UnknownField { format, path }),
        None => Ok(value),
    }
}
