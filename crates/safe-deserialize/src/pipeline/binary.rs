//! Binary pipeline (`bincode`).
//!
//! bincode has no notion of unknown fields, so strict mode changes nothing
//! at decode time. The decoder's own allocation limit is tied to `max_size`
//! so a forged length prefix cannot request more memory than the input cap.

use std::io::Read;

use bincode::Options as BincodeOptions;
use serde::de::DeserializeOwned;

use super::{decode_reader, decode_slice, Codec, Format};
use crate::error::{DeserializeError, DeserializeResult};
use crate::options::Options;
use crate::validate::Destination;

pub(crate) struct Binary;

impl Codec for Binary {
    const FORMAT: Format = Format::Binary;

    fn decode<T: DeserializeOwned>(data: &[u8], options: &Options) -> DeserializeResult<T> {
        let limit = u64::try_from(options.max_size()).unwrap_or(u64::MAX);
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(limit)
            .deserialize(data)
            .map_err(|err| DeserializeError::decode(Format::Binary, err))
    }
}

/// Decode bincode bytes into `dest`.
///
/// The encoding matches `bincode::serialize` (fixed-width integers, little
/// endian).
pub fn binary<D>(data: &[u8], dest: D, options: &Options) -> DeserializeResult<()>
where
    D: Destination,
    D::Value: DeserializeOwned,
{
    decode_slice::<Binary, D>(data, dest, options)
}

/// Decode bincode from a reader into `dest`, reading at most `max_size + 1` bytes.
pub fn binary_reader<D, R>(reader: R, dest: D, options: &Options) -> DeserializeResult<()>
where
    D: Destination,
    D::Value: DeserializeOwned,
    R: Read,
{
    decode_reader::<Binary, D, R>(reader, dest, options)
}
