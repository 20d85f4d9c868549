//! JSON pipeline (`serde_json`).
//!
//! The only format with a depth guard: in strict mode the input is scanned
//! with [`measure_depth`] before `serde_json` sees it.

use std::io::Read;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::{decode_reader, decode_slice, reject_unknown, Codec, Format};
use crate::depth::measure_depth;
use crate::error::{DeserializeError, DeserializeResult};
use crate::options::Options;
use crate::validate::Destination;

pub(crate) struct Json;

impl Codec for Json {
    const FORMAT: Format = Format::Json;

    fn guard(data: &[u8], options: &Options) -> DeserializeResult<()> {
        if !options.strict_mode() {
            return Ok(());
        }

        let depth = measure_depth(data);
        if depth > options.max_depth() {
            debug!(depth, limit = options.max_depth(), "rejected deeply nested JSON");
            return Err(DeserializeError::MaxDepthExceeded {
                depth,
                limit: options.max_depth(),
            });
        }
        Ok(())
    }

    fn decode<T: DeserializeOwned>(data: &[u8], options: &Options) -> DeserializeResult<T> {
        let mut de = serde_json::Deserializer::from_slice(data);
        let value = if options.strict_mode() {
            reject_unknown(Format::Json, &mut de)?
        } else {
            T::deserialize(&mut de).map_err(|err| DeserializeError::decode(Format::Json, err))?
        };
        de.end()
            .map_err(|err| DeserializeError::decode(Format::Json, err))?;
        Ok(value)
    }
}

/// Decode JSON bytes into `dest`.
///
/// ```
/// use safe_deserialize::{json, shaped, Options};
/// use serde::Deserialize;
///
/// shaped! {
///     #[derive(Debug, Default, Deserialize)]
///     pub struct User {
///         pub id: u64,
///         pub name: String,
///     }
/// }
///
/// let mut user = User::default();
/// json(br#"{"id": 7, "name": "ada"}"#, &mut user, &Options::default()).unwrap();
/// assert_eq!(user.id, 7);
///
/// let err = json(br#"{"id": 7, "name": "ada", "role": "admin"}"#, &mut user, &Options::default())
///     .unwrap_err();
/// assert!(err.kind().is_decode_failure());
/// ```
pub fn json<D>(data: &[u8], dest: D, options: &Options) -> DeserializeResult<()>
where
    D: Destination,
    D::Value: DeserializeOwned,
{
    decode_slice::<Json, D>(data, dest, options)
}

/// Decode JSON from a reader into `dest`, reading at most `max_size + 1` bytes.
pub fn json_reader<D, R>(reader: R, dest: D, options: &Options) -> DeserializeResult<()>
where
    D: Destination,
    D::Value: DeserializeOwned,
    R: Read,
{
    decode_reader::<Json, D, R>(reader, dest, options)
}
