//! XML pipeline (`quick-xml` with serde support).
//!
//! Strict mode adds a full well-formedness pass over the document with end
//! tag and comment checking enabled before it is deserialized.

use std::io::Read;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;

use super::{decode_reader, decode_slice, Codec, Format};
use crate::error::{DeserializeError, DeserializeResult};
use crate::options::Options;
use crate::validate::Destination;

pub(crate) struct Xml;

impl Codec for Xml {
    const FORMAT: Format = Format::Xml;

    fn decode<T: DeserializeOwned>(data: &[u8], options: &Options) -> DeserializeResult<T> {
        let text =
            std::str::from_utf8(data).map_err(|err| DeserializeError::decode(Format::Xml, err))?;

        if options.strict_mode() {
            check_well_formed(data)?;
        }

        quick_xml::de::from_str(text).map_err(|err| DeserializeError::decode(Format::Xml, err))
    }
}

fn check_well_formed(data: &[u8]) -> DeserializeResult<()> {
    let mut reader = Reader::from_reader(data);
    let config = reader.config_mut();
    config.check_end_names = true;
    config.check_comments = true;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => return Ok(()),
            Ok(_) => {}
            Err(err) => return Err(DeserializeError::decode(Format::Xml, err)),
        }
        buf.clear();
    }
}

/// Decode XML bytes into `dest`.
pub fn xml<D>(data: &[u8], dest: D, options: &Options) -> DeserializeResult<()>
where
    D: Destination,
    D::Value: DeserializeOwned,
{
    decode_slice::<Xml, D>(data, dest, options)
}

/// Decode XML from a reader into `dest`, reading at most `max_size + 1` bytes.
pub fn xml_reader<D, R>(reader: R, dest: D, options: &Options) -> DeserializeResult<()>
where
    D: Destination,
    D::Value: DeserializeOwned,
    R: Read,
{
    decode_reader::<Xml, D, R>(reader, dest, options)
}
