//! Transport layer: query-string encoding and the line-oriented answer format.

mod params;
mod records;
mod send;
mod status;

pub use params::{ApiParameters, ParamValue};
pub use records::{ResponseRecord, parse_records};
pub use send::{SEND_COMMAND, decode_send_records, encode_send_params};
pub use status::{STATUS_COMMAND, decode_status_records, encode_status_params};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("cannot read response line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: serde::de::value::Error,
    },
}
