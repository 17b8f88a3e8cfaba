use serde::Deserialize;

use super::TransportError;
use super::params::ApiParameters;
use super::records::ResponseRecord;
use crate::domain::{Charset, DeliveryReport, MessageText, Phone, SendSms, SentMessage};

pub const SEND_COMMAND: &str = "send";

#[derive(Debug, Deserialize)]
struct SendLine {
    phone: String,
    id: String,
}

pub fn encode_send_params(request: &SendSms) -> ApiParameters {
    let phones = request
        .phones()
        .iter()
        .map(Phone::as_str)
        .collect::<Vec<_>>()
        .join(Phone::SEPARATOR);
    let options = request.options();

    ApiParameters::new()
        .with(Phone::FIELD, phones)
        .with(MessageText::FIELD, request.text().as_str())
        .with_opt(Charset::FIELD, options.charset.as_ref().map(Charset::as_str))
        .with_opt(DeliveryReport::FIELD, options.rep.map(DeliveryReport::as_i64))
}

pub fn decode_send_records(records: &[ResponseRecord]) -> Result<Vec<SentMessage>, TransportError> {
    records
        .iter()
        .enumerate()
        .map(|(line, record)| {
            let parsed: SendLine = record
                .deserialize()
                .map_err(|source| TransportError::Record { line, source })?;
            Ok(SentMessage {
                phone: parsed.phone,
                id: parsed.id,
            })
        })
        .collect()
}
