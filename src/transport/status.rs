use serde::Deserialize;

use super::TransportError;
use super::params::ApiParameters;
use super::records::ResponseRecord;
use crate::domain::{DeliveryStatus, ErrorCode, MessageId, MessageStatus, QueryStatus};

pub const STATUS_COMMAND: &str = "msg";

#[derive(Debug, Deserialize)]
struct StatusLine {
    phone: String,
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    err: String,
    #[serde(default)]
    err_msg: String,
}

pub fn encode_status_params(request: &QueryStatus) -> ApiParameters {
    ApiParameters::new().with(MessageId::FIELD, request.id().as_str())
}

pub fn decode_status_records(
    records: &[ResponseRecord],
) -> Result<Vec<MessageStatus>, TransportError> {
    records
        .iter()
        .enumerate()
        .map(|(line, record)| {
            let parsed: StatusLine = record
                .deserialize()
                .map_err(|source| TransportError::Record { line, source })?;
            Ok(MessageStatus {
                phone: parsed.phone,
                id: parsed.id,
                status: DeliveryStatus::new(parsed.status),
                err: ErrorCode::new(parsed.err),
                err_msg: parsed.err_msg,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::domain::KnownDeliveryStatus;
    use crate::transport::parse_records;

    use super::*;

    #[test]
    fn encode_status_params_uses_id() {
        let request = QueryStatus::new(MessageId::new("abc-1").unwrap());
        assert_eq!(encode_status_params(&request).to_query_string(), "id=abc-1");
    }

    #[test]
    fn decode_delivered_status() {
        let records = parse_records(
            "phone=79001234567&id=abc-1&status=3&err=0x00000000&err_msg=",
        );
        let statuses = decode_status_records(&records).unwrap();
        assert_eq!(statuses.len(), 1);

        let status = &statuses[0];
        assert_eq!(status.phone, "79001234567");
        assert_eq!(status.id, "abc-1");
        assert_eq!(status.status.as_str(), "3");
        assert_eq!(
            status.status.known_kind(),
            Some(KnownDeliveryStatus::DeliveryConfirmed)
        );
        assert_eq!(status.err.as_str(), "0x00000000");
        assert!(status.err.is_success());
        assert_eq!(status.err_msg, "");
    }

    #[test]
    fn decode_keeps_error_description() {
        let records = parse_records(
            "phone=79001234567&id=abc-1&status=2&err=0x0000001f&err_msg=Device+busy",
        );
        let statuses = decode_status_records(&records).unwrap();
        assert_eq!(
            statuses[0].status.known_kind(),
            Some(KnownDeliveryStatus::HandedToDevice)
        );
        assert_eq!(statuses[0].err.value(), Some(0x1f));
        assert_eq!(statuses[0].err_msg, "Device busy");
    }

    #[test]
    fn decode_defaults_optional_fields() {
        let records = parse_records("phone=79001234567&id=abc-1");
        let statuses = decode_status_records(&records).unwrap();
        assert_eq!(statuses[0].status.as_str(), "");
        assert_eq!(statuses[0].err_msg, "");
    }

    #[test]
    fn decode_rejects_line_without_id() {
        let records = parse_records("phone=79001234567&status=3");
        let err = decode_status_records(&records).unwrap_err();
        assert!(err.to_string().starts_with("cannot read response line 0"), "{err}");
    }
}
