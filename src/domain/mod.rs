//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{QueryStatus, SendOptions, SendSms};
pub use response::{MessageStatus, SentMessage};
pub use validation::ValidationError;
pub use value::{
    Charset, DeliveryReport, DeliveryStatus, ErrorCode, KnownDeliveryStatus, Login, MessageId,
    MessageText, Password, Phone, PhoneNumber,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_rejects_empty() {
        assert!(matches!(
            Login::new("   "),
            Err(ValidationError::Empty {
                field: Login::FIELD
            })
        ));
    }

    #[test]
    fn phone_number_parses_with_region_and_trims() {
        let pn =
            PhoneNumber::parse(Some(phonenumber::country::Id::RU), " +7 925 123-45-67 ").unwrap();
        assert_eq!(pn.raw(), "+7 925 123-45-67");
        let phone: Phone = pn.into();
        assert_eq!(phone.as_str(), "79251234567");
    }

    #[test]
    fn send_sms_requires_recipients() {
        let text = MessageText::new("hi").unwrap();
        let err = SendSms::to_many(Vec::new(), text, SendOptions::default()).unwrap_err();
        assert_eq!(err, ValidationError::NoRecipients);
    }

    #[test]
    fn send_sms_keeps_recipient_order() {
        let phones = vec![
            Phone::new("79001234568").unwrap(),
            Phone::new("79001234567").unwrap(),
        ];
        let request = SendSms::to_many(
            phones.clone(),
            MessageText::new("hi").unwrap(),
            SendOptions::default(),
        )
        .unwrap();
        assert_eq!(request.phones(), phones.as_slice());
    }

    #[test]
    fn send_sms_to_one_uses_default_options() {
        let request = SendSms::to_one(
            Phone::new("79001234567").unwrap(),
            MessageText::new("hi").unwrap(),
        );
        assert_eq!(request.phones().len(), 1);
        assert!(request.options().charset.is_none());
        assert!(request.options().rep.is_none());

        let request = request.with_options(SendOptions {
            rep: Some(DeliveryReport::Request),
            ..Default::default()
        });
        assert_eq!(request.options().rep, Some(DeliveryReport::Request));
    }
}
