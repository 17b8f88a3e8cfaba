use crate::domain::validation::ValidationError;
use crate::domain::value::{Charset, DeliveryReport, MessageId, MessageText, Phone};

#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub charset: Option<Charset>,
    pub rep: Option<DeliveryReport>,
}

/// `cmd=send`: one text to one or many recipients.
///
/// Recipient order is kept; the gateway answers with one line per phone in
/// the same order.
#[derive(Debug, Clone)]
pub struct SendSms {
    phones: Vec<Phone>,
    text: MessageText,
    options: SendOptions,
}

impl SendSms {
    pub fn to_one(phone: Phone, text: MessageText) -> Self {
        Self {
            phones: vec![phone],
            text,
            options: SendOptions::default(),
        }
    }

    pub fn to_many(
        phones: Vec<Phone>,
        text: MessageText,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        if phones.is_empty() {
            return Err(ValidationError::NoRecipients);
        }
        Ok(Self {
            phones,
            text,
            options,
        })
    }

    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

/// `cmd=msg`: state of a single outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryStatus {
    id: MessageId,
}

impl QueryStatus {
    pub fn new(id: MessageId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }
}
