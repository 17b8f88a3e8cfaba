use crate::domain::value::{DeliveryStatus, ErrorCode};

/// One line of a `send` answer: the phone and the id assigned to its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub phone: String,
    pub id: String,
}

/// One line of a `msg` answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStatus {
    pub phone: String,
    pub id: String,
    pub status: DeliveryStatus,
    pub err: ErrorCode,
    /// Error description; empty when `err` is `0x00000000`.
    pub err_msg: String,
}
