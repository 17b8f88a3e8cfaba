//! Typed Rust client for the SMSGATE `rest.api` HTTP gateway.
//!
//! The crate is split into a domain layer of strong types, a transport layer
//! for the query-string requests and the line-oriented `key=value&...`
//! answers, and a small client layer that runs every request through a
//! middleware pipeline (credentials, base URI, error translation).
//!
//! ```rust,no_run
//! use smsgate::{Credentials, MessageText, Phone, SendOptions, SendSms, SmsGateClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smsgate::SmsGateError> {
//!     let client = SmsGateClient::new("https://192.168.0.1:8080", Credentials::new("SMS", "123")?)?;
//!     let phones = vec![Phone::new("79001234567")?, Phone::new("79001234568")?];
//!     let request = SendSms::to_many(phones, MessageText::new("hello")?, SendOptions::default())?;
//!     for sent in client.send(request).await? {
//!         println!("{} -> {}", sent.phone, sent.id);
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    Credentials, Endpoint, GatewayError, GatewayErrorKind, HttpRequest, HttpResponse,
    HttpTransport, Middleware, ReqwestTransport, SmsGateClient, SmsGateClientBuilder, SmsGateError,
};
pub use domain::{
    Charset, DeliveryReport, DeliveryStatus, ErrorCode, KnownDeliveryStatus, Login, MessageId,
    MessageStatus, MessageText, Password, Phone, PhoneNumber, QueryStatus, SendOptions, SendSms,
    SentMessage, ValidationError,
};
pub use transport::{ApiParameters, ParamValue, ResponseRecord, parse_records};
