use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway account user name (`user`).
///
/// Invariant: non-empty after trimming.
pub struct Login(String);

impl Login {
    /// Query parameter name used by the gateway (`user`).
    pub const FIELD: &'static str = "user";

    /// Create a validated [`Login`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated login.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Gateway account password (`pswd`).
///
/// The gateway accepts accounts without a password, so an empty value is
/// allowed and is still sent as `pswd=`.
pub struct Password(String);

impl Password {
    /// Query parameter name used by the gateway (`pswd`).
    pub const FIELD: &'static str = "pswd";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Recipient phone number as sent to the gateway (digits, no `+`).
///
/// Invariant: non-empty after trimming. No normalization is done here; parse
/// into [`PhoneNumber`] and convert it when the input comes from users.
pub struct Phone(String);

impl Phone {
    /// Query parameter name used by the gateway (`phones`).
    pub const FIELD: &'static str = "phones";

    /// Separator between several recipients in a single `phones` value.
    pub const SEPARATOR: &'static str = ";";

    /// Create a validated (non-empty) phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for Phone {
    /// The gateway expects bare digits, so the E.164 form loses its `+`.
    fn from(value: PhoneNumber) -> Self {
        let digits = value
            .e164
            .strip_prefix('+')
            .unwrap_or(&value.e164)
            .to_owned();
        Self(digits)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty {
                field: Phone::FIELD,
            });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`text`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Query parameter name used by the gateway (`text`).
    pub const FIELD: &'static str = "text";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Charset of the message text in the request (`charset`), e.g. `windows-1251`.
///
/// The gateway assumes UTF-8 when the parameter is omitted.
pub struct Charset(String);

impl Charset {
    /// Query parameter name used by the gateway (`charset`).
    pub const FIELD: &'static str = "charset";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Message id (`id`) assigned by the gateway on `send`.
///
/// Invariant: non-empty after trimming.
pub struct MessageId(String);

impl MessageId {
    /// Query parameter name used by the gateway (`id`).
    pub const FIELD: &'static str = "id";

    /// Create a validated [`MessageId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated message id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Delivery report request flag (`rep`).
pub enum DeliveryReport {
    /// `rep=0`: no delivery confirmation.
    Skip,
    /// `rep=1`: ask the gateway for a delivery confirmation.
    Request,
}

impl DeliveryReport {
    /// Query parameter name used by the gateway (`rep`).
    pub const FIELD: &'static str = "rep";

    pub fn as_i64(self) -> i64 {
        match self {
            Self::Skip => 0,
            Self::Request => 1,
        }
    }
}

impl From<bool> for DeliveryReport {
    fn from(value: bool) -> Self {
        if value { Self::Request } else { Self::Skip }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Processing state of an outgoing message (`status`).
///
/// The raw value is preserved as-is even when it is unknown to this crate.
pub struct DeliveryStatus(String);

impl DeliveryStatus {
    /// Response field name used by the gateway (`status`).
    pub const FIELD: &'static str = "status";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw value as returned by the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this value to a known state, if one exists.
    pub fn known_kind(&self) -> Option<KnownDeliveryStatus> {
        KnownDeliveryStatus::from_code(self.0.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known `status` values of the `msg` command.
pub enum KnownDeliveryStatus {
    /// `1`: the message is waiting in the send queue.
    Queued,
    /// `2`: the message was handed to the device; `err` holds the send result.
    HandedToDevice,
    /// `3`: a delivery confirmation was received; `err` holds the delivery result.
    DeliveryConfirmed,
}

impl KnownDeliveryStatus {
    /// Convert a raw `status` value into a known variant.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "1" => Self::Queued,
            "2" => Self::HandedToDevice,
            "3" => Self::DeliveryConfirmed,
            _ => return None,
        })
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Queued => 1,
            Self::HandedToDevice => 2,
            Self::DeliveryConfirmed => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Result code of the send or delivery operation (`err`), e.g. `0x00000000`.
pub struct ErrorCode(String);

impl ErrorCode {
    /// Response field name used by the gateway (`err`).
    pub const FIELD: &'static str = "err";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw value as returned by the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the hex code; `None` when the gateway sent something else.
    pub fn value(&self) -> Option<u32> {
        let trimmed = self.0.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        u32::from_str_radix(digits, 16).ok()
    }

    /// Returns `true` for `0x00000000`.
    pub fn is_success(&self) -> bool {
        self.value() == Some(0)
    }
}
