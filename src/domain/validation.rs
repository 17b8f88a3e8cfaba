use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    NoRecipients,
    InvalidPhoneNumber { input: String },
    InvalidHost { input: String, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::NoRecipients => write!(f, "at least one recipient is required"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidHost { input, reason } => {
                write!(f, "invalid gateway host {input:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
