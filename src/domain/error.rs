use thiserror::Error;

/// A string did not name any variant of a wire enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A custom period could not be turned into a time window.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidWindow {
    #[error("custom period requires both a start and an end date")]
    MissingBound,

    #[error("custom period ends ({end}) before it starts ({start})")]
    EndBeforeStart {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
