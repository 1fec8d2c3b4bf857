use thiserror::Error;

/// Reasons a wire record cannot become an [`Event`](crate::Event).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("event {0} has an empty title")]
    EmptyTitle(String),

    #[error("event {id} has no `{field}`")]
    MissingField { id: String, field: &'static str },

    #[error("event {id} has an invalid date `{value}`")]
    InvalidDate { id: String, value: String },

    #[error("event {id} has an unrecognized recurrence kind `{value}`")]
    UnknownRecurrence { id: String, value: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: `{value}`")]
    InvalidValue { key: &'static str, value: String },
}
