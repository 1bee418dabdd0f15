use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("customer id is required")]
    EmptyCustomerId,
    #[error("duplicate customer id: {0}")]
    DuplicateCustomerId(String),
    #[error("invalid sort key: {0}")]
    InvalidSortKey(String),
    #[error("invalid sort direction: {0}")]
    InvalidSortDirection(String),
    #[error("invalid birthday filter: {0}")]
    InvalidBirthdayMode(String),
    #[error("invalid timestamp")]
    InvalidTimestamp,
}
