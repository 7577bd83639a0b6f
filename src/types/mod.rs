use thiserror::Error;

mod colors;
mod domain_types;
mod ids;

pub use colors::*;
pub use domain_types::*;
pub use ids::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Value out of bounds: {value}, expected {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Record '{record}' is missing required field `{field}`")]
    MissingField { record: String, field: String },

    #[error("Record '{record}' is malformed: {reason}")]
    MalformedRecord { record: String, reason: String },

    #[error("Table row has {actual} cells, expected {expected}")]
    TableShape { expected: usize, actual: usize },

    #[error("Unknown dataset '{0}'")]
    UnknownDataset(String),

    #[error("Invalid build selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid index range: start {start} is past end {end}")]
    InvalidRange { start: usize, end: usize },
}
