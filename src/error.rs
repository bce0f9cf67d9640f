// Centralized error type for shapeless
use thiserror::Error;

use crate::value::Kind;

#[derive(Error, Debug)]
pub enum ShapelessError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Unknown class: {0}")]
    UnknownClass(String),
    #[error("No such field '{field}' on {class}")]
    NoSuchField { class: String, field: String },
    #[error("No such method '{method}' on {class}")]
    NoSuchMethod { class: String, method: String },
    #[error("No signature of {class}::{member} matches ({})", kinds(.arguments))]
    NoMatchingSignature { class: String, member: String, arguments: Vec<Kind> },
    #[error("No constructor of {class} matches ({})", kinds(.arguments))]
    NoMatchingConstructor { class: String, arguments: Vec<Kind> },
    #[error("Invocation failed: {0}")]
    Invocation(String),
    #[error("No such property '{property}' on {class}")]
    NoSuchProperty { class: String, property: String },
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Unknown driver: {0}")]
    UnknownDriver(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Statement error: {0}")]
    Statement(String),
    #[error("Row has {found} values but the result declares {expected} columns")]
    RowWidth { expected: usize, found: usize },
    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, ShapelessError>;

fn kinds(arguments: &[Kind]) -> String {
    arguments
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// Helper conversions
impl From<rusqlite::Error> for ShapelessError {
    fn from(e: rusqlite::Error) -> Self { Self::Persistence(e.to_string()) }
}

impl From<config::ConfigError> for ShapelessError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
