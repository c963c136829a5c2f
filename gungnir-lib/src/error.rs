use thiserror::Error;

/// Errors that can occur while crafting or injecting a frame
#[derive(Error, Debug)]
pub enum CraftError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed value: {0}")]
    Value(String),

    #[error("unknown field `{field}` in header `{header}`")]
    UnknownField { header: String, field: String },

    #[error("frame stack is full (16 headers)")]
    StackFull,

    #[error("device error: {0}")]
    Device(String),

    #[error("data file error: {0}")]
    Blob(String),

    #[error("injection error: {0}")]
    Sink(String),
}

pub type Result<T> = std::result::Result<T, CraftError>;
