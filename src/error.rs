use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed function-call arguments: {0}")]
    MalformedArguments(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ExecError>;
