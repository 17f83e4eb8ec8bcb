use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbotError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Errors raised while a handler chain runs.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// `next()` was called after the last handler already ran.
    #[error("handler index out of range: cursor {cursor}, chain length {len}")]
    OutOfRange { cursor: usize, len: usize },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("State error: {0}")]
    State(String),

    #[error("{0}")]
    Custom(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

/// Errors returned synchronously by the registration API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("command cannot be an empty string")]
    EmptyCommand,
}

pub type Result<T> = std::result::Result<T, DbotError>;
