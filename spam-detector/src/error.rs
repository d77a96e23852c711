use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpamError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Model initialization failed: {0}")]
    ModelInit(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SpamError>;
