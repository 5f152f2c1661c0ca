use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Visibility policy error for {app_id}: {reason}")]
    Policy { app_id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
