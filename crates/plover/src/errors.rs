use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, Deserialize, Serialize)]
pub enum ChatError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Storage failure: {0}")]
    Store(String),

    #[error("Completion failure: {0}")]
    Completion(String),
}

pub type ChatResult<T> = Result<T, ChatError>;
