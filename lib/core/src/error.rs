use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid entity '{name}': {reason}")]
    InvalidEntity { name: String, reason: String },

    #[error("Invalid threshold: {0} (must be a number in [0, 1])")]
    InvalidThreshold(f64),

    #[error("Field '{0}' has negative weight")]
    NegativeWeight(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_entity(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidEntity {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
