use models::UserId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("validation error: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("User with ID {0} not found.")]
    NotFound(UserId),
    #[error("no user ids left to assign")]
    IdsExhausted,
}

impl ServiceError {
    /// Messages suitable for an `errors` list in a response payload.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(errors) => errors.clone(),
            Self::NotFound(_) | Self::IdsExhausted => vec![self.to_string()],
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(errors) => Self::Validation(errors),
        }
    }
}
