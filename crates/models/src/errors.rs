use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("validation error: {}", .0.join(", "))]
    Validation(Vec<String>),
}
