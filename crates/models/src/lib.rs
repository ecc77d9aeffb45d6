//! Domain models for the user directory.
//! - `user`: the stored record, the create/update input and its validation rules.
//! - `errors`: model-level error type shared with the service layer.

pub mod errors;
pub mod user;

pub use user::{User, UserId, UserInput};
