//! Service layer owning the in-memory user directory.
//! - `user_store`: the record store (validation, id assignment, locking).
//! - `directory`: the trait the HTTP layer consumes.
//! - `storage`: seed dataset loading.

pub mod errors;
pub mod directory;
pub mod user_store;
pub mod storage;

pub use directory::UserDirectory;
pub use errors::ServiceError;
pub use user_store::UserStore;
