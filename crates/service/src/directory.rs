use async_trait::async_trait;
use models::{User, UserId, UserInput};

use crate::errors::ServiceError;

/// Trait abstraction for the user record store consumed by request handlers.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list(&self) -> Vec<User>;
    async fn get(&self, id: UserId) -> Result<User, ServiceError>;
    async fn create(&self, input: UserInput) -> Result<User, ServiceError>;
    async fn update(&self, id: UserId, input: UserInput) -> Result<User, ServiceError>;
    async fn delete(&self, id: UserId) -> Result<(), ServiceError>;
}
