use std::path::Path;

use models::User;
use thiserror::Error;
use tokio::fs;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed seed data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a JSON array of user records.
pub fn parse_seed(bytes: &[u8]) -> Result<Vec<User>, SeedError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Read the seed dataset from a JSON file.
pub async fn load_seed<P: AsRef<Path>>(path: P) -> Result<Vec<User>, SeedError> {
    let bytes = fs::read(path.as_ref()).await?;
    parse_seed(&bytes)
}

/// Read the seed dataset, falling back to an empty collection when the file
/// is missing or malformed. The failure is logged, never returned.
pub async fn load_seed_or_empty<P: AsRef<Path>>(path: P) -> Vec<User> {
    let path = path.as_ref();
    match load_seed(path).await {
        Ok(users) => {
            info!(path = %path.display(), count = users.len(), "loaded users from seed file");
            users
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to load users from seed file; starting empty");
            Vec::new()
        }
    }
}
