use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub type UserId = u64;

pub const NAME_REQUIRED: &str = "Name is required";
pub const USERNAME_REQUIRED: &str = "Username is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Invalid email format";

/// Local part of `[A-Za-z0-9_+&*-]` segments joined by single dots, then one or
/// more `[A-Za-z0-9-]` labels and a 2..=7 letter final label.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_+&*-]+(?:\.[a-zA-Z0-9_+&*-]+)*@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,7}$")
        .expect("email pattern compiles")
});

/// Stored user record.
/// - `id`: assigned by the store, never taken from a request body
/// - `phone` / `website`: free-form, serialized as `null` when absent
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Create/update input: carries no id. Every field must be supplied on update,
/// a missing required field is reported by `validate` rather than by serde.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Full-match check against the accepted email syntax.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

impl UserInput {
    /// Collect every violated rule; an empty list means the input is storable.
    pub fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if is_blank(&self.name) {
            errors.push(NAME_REQUIRED.to_string());
        }
        if is_blank(&self.username) {
            errors.push(USERNAME_REQUIRED.to_string());
        }
        match self.email.as_deref() {
            _ if is_blank(&self.email) => errors.push(EMAIL_REQUIRED.to_string()),
            Some(email) if !is_valid_email(email) => errors.push(EMAIL_INVALID.to_string()),
            _ => {}
        }
        errors
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let errors = self.violations();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Validation(errors))
        }
    }
}

impl User {
    /// Build a record from already validated input.
    pub fn from_input(id: UserId, input: UserInput) -> Self {
        Self {
            id,
            name: input.name.unwrap_or_default(),
            username: input.username.unwrap_or_default(),
            email: input.email.unwrap_or_default(),
            phone: input.phone,
            website: input.website,
        }
    }

    /// Seed records go through the same rule set as requests.
    pub fn violations(&self) -> Vec<String> {
        UserInput::from(self.clone()).violations()
    }
}

impl From<User> for UserInput {
    fn from(user: User) -> Self {
        Self {
            name: Some(user.name),
            username: Some(user.username),
            email: Some(user.email),
            phone: user.phone,
            website: user.website,
        }
    }
}
