use crate::errors::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub created_at: String,
}

/// The user on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: String,
}

impl CurrentUser {
    pub fn new(user_id: &str) -> AppResult<Self> {
        Ok(Self {
            user_id: validate_user_id(user_id)?,
        })
    }

    pub fn is(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Trimmed, non-empty identifier without whitespace or '@'.
pub fn validate_user_id(raw: &str) -> AppResult<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(AppError::InvalidUser("user id cannot be empty".into()));
    }
    if id.chars().any(|c| c.is_whitespace() || c == '@') {
        return Err(AppError::InvalidUser(format!(
            "'{}' contains whitespace or '@'",
            id
        )));
    }
    Ok(id.to_string())
}
