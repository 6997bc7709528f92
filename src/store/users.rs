use std::path::PathBuf;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User, UserUpdate};

use super::{read_json_array, write_json_array};

/// JSON-backed user profile store
///
/// Owns the user records and their file I/O; knows nothing about sessions
/// or credentials.
pub struct JsonUserStore {
    path: PathBuf,
}

impl JsonUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.users_path())
    }

    /// All stored users
    pub fn list(&self) -> AppResult<Vec<User>> {
        read_json_array(&self.path)
    }

    /// Looks a user up by id
    pub fn get_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        Ok(self.list()?.into_iter().find(|u| u.id == user_id))
    }

    /// Looks a user up by email
    pub fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.list()?.into_iter().find(|u| u.email == email))
    }

    /// Creates a user with a freshly assigned id
    ///
    /// Email is the unique login identifier; creating a second user with an
    /// existing email is rejected.
    pub fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut rows = self.list()?;
        if rows.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::InvalidInput(format!(
                "email {} is already registered",
                new_user.email
            )));
        }
        let user = User::from_new(new_user);
        rows.push(user.clone());
        write_json_array(&self.path, &rows)?;
        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Applies a partial profile update to an existing user
    pub fn update(&self, user_id: &str, update: UserUpdate) -> AppResult<User> {
        let mut rows = self.list()?;
        let user = rows
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("user with id {} not found", user_id)))?;
        user.apply_update(update);
        let updated = user.clone();
        write_json_array(&self.path, &rows)?;
        tracing::info!(user_id = %user_id, "User updated");
        Ok(updated)
    }

    /// Deletes a user; returns whether a record was removed
    pub fn delete(&self, user_id: &str) -> AppResult<bool> {
        let rows = self.list()?;
        let before = rows.len();
        let remaining: Vec<User> = rows.into_iter().filter(|u| u.id != user_id).collect();
        if remaining.len() == before {
            return Ok(false);
        }
        write_json_array(&self.path, &remaining)?;
        tracing::info!(user_id = %user_id, "User deleted");
        Ok(true)
    }

    /// Resets the store to empty
    pub fn reset(&self) -> AppResult<()> {
        write_json_array::<User>(&self.path, &[])?;
        Ok(())
    }
}
