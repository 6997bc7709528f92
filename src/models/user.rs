use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored user profile for recommendations
///
/// Only the identity fields are required at signup; travel preferences are
/// filled in later through profile updates. `budget_max` and `preferred_env`
/// are the fields the scoring engine reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Stable UUID string
    pub id: String,
    /// Login identifier, unique across users
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub group_size: Option<u32>,
    #[serde(default)]
    pub preferred_env: Option<String>,
    /// Nightly budget bounds in dollars
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub travel_start: Option<String>,
    #[serde(default)]
    pub travel_end: Option<String>,
}

/// Payload for creating a user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub group_size: Option<u32>,
    #[serde(default)]
    pub preferred_env: Option<String>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub travel_start: Option<String>,
    #[serde(default)]
    pub travel_end: Option<String>,
}

/// Partial profile update; `Some` fields overwrite, `None` fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub group_size: Option<u32>,
    pub preferred_env: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub travel_start: Option<String>,
    pub travel_end: Option<String>,
}

impl User {
    /// Creates a user with a freshly assigned id
    pub fn from_new(new_user: NewUser) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            group_size: new_user.group_size,
            preferred_env: new_user.preferred_env,
            budget_min: new_user.budget_min,
            budget_max: new_user.budget_max,
            travel_start: new_user.travel_start,
            travel_end: new_user.travel_end,
        }
    }

    /// Applies a partial update in place
    pub fn apply_update(&mut self, update: UserUpdate) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(group_size) = update.group_size {
            self.group_size = Some(group_size);
        }
        if let Some(preferred_env) = update.preferred_env {
            self.preferred_env = Some(preferred_env);
        }
        if let Some(budget_min) = update.budget_min {
            self.budget_min = Some(budget_min);
        }
        if let Some(budget_max) = update.budget_max {
            self.budget_max = Some(budget_max);
        }
        if let Some(travel_start) = update.travel_start {
            self.travel_start = Some(travel_start);
        }
        if let Some(travel_end) = update.travel_end {
            self.travel_end = Some(travel_end);
        }
    }
}
