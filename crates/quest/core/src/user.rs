//! User accounts and their per-dimension progression.

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::validate::{ValidationError, non_empty};

/// Accumulated experience in one dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionStat {
    pub dimension: Dimension,
    pub xp: u32,
    pub level: u32,
}

/// A persisted user record, including the password hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Unique, case-sensitive login name.
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub hashed_password: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub dimension_stats: Vec<DimensionStat>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        display_name: Option<String>,
        hashed_password: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::new_id(),
            username: username.into(),
            display_name,
            hashed_password: hashed_password.into(),
            disabled: false,
            dimension_stats: Vec::new(),
        }
    }

    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(display_name) = patch.display_name {
            self.display_name = Some(display_name);
        }
        if let Some(hashed_password) = patch.hashed_password {
            self.hashed_password = hashed_password;
        }
        if let Some(disabled) = patch.disabled {
            self.disabled = disabled;
        }
        if let Some(dimension_stats) = patch.dimension_stats {
            self.dimension_stats = dimension_stats;
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        non_empty("id", &self.id)?;
        non_empty("username", &self.username)?;
        non_empty("hashed_password", &self.hashed_password)
    }

    /// Strip credentials for responses.
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            disabled: self.disabled,
            dimension_stats: self.dimension_stats.clone(),
        }
    }
}

/// Sparse update for a user; `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub hashed_password: Option<String>,
    pub disabled: Option<bool>,
    pub dimension_stats: Option<Vec<DimensionStat>>,
}

/// User as returned to clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub disabled: bool,
    pub dimension_stats: Vec<DimensionStat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_never_clears() {
        let mut user = User::new("veteran", Some("Princess Donut".into()), "hash");
        user.apply(UserPatch {
            display_name: None,
            disabled: Some(true),
            ..UserPatch::default()
        });

        assert_eq!(user.display_name.as_deref(), Some("Princess Donut"));
        assert!(user.disabled);
    }

    #[test]
    fn view_drops_password() {
        let user = User::new("noob", None, "secret-hash");
        let json = serde_json::to_value(user.view()).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["username"], "noob");
    }
}
