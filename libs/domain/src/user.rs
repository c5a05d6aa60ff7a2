//! User accounts, credentials payloads and favorites

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ValidationError, require_text};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Restaurant,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Restaurant => "restaurant",
            Role::Admin => "admin",
        }
    }

    /// Admins bypass ownership checks
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Roles allowed to publish menus
    pub fn can_publish_menus(&self) -> bool {
        matches!(self, Role::Restaurant | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "restaurant" => Ok(Role::Restaurant),
            "admin" => Ok(Role::Admin),
            other => Err(ValidationError::new("role", format!("Unknown role '{other}'"))),
        }
    }
}

/// User profile as returned by the API (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub profile_picture: Option<String>,
    pub favorites: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for user registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl RegisterRequest {
    /// Role the new account gets; `admin` cannot be self-assigned
    pub fn requested_role(&self) -> Result<Role, ValidationError> {
        match self.role.unwrap_or_default() {
            Role::Admin => Err(ValidationError::new(
                "role",
                "Admin accounts cannot be self-registered",
            )),
            role => Ok(role),
        }
    }
}

/// Request for user login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        alias = "profilePicture",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate_name(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) => require_text(name, "name", "Name"),
            None => Ok(()),
        }
    }
}

/// Body returned by register, login and profile update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub favorites: Vec<Uuid>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    pub token: String,
}

impl AuthResponse {
    pub fn new(profile: UserProfile, token: String) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            role: profile.role,
            favorites: profile.favorites,
            profile_picture: profile.profile_picture,
            token,
        }
    }
}

/// Body of `POST /api/users/favorites`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FavoriteRequest {
    #[serde(rename = "restaurantId", alias = "restaurant_id")]
    pub restaurant_id: Uuid,
}

/// Favorites list after a toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub message: String,
    pub favorites: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::User, Role::Restaurant, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn register_defaults_to_user_and_rejects_admin() {
        let mut req = RegisterRequest {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "secret-pass".into(),
            role: None,
        };
        assert_eq!(req.requested_role().unwrap(), Role::User);

        req.role = Some(Role::Restaurant);
        assert_eq!(req.requested_role().unwrap(), Role::Restaurant);

        req.role = Some(Role::Admin);
        assert!(req.requested_role().is_err());
    }

    #[test]
    fn favorite_request_accepts_both_spellings() {
        let id = Uuid::new_v4();
        let camel: FavoriteRequest =
            serde_json::from_value(serde_json::json!({ "restaurantId": id })).unwrap();
        let snake: FavoriteRequest =
            serde_json::from_value(serde_json::json!({ "restaurant_id": id })).unwrap();
        assert_eq!(camel.restaurant_id, id);
        assert_eq!(snake.restaurant_id, id);
    }

    #[test]
    fn profile_update_accepts_camel_case_picture() {
        let update: UpdateProfileRequest =
            serde_json::from_value(serde_json::json!({ "profilePicture": "me.png" })).unwrap();
        assert_eq!(update.profile_picture.as_deref(), Some("me.png"));
        assert!(update.name.is_none());
    }
}
