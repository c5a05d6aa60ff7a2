//! Stored user account

use chrono::{DateTime, Utc};
use domain::{Role, UserProfile};
use sqlx::FromRow;
use uuid::Uuid;

/// User entity as persisted, including the password hash
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public view of the account; the hash never leaves the service
    pub fn into_profile(self, favorites: Vec<Uuid>) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name,
            email: self.email,
            role: self.role,
            profile_picture: self.profile_picture,
            favorites,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Raw `users` row; `role` is stored as text
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = domain::ValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            role: row.role.parse()?,
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            profile_picture: row.profile_picture,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// New user creation payload; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// User update payload
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_picture: Option<String>,
    pub password_hash: Option<String>,
}

impl UpdateUser {
    /// Apply the present fields onto an account
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(picture) = self.profile_picture {
            user.profile_picture = Some(picture);
        }
        if let Some(hash) = self.password_hash {
            user.password_hash = hash;
        }
    }
}
