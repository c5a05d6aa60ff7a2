//! Ownership and role checks for write operations

use std::fmt;

use domain::Role;
use uuid::Uuid;

use crate::error::ApiError;

/// Authenticated caller, loaded fresh from the users table on every request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

/// Kinds of owned resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Restaurant,
    Menu,
    Review,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Restaurant => "restaurant",
            ResourceKind::Menu => "menu",
            ResourceKind::Review => "review",
        })
    }
}

impl Principal {
    /// Allow the write when the caller owns the resource or is an admin.
    ///
    /// For menus `owner_id` is the owner of the parent restaurant.
    pub fn ensure_can_write(&self, owner_id: Uuid, kind: ResourceKind) -> Result<(), ApiError> {
        if self.id == owner_id || self.role.is_admin() {
            return Ok(());
        }
        Err(ApiError::Forbidden(format!(
            "Not authorized to modify this {kind}"
        )))
    }

    /// Menu mutations and menu photo parsing need a restaurant or admin account
    pub fn require_menu_publisher(&self) -> Result<(), ApiError> {
        if self.role.can_publish_menus() {
            return Ok(());
        }
        Err(ApiError::Forbidden(
            "Not authorized as a restaurant owner".to_string(),
        ))
    }
}
