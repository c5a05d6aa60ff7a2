//! In-memory account store for router tests

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use uuid::Uuid;

use crate::{
    models::{NewUser, UpdateUser, User},
    repositories::UserStore,
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

fn email_taken() -> DatabaseError {
    DatabaseError::UniqueViolation {
        constraint: "users_email_key".into(),
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> DatabaseResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(email_taken());
        }
        let now = Utc::now();
        let stored = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> DatabaseResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if let Some(email) = &changes.email {
            if users.values().any(|u| u.id != id && &u.email == email) {
                return Err(email_taken());
            }
        }
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(user);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn favorites(&self, _id: Uuid) -> DatabaseResult<Vec<Uuid>> {
        Ok(Vec::new())
    }
}
