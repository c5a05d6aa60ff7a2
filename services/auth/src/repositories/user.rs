//! User repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, UpdateUser, User, user::UserRow};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, profile_picture, created_at, updated_at";

/// Account storage used by the auth handlers
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account; a taken email yields `UniqueViolation`
    async fn create(&self, user: NewUser) -> DatabaseResult<User>;

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;

    /// Apply a partial update, returning `None` when the account is gone
    async fn update(&self, id: Uuid, changes: UpdateUser) -> DatabaseResult<Option<User>>;

    /// Favorite restaurant ids in the order they were added
    async fn favorites(&self, id: Uuid) -> DatabaseResult<Vec<Uuid>>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_user(row: UserRow) -> DatabaseResult<User> {
    User::try_from(row).map_err(|e| DatabaseError::InvalidData(e.to_string()))
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", user.email);

        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        into_user(row)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(into_user).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(into_user).transpose()
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> DatabaseResult<Option<User>> {
        info!("Updating user: {}", id);

        let row: Option<UserRow> = sqlx::query_as(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                profile_picture = COALESCE($4, profile_picture),
                password_hash = COALESCE($5, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.profile_picture)
        .bind(changes.password_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_user).transpose()
    }

    async fn favorites(&self, id: Uuid) -> DatabaseResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar(
            r#"
            SELECT restaurant_id
            FROM user_favorites
            WHERE user_id = $1
            ORDER BY created_at, restaurant_id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
