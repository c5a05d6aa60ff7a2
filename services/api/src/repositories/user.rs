//! Account lookups and favorites as seen by the resource API

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use domain::{Restaurant, Role};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{
    UserStore,
    restaurant::{RESTAURANT_COLUMNS, RestaurantRow, into_restaurants},
};
use crate::authz::Principal;

#[derive(Debug, FromRow)]
struct PrincipalRow {
    id: Uuid,
    role: String,
}

impl TryFrom<PrincipalRow> for Principal {
    type Error = DatabaseError;

    fn try_from(row: PrincipalRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: domain::ValidationError| DatabaseError::InvalidData(e.message))?;
        Ok(Principal { id: row.id, role })
    }
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn principal(&self, id: Uuid) -> DatabaseResult<Option<Principal>> {
        let row: Option<PrincipalRow> = sqlx::query_as("SELECT id, role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Principal::try_from).transpose()
    }

    async fn favorite_ids(&self, user_id: Uuid) -> DatabaseResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar(
            "SELECT restaurant_id FROM user_favorites WHERE user_id = $1 ORDER BY created_at, restaurant_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn favorite_restaurants(&self, user_id: Uuid) -> DatabaseResult<Vec<Restaurant>> {
        let rows: Vec<RestaurantRow> = sqlx::query_as(&format!(
            r#"
            SELECT {RESTAURANT_COLUMNS}
            FROM user_favorites f
            JOIN restaurants r ON r.id = f.restaurant_id
            WHERE f.user_id = $1
            ORDER BY f.created_at, r.id
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        into_restaurants(rows)
    }

    async fn add_favorite(&self, user_id: Uuid, restaurant_id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query(
            "INSERT INTO user_favorites (user_id, restaurant_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(restaurant_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove_favorite(&self, user_id: Uuid, restaurant_id: Uuid) -> DatabaseResult<bool> {
        let result =
            sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND restaurant_id = $2")
                .bind(user_id)
                .bind(restaurant_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
