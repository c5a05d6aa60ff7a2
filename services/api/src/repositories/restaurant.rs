//! Restaurant repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use domain::{
    DietaryOption, Location, NearbyFilter, NewRestaurant, OpeningHours, Restaurant,
    RestaurantFilter, UpdateRestaurant,
};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, types::Json};
use tracing::info;
use uuid::Uuid;

use super::RestaurantStore;

pub(crate) const RESTAURANT_COLUMNS: &str = "r.id, r.name, r.latitude, r.longitude, r.address, \
     r.cuisine_type, r.dietary_options, r.phone_number, r.subscription_tier, r.owner_id, \
     r.description, r.photos, r.opening_hours, r.average_rating, r.review_count, \
     r.created_at, r.updated_at";

/// Raw `restaurants` row
#[derive(Debug, FromRow)]
pub(crate) struct RestaurantRow {
    id: Uuid,
    name: String,
    latitude: f64,
    longitude: f64,
    address: String,
    cuisine_type: String,
    dietary_options: Vec<String>,
    phone_number: String,
    subscription_tier: String,
    owner_id: Uuid,
    description: Option<String>,
    photos: Vec<String>,
    opening_hours: Json<OpeningHours>,
    average_rating: f64,
    review_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RestaurantRow {
    pub(crate) fn into_restaurant(self) -> DatabaseResult<Restaurant> {
        Ok(Restaurant {
            id: self.id,
            name: self.name,
            location: Location::new(self.longitude, self.latitude, self.address),
            cuisine_type: self.cuisine_type,
            dietary_options: parse_dietary_options(&self.dietary_options)?,
            phone_number: self.phone_number,
            subscription_tier: self
                .subscription_tier
                .parse()
                .map_err(|e: domain::ValidationError| DatabaseError::InvalidData(e.message))?,
            owner: self.owner_id,
            description: self.description,
            photos: self.photos,
            opening_hours: self.opening_hours.0,
            average_rating: self.average_rating,
            review_count: self.review_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(crate) fn parse_dietary_options(raw: &[String]) -> DatabaseResult<Vec<DietaryOption>> {
    raw.iter()
        .map(|option| {
            option
                .parse()
                .map_err(|e: domain::ValidationError| DatabaseError::InvalidData(e.message))
        })
        .collect()
}

pub(crate) fn dietary_strings(options: &[DietaryOption]) -> Vec<String> {
    options.iter().map(|o| o.as_str().to_string()).collect()
}

pub(crate) fn into_restaurants(rows: Vec<RestaurantRow>) -> DatabaseResult<Vec<Restaurant>> {
    rows.into_iter().map(RestaurantRow::into_restaurant).collect()
}

/// Append the equality filters of a listing
pub(crate) fn push_restaurant_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    filter: &RestaurantFilter,
) {
    if let Some(cuisine) = &filter.cuisine_type {
        builder.push(" AND r.cuisine_type = ").push_bind(cuisine.clone());
    }
    if let Some(option) = filter.dietary_option {
        builder
            .push(" AND ")
            .push_bind(option.as_str())
            .push(" = ANY(r.dietary_options)");
    }
}

/// PostgreSQL-backed restaurant repository
#[derive(Clone)]
pub struct PgRestaurantStore {
    pool: PgPool,
}

impl PgRestaurantStore {
    /// Create a new restaurant repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RestaurantStore for PgRestaurantStore {
    async fn list(&self, filter: &RestaurantFilter) -> DatabaseResult<Vec<Restaurant>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants r WHERE TRUE"
        ));
        push_restaurant_filter(&mut builder, filter);
        builder.push(" ORDER BY r.created_at DESC, r.id");

        let rows: Vec<RestaurantRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        into_restaurants(rows)
    }

    async fn nearby(&self, filter: &NearbyFilter) -> DatabaseResult<Vec<Restaurant>> {
        // earth_box is a cheap index-backed prefilter; earth_distance is exact
        let rows: Vec<RestaurantRow> = sqlx::query_as(&format!(
            r#"
            SELECT {RESTAURANT_COLUMNS}
            FROM restaurants r
            WHERE earth_box(ll_to_earth($1, $2), $3) @> ll_to_earth(r.latitude, r.longitude)
              AND earth_distance(ll_to_earth($1, $2), ll_to_earth(r.latitude, r.longitude)) <= $3
            ORDER BY earth_distance(ll_to_earth($1, $2), ll_to_earth(r.latitude, r.longitude)), r.id
            "#
        ))
        .bind(filter.latitude)
        .bind(filter.longitude)
        .bind(filter.radius_meters())
        .fetch_all(&self.pool)
        .await?;

        into_restaurants(rows)
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Restaurant>> {
        let row: Option<RestaurantRow> = sqlx::query_as(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants r WHERE r.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RestaurantRow::into_restaurant).transpose()
    }

    async fn create(&self, owner: Uuid, restaurant: NewRestaurant) -> DatabaseResult<Restaurant> {
        let mut tx = self.pool.begin().await?;

        let row: RestaurantRow = sqlx::query_as(&format!(
            r#"
            WITH r AS (
                INSERT INTO restaurants (id, name, latitude, longitude, address, cuisine_type,
                    dietary_options, phone_number, owner_id, description, opening_hours)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING *
            )
            SELECT {RESTAURANT_COLUMNS} FROM r
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(restaurant.name.trim())
        .bind(restaurant.location.latitude())
        .bind(restaurant.location.longitude())
        .bind(restaurant.location.address.trim())
        .bind(restaurant.cuisine_type.trim())
        .bind(dietary_strings(&restaurant.dietary_options))
        .bind(restaurant.phone_number.trim())
        .bind(owner)
        .bind(restaurant.description.as_deref())
        .bind(Json(&restaurant.opening_hours))
        .fetch_one(&mut *tx)
        .await?;

        let promoted = sqlx::query(
            "UPDATE users SET role = 'restaurant', updated_at = NOW() WHERE id = $1 AND role = 'user'",
        )
        .bind(owner)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if promoted.rows_affected() > 0 {
            info!("Promoted user {} to restaurant owner", owner);
        }
        info!("Created restaurant {}", row.id);
        row.into_restaurant()
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UpdateRestaurant,
    ) -> DatabaseResult<Option<Restaurant>> {
        let location = changes.location.as_ref();
        let row: Option<RestaurantRow> = sqlx::query_as(&format!(
            r#"
            WITH r AS (
                UPDATE restaurants
                SET name = COALESCE($2, name),
                    latitude = COALESCE($3, latitude),
                    longitude = COALESCE($4, longitude),
                    address = COALESCE($5, address),
                    cuisine_type = COALESCE($6, cuisine_type),
                    dietary_options = COALESCE($7, dietary_options),
                    phone_number = COALESCE($8, phone_number),
                    subscription_tier = COALESCE($9, subscription_tier),
                    description = COALESCE($10, description),
                    opening_hours = COALESCE($11, opening_hours),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {RESTAURANT_COLUMNS} FROM r
            "#
        ))
        .bind(id)
        .bind(changes.name.as_deref().map(str::trim))
        .bind(location.map(Location::latitude))
        .bind(location.map(Location::longitude))
        .bind(location.map(|l| l.address.trim()))
        .bind(changes.cuisine_type.as_deref().map(str::trim))
        .bind(changes.dietary_options.as_deref().map(dietary_strings))
        .bind(changes.phone_number.as_deref().map(str::trim))
        .bind(changes.subscription_tier.map(|t| t.as_str()))
        .bind(changes.description.as_deref())
        .bind(changes.opening_hours.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await?;

        row.map(RestaurantRow::into_restaurant).transpose()
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!("Deleted restaurant {}", id);
        }
        Ok(result.rows_affected() > 0)
    }

    async fn add_photo(&self, id: Uuid, path: &str) -> DatabaseResult<Option<Vec<String>>> {
        let photos = sqlx::query_scalar(
            r#"
            UPDATE restaurants
            SET photos = array_append(photos, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING photos
            "#,
        )
        .bind(id)
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        Ok(photos)
    }
}
