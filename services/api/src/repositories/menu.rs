//! Menu repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use domain::{
    Location, Menu, MenuFilter, MenuWithRestaurant, NewMenu, RestaurantSummary, UpdateMenu,
};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use super::{MenuStore, restaurant::parse_dietary_options};

const MENU_COLUMNS: &str = "m.id, m.restaurant_id, m.type, m.starter, m.main, m.dessert, \
     m.price, m.photo_url, m.tags, m.is_exclusive, m.hours, m.date, m.includes_drink, \
     m.drink_options, m.additional_info, m.created_at, m.updated_at";

const SUMMARY_COLUMNS: &str = "r.name AS restaurant_name, r.latitude AS restaurant_latitude, \
     r.longitude AS restaurant_longitude, r.address AS restaurant_address, \
     r.cuisine_type AS restaurant_cuisine_type, \
     r.dietary_options AS restaurant_dietary_options, \
     r.phone_number AS restaurant_phone_number";

/// Raw `menus` row
#[derive(Debug, FromRow)]
struct MenuRow {
    id: Uuid,
    restaurant_id: Uuid,
    #[sqlx(rename = "type")]
    menu_type: String,
    starter: String,
    main: String,
    dessert: Option<String>,
    price: f64,
    photo_url: Option<String>,
    tags: Vec<String>,
    is_exclusive: bool,
    hours: String,
    date: DateTime<Utc>,
    includes_drink: bool,
    drink_options: Vec<String>,
    additional_info: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MenuRow {
    fn into_menu(self) -> DatabaseResult<Menu> {
        Ok(Menu {
            id: self.id,
            restaurant_id: self.restaurant_id,
            menu_type: self
                .menu_type
                .parse()
                .map_err(|e: domain::ValidationError| DatabaseError::InvalidData(e.message))?,
            starter: self.starter,
            main: self.main,
            dessert: self.dessert,
            price: self.price,
            photo_url: self.photo_url,
            tags: self.tags,
            is_exclusive: self.is_exclusive,
            hours: self.hours,
            date: self.date,
            includes_drink: self.includes_drink,
            drink_options: self.drink_options,
            additional_info: self.additional_info,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Menu row joined with the columns of its restaurant summary
#[derive(Debug, FromRow)]
struct MenuListRow {
    #[sqlx(flatten)]
    menu: MenuRow,
    restaurant_name: String,
    restaurant_latitude: f64,
    restaurant_longitude: f64,
    restaurant_address: String,
    restaurant_cuisine_type: String,
    restaurant_dietary_options: Vec<String>,
    restaurant_phone_number: String,
}

impl MenuListRow {
    fn into_listing(self) -> DatabaseResult<MenuWithRestaurant> {
        let summary = RestaurantSummary {
            id: self.menu.restaurant_id,
            name: self.restaurant_name,
            location: Location::new(
                self.restaurant_longitude,
                self.restaurant_latitude,
                self.restaurant_address,
            ),
            cuisine_type: self.restaurant_cuisine_type,
            dietary_options: parse_dietary_options(&self.restaurant_dietary_options)?,
            phone_number: self.restaurant_phone_number,
        };
        Ok(MenuWithRestaurant {
            menu: self.menu.into_menu()?,
            restaurant: Some(summary),
        })
    }
}

/// Escape `LIKE` wildcards in user input
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append the predicates of a [`MenuFilter`] to a query selecting from `menus m`
fn push_menu_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &MenuFilter) {
    if let Some(restaurant_id) = filter.restaurant_id {
        builder.push(" AND m.restaurant_id = ").push_bind(restaurant_id);
    }
    if let Some(menu_type) = filter.menu_type {
        builder.push(" AND m.type = ").push_bind(menu_type.as_str());
    }
    if let Some(min) = filter.price_min {
        builder.push(" AND m.price >= ").push_bind(min);
    }
    if let Some(max) = filter.price_max {
        builder.push(" AND m.price <= ").push_bind(max);
    }
    if !filter.tags.is_empty() {
        builder.push(" AND m.tags && ").push_bind(filter.tags.clone());
    }
    if let Some(exclusive) = filter.is_exclusive {
        builder.push(" AND m.is_exclusive = ").push_bind(exclusive);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        builder
            .push(" AND (m.starter ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR m.main ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR m.dessert ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR EXISTS (SELECT 1 FROM unnest(m.tags) AS tag WHERE tag ILIKE ")
            .push_bind(pattern)
            .push("))");
    }
    if let Some(from) = filter.date_from {
        builder.push(" AND m.date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        builder.push(" AND m.date < ").push_bind(to);
    }
}

fn listing_query() -> QueryBuilder<'static, Postgres> {
    QueryBuilder::new(format!(
        "SELECT {MENU_COLUMNS}, {SUMMARY_COLUMNS} \
         FROM menus m JOIN restaurants r ON r.id = m.restaurant_id WHERE TRUE"
    ))
}

/// PostgreSQL-backed menu repository
#[derive(Clone)]
pub struct PgMenuStore {
    pool: PgPool,
}

impl PgMenuStore {
    /// Create a new menu repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuStore for PgMenuStore {
    async fn list(&self, filter: &MenuFilter) -> DatabaseResult<Vec<MenuWithRestaurant>> {
        let mut builder = listing_query();
        push_menu_filter(&mut builder, filter);
        builder.push(" ORDER BY m.date DESC, m.created_at DESC, m.id");

        let rows: Vec<MenuListRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(MenuListRow::into_listing).collect()
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<MenuWithRestaurant>> {
        let mut builder = listing_query();
        builder.push(" AND m.id = ").push_bind(id);

        let row: Option<MenuListRow> = builder
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?;
        row.map(MenuListRow::into_listing).transpose()
    }

    async fn create(&self, menu: NewMenu) -> DatabaseResult<Menu> {
        let row: MenuRow = sqlx::query_as(&format!(
            r#"
            WITH m AS (
                INSERT INTO menus (id, restaurant_id, type, starter, main, dessert, price,
                    photo_url, tags, is_exclusive, hours, date, includes_drink, drink_options,
                    additional_info)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, COALESCE($12, NOW()),
                    $13, $14, $15)
                RETURNING *
            )
            SELECT {MENU_COLUMNS} FROM m
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(menu.restaurant_id)
        .bind(menu.menu_type.as_str())
        .bind(menu.starter.trim())
        .bind(menu.main.trim())
        .bind(menu.dessert.as_deref().map(str::trim))
        .bind(menu.price)
        .bind(menu.photo_url.as_deref())
        .bind(&menu.tags)
        .bind(menu.is_exclusive)
        .bind(menu.hours_or_default())
        .bind(menu.date)
        .bind(menu.includes_drink)
        .bind(&menu.drink_options)
        .bind(menu.additional_info.as_deref())
        .fetch_one(&self.pool)
        .await?;

        info!("Created menu {} for restaurant {}", row.id, row.restaurant_id);
        row.into_menu()
    }

    async fn update(&self, id: Uuid, changes: UpdateMenu) -> DatabaseResult<Option<Menu>> {
        let row: Option<MenuRow> = sqlx::query_as(&format!(
            r#"
            WITH m AS (
                UPDATE menus
                SET type = COALESCE($2, type),
                    starter = COALESCE($3, starter),
                    main = COALESCE($4, main),
                    dessert = COALESCE($5, dessert),
                    price = COALESCE($6, price),
                    photo_url = COALESCE($7, photo_url),
                    tags = COALESCE($8, tags),
                    is_exclusive = COALESCE($9, is_exclusive),
                    hours = COALESCE($10, hours),
                    date = COALESCE($11, date),
                    includes_drink = COALESCE($12, includes_drink),
                    drink_options = COALESCE($13, drink_options),
                    additional_info = COALESCE($14, additional_info),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {MENU_COLUMNS} FROM m
            "#
        ))
        .bind(id)
        .bind(changes.menu_type.map(|t| t.as_str()))
        .bind(changes.starter.as_deref().map(str::trim))
        .bind(changes.main.as_deref().map(str::trim))
        .bind(changes.dessert.as_deref().map(str::trim))
        .bind(changes.price)
        .bind(changes.photo_url.as_deref())
        .bind(changes.tags.as_ref())
        .bind(changes.is_exclusive)
        .bind(changes.hours.as_deref())
        .bind(changes.date)
        .bind(changes.includes_drink)
        .bind(changes.drink_options.as_ref())
        .bind(changes.additional_info.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.map(MenuRow::into_menu).transpose()
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
