//! Review repository for database operations
//!
//! Every write takes the parent restaurant row lock before touching
//! `reviews`, then recomputes `average_rating` and `review_count` from the
//! ratings that remain. Concurrent writers for one restaurant therefore
//! serialize on that lock and the aggregate always matches the table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use domain::{
    AuthorSummary, NewReview, RatingSummary, RestaurantRef, Review, ReviewView, UpdateReview,
};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use super::{ReviewFilter, ReviewStore};

const REVIEW_COLUMNS: &str = "v.id, v.user_id, v.restaurant_id, v.rating, v.comment, v.photos, \
     v.likes, v.menu_id, v.created_at, v.updated_at";

#[derive(Debug, FromRow)]
struct ReviewRow {
    id: Uuid,
    user_id: Uuid,
    restaurant_id: Uuid,
    rating: i16,
    comment: Option<String>,
    photos: Vec<String>,
    likes: i32,
    menu_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            user_id: row.user_id,
            restaurant_id: row.restaurant_id,
            rating: row.rating,
            comment: row.comment,
            photos: row.photos,
            likes: row.likes,
            menu_id: row.menu_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Review joined with author and restaurant names
#[derive(Debug, FromRow)]
struct ReviewViewRow {
    #[sqlx(flatten)]
    review: ReviewRow,
    author_name: Option<String>,
    author_picture: Option<String>,
    restaurant_name: Option<String>,
}

impl From<ReviewViewRow> for ReviewView {
    fn from(row: ReviewViewRow) -> Self {
        let author = row.author_name.map(|name| AuthorSummary {
            id: row.review.user_id,
            name,
            profile_picture: row.author_picture,
        });
        let restaurant = row.restaurant_name.map(|name| RestaurantRef {
            id: row.review.restaurant_id,
            name,
        });
        ReviewView {
            review: row.review.into(),
            author,
            restaurant,
        }
    }
}

fn view_query() -> QueryBuilder<'static, Postgres> {
    QueryBuilder::new(format!(
        "SELECT {REVIEW_COLUMNS}, u.name AS author_name, u.profile_picture AS author_picture, \
         r.name AS restaurant_name \
         FROM reviews v \
         LEFT JOIN users u ON u.id = v.user_id \
         LEFT JOIN restaurants r ON r.id = v.restaurant_id \
         WHERE TRUE"
    ))
}

fn push_review_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: ReviewFilter) {
    if let Some(restaurant_id) = filter.restaurant_id {
        builder.push(" AND v.restaurant_id = ").push_bind(restaurant_id);
    }
    if let Some(user_id) = filter.user_id {
        builder.push(" AND v.user_id = ").push_bind(user_id);
    }
}

/// Lock a restaurant row for the rest of the transaction; `false` if absent
async fn lock_restaurant(conn: &mut PgConnection, restaurant_id: Uuid) -> DatabaseResult<bool> {
    let locked: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM restaurants WHERE id = $1 FOR UPDATE")
            .bind(restaurant_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(locked.is_some())
}

/// Restaurant a review belongs to
async fn review_restaurant(conn: &mut PgConnection, review_id: Uuid) -> DatabaseResult<Option<Uuid>> {
    let restaurant_id = sqlx::query_scalar("SELECT restaurant_id FROM reviews WHERE id = $1")
        .bind(review_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(restaurant_id)
}

/// Recompute the restaurant's rating aggregate from its current reviews
async fn refresh_rating(conn: &mut PgConnection, restaurant_id: Uuid) -> DatabaseResult<RatingSummary> {
    let ratings: Vec<i16> = sqlx::query_scalar("SELECT rating FROM reviews WHERE restaurant_id = $1")
        .bind(restaurant_id)
        .fetch_all(&mut *conn)
        .await?;

    let summary = RatingSummary::from_ratings(ratings);

    sqlx::query(
        "UPDATE restaurants SET average_rating = $2, review_count = $3, updated_at = NOW() WHERE id = $1",
    )
    .bind(restaurant_id)
    .bind(summary.average_rating)
    .bind(summary.review_count)
    .execute(&mut *conn)
    .await?;

    debug!(
        "Restaurant {} rating is now {:.2} over {} reviews",
        restaurant_id, summary.average_rating, summary.review_count
    );
    Ok(summary)
}

/// PostgreSQL-backed review repository
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    /// Create a new review repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn list(&self, filter: ReviewFilter) -> DatabaseResult<Vec<ReviewView>> {
        let mut builder = view_query();
        push_review_filter(&mut builder, filter);
        builder.push(" ORDER BY v.created_at DESC, v.id");

        let rows: Vec<ReviewViewRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(ReviewView::from).collect())
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<ReviewView>> {
        let mut builder = view_query();
        builder.push(" AND v.id = ").push_bind(id);

        let row: Option<ReviewViewRow> = builder
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ReviewView::from))
    }

    async fn create(&self, user_id: Uuid, review: NewReview) -> DatabaseResult<Option<Review>> {
        let mut tx = self.pool.begin().await?;

        if !lock_restaurant(&mut tx, review.restaurant_id).await? {
            return Ok(None);
        }

        let row: ReviewRow = sqlx::query_as(&format!(
            r#"
            WITH v AS (
                INSERT INTO reviews (id, user_id, restaurant_id, rating, comment, photos, menu_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            SELECT {REVIEW_COLUMNS} FROM v
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(review.restaurant_id)
        .bind(review.rating)
        .bind(review.comment.as_deref())
        .bind(&review.photos)
        .bind(review.menu_id)
        .fetch_one(&mut *tx)
        .await?;

        refresh_rating(&mut tx, review.restaurant_id).await?;
        tx.commit().await?;

        info!("Created review {} for restaurant {}", row.id, row.restaurant_id);
        Ok(Some(row.into()))
    }

    async fn update(&self, id: Uuid, changes: UpdateReview) -> DatabaseResult<Option<Review>> {
        let mut tx = self.pool.begin().await?;

        let Some(restaurant_id) = review_restaurant(&mut tx, id).await? else {
            return Ok(None);
        };
        lock_restaurant(&mut tx, restaurant_id).await?;

        let row: Option<ReviewRow> = sqlx::query_as(&format!(
            r#"
            WITH v AS (
                UPDATE reviews
                SET rating = COALESCE($2, rating),
                    comment = COALESCE($3, comment),
                    menu_id = COALESCE($4, menu_id),
                    photos = COALESCE($5, photos),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {REVIEW_COLUMNS} FROM v
            "#
        ))
        .bind(id)
        .bind(changes.rating)
        .bind(changes.comment.as_deref())
        .bind(changes.menu_id)
        .bind(changes.photos.as_ref())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        refresh_rating(&mut tx, restaurant_id).await?;
        tx.commit().await?;

        Ok(Some(row.into()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tx = self.pool.begin().await?;

        let Some(restaurant_id) = review_restaurant(&mut tx, id).await? else {
            return Ok(false);
        };
        lock_restaurant(&mut tx, restaurant_id).await?;

        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        refresh_rating(&mut tx, restaurant_id).await?;
        tx.commit().await?;

        info!("Deleted review {}", id);
        Ok(true)
    }

    async fn like(&self, id: Uuid) -> DatabaseResult<Option<i32>> {
        let likes = sqlx::query_scalar(
            "UPDATE reviews SET likes = likes + 1 WHERE id = $1 RETURNING likes",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(likes)
    }
}
