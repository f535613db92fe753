//! Tour and add-on repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::tour::{
    CreateAddonRequest, CreateTourRequest, Tour, TourAddon, TourFilter, UpdateAddonRequest,
    UpdateTourRequest,
};
use crate::utils::errors::TourbookError;
use crate::utils::helpers::{calculate_offset, slugify};

const TOUR_COLUMNS: &str = "id, slug, title, summary, description, destination_id, base_price_cents, kitty_cents, duration_days, hero_image_url, is_published, created_at, updated_at";
const ADDON_COLUMNS: &str = "id, tour_id, name, description, unit_price_cents, max_quantity, is_active, created_at";

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone)]
pub struct TourRepository {
    pool: PgPool,
}

impl TourRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new tour
    pub async fn create(&self, request: CreateTourRequest) -> Result<Tour, TourbookError> {
        let slug = request.slug.unwrap_or_else(|| slugify(&request.title));
        let tour = sqlx::query_as::<_, Tour>(&format!(
            r#"
            INSERT INTO tours (slug, title, summary, description, destination_id, base_price_cents, kitty_cents, duration_days, hero_image_url, is_published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING {TOUR_COLUMNS}
            "#
        ))
        .bind(slug)
        .bind(request.title)
        .bind(request.summary)
        .bind(request.description)
        .bind(request.destination_id)
        .bind(request.base_price_cents)
        .bind(request.kitty_cents.unwrap_or(0))
        .bind(request.duration_days)
        .bind(request.hero_image_url)
        .bind(request.is_published.unwrap_or(false))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(tour)
    }

    /// Find tour by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Tour>, TourbookError> {
        let tour = sqlx::query_as::<_, Tour>(&format!(
            "SELECT {TOUR_COLUMNS} FROM tours WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tour)
    }

    /// Find tour by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Tour>, TourbookError> {
        let tour = sqlx::query_as::<_, Tour>(&format!(
            "SELECT {TOUR_COLUMNS} FROM tours WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tour)
    }

    /// List published tours matching the storefront filter
    pub async fn list_published(&self, filter: &TourFilter) -> Result<Vec<Tour>, TourbookError> {
        let page_size = filter
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = calculate_offset(filter.page.unwrap_or(1), page_size);
        let search = filter.search.as_deref().map(|s| format!("%{}%", s));

        let tours = sqlx::query_as::<_, Tour>(&format!(
            r#"
            SELECT {TOUR_COLUMNS} FROM tours
            WHERE is_published
              AND ($1::bigint IS NULL OR destination_id = $1)
              AND ($2::text IS NULL OR title ILIKE $2 OR summary ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.destination_id)
        .bind(search)
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(tours)
    }

    /// List all tours for the admin screen
    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Tour>, TourbookError> {
        let tours = sqlx::query_as::<_, Tour>(&format!(
            "SELECT {TOUR_COLUMNS} FROM tours ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(tours)
    }

    /// Update tour
    pub async fn update(&self, id: i64, request: UpdateTourRequest) -> Result<Tour, TourbookError> {
        let tour = sqlx::query_as::<_, Tour>(&format!(
            r#"
            UPDATE tours
            SET title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                summary = COALESCE($4, summary),
                description = COALESCE($5, description),
                destination_id = COALESCE($6, destination_id),
                base_price_cents = COALESCE($7, base_price_cents),
                kitty_cents = COALESCE($8, kitty_cents),
                duration_days = COALESCE($9, duration_days),
                hero_image_url = COALESCE($10, hero_image_url),
                is_published = COALESCE($11, is_published),
                updated_at = $12
            WHERE id = $1
            RETURNING {TOUR_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.slug)
        .bind(request.summary)
        .bind(request.description)
        .bind(request.destination_id)
        .bind(request.base_price_cents)
        .bind(request.kitty_cents)
        .bind(request.duration_days)
        .bind(request.hero_image_url)
        .bind(request.is_published)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(tour)
    }

    /// Delete tour
    pub async fn delete(&self, id: i64) -> Result<(), TourbookError> {
        sqlx::query("DELETE FROM tours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count total tours
    pub async fn count(&self) -> Result<i64, TourbookError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tours")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Create a tour add-on
    pub async fn create_addon(&self, request: CreateAddonRequest) -> Result<TourAddon, TourbookError> {
        let addon = sqlx::query_as::<_, TourAddon>(&format!(
            r#"
            INSERT INTO tour_addons (tour_id, name, description, unit_price_cents, max_quantity, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ADDON_COLUMNS}
            "#
        ))
        .bind(request.tour_id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.unit_price_cents)
        .bind(request.max_quantity.unwrap_or(10))
        .bind(request.is_active.unwrap_or(true))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(addon)
    }

    /// Find add-on by ID
    pub async fn find_addon(&self, id: i64) -> Result<Option<TourAddon>, TourbookError> {
        let addon = sqlx::query_as::<_, TourAddon>(&format!(
            "SELECT {ADDON_COLUMNS} FROM tour_addons WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(addon)
    }

    /// List active add-ons for a tour
    pub async fn list_addons(&self, tour_id: i64, active_only: bool) -> Result<Vec<TourAddon>, TourbookError> {
        let addons = sqlx::query_as::<_, TourAddon>(&format!(
            "SELECT {ADDON_COLUMNS} FROM tour_addons WHERE tour_id = $1 AND (is_active OR NOT $2) ORDER BY name ASC"
        ))
        .bind(tour_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(addons)
    }

    /// Update add-on
    pub async fn update_addon(&self, id: i64, request: UpdateAddonRequest) -> Result<TourAddon, TourbookError> {
        let addon = sqlx::query_as::<_, TourAddon>(&format!(
            r#"
            UPDATE tour_addons
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                unit_price_cents = COALESCE($4, unit_price_cents),
                max_quantity = COALESCE($5, max_quantity),
                is_active = COALESCE($6, is_active)
            WHERE id = $1
            RETURNING {ADDON_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.unit_price_cents)
        .bind(request.max_quantity)
        .bind(request.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(addon)
    }

    /// Delete add-on
    pub async fn delete_addon(&self, id: i64) -> Result<(), TourbookError> {
        sqlx::query("DELETE FROM tour_addons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
