//! Destination repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::destination::{CreateDestinationRequest, Destination, UpdateDestinationRequest};
use crate::utils::errors::TourbookError;
use crate::utils::helpers::slugify;

#[derive(Debug, Clone)]
pub struct DestinationRepository {
    pool: PgPool,
}

impl DestinationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new destination
    pub async fn create(&self, request: CreateDestinationRequest) -> Result<Destination, TourbookError> {
        let slug = request.slug.unwrap_or_else(|| slugify(&request.name));
        let destination = sqlx::query_as::<_, Destination>(
            r#"
            INSERT INTO destinations (slug, name, description, parent_id, image_url, is_published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id, slug, name, description, parent_id, image_url, is_published, created_at, updated_at
            "#,
        )
        .bind(slug)
        .bind(request.name)
        .bind(request.description)
        .bind(request.parent_id)
        .bind(request.image_url)
        .bind(request.is_published.unwrap_or(false))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(destination)
    }

    /// Find destination by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Destination>, TourbookError> {
        let destination = sqlx::query_as::<_, Destination>(
            "SELECT id, slug, name, description, parent_id, image_url, is_published, created_at, updated_at FROM destinations WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(destination)
    }

    /// Find destination by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Destination>, TourbookError> {
        let destination = sqlx::query_as::<_, Destination>(
            "SELECT id, slug, name, description, parent_id, image_url, is_published, created_at, updated_at FROM destinations WHERE slug = $1"
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(destination)
    }

    /// List all destinations, optionally only published ones
    pub async fn list(&self, published_only: bool) -> Result<Vec<Destination>, TourbookError> {
        let destinations = sqlx::query_as::<_, Destination>(
            "SELECT id, slug, name, description, parent_id, image_url, is_published, created_at, updated_at FROM destinations WHERE is_published OR NOT $1 ORDER BY name ASC"
        )
        .bind(published_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(destinations)
    }

    /// Update destination
    pub async fn update(&self, id: i64, request: UpdateDestinationRequest) -> Result<Destination, TourbookError> {
        let destination = sqlx::query_as::<_, Destination>(
            r#"
            UPDATE destinations
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                parent_id = COALESCE($5, parent_id),
                image_url = COALESCE($6, image_url),
                is_published = COALESCE($7, is_published),
                updated_at = $8
            WHERE id = $1
            RETURNING id, slug, name, description, parent_id, image_url, is_published, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.name)
        .bind(request.slug)
        .bind(request.description)
        .bind(request.parent_id)
        .bind(request.image_url)
        .bind(request.is_published)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(destination)
    }

    /// Delete destination
    pub async fn delete(&self, id: i64) -> Result<(), TourbookError> {
        sqlx::query("DELETE FROM destinations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
