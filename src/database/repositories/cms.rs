//! Article and banner repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::cms::{
    Article, Banner, CreateArticleRequest, CreateBannerRequest, UpdateArticleRequest,
    UpdateBannerRequest,
};
use crate::utils::errors::TourbookError;
use crate::utils::helpers::slugify;

const ARTICLE_COLUMNS: &str = "id, slug, title, excerpt, body, cover_image_url, author_id, is_published, published_at, created_at, updated_at";
const BANNER_COLUMNS: &str = "id, title, image_url, link_url, position, sort_order, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CmsRepository {
    pool: PgPool,
}

impl CmsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an article; publishing stamps `published_at`
    pub async fn create_article(&self, request: CreateArticleRequest) -> Result<Article, TourbookError> {
        let slug = request.slug.unwrap_or_else(|| slugify(&request.title));
        let is_published = request.is_published.unwrap_or(false);
        let published_at = is_published.then(Utc::now);

        let article = sqlx::query_as::<_, Article>(&format!(
            r#"
            INSERT INTO articles (slug, title, excerpt, body, cover_image_url, author_id, is_published, published_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {ARTICLE_COLUMNS}
            "#
        ))
        .bind(slug)
        .bind(request.title)
        .bind(request.excerpt)
        .bind(request.body)
        .bind(request.cover_image_url)
        .bind(request.author_id)
        .bind(is_published)
        .bind(published_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(article)
    }

    /// Find article by slug
    pub async fn find_article_by_slug(&self, slug: &str) -> Result<Option<Article>, TourbookError> {
        let article = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    /// Find article by ID
    pub async fn find_article(&self, id: i64) -> Result<Option<Article>, TourbookError> {
        let article = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    /// List articles, newest first
    pub async fn list_articles(&self, published_only: bool, limit: i64, offset: i64) -> Result<Vec<Article>, TourbookError> {
        let articles = sqlx::query_as::<_, Article>(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS} FROM articles
            WHERE is_published OR NOT $1
            ORDER BY COALESCE(published_at, created_at) DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(published_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(articles)
    }

    /// Update article; flipping to published stamps `published_at` once
    pub async fn update_article(&self, id: i64, request: UpdateArticleRequest) -> Result<Article, TourbookError> {
        let article = sqlx::query_as::<_, Article>(&format!(
            r#"
            UPDATE articles
            SET title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                excerpt = COALESCE($4, excerpt),
                body = COALESCE($5, body),
                cover_image_url = COALESCE($6, cover_image_url),
                is_published = COALESCE($7, is_published),
                published_at = CASE
                    WHEN COALESCE($7, is_published) AND published_at IS NULL THEN $8
                    ELSE published_at
                END,
                updated_at = $8
            WHERE id = $1
            RETURNING {ARTICLE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.slug)
        .bind(request.excerpt)
        .bind(request.body)
        .bind(request.cover_image_url)
        .bind(request.is_published)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(article)
    }

    /// Delete article
    pub async fn delete_article(&self, id: i64) -> Result<(), TourbookError> {
        sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create a banner
    pub async fn create_banner(&self, request: CreateBannerRequest) -> Result<Banner, TourbookError> {
        let banner = sqlx::query_as::<_, Banner>(&format!(
            r#"
            INSERT INTO banners (title, image_url, link_url, position, sort_order, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {BANNER_COLUMNS}
            "#
        ))
        .bind(request.title)
        .bind(request.image_url)
        .bind(request.link_url)
        .bind(request.position)
        .bind(request.sort_order.unwrap_or(0))
        .bind(request.is_active.unwrap_or(true))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(banner)
    }

    /// Find banner by ID
    pub async fn find_banner(&self, id: i64) -> Result<Option<Banner>, TourbookError> {
        let banner = sqlx::query_as::<_, Banner>(&format!(
            "SELECT {BANNER_COLUMNS} FROM banners WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(banner)
    }

    /// List banners, optionally filtered to a placement slot
    pub async fn list_banners(&self, position: Option<&str>, active_only: bool) -> Result<Vec<Banner>, TourbookError> {
        let banners = sqlx::query_as::<_, Banner>(&format!(
            r#"
            SELECT {BANNER_COLUMNS} FROM banners
            WHERE ($1::text IS NULL OR position = $1)
              AND (is_active OR NOT $2)
            ORDER BY position ASC, sort_order ASC
            "#
        ))
        .bind(position)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(banners)
    }

    /// Update banner
    pub async fn update_banner(&self, id: i64, request: UpdateBannerRequest) -> Result<Banner, TourbookError> {
        let banner = sqlx::query_as::<_, Banner>(&format!(
            r#"
            UPDATE banners
            SET title = COALESCE($2, title),
                image_url = COALESCE($3, image_url),
                link_url = COALESCE($4, link_url),
                position = COALESCE($5, position),
                sort_order = COALESCE($6, sort_order),
                is_active = COALESCE($7, is_active),
                updated_at = $8
            WHERE id = $1
            RETURNING {BANNER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.image_url)
        .bind(request.link_url)
        .bind(request.position)
        .bind(request.sort_order)
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(banner)
    }

    /// Delete banner
    pub async fn delete_banner(&self, id: i64) -> Result<(), TourbookError> {
        sqlx::query("DELETE FROM banners WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
