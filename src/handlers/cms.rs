//! Public content handlers: articles and banners

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::models::cms::{Article, Banner};
use crate::utils::errors::{Result, TourbookError};
use crate::utils::helpers::calculate_offset;

use super::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageQuery {
    pub fn limit_offset(&self) -> (i64, i64) {
        let limit = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (limit, calculate_offset(self.page.unwrap_or(1), limit))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BannerQuery {
    pub position: Option<String>,
}

/// Published articles, newest first
pub async fn list_articles(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Article>>> {
    let (limit, offset) = page.limit_offset();
    let articles = state.db.cms.list_articles(true, limit, offset).await?;
    Ok(Json(articles))
}

/// A single published article
pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Article>> {
    let article = state
        .db
        .cms
        .find_article_by_slug(&slug)
        .await?
        .filter(|a| a.is_published)
        .ok_or_else(|| TourbookError::NotFound(format!("article {}", slug)))?;

    Ok(Json(article))
}

/// Active banners, optionally for one placement slot
pub async fn list_banners(
    State(state): State<AppState>,
    Query(query): Query<BannerQuery>,
) -> Result<Json<Vec<Banner>>> {
    let banners = state
        .db
        .cms
        .list_banners(query.position.as_deref(), true)
        .await?;
    Ok(Json(banners))
}
