//! Repository module for catalog data persistence
//!
//! Posts are stored as JSONB documents with the id, title, and view counter
//! lifted into columns; hero slides, settings, and site stats live in their
//! own tables. Writes use upsert logic with ON CONFLICT UPDATE.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use thiserror::Error;

use crate::models::{HeroSlide, Post, SiteStats, ThemeSettings};

/// Repository-related errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Corrupt catalog document: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Settings key holding the theme activation flags
const THEME_SETTINGS_KEY: &str = "theme";

/// Decode a posts row into a document, lifting the column values over
/// whatever the stored JSON carries
fn post_from_row(row: &PgRow) -> RepositoryResult<Post> {
    let doc: serde_json::Value = row.get("doc");
    let mut post: Post = serde_json::from_value(doc)?;
    post.id = row.get("id");
    post.title = row.get("title");
    post.views = row.get("views");
    Ok(post)
}

// ============================================================================
// Posts Repository
// ============================================================================

/// Get all posts, newest first
pub async fn get_posts(pool: &PgPool) -> RepositoryResult<Vec<Post>> {
    let rows = sqlx::query("SELECT id, title, views, doc FROM posts ORDER BY id DESC")
        .fetch_all(pool)
        .await?;

    rows.iter().map(post_from_row).collect()
}

/// Get one post by id
pub async fn get_post(pool: &PgPool, id: i64) -> RepositoryResult<Option<Post>> {
    let row = sqlx::query("SELECT id, title, views, doc FROM posts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(post_from_row).transpose()
}

/// Save a post document with upsert logic
///
/// Updating an existing post keeps its view counter; the document and title
/// are replaced wholesale.
pub async fn save_post(pool: &PgPool, id: i64, post: &Post) -> RepositoryResult<()> {
    let doc = serde_json::to_value(post)?;

    sqlx::query(
        r#"
        INSERT INTO posts (id, title, views, doc, updated_at)
        VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP)
        ON CONFLICT (id) DO UPDATE SET
            title = EXCLUDED.title,
            doc = EXCLUDED.doc,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(id)
    .bind(&post.title)
    .bind(post.views)
    .bind(doc)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a post by id, returning whether a row was removed
pub async fn delete_post(pool: &PgPool, id: i64) -> RepositoryResult<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Increment a post's view counter, returning the new count
pub async fn increment_post_views(pool: &PgPool, id: i64) -> RepositoryResult<Option<i64>> {
    let row = sqlx::query("UPDATE posts SET views = views + 1 WHERE id = $1 RETURNING views")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get("views")))
}

// ============================================================================
// Hero Slides Repository
// ============================================================================

/// Get hero slides in display order
pub async fn get_hero_slides(pool: &PgPool) -> RepositoryResult<Vec<HeroSlide>> {
    let rows = sqlx::query(
        r#"
        SELECT id, backdrop, logo, age_rating, quality, tags, link
        FROM hero_slides
        ORDER BY position, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let slides = rows
        .into_iter()
        .map(|row| HeroSlide {
            id: row.get("id"),
            backdrop: row.get("backdrop"),
            logo: row.get("logo"),
            age_rating: row.get("age_rating"),
            quality: row.get("quality"),
            tags: row.get("tags"),
            link: row.get("link"),
            watch_link: None,
        })
        .collect();

    Ok(slides)
}

/// Replace the hero slide set, keeping the given order
pub async fn save_hero_slides(pool: &PgPool, slides: &[HeroSlide]) -> RepositoryResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM hero_slides")
        .execute(&mut *tx)
        .await?;

    for (position, slide) in slides.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO hero_slides (backdrop, logo, age_rating, quality, tags, link, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&slide.backdrop)
        .bind(&slide.logo)
        .bind(&slide.age_rating)
        .bind(&slide.quality)
        .bind(&slide.tags)
        .bind(&slide.link)
        .bind(position as i32)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

// ============================================================================
// Settings Repository
// ============================================================================

/// Get the theme activation flags, when a settings document exists
pub async fn get_theme_settings(pool: &PgPool) -> RepositoryResult<Option<ThemeSettings>> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = $1")
        .bind(THEME_SETTINGS_KEY)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let value: serde_json::Value = row.get("value");
            Ok(Some(serde_json::from_value(value)?))
        }
        None => Ok(None),
    }
}

/// Save the theme activation flags with upsert logic
pub async fn save_theme_settings(
    pool: &PgPool,
    settings: &ThemeSettings,
) -> RepositoryResult<()> {
    let value = serde_json::to_value(settings)?;

    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES ($1, $2, CURRENT_TIMESTAMP)
        ON CONFLICT (key) DO UPDATE SET
            value = EXCLUDED.value,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(THEME_SETTINGS_KEY)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

// ============================================================================
// Site Stats Repository
// ============================================================================

fn stats_from_row(row: &PgRow) -> SiteStats {
    SiteStats {
        total_visits: row.get("total_visits"),
        total_page_views: row.get("total_page_views"),
        last_active: row
            .get::<Option<DateTime<Utc>>, _>("last_active")
            .map(|t| t.to_rfc3339()),
    }
}

/// Record one page view, counting a visit only for a new session
pub async fn record_site_visit(
    pool: &PgPool,
    new_session: bool,
) -> RepositoryResult<SiteStats> {
    let visit_delta: i64 = if new_session { 1 } else { 0 };

    let row = sqlx::query(
        r#"
        INSERT INTO site_stats (id, total_visits, total_page_views, last_active)
        VALUES (1, $1, 1, CURRENT_TIMESTAMP)
        ON CONFLICT (id) DO UPDATE SET
            total_visits = site_stats.total_visits + $1,
            total_page_views = site_stats.total_page_views + 1,
            last_active = CURRENT_TIMESTAMP
        RETURNING total_visits, total_page_views, last_active
        "#,
    )
    .bind(visit_delta)
    .fetch_one(pool)
    .await?;

    Ok(stats_from_row(&row))
}

/// Get the site totals, zeroed when nothing has been recorded yet
pub async fn get_site_stats(pool: &PgPool) -> RepositoryResult<SiteStats> {
    let row = sqlx::query(
        "SELECT total_visits, total_page_views, last_active FROM site_stats WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(stats_from_row).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Hero;

    async fn test_pool() -> PgPool {
        dotenvy::dotenv().ok();
        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
        PgPool::connect(&database_url)
            .await
            .expect("Should connect to database")
    }

    fn sample_post(id: i64) -> Post {
        Post {
            id,
            title: format!("Test Post {}", id),
            hero: Hero {
                poster: "https://img.example/poster.jpg".to_string(),
                backdrop: None,
                logo: None,
                tags: vec![],
                trailer_url: None,
            },
            seasons: vec![],
            cast: vec![],
            crew: vec![],
            platforms: vec![],
            ppt: None,
            media: None,
            ticker: vec![],
            story: None,
            card_badge_left: None,
            card_badge_right: None,
            views: 0,
        }
    }

    #[tokio::test]
    #[ignore] // Requires a running database
    async fn test_save_and_get_post_round_trip() {
        let pool = test_pool().await;
        let post = sample_post(900_001);

        save_post(&pool, post.id, &post).await.unwrap();
        let loaded = get_post(&pool, post.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, post.title);

        assert!(delete_post(&pool, post.id).await.unwrap());
        assert!(get_post(&pool, post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore] // Requires a running database
    async fn test_increment_post_views() {
        let pool = test_pool().await;
        let post = sample_post(900_002);
        save_post(&pool, post.id, &post).await.unwrap();

        let first = increment_post_views(&pool, post.id).await.unwrap();
        let second = increment_post_views(&pool, post.id).await.unwrap();
        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));

        assert_eq!(increment_post_views(&pool, -1).await.unwrap(), None);
        delete_post(&pool, post.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a running database
    async fn test_record_site_visit_counts_sessions_once() {
        let pool = test_pool().await;

        let before = get_site_stats(&pool).await.unwrap();
        let after_new = record_site_visit(&pool, true).await.unwrap();
        let after_repeat = record_site_visit(&pool, false).await.unwrap();

        assert_eq!(after_new.total_visits, before.total_visits + 1);
        assert_eq!(after_repeat.total_visits, after_new.total_visits);
        assert_eq!(after_repeat.total_page_views, after_new.total_page_views + 1);
    }
}
