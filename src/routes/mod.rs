//! API Routes module for the Anime Catalog API
//!
//! This module contains all HTTP route handlers for the public API endpoints.

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::catalog;
use crate::config::Config;
use crate::constants::orders;
use crate::db::{
    delete_post, get_hero_slides, get_post, get_posts, get_site_stats, get_theme_settings,
    increment_post_views, record_site_visit, save_hero_slides, save_post, save_theme_settings,
    Database,
};
use crate::error::AppError;
use crate::models::{
    ApiError, ApiResponse, CastMember, CountdownSnapshot, CountdownSpec, DubRelease,
    GalleryEntry, GalleryItem, Hero, HeroSlide, LatestEpisodeEntry, Media, MediaItem,
    PlatformBucket, PlatformLink, Post, PostListFilters, PostListResponse, PostSummary,
    ProjectionResult, ScheduleRule, Season, SeasonCredit, SeasonOverview, SeasonStatus,
    SiteStats, ThemeConfig, ThemeEntry, ThemeSettings, TickerItem, TimeParts, UpcomingEntry,
    VisitRequest,
};
use crate::schedule;
use crate::themes;

/// Application state shared across handlers
pub struct AppState {
    pub db: Database,
    pub config: Config,
}

/// GET /api/hero - Get hero slider entries
///
/// Returns the ordered hero slides with their watch links resolved.
#[utoipa::path(
    get,
    path = "/api/hero",
    tag = "catalog",
    responses(
        (status = 200, description = "Hero slides retrieved successfully", body = Vec<HeroSlide>),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn get_hero(data: web::Data<AppState>) -> impl Responder {
    match get_hero_slides(data.db.pool()).await {
        Ok(slides) => {
            let slides: Vec<HeroSlide> = slides
                .into_iter()
                .map(|mut slide| {
                    let link = slide.link.as_deref().unwrap_or("#");
                    slide.watch_link = Some(catalog::resolve_watch_link(link));
                    slide
                })
                .collect();
            HttpResponse::Ok().json(ApiResponse::new(slides))
        }
        Err(e) => {
            error!("Failed to load hero slides: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Database error: {}", e)))
        }
    }
}

/// Query parameters for the post listing endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PostListQuery {
    /// Page number (default: 1)
    pub page: Option<u32>,
    /// Title search query
    pub q: Option<String>,
    /// Platform filter (normalized key or raw label)
    pub platform: Option<String>,
    /// Sort order (latest, rating)
    pub order: Option<String>,
}

/// GET /api/posts - Get the paginated listing grid
///
/// Query parameters:
/// - page: Page number (default: 1)
/// - q: Title search query
/// - platform: Platform filter
/// - order: Sort order; "rating" produces the ranked list view
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "catalog",
    params(PostListQuery),
    responses(
        (status = 200, description = "Post listing retrieved successfully", body = PostListResponse),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn list_posts(
    data: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> impl Responder {
    let page = query.page.unwrap_or(1).max(1);
    let search = query.q.as_deref().unwrap_or("");
    let platform = query.platform.as_deref().unwrap_or("");
    let order = query.order.as_deref().unwrap_or(orders::LATEST);

    info!(
        "Listing posts: page={}, q={:?}, platform={:?}, order={}",
        page, search, platform, order
    );

    let posts = match get_posts(data.db.pool()).await {
        Ok(posts) => posts,
        Err(e) => {
            error!("Failed to load posts: {}", e);
            return HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Database error: {}", e)));
        }
    };

    let mut items: Vec<PostSummary> = posts.iter().map(catalog::summarize).collect();
    if order == orders::RATING {
        catalog::rank_by_rating(&mut items);
    } else {
        catalog::sort_latest(&mut items);
    }

    let items = catalog::filter_by_title(items, search);
    let items = catalog::filter_by_platform(items, platform);
    let total_items = items.len() as u32;

    let (items, total_pages) = catalog::paginate(items, page, data.config.page_size);

    let response = PostListResponse {
        items,
        page,
        total_pages,
        total_items,
        filters: PostListFilters {
            query: search.to_string(),
            platform: catalog::normalize_platform_key(platform),
            order: order.to_string(),
        },
    };

    HttpResponse::Ok().json(ApiResponse::new(response))
}

/// GET /api/posts/{id} - Get a post with freshly decorated seasons
///
/// Season release state (countdown target, next-episode tag, episodes label,
/// finished status) is recomputed from the schedule on every request.
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Post document id")
    ),
    responses(
        (status = 200, description = "Post retrieved successfully", body = Post),
        (status = 404, description = "Post not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn get_post_detail(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let post = get_post(data.db.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    let decorated = catalog::decorate_post(&post, Utc::now())?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(decorated)))
}

/// GET /api/posts/{id}/countdown - Get countdown snapshots for a post
///
/// One snapshot per season with an active countdown: the target instant and
/// the remaining time decomposed into days/hours/minutes/seconds.
#[utoipa::path(
    get,
    path = "/api/posts/{id}/countdown",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Post document id")
    ),
    responses(
        (status = 200, description = "Countdown snapshots retrieved successfully", body = Vec<CountdownSnapshot>),
        (status = 404, description = "Post not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn get_post_countdowns(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let post = get_post(data.db.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    let now = Utc::now();
    let decorated = catalog::decorate_post(&post, now)?;

    let mut snapshots = Vec::new();
    for season in &decorated.seasons {
        let Some(countdown) = &season.countdown else { continue };
        let Some(date_text) = &countdown.date else { continue };

        let target = schedule::parse_target(date_text)?;
        let remaining = schedule::decompose((target - now).num_milliseconds());

        snapshots.push(CountdownSnapshot {
            season_name: season.name.clone(),
            episode_tag: countdown.episode_tag.clone(),
            title: countdown.title.clone(),
            target,
            display: remaining.map(|parts| parts.display()),
            released: remaining.is_none(),
            remaining,
        });
    }

    Ok(HttpResponse::Ok().json(ApiResponse::new(snapshots)))
}

/// GET /api/upcoming - Get the upcoming-premieres rail
#[utoipa::path(
    get,
    path = "/api/upcoming",
    tag = "catalog",
    responses(
        (status = 200, description = "Upcoming premieres retrieved successfully", body = Vec<UpcomingEntry>),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn get_upcoming(data: web::Data<AppState>) -> impl Responder {
    match get_posts(data.db.pool()).await {
        Ok(posts) => {
            let entries = catalog::upcoming_entries(&posts, Utc::now());
            HttpResponse::Ok().json(ApiResponse::new(entries))
        }
        Err(e) => {
            error!("Failed to load posts for upcoming rail: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Database error: {}", e)))
        }
    }
}

/// GET /api/latest - Get the latest-episodes rail
#[utoipa::path(
    get,
    path = "/api/latest",
    tag = "catalog",
    responses(
        (status = 200, description = "Latest episodes retrieved successfully", body = Vec<LatestEpisodeEntry>),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn get_latest(data: web::Data<AppState>) -> impl Responder {
    match get_posts(data.db.pool()).await {
        Ok(posts) => {
            let entries = catalog::latest_episode_entries(&posts, Utc::now());
            HttpResponse::Ok().json(ApiResponse::new(entries))
        }
        Err(e) => {
            error!("Failed to load posts for latest-episodes rail: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Database error: {}", e)))
        }
    }
}

/// GET /api/platforms - Get platform filter pills with counts
#[utoipa::path(
    get,
    path = "/api/platforms",
    tag = "catalog",
    responses(
        (status = 200, description = "Platform buckets retrieved successfully", body = Vec<PlatformBucket>),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn get_platforms(data: web::Data<AppState>) -> impl Responder {
    match get_posts(data.db.pool()).await {
        Ok(posts) => {
            let items: Vec<PostSummary> = posts.iter().map(catalog::summarize).collect();
            HttpResponse::Ok().json(ApiResponse::new(catalog::platform_buckets(&items)))
        }
        Err(e) => {
            error!("Failed to load posts for platform buckets: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Database error: {}", e)))
        }
    }
}

/// GET /api/themes - Get the active theme cycle
#[utoipa::path(
    get,
    path = "/api/themes",
    tag = "settings",
    responses(
        (status = 200, description = "Theme configuration retrieved successfully", body = ThemeConfig),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn get_themes(data: web::Data<AppState>) -> impl Responder {
    match get_theme_settings(data.db.pool()).await {
        Ok(settings) => {
            HttpResponse::Ok().json(ApiResponse::new(themes::theme_config(settings.as_ref())))
        }
        Err(e) => {
            error!("Failed to load theme settings: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Database error: {}", e)))
        }
    }
}

/// PUT /api/themes - Replace the theme activation flags
#[utoipa::path(
    put,
    path = "/api/themes",
    tag = "settings",
    request_body = ThemeSettings,
    responses(
        (status = 200, description = "Theme configuration saved", body = ThemeConfig),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn update_themes(
    data: web::Data<AppState>,
    body: web::Json<ThemeSettings>,
) -> impl Responder {
    let settings = body.into_inner();
    match save_theme_settings(data.db.pool(), &settings).await {
        Ok(()) => {
            info!("Theme settings updated");
            HttpResponse::Ok().json(ApiResponse::new(themes::theme_config(Some(&settings))))
        }
        Err(e) => {
            error!("Failed to save theme settings: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Database error: {}", e)))
        }
    }
}

/// PUT /api/hero - Replace the hero slide set
#[utoipa::path(
    put,
    path = "/api/hero",
    tag = "settings",
    request_body = Vec<HeroSlide>,
    responses(
        (status = 200, description = "Hero slides saved", body = Vec<HeroSlide>),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn update_hero(
    data: web::Data<AppState>,
    body: web::Json<Vec<HeroSlide>>,
) -> impl Responder {
    let slides = body.into_inner();
    match save_hero_slides(data.db.pool(), &slides).await {
        Ok(()) => {
            info!("Hero slides replaced ({} entries)", slides.len());
            HttpResponse::Ok().json(ApiResponse::new(slides))
        }
        Err(e) => {
            error!("Failed to save hero slides: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Database error: {}", e)))
        }
    }
}

/// PUT /api/posts/{id} - Create or replace a post document
///
/// Season schedules are validated before the document is stored so a rule
/// that can never project (zero or negative interval) is rejected here
/// rather than discovered at render time.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Post document id")
    ),
    request_body = Post,
    responses(
        (status = 200, description = "Post saved", body = Post),
        (status = 400, description = "Invalid post document", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn update_post(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Post>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let mut post = body.into_inner();
    post.id = id;

    let now = Utc::now();
    for season in &post.seasons {
        if let Some(rule) = &season.schedule {
            schedule::project(rule, now).map_err(|e| {
                AppError::validation(format!("season {:?}: {}", season.name, e))
            })?;
        }
    }

    save_post(data.db.pool(), id, &post).await?;
    info!("Saved post {}", id);
    Ok(HttpResponse::Ok().json(ApiResponse::new(post)))
}

/// DELETE /api/posts/{id} - Delete a post document
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Post document id")
    ),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 404, description = "Post not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn remove_post(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    match delete_post(data.db.pool(), id).await {
        Ok(true) => {
            info!("Deleted post {}", id);
            HttpResponse::Ok().json(ApiResponse::new(serde_json::json!({ "deleted": true })))
        }
        Ok(false) => HttpResponse::NotFound().json(ApiError::new("Post not found")),
        Err(e) => {
            error!("Failed to delete post {}: {}", id, e);
            HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Database error: {}", e)))
        }
    }
}

/// POST /api/posts/{id}/view - Record one view of a post
#[utoipa::path(
    post,
    path = "/api/posts/{id}/view",
    tag = "analytics",
    params(
        ("id" = i64, Path, description = "Post document id")
    ),
    responses(
        (status = 200, description = "View recorded"),
        (status = 404, description = "Post not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn track_post_view(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    match increment_post_views(data.db.pool(), id).await {
        Ok(Some(views)) => {
            HttpResponse::Ok().json(ApiResponse::new(serde_json::json!({ "views": views })))
        }
        Ok(None) => HttpResponse::NotFound().json(ApiError::new("Post not found")),
        Err(e) => {
            error!("Failed to record view for post {}: {}", id, e);
            HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Database error: {}", e)))
        }
    }
}

/// POST /api/stats/visit - Record one page view on the site totals
///
/// `newSession` marks the first page view of a visitor's day and bumps the
/// visit counter on top of the page-view counter.
#[utoipa::path(
    post,
    path = "/api/stats/visit",
    tag = "analytics",
    request_body = VisitRequest,
    responses(
        (status = 200, description = "Visit recorded", body = SiteStats),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn track_site_visit(
    data: web::Data<AppState>,
    body: web::Json<VisitRequest>,
) -> impl Responder {
    match record_site_visit(data.db.pool(), body.new_session).await {
        Ok(stats) => HttpResponse::Ok().json(ApiResponse::new(stats)),
        Err(e) => {
            error!("Failed to record site visit: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Database error: {}", e)))
        }
    }
}

/// GET /api/stats - Get the site totals
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "analytics",
    responses(
        (status = 200, description = "Site stats retrieved successfully", body = SiteStats),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn get_stats(data: web::Data<AppState>) -> impl Responder {
    match get_site_stats(data.db.pool()).await {
        Ok(stats) => HttpResponse::Ok().json(ApiResponse::new(stats)),
        Err(e) => {
            error!("Failed to load site stats: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Database error: {}", e)))
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Anime Catalog API",
        version = "0.1.0",
        description = "API serving an anime/series catalog with schedule-driven release countdowns",
        license(
            name = "MIT"
        )
    ),
    paths(
        get_hero,
        list_posts,
        get_post_detail,
        get_post_countdowns,
        get_upcoming,
        get_latest,
        get_platforms,
        get_themes,
        update_themes,
        update_hero,
        update_post,
        remove_post,
        track_post_view,
        track_site_visit,
        get_stats
    ),
    components(
        schemas(
            Post,
            Hero,
            Season,
            SeasonOverview,
            SeasonCredit,
            CountdownSpec,
            ScheduleRule,
            ProjectionResult,
            SeasonStatus,
            TimeParts,
            DubRelease,
            CastMember,
            Media,
            MediaItem,
            GalleryEntry,
            GalleryItem,
            TickerItem,
            PlatformLink,
            HeroSlide,
            ThemeSettings,
            ThemeConfig,
            ThemeEntry,
            SiteStats,
            ApiError,
            PostSummary,
            PostListResponse,
            PostListFilters,
            UpcomingEntry,
            LatestEpisodeEntry,
            PlatformBucket,
            CountdownSnapshot,
            VisitRequest,
            PostListQuery
        )
    ),
    tags(
        (name = "catalog", description = "Catalog data endpoints"),
        (name = "settings", description = "Site configuration endpoints"),
        (name = "analytics", description = "View and visit counters")
    )
)]
pub struct ApiDoc;

/// Configure API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/hero", web::get().to(get_hero))
            .route("/hero", web::put().to(update_hero))
            .route("/posts", web::get().to(list_posts))
            .route("/posts/{id}", web::get().to(get_post_detail))
            .route("/posts/{id}", web::put().to(update_post))
            .route("/posts/{id}", web::delete().to(remove_post))
            .route("/posts/{id}/countdown", web::get().to(get_post_countdowns))
            .route("/posts/{id}/view", web::post().to(track_post_view))
            .route("/upcoming", web::get().to(get_upcoming))
            .route("/latest", web::get().to(get_latest))
            .route("/platforms", web::get().to(get_platforms))
            .route("/themes", web::get().to(get_themes))
            .route("/themes", web::put().to(update_themes))
            .route("/stats", web::get().to(get_stats))
            .route("/stats/visit", web::post().to(track_site_visit)),
    );
}
