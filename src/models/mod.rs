//! Data models for the Anime Catalog API
//!
//! This module contains all data structures used throughout the application:
//! the catalog document shapes stored as JSONB, response wrappers, and the
//! view models derived for listing and countdown endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Re-export schedule models for convenience
pub use crate::schedule::{ProjectionResult, ScheduleRule, SeasonStatus, TimeParts};

/// Hero artwork block of a catalog post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    /// Poster image URL
    pub poster: String,
    /// Wide backdrop image URL
    pub backdrop: Option<String>,
    /// Title logo image URL, shown instead of text when present
    pub logo: Option<String>,
    /// Genre/tag pills
    #[serde(default)]
    pub tags: Vec<String>,
    /// Trailer video URL or id
    pub trailer_url: Option<String>,
}

/// One dubbed-release entry inside a season overview
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DubRelease {
    /// Platform label (e.g. "Crunchyroll")
    pub platform: Option<String>,
    /// Release date text, "TBA" style free text allowed
    pub date: Option<String>,
}

/// Info-grid block of a season
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeasonOverview {
    /// Animation studio
    pub studio: Option<String>,
    /// Dubbing studio
    pub dubbing_studio: Option<String>,
    /// Airing status text (e.g. "Currently Airing", "Finished Airing")
    pub status: Option<String>,
    /// CSS class hint for the status value
    pub status_class: Option<String>,
    /// Episodes text in `"<released> / <total...>"` form
    pub episodes: Option<String>,
    /// Format (TV, Movie, ...)
    pub format: Option<String>,
    /// Episode duration text
    pub duration: Option<String>,
    /// Audio languages text
    pub languages: Option<String>,
    /// Rating value as free text (e.g. "8.6", "--")
    pub rating: Option<String>,
    /// Per-platform dubbed release dates
    #[serde(default)]
    pub dub_releases: Vec<DubRelease>,
    /// Legacy single dubbing platform text
    pub dubbing_platform: Option<String>,
    /// Legacy single dub release date text
    pub dub_release_date: Option<String>,
}

/// Countdown block of a season
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountdownSpec {
    /// Target date text
    pub date: Option<String>,
    /// Headline shown next to the timer
    pub title: Option<String>,
    /// Small tag above the timer (e.g. "NEXT EPISODE: EP 5")
    pub episode_tag: Option<String>,
    /// Footer note under the timer
    pub footer: Option<String>,
}

/// One season of a catalog post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    /// Stable panel id, generated when absent
    pub id: Option<String>,
    /// Display name (e.g. "Season 2")
    pub name: String,
    /// Season kind: "countdown" for explicit premiere dates, "mixed" or
    /// "scheduled" for recurring schedules
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Declarative release schedule, when the season is airing on a cadence
    pub schedule: Option<ScheduleRule>,
    /// Countdown block, either authored or derived from the schedule
    pub countdown: Option<CountdownSpec>,
    /// Info-grid block
    pub overview: Option<SeasonOverview>,
}

/// Season-scoped credit details for a cast or crew member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeasonCredit {
    /// Season label
    pub season: Option<String>,
    /// Year text
    pub year: Option<String>,
    /// Platform label
    pub platform: Option<String>,
}

/// Cast or crew member of a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    /// Performer name
    pub name: String,
    /// Role text (e.g. voice actor credit, "Director")
    pub role: Option<String>,
    /// Performer image URL
    pub image: Option<String>,
    /// Voiced character name (cast only)
    pub character_name: Option<String>,
    /// Character image URL (cast only)
    pub character_image: Option<String>,
    /// Source label under the character name
    pub character_label: Option<String>,
    /// Per-season credit details
    #[serde(default)]
    pub season_details: Vec<SeasonCredit>,
}

/// A video entry in the media section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Video URL or id
    pub url: String,
    /// Kind: Trailer, Teaser, Clip, Opening, Ending, Extra
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Display title
    pub title: Option<String>,
}

/// A gallery entry, stored either as a bare URL string or an object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(untagged)]
pub enum GalleryEntry {
    /// Bare image URL
    Url(String),
    /// Image with caption and optional click-through link
    Item(GalleryItem),
}

/// An object-form gallery entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    /// Image URL
    pub url: String,
    /// Caption badge text
    pub caption: Option<String>,
    /// Click-through link
    pub link: Option<String>,
}

/// Media section of a post
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Trailer/clip/opening/ending videos
    #[serde(default)]
    pub trailers: Vec<MediaItem>,
    /// Gallery images
    #[serde(default)]
    pub gallery: Vec<GalleryEntry>,
}

/// One scrolling news-ticker item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TickerItem {
    /// Badge text (e.g. "NEW")
    pub badge: String,
    /// News text
    pub text: String,
    /// Optional link
    pub link: Option<String>,
}

/// A streaming platform link on a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformLink {
    /// Display name (e.g. "Prime Video")
    pub name: String,
    /// Watch URL
    pub url: Option<String>,
    /// CSS class / normalized key hint (e.g. "primevideo")
    pub class: Option<String>,
    /// Platform logo URL
    pub logo: Option<String>,
    /// Call-to-action text
    pub cta: Option<String>,
}

/// A full catalog post document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Numeric document id; newest posts have the highest ids
    #[serde(default)]
    pub id: i64,
    /// Display title
    pub title: String,
    /// Hero artwork block
    pub hero: Hero,
    /// Seasons, in display order
    #[serde(default)]
    pub seasons: Vec<Season>,
    /// Voice cast
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew
    #[serde(default)]
    pub crew: Vec<CastMember>,
    /// Streaming platforms
    #[serde(default)]
    pub platforms: Vec<PlatformLink>,
    /// Primary platform tag used for filtering
    pub ppt: Option<String>,
    /// Media section
    pub media: Option<Media>,
    /// News ticker items
    #[serde(default)]
    pub ticker: Vec<TickerItem>,
    /// Story/synopsis text, blank-line separated paragraphs
    pub story: Option<String>,
    /// Override for the left card badge (defaults to year)
    pub card_badge_left: Option<String>,
    /// Override for the right card badge (defaults to format)
    pub card_badge_right: Option<String>,
    /// View counter
    #[serde(default)]
    pub views: i64,
}

/// One hero slider entry on the index page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlide {
    /// Slide id
    #[serde(default)]
    pub id: i64,
    /// Backdrop image URL
    pub backdrop: String,
    /// Title logo image URL
    pub logo: Option<String>,
    /// Age rating badge (e.g. "PG-13")
    pub age_rating: Option<String>,
    /// Quality badge (e.g. "HD")
    pub quality: Option<String>,
    /// Tag line text
    pub tags: Option<String>,
    /// Raw link: a post id, a page, or a full URL
    pub link: Option<String>,
    /// Resolved watch link, filled at response time
    #[serde(default)]
    pub watch_link: Option<String>,
}

/// Theme activation flags from the settings document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    /// Light theme active unless explicitly disabled
    pub light: Option<bool>,
    /// Seasonal themes, active only when enabled
    pub christmas: Option<bool>,
    pub ruby: Option<bool>,
    pub amethyst: Option<bool>,
    pub winter: Option<bool>,
    pub festival: Option<bool>,
    pub halloween: Option<bool>,
    pub spring: Option<bool>,
}

impl ThemeSettings {
    /// Whether an opt-in theme flag is enabled
    pub fn is_enabled(&self, theme: &str) -> bool {
        match theme {
            "christmas" => self.christmas.unwrap_or(false),
            "ruby" => self.ruby.unwrap_or(false),
            "amethyst" => self.amethyst.unwrap_or(false),
            "winter" => self.winter.unwrap_or(false),
            "festival" => self.festival.unwrap_or(false),
            "halloween" => self.halloween.unwrap_or(false),
            "spring" => self.spring.unwrap_or(false),
            _ => false,
        }
    }
}

/// Site-wide visit counters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteStats {
    /// Distinct visit sessions
    pub total_visits: i64,
    /// Total page views
    pub total_page_views: i64,
    /// ISO timestamp of the last recorded activity
    pub last_active: Option<String>,
}

/// Generic API response wrapper for successful responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the operation was successful (always true for this type)
    pub success: bool,
    /// The response payload
    pub data: T,
    /// ISO timestamp of when data was produced
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// Create a new successful API response with the current timestamp
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Create a new successful API response with a custom timestamp
    pub fn with_timestamp(data: T, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            data,
            timestamp: timestamp.to_rfc3339(),
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Whether the operation was successful (always false for errors)
    pub success: bool,
    /// Error message describing what went wrong
    pub error: String,
    /// ISO timestamp of when the error occurred
    pub timestamp: String,
}

impl ApiError {
    /// Create a new API error response with the current timestamp
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// A listing card derived from a post document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    /// Post document id
    pub id: i64,
    /// Card serial: the document id, or the rank in rating order
    pub serial: i64,
    /// Display title
    pub title: String,
    /// Poster image URL
    pub image: String,
    /// Backdrop image URL
    pub backdrop: Option<String>,
    /// Best rating across seasons, "N/A" when none
    pub rating: String,
    /// Quality badge
    pub quality: String,
    /// Left card badge (year or override)
    pub year: String,
    /// Right card badge (format or override)
    pub format: String,
    /// Primary platform tag
    pub ppt: Option<String>,
    /// Streaming platforms
    pub platforms: Vec<PlatformLink>,
}

/// Filters applied to a post listing query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostListFilters {
    /// Title search query
    pub query: String,
    /// Normalized platform key filter
    pub platform: String,
    /// Sort order
    pub order: String,
}

/// Response wrapper for the post listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    /// Cards for the requested page
    pub items: Vec<PostSummary>,
    /// Current 1-based page
    pub page: u32,
    /// Total pages after filtering
    pub total_pages: u32,
    /// Total cards after filtering
    pub total_items: u32,
    /// Applied filters
    pub filters: PostListFilters,
}

/// One entry on the upcoming-premieres rail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEntry {
    /// Post document id
    pub id: i64,
    /// Post title
    pub title: String,
    /// Poster image URL
    pub image: String,
    /// Premiere instant
    pub countdown_date: DateTime<Utc>,
    /// Season name
    pub season_name: String,
    /// Episode headline
    pub episode_title: String,
}

/// One entry on the latest-episodes rail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestEpisodeEntry {
    /// Post document id
    pub id: i64,
    /// Post title
    pub title: String,
    /// Poster image URL
    pub image: String,
    /// Next release instant
    pub countdown_date: DateTime<Utc>,
    /// Season name
    pub season_name: String,
    /// Episode number airing next
    pub episode_number: u32,
    /// Episode headline
    pub episode_title: String,
}

/// One platform filter pill with its post count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformBucket {
    /// Normalized platform key
    pub key: String,
    /// Human display name
    pub display_name: String,
    /// Number of posts on this platform
    pub count: u32,
    /// Two-digit count badge text
    pub display_count: String,
}

/// One theme in the active cycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThemeEntry {
    /// Theme id (e.g. "dark")
    pub id: String,
    /// Human label (e.g. "Dark Mode")
    pub display_name: String,
}

/// Active theme cycle served to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    /// Themes in cycle order; dark is always first
    pub active: Vec<ThemeEntry>,
}

/// Countdown state for one season of a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountdownSnapshot {
    /// Season name
    pub season_name: String,
    /// Tag above the timer
    pub episode_tag: Option<String>,
    /// Headline next to the timer
    pub title: Option<String>,
    /// Countdown target
    pub target: DateTime<Utc>,
    /// Remaining time, absent once released
    pub remaining: Option<TimeParts>,
    /// Zero-padded `DD:HH:MM:SS` text, absent once released
    pub display: Option<String>,
    /// True once the target has passed
    pub released: bool,
}

/// Request body for the site visit analytics write
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequest {
    /// True for the first page view of a visitor's day
    #[serde(default)]
    pub new_session: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post_json() -> &'static str {
        r#"{
            "title": "Demon Slayer",
            "hero": {
                "poster": "https://img.example/ds-poster.jpg",
                "backdrop": "https://img.example/ds-backdrop.jpg",
                "tags": ["Action", "Fantasy"]
            },
            "seasons": [
                {
                    "name": "Season 3",
                    "type": "mixed",
                    "schedule": {"startDate": "2024-01-01"},
                    "overview": {
                        "studio": "ufotable",
                        "status": "Currently Airing",
                        "episodes": "4 / 12 Released",
                        "rating": "8.6"
                    }
                }
            ],
            "ppt": "crunchyroll",
            "cardBadgeLeft": "2024"
        }"#
    }

    #[test]
    fn test_post_deserialization_defaults() {
        let post: Post = serde_json::from_str(sample_post_json()).unwrap();

        assert_eq!(post.id, 0);
        assert_eq!(post.views, 0);
        assert_eq!(post.title, "Demon Slayer");
        assert!(post.cast.is_empty());
        assert!(post.platforms.is_empty());
        assert_eq!(post.card_badge_left.as_deref(), Some("2024"));
    }

    #[test]
    fn test_post_season_schedule_defaults() {
        let post: Post = serde_json::from_str(sample_post_json()).unwrap();
        let schedule = post.seasons[0].schedule.as_ref().unwrap();

        assert_eq!(schedule.start_episode, 1);
        assert_eq!(schedule.interval_days, 7);
        assert_eq!(schedule.episodes_per_release, 1);
    }

    #[test]
    fn test_post_serialization_uses_camel_case() {
        let post: Post = serde_json::from_str(sample_post_json()).unwrap();
        let json = serde_json::to_string(&post).unwrap();

        assert!(json.contains("\"cardBadgeLeft\""));
        assert!(json.contains("\"type\":\"mixed\""));
        assert!(json.contains("\"startDate\""));
        assert!(json.contains("\"statusClass\""));
    }

    #[test]
    fn test_gallery_entry_accepts_string_and_object() {
        let media: Media = serde_json::from_str(
            r#"{
                "trailers": [],
                "gallery": [
                    "https://img.example/one.jpg",
                    {"url": "https://img.example/two.jpg", "caption": "Key Visual"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(media.gallery.len(), 2);
        assert!(matches!(media.gallery[0], GalleryEntry::Url(_)));
        match &media.gallery[1] {
            GalleryEntry::Item(item) => assert_eq!(item.caption.as_deref(), Some("Key Visual")),
            GalleryEntry::Url(_) => panic!("expected object entry"),
        }
    }

    #[test]
    fn test_theme_settings_is_enabled() {
        let settings: ThemeSettings =
            serde_json::from_str(r#"{"christmas": true, "light": false}"#).unwrap();

        assert!(settings.is_enabled("christmas"));
        assert!(!settings.is_enabled("winter"));
        assert!(!settings.is_enabled("dark"));
        assert_eq!(settings.light, Some(false));
    }

    #[test]
    fn test_hero_slide_serialization() {
        let slide = HeroSlide {
            id: 1,
            backdrop: "https://img.example/backdrop.jpg".to_string(),
            logo: None,
            age_rating: Some("PG-13".to_string()),
            quality: Some("HD".to_string()),
            tags: Some("Action • Fantasy".to_string()),
            link: Some("12".to_string()),
            watch_link: Some("post.html?id=12".to_string()),
        };

        let json = serde_json::to_string(&slide).unwrap();
        assert!(json.contains("\"ageRating\""));
        assert!(json.contains("\"watchLink\""));
    }

    #[test]
    fn test_api_response_serialization() {
        let response = ApiResponse::new(vec!["item1", "item2"]);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"data\""));
        assert!(json.contains("\"timestamp\""));
    }

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("Something went wrong");

        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"error\":\"Something went wrong\""));
    }

    #[test]
    fn test_post_list_response_serialization() {
        let response = PostListResponse {
            items: vec![],
            page: 1,
            total_pages: 0,
            total_items: 0,
            filters: PostListFilters {
                query: "demon".to_string(),
                platform: "prime".to_string(),
                order: "rating".to_string(),
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"totalPages\""));
        assert!(json.contains("\"query\":\"demon\""));
        assert!(json.contains("\"order\":\"rating\""));
    }

    #[test]
    fn test_visit_request_defaults() {
        let request: VisitRequest = serde_json::from_str("{}").unwrap();
        assert!(!request.new_session);

        let request: VisitRequest = serde_json::from_str(r#"{"newSession": true}"#).unwrap();
        assert!(request.new_session);
    }

    #[test]
    fn test_countdown_snapshot_serialization() {
        let snapshot = CountdownSnapshot {
            season_name: "Season 3".to_string(),
            episode_tag: Some("NEXT EPISODE: EP 5".to_string()),
            title: Some("Episode 5".to_string()),
            target: "2024-06-01T15:00:00Z".parse().unwrap(),
            remaining: crate::schedule::decompose(90_061_000),
            display: Some("01:01:01:01".to_string()),
            released: false,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"seasonName\""));
        assert!(json.contains("\"episodeTag\""));
        assert!(json.contains("\"released\":false"));
    }
}
