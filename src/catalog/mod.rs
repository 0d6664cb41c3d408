//! Catalog module for listing, filtering, and season decoration
//!
//! Pure projections over post documents: card summaries for the listing
//! grid, sort orders, platform buckets, pagination, and the per-render
//! season decoration that folds schedule projections into display state.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::constants::platforms::DISPLAY_NAMES;
use crate::models::{
    LatestEpisodeEntry, PlatformBucket, Post, PostSummary, Season, UpcomingEntry,
};
use crate::schedule::{self, ScheduleError};

/// Season kind whose countdown date is authored rather than projected
const KIND_COUNTDOWN: &str = "countdown";

/// Build a listing card from a post document
///
/// The rating is the best numeric rating across seasons ("N/A" when no
/// season carries one); year and format fall back to the first season's
/// overview and can be overridden by the card badge fields.
pub fn summarize(post: &Post) -> PostSummary {
    let mut best = 0.0f64;
    let mut has_rating = false;
    for season in &post.seasons {
        let Some(overview) = &season.overview else { continue };
        let Some(text) = &overview.rating else { continue };
        if text == "--" || text == "N/A" {
            continue;
        }
        if let Ok(value) = text.trim().parse::<f64>() {
            if value > best {
                best = value;
                has_rating = true;
            }
        }
    }
    let rating = if has_rating {
        format_rating(best)
    } else {
        "N/A".to_string()
    };

    let first_overview = post.seasons.first().and_then(|s| s.overview.as_ref());
    let year = first_overview
        .and_then(|o| o.episodes.clone())
        .unwrap_or_else(|| "2024".to_string());
    let format = first_overview
        .and_then(|o| o.format.clone())
        .unwrap_or_else(|| "TV Series".to_string());

    PostSummary {
        id: post.id,
        serial: post.id,
        title: post.title.clone(),
        image: post.hero.poster.clone(),
        backdrop: post.hero.backdrop.clone(),
        rating,
        quality: "HD".to_string(),
        year: post.card_badge_left.clone().unwrap_or(year),
        format: post.card_badge_right.clone().unwrap_or(format),
        ppt: post.ppt.clone(),
        platforms: post.platforms.clone(),
    }
}

/// Render a rating the way scripts print numbers: no trailing ".0"
fn format_rating(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn parse_rating(text: &str) -> f64 {
    text.trim().parse().unwrap_or(0.0)
}

/// Sort cards newest-first (numeric id descending), the default view
pub fn sort_latest(items: &mut [PostSummary]) {
    items.sort_by(|a, b| b.id.cmp(&a.id));
}

/// Sort cards by rating descending and reassign serials as ranks 1..n
pub fn rank_by_rating(items: &mut [PostSummary]) {
    items.sort_by(|a, b| {
        parse_rating(&b.rating)
            .partial_cmp(&parse_rating(&a.rating))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (index, item) in items.iter_mut().enumerate() {
        item.serial = index as i64 + 1;
    }
}

/// Keep cards whose title contains the query, case-insensitively
pub fn filter_by_title(items: Vec<PostSummary>, query: &str) -> Vec<PostSummary> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| item.title.to_lowercase().contains(&query))
        .collect()
}

/// Normalize a raw platform tag into a filter key
///
/// Lowercases, strips whitespace, and folds label variants onto one key
/// (`primevideo` and `prime` are the same service, as are `disney+hotstar`
/// and `hotstar`).
pub fn normalize_platform_key(raw: &str) -> String {
    let key: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    match key.as_str() {
        "primevideo" => "prime".to_string(),
        "disney+hotstar" => "hotstar".to_string(),
        _ => key,
    }
}

/// All normalized platform keys a card belongs to
fn platform_keys(item: &PostSummary) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    if let Some(ppt) = &item.ppt {
        keys.insert(normalize_platform_key(ppt));
    }
    for platform in &item.platforms {
        let raw = platform.class.as_deref().unwrap_or(&platform.name);
        keys.insert(normalize_platform_key(raw));
    }
    keys.retain(|k| !k.is_empty());
    keys
}

/// Human display name for a normalized platform key
pub fn platform_display_name(key: &str) -> String {
    DISPLAY_NAMES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| {
            let mut chars = key.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
}

/// Count posts per platform, one bucket per normalized key
pub fn platform_buckets(items: &[PostSummary]) -> Vec<PlatformBucket> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for item in items {
        for key in platform_keys(item) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(key, count)| PlatformBucket {
            display_name: platform_display_name(&key),
            display_count: format!("{:02}", count),
            key,
            count,
        })
        .collect()
}

/// Keep cards available on the given platform
pub fn filter_by_platform(items: Vec<PostSummary>, platform: &str) -> Vec<PostSummary> {
    let key = normalize_platform_key(platform);
    if key.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| platform_keys(item).contains(&key))
        .collect()
}

/// Slice a 1-based page out of the card list, returning the page and the
/// total page count
pub fn paginate(items: Vec<PostSummary>, page: u32, per_page: u32) -> (Vec<PostSummary>, u32) {
    let per_page = per_page.max(1) as usize;
    let total_pages = items.len().div_ceil(per_page) as u32;
    let page = page.max(1) as usize;

    let start = (page - 1) * per_page;
    let page_items = items.into_iter().skip(start).take(per_page).collect();
    (page_items, total_pages)
}

/// Resolve a hero slide link to a navigable URL
///
/// Bare document ids become a post page link; full URLs and page links pass
/// through unchanged.
pub fn resolve_watch_link(link: &str) -> String {
    if link.contains("http") || link.contains(".html") {
        link.to_string()
    } else {
        format!("post.html?id={}", link)
    }
}

/// Decorate one season with freshly computed release state
///
/// Seasons without a schedule pass through untouched. Scheduled seasons get
/// a countdown pointing at the projected next release ("NEXT EPISODE: EP n"
/// tag, "Episode n" default title) and an episodes label reduced against the
/// declared total. Finished seasons drop the countdown and switch their
/// status to "Finished Airing". Returns a fresh value; the input season is
/// never mutated.
pub fn decorate_season(season: &Season, now: DateTime<Utc>) -> Result<Season, ScheduleError> {
    let mut decorated = season.clone();
    let Some(rule) = &season.schedule else {
        return Ok(decorated);
    };

    let projection = schedule::project(rule, now)?;

    let mut countdown = season.countdown.clone().unwrap_or_default();
    countdown.date = Some(projection.next_date.to_rfc3339());
    countdown.episode_tag = Some(format!("NEXT EPISODE: EP {}", projection.next_episode));
    if countdown.title.is_none() {
        countdown.title = Some(format!("Episode {}", projection.next_episode));
    }
    decorated.countdown = Some(countdown);

    if let Some(overview) = &season.overview {
        if let Some(text) = &overview.episodes {
            let status = schedule::reduce(rule, text, now)?;
            let mut overview = overview.clone();
            if let Some(label) = status.episodes_label {
                overview.episodes = Some(label);
            }
            if status.is_finished {
                overview.status = Some("Finished Airing".to_string());
                overview.status_class = Some(String::new());
                decorated.countdown = None;
            }
            decorated.overview = Some(overview);
        }
    }

    Ok(decorated)
}

/// Decorate every season of a post and give each one a unique panel id
pub fn decorate_post(post: &Post, now: DateTime<Utc>) -> Result<Post, ScheduleError> {
    let mut decorated = post.clone();
    let mut seen_ids = BTreeSet::new();
    let mut seasons = Vec::with_capacity(post.seasons.len());

    for (index, season) in post.seasons.iter().enumerate() {
        let mut season = decorate_season(season, now)?;
        let id = match season.id.take() {
            Some(id) if !seen_ids.contains(&id) => id,
            Some(id) => format!("{}-{}", id, index),
            None => format!("season-{}", index),
        };
        seen_ids.insert(id.clone());
        season.id = Some(id);
        seasons.push(season);
    }

    decorated.seasons = seasons;
    Ok(decorated)
}

/// Collect seasons with an authored premiere countdown still in the future
///
/// Soonest first, one entry per post (the soonest kept). Seasons with an
/// unparseable date are skipped.
pub fn upcoming_entries(posts: &[Post], now: DateTime<Utc>) -> Vec<UpcomingEntry> {
    let mut entries = Vec::new();

    for post in posts {
        for season in &post.seasons {
            if season.kind.as_deref() != Some(KIND_COUNTDOWN) {
                continue;
            }
            let Some(countdown) = &season.countdown else { continue };
            let Some(date_text) = &countdown.date else { continue };

            match schedule::parse_target(date_text) {
                Ok(date) if date > now => entries.push(UpcomingEntry {
                    id: post.id,
                    title: post.title.clone(),
                    image: post.hero.poster.clone(),
                    countdown_date: date,
                    season_name: season.name.clone(),
                    episode_title: countdown
                        .title
                        .clone()
                        .unwrap_or_else(|| "New Episode".to_string()),
                }),
                Ok(_) => {}
                Err(e) => {
                    warn!("skipping upcoming entry for post {}: {}", post.id, e);
                }
            }
        }
    }

    entries.sort_by_key(|entry| entry.countdown_date);

    let mut seen = BTreeSet::new();
    entries.retain(|entry| seen.insert(entry.id));
    entries
}

/// Collect the next release of every scheduled season
///
/// Soonest first. Seasons whose rule cannot produce a projection are skipped
/// so one corrupt record cannot blank the rail.
pub fn latest_episode_entries(posts: &[Post], now: DateTime<Utc>) -> Vec<LatestEpisodeEntry> {
    let mut entries = Vec::new();

    for post in posts {
        for season in &post.seasons {
            let Some(rule) = &season.schedule else { continue };

            let projection = match schedule::project(rule, now) {
                Ok(projection) => projection,
                Err(e) => {
                    warn!("skipping latest-episode entry for post {}: {}", post.id, e);
                    continue;
                }
            };

            let episode_title = season
                .countdown
                .as_ref()
                .and_then(|c| c.title.clone())
                .unwrap_or_else(|| format!("Episode {}", projection.next_episode));

            entries.push(LatestEpisodeEntry {
                id: post.id,
                title: post.title.clone(),
                image: post.hero.poster.clone(),
                countdown_date: projection.next_date,
                season_name: season.name.clone(),
                episode_number: projection.next_episode,
                episode_title,
            });
        }
    }

    entries.sort_by_key(|entry| entry.countdown_date);
    entries
}
