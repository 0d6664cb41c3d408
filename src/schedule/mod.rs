//! Schedule module for episode release projection
//!
//! This module derives "what episode airs next and when" from a season's
//! declarative release schedule, folds that projection into a display status,
//! and drives live countdown timers toward a target instant.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration as TickPeriod, Instant};
use tracing::warn;
use utoipa::ToSchema;

/// Milliseconds per day
pub const MS_PER_DAY: i64 = 86_400_000;
/// Milliseconds per hour
pub const MS_PER_HOUR: i64 = 3_600_000;
/// Milliseconds per minute
pub const MS_PER_MINUTE: i64 = 60_000;
/// Milliseconds per second
pub const MS_PER_SECOND: i64 = 1_000;

/// Errors raised by schedule projection and countdown setup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A schedule rule or countdown target that cannot produce a valid projection
    #[error("Invalid schedule configuration: {0}")]
    Configuration(String),
}

/// Declarative recurrence describing a season's release cadence
///
/// Missing fields default to one episode per weekly release, matching how
/// catalog documents are authored. Explicitly non-positive values are kept
/// as-is and rejected by [`project`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRule {
    /// First anchor release date (RFC 3339 or `YYYY-MM-DD`)
    pub start_date: String,
    /// Episode number airing at `start_date`
    #[serde(default = "default_start_episode")]
    pub start_episode: u32,
    /// Days between successive releases
    #[serde(default = "default_interval_days")]
    pub interval_days: i64,
    /// Episodes added at each release
    #[serde(default = "default_episodes_per_release")]
    pub episodes_per_release: i64,
}

fn default_start_episode() -> u32 {
    1
}

fn default_interval_days() -> i64 {
    7
}

fn default_episodes_per_release() -> i64 {
    1
}

/// Output of one projection run: the next future release
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Release instant strictly after the reference "now"
    pub next_date: DateTime<Utc>,
    /// Episode number airing at `next_date`
    pub next_episode: u32,
}

/// Derived display state for one season
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStatus {
    /// Episodes aired strictly before the upcoming release
    pub released_count: u32,
    /// Declared total, when the episodes text carries one
    pub total_episodes: Option<u32>,
    /// True once every declared episode has aired
    pub is_finished: bool,
    /// True when no countdown should be shown for this season
    pub countdown_suppressed: bool,
    /// Reformatted `"<released> / <total...>"` text, when one could be built
    pub episodes_label: Option<String>,
}

/// Parse a countdown target date
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`, and bare
/// `YYYY-MM-DD` (midnight UTC). Anything else is a configuration error,
/// raised before any timer is armed.
pub fn parse_target(text: &str) -> Result<DateTime<Utc>, ScheduleError> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(ScheduleError::Configuration(format!(
        "unparseable countdown date: {:?}",
        text
    )))
}

/// Project the next future release for a schedule rule
///
/// Steps from `(start_date, start_episode)` by `interval_days` and
/// `episodes_per_release` until the release date strictly exceeds `now`.
/// A release landing exactly on `now` counts as already aired, so the
/// projection points at the following one. Pure and deterministic.
pub fn project(rule: &ScheduleRule, now: DateTime<Utc>) -> Result<ProjectionResult, ScheduleError> {
    if rule.interval_days <= 0 {
        return Err(ScheduleError::Configuration(format!(
            "intervalDays must be positive, got {}",
            rule.interval_days
        )));
    }
    if rule.episodes_per_release <= 0 {
        return Err(ScheduleError::Configuration(format!(
            "episodesPerRelease must be positive, got {}",
            rule.episodes_per_release
        )));
    }

    let start_date = parse_target(&rule.start_date)?;

    // Closed form for the stepped recurrence: count releases at or before
    // `now`, then land one interval past the last of them. Equivalent to
    // advancing the date until it strictly exceeds `now`.
    let mut steps: i64 = 0;
    if now >= start_date {
        let elapsed_ms = (now - start_date).num_milliseconds();
        let interval_ms = rule.interval_days * MS_PER_DAY;
        steps = elapsed_ms / interval_ms + 1;
    }

    let next_date = start_date + Duration::days(rule.interval_days * steps);
    let next_episode = i64::from(rule.start_episode) + steps * rule.episodes_per_release;

    Ok(ProjectionResult {
        next_date,
        next_episode: u32::try_from(next_episode).unwrap_or(u32::MAX),
    })
}

/// Extract the first contiguous run of digits from a string
fn first_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Fold a projection into a season's display status
///
/// `declared_total_text` is the stored `"<released> / <total...>"` episodes
/// text; the first integer after the slash is the declared total. A text
/// without a slash or total leaves the season permanently unfinished and the
/// stored text untouched. Returns a fresh value; inputs are never mutated.
pub fn reduce(
    rule: &ScheduleRule,
    declared_total_text: &str,
    now: DateTime<Utc>,
) -> Result<SeasonStatus, ScheduleError> {
    let projection = project(rule, now)?;

    let released = i64::from(projection.next_episode) - rule.episodes_per_release;
    let released_count = u32::try_from(released.max(0)).unwrap_or(0);

    let total_text = declared_total_text
        .split_once('/')
        .map(|(_, rest)| rest.trim().to_string());

    let Some(total_text) = total_text else {
        warn!(
            "episodes text {:?} has no '/' separator, treating total as unknown",
            declared_total_text
        );
        return Ok(SeasonStatus {
            released_count,
            total_episodes: None,
            is_finished: false,
            countdown_suppressed: false,
            episodes_label: None,
        });
    };

    let total_episodes = first_integer(&total_text);
    if total_episodes.is_none() {
        warn!(
            "episodes text {:?} has no numeric total, season never finishes",
            declared_total_text
        );
    }

    let is_finished = total_episodes.is_some_and(|total| released_count >= total);

    let episodes_label = if is_finished {
        // Pin the label at the declared total once everything has aired.
        total_episodes.map(|total| format!("{} / {}", total, total_text))
    } else {
        Some(format!("{} / {}", released_count, total_text))
    };

    Ok(SeasonStatus {
        released_count,
        total_episodes,
        is_finished,
        countdown_suppressed: is_finished,
        episodes_label,
    })
}

/// Remaining time decomposed into display units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeParts {
    /// Whole days remaining
    pub days: i64,
    /// Whole hours after removing days
    pub hours: i64,
    /// Whole minutes after removing hours
    pub minutes: i64,
    /// Whole seconds after removing minutes
    pub seconds: i64,
}

impl TimeParts {
    /// Two-digit zero-padded `DD:HH:MM:SS` display
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Decompose a countdown distance in milliseconds into display units
///
/// Returns `None` once the distance has gone negative (target passed).
pub fn decompose(distance_ms: i64) -> Option<TimeParts> {
    if distance_ms < 0 {
        return None;
    }
    Some(TimeParts {
        days: distance_ms / MS_PER_DAY,
        hours: (distance_ms % MS_PER_DAY) / MS_PER_HOUR,
        minutes: (distance_ms % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (distance_ms % MS_PER_MINUTE) / MS_PER_SECOND,
    })
}

/// Handle owning one live countdown task
///
/// Cancelling stops the periodic tick immediately; no callback fires
/// afterward. The task also stops itself after expiry, so an unused handle
/// does not leak a timer past its target.
#[derive(Debug)]
pub struct CountdownHandle {
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Stop the countdown; no further `on_tick` or `on_expire` calls fire
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the countdown task has stopped (expired or cancelled)
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Start a live countdown toward `target`
///
/// Fires `on_tick` once per second at a fixed rate with the remaining time
/// decomposed into [`TimeParts`]. On the first tick past the target the
/// periodic task stops and `on_expire` runs exactly once. The initial
/// distance is taken from the wall clock; subsequent ticks subtract elapsed
/// runtime time, so long countdowns may drift by tick-scheduling latency.
pub fn start_countdown<T, E>(target: DateTime<Utc>, mut on_tick: T, on_expire: E) -> CountdownHandle
where
    T: FnMut(TimeParts) + Send + 'static,
    E: FnOnce() + Send + 'static,
{
    let initial_ms = (target - Utc::now()).num_milliseconds();

    let task = tokio::spawn(async move {
        let period = TickPeriod::from_secs(1);
        let started = Instant::now();
        let mut ticks = interval_at(started + period, period);
        let mut on_expire = Some(on_expire);

        loop {
            ticks.tick().await;
            let elapsed_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
            match decompose(initial_ms - elapsed_ms) {
                Some(parts) => on_tick(parts),
                None => {
                    if let Some(expire) = on_expire.take() {
                        expire();
                    }
                    break;
                }
            }
        }
    });

    CountdownHandle { task }
}
