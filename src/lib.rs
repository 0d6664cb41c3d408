//! Anime Catalog API Library
//!
//! This library serves an anime/series catalog (posts, seasons, cast, media)
//! from PostgreSQL and derives episode release countdowns from declarative
//! schedules.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod schedule;
pub mod themes;
