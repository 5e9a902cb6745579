//! # Attendance Plan Backend
//!
//! Schedule ordering and calendar grouping for a personal academic planner.
//!
//! Users keep two kinds of schedules: institutional `master` entries and
//! personal `custom` entries. Schedules that share an owner, a start date and
//! a type carry a display order, assigned automatically when the client does
//! not supply one. Listing folds an owner's schedules into per-day groups,
//! split by type.
//!
//! ## Architecture
//!
//! - [`models`]: Schedule, Order, ScheduleList and DateItem value types
//! - [`db`]: Repository traits, in-memory storage and backend selection
//! - [`services`]: Schedule interactor and subject service
//! - [`auth`]: HMAC-signed session tokens
//! - [`config`]: Server settings from the environment
//! - [`http`]: Axum-based REST API (feature `http-server`)

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
