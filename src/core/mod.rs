//! Core business logic - framework-agnostic game and aggregation rules.
//!
//! Everything in here takes a database connection and plain data; nothing
//! knows about HTTP. The points engine and monthly aggregator are the heart
//! of the system, the per-record modules wire them into transactional CRUD.

/// Booking records and their ledger effects
pub mod booking;
/// Daily activity digest for the team channel
pub mod digest;
/// Meeting records and their ledger effects
pub mod meeting;
/// Offer records and their ledger effects
pub mod offer;
/// Points engine: deltas, thresholds, level arithmetic
pub mod points;
/// Profile ledger lifecycle, settings, leaderboard, level-up
pub mod profile;
/// Sale records, service line-items, provisions
pub mod sale;
/// Service catalog management
pub mod service;
/// Monthly windows and dashboard aggregates
pub mod stats;
