//! # habitree-core
//!
//! Core library for habitree - a personal habit, task and focus tracker.
//!
//! This library provides:
//! - Domain types for habits, tasks, pomodoro sessions and journal entries
//! - Local calendar day keys with DST-safe day arithmetic
//! - The habit streak engine
//! - Windowed analytics: KPIs, focus heatmap, insights and trend series
//! - Record stores over a flat JSON key-value storage
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Computation and state are kept apart:
//! - **Stores** ([`store`]) own the records and are the only mutation points.
//!   Each mutation recomputes derived fields before returning.
//! - **Analytics** ([`analytics`], [`streak`]) are pure functions over a
//!   borrowed [`AnalyticsSnapshot`](analytics::AnalyticsSnapshot).
//! - **Persistence** ([`storage`]) is an explicit `save` after mutating.
//!
//! ## Example
//!
//! ```rust,no_run
//! use habitree_core::analytics::{filtered_data, generate_insights};
//! use habitree_core::storage::FileStore;
//! use habitree_core::{Config, DateRange, DayKey, Workspace};
//!
//! let config = Config::load().expect("failed to load config");
//! let store = FileStore::open(config.data_dir()).expect("failed to open store");
//! let workspace = Workspace::load(&store, DayKey::today()).expect("failed to load records");
//!
//! let window = filtered_data(&workspace.snapshot(), DateRange::Weekly, &chrono::Local::now());
//! for insight in generate_insights(&window) {
//!     println!("{}", insight);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use date::DayKey;
pub use error::{Error, Result};
pub use store::Workspace;
pub use streak::{compute_streaks, Streaks};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod date;
pub mod error;
pub mod format;
pub mod logging;
pub mod storage;
pub mod store;
pub mod streak;
pub mod types;
