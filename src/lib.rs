//! triggerd: trigger management core of a metrics alerting service
//!
//! Keeps a trigger's persisted check state consistent when its definition
//! changes, resolves throttling, and verifies target expressions against the
//! retention of the metric source they read from.
//!
//! # Features
//!
//! - **Check-state reconciliation**: saving a trigger prunes metrics its targets
//!   no longer produce, under a per-trigger TTL lock
//! - **Throttling**: the next allowed notification time, or 0 when not throttled
//! - **Target parsing**: graphite-style expressions and the patterns they read
//! - **Target validation**: a tree of problems mirroring the call structure
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashSet;
//! use triggerd::controller::save_trigger;
//! use triggerd::model::Trigger;
//! use triggerd::storage::InMemoryDatabase;
//!
//! let db = InMemoryDatabase::new();
//! let trigger = Trigger::new("t1", "cpu", vec!["servers.*.cpu".to_string()]);
//! let live: HashSet<String> = ["servers.a.cpu".to_string()].into();
//!
//! let resp = save_trigger(&db, &trigger, "t1", &live).unwrap();
//! println!("{}", resp.message);
//! ```

pub mod config;
pub mod controller;
pub mod model;
pub mod storage;
pub mod target;

// Re-export commonly used types
pub use config::MetricTtlConfig;
pub use controller::ApiError;
pub use model::{CheckData, MetricState, State, Trigger};
pub use storage::{Database, InMemoryDatabase, StoreError};
