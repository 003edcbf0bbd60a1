pub mod database;
pub mod memory;
pub mod pattern;

pub use database::{Database, StoreError};
pub use memory::InMemoryDatabase;
pub use pattern::glob_to_regex;
