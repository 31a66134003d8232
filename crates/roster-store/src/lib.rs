//! `roster-store`: data access for the `roster` and `teams` tables.
//!
//! # Backends
//!
//! | Backend       | Transport                          |
//! |---------------|------------------------------------|
//! | `SqliteStore` | local SQLite file via rusqlite     |
//! | `RestStore`   | hosted PostgREST (Supabase) API    |
//!
//! Both implement [`RosterStore`], so the gateway never knows which one it
//! is talking to. Queries are plain filtered selects, upserts and deletes;
//! nothing is cached.

pub mod db;
pub mod error;
pub mod rest;
pub mod sqlite;
pub mod store;

pub use error::{Result, StoreError};
pub use rest::RestStore;
pub use sqlite::SqliteStore;
pub use store::RosterStore;
