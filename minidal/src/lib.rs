//! minidal - a minimal data-access layer
//!
//! Builds parameterized SELECT, INSERT, UPDATE and DELETE statements from
//! ordered column/value input and runs them through a [`Connection`].
//!
//! ```
//! use minidal::{build_update, Fields, Value};
//!
//! let query = build_update(
//!     "users",
//!     &Fields::new().with("age", 6),
//!     &Fields::new().with("name", "Bob"),
//! )
//! .unwrap();
//! assert_eq!(query.sql(), "UPDATE users SET age = %s WHERE name = %s");
//! assert_eq!(query.parameters(), &[Value::I32(6), Value::from("Bob")]);
//! ```
//!
//! Values are always bound as arguments. Table and column names are copied
//! into the statement text as given and must never come from untrusted input.

pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod row;
pub mod value;

// Re-export main types
pub use builder::{build_delete, build_insert, build_select, build_update, Fields, Query};
pub use config::ConnectionConfig;
pub use error::{Error, Result};
pub use executor::{render_placeholders, Connection, Executor, Expect, Outcome, PlaceholderStyle};
pub use row::Row;
pub use value::Value;

#[cfg(feature = "mysql")]
pub use executor::mysql::MySqlBackend;
#[cfg(feature = "postgres")]
pub use executor::postgres::PostgresBackend;
#[cfg(feature = "sqlite")]
pub use executor::sqlite::SqliteBackend;
