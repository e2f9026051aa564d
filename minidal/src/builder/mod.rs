//! Statement builders
//!
//! Pure functions turning a table name plus ordered column/value input into
//! a [`Query`]. Values always travel as `%s` arguments; identifiers do not.

pub mod common;
pub mod select;
pub mod insert;
pub mod update;
pub mod delete;

pub use common::{Fields, Query, PLACEHOLDER};
pub use select::build_select;
pub use insert::build_insert;
pub use update::build_update;
pub use delete::build_delete;
