//! Functional core for querykit.
//!
//! Pure types and functions only: the value model, result materialization,
//! coercion rules, driver capability traits and connection configuration.
//! Everything that performs I/O lives in the `querykit` crate.

pub mod database;
pub mod query;
