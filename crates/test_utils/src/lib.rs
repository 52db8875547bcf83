//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! catalog and claim scoring test suites.
//!
//! # Modules
//!
//! - `fixtures`: The demo catalog and reference claims
//! - `builders`: Builder patterns for test data construction
//! - `database`: PostgreSQL test container management
//! - `assertions`: Assertion helpers for neighborhoods and score outcomes
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
