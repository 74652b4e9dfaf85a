//! Outbound adapters implementing the domain repository ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM.
//! - **memory**: a mutex-guarded arena used without a database and in tests.
//!
//! Adapters translate between domain types and storage representations and
//! carry no business rules beyond the constraints the schema enforces.

pub mod memory;
pub mod persistence;
