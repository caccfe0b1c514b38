//! Record store abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the CRUD contract consumed by services and routes.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths call `Contact::validate()` before persisting.
//! - Missing ids surface as `RepoError::NotFound`, not as transport errors.
//! - `list_contacts` orders by last name (absent last), then creation time, then id.

pub mod contact_repo;
pub mod memory_repo;
