//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its partial-update shape.
//!
//! # Invariants
//! - Every contact is identified by a stable `ContactId`.
//! - Absent text fields are `None`, never an empty string.

pub mod contact;
