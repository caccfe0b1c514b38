//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into loader/action level APIs.
//! - Keep HTTP and CLI layers decoupled from storage details.

pub mod contact_service;
