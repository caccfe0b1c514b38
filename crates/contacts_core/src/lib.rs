//! Core domain logic for the contacts manager.
//! This crate is the single source of truth for record and navigation invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{normalize_text, Contact, ContactId, ContactPatch, ContactValidationError};
pub use navigation::favorite::{parse_favorite_field, FavoriteToggle, FavoriteView, FAVORITE_FIELD};
pub use navigation::forms::{confirm_delete, FormMethod, Submission, DELETE_CONFIRMATION_PROMPT};
pub use navigation::links::{nav_link_state, nav_link_state_for, NavLinkState};
pub use navigation::location::{Location, SEARCH_PARAM};
pub use navigation::router::{
    NavigationController, NavigationState, Router, Settled, SubmitOptions, TransitionId,
};
pub use navigation::search::{is_searching, QuerySynchronizer, SearchSession, SearchView};
pub use repo::contact_repo::{ContactRepository, RepoError, RepoResult, SqliteContactRepository};
pub use repo::memory_repo::MemoryContactRepository;
pub use service::contact_service::{ContactService, ContactServiceError, ServiceResult};

/// Minimal health-check API used by the CLI probe and `/healthz`.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
