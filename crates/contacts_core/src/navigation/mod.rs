//! Client-side navigation model.
//!
//! # Responsibility
//! - Model the router, history stack and pending transitions explicitly so
//!   search, nav-link and favorite behavior can be driven without a browser.
//! - Keep the search input, loading markers and history consistent with
//!   asynchronous, superseding transitions.
//!
//! # Invariants
//! - Only the most recently started main transition may commit.
//! - Fetcher submissions never touch history or the main transition state.
//! - A whole typing session occupies one history entry.

pub mod favorite;
pub mod forms;
pub mod links;
pub mod location;
pub mod router;
pub mod search;
