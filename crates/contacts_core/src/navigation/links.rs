//! Sidebar nav-link state.

use super::location::Location;
use super::router::NavigationController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLinkState {
    /// Link target is the committed location.
    Active,
    /// Link target is where the pending transition is heading.
    Pending,
    Inactive,
}

impl NavLinkState {
    /// CSS class rendered on the link.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Inactive => "",
        }
    }
}

/// Resolves link state by path; query parameters are ignored.
///
/// A link also matches the nested routes below it, so `/contacts/1` is
/// active on `/contacts/1/edit`.
pub fn nav_link_state(target: &str, current: &Location, pending: Option<&Location>) -> NavLinkState {
    if is_within(&current.path, target) {
        NavLinkState::Active
    } else if pending.is_some_and(|location| is_within(&location.path, target)) {
        NavLinkState::Pending
    } else {
        NavLinkState::Inactive
    }
}

pub fn nav_link_state_for<C: NavigationController + ?Sized>(
    target: &str,
    controller: &C,
) -> NavLinkState {
    nav_link_state(target, controller.location(), controller.pending_location())
}

fn is_within(path: &str, target: &str) -> bool {
    match path.strip_prefix(target) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
