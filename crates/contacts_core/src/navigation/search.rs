//! Sidebar search synchronization.
//!
//! Keeps the search input, its loading markers and the history stack in
//! step with the `q` parameter of the current and pending locations.
//!
//! # Invariants
//! - The first keystroke of a session pushes a history entry; later
//!   keystrokes replace it.
//! - Whenever the resolved query changes, the input shows it verbatim, and
//!   an absent query shows an empty input.
//! - While a search is pending the detail panel does not show its own
//!   loading marker.

use super::forms::Submission;
use super::location::{Location, SEARCH_PARAM};
use super::router::{NavigationController, NavigationState, SubmitOptions, TransitionId};

/// Whether a search is already reflected in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSession {
    /// No `q` on the current or pending location; next search pushes.
    Fresh,
    /// A `q` is present; next search replaces the entry.
    Active,
}

impl SearchSession {
    pub fn for_controller<C: NavigationController + ?Sized>(controller: &C) -> Self {
        let searching = controller.location().has_param(SEARCH_PARAM)
            || controller
                .pending_location()
                .is_some_and(|pending| pending.has_param(SEARCH_PARAM));

        if searching {
            Self::Active
        } else {
            Self::Fresh
        }
    }

    pub fn submit_options(self) -> SubmitOptions {
        SubmitOptions {
            replace: self == Self::Active,
        }
    }
}

/// Render state of the search form and the detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub input_value: String,
    /// `loading` class on the input.
    pub input_loading: bool,
    pub spinner_visible: bool,
    /// `loading` class on the detail panel.
    pub detail_loading: bool,
}

impl SearchView {
    /// View with no transition in flight, as rendered by the server.
    pub fn settled(resolved_query: Option<&str>) -> Self {
        Self {
            input_value: resolved_query.unwrap_or_default().to_string(),
            input_loading: false,
            spinner_visible: false,
            detail_loading: false,
        }
    }
}

/// True while the pending main transition carries a search term.
pub fn is_searching<C: NavigationController + ?Sized>(controller: &C) -> bool {
    controller
        .pending_location()
        .is_some_and(|location: &Location| location.has_param(SEARCH_PARAM))
}

/// Owns the displayed input value of the search field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySynchronizer {
    /// Route the search form submits to.
    action: String,
    resolved_query: Option<String>,
    input_value: String,
}

impl QuerySynchronizer {
    /// Mounts the field for the loader-resolved query.
    ///
    /// Whatever the browser restored into the input is discarded.
    pub fn mount(action: impl Into<String>, resolved_query: Option<String>) -> Self {
        let input_value = resolved_query.clone().unwrap_or_default();
        Self {
            action: action.into(),
            resolved_query,
            input_value,
        }
    }

    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    pub fn resolved_query(&self) -> Option<&str> {
        self.resolved_query.as_deref()
    }

    /// Feeds newly committed loader data.
    ///
    /// Returns `true` when the query changed and the input was overwritten.
    pub fn sync_resolved(&mut self, resolved_query: Option<String>) -> bool {
        if resolved_query == self.resolved_query {
            return false;
        }

        self.input_value = resolved_query.clone().unwrap_or_default();
        self.resolved_query = resolved_query;
        true
    }

    /// Handles one change event of the search field.
    pub fn on_input<C: NavigationController + ?Sized>(
        &mut self,
        value: impl Into<String>,
        controller: &mut C,
    ) -> TransitionId {
        self.input_value = value.into();
        let options = SearchSession::for_controller(&*controller).submit_options();
        let submission =
            Submission::get(self.action.clone()).field(SEARCH_PARAM, self.input_value.clone());
        controller.submit(submission, options)
    }

    pub fn view<C: NavigationController + ?Sized>(&self, controller: &C) -> SearchView {
        let searching = is_searching(controller);
        SearchView {
            input_value: self.input_value.clone(),
            input_loading: searching,
            spinner_visible: searching,
            detail_loading: controller.state() == NavigationState::Loading && !searching,
        }
    }
}
