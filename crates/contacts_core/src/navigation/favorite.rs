//! Favorite toggle cell.
//!
//! Submits through its own fetcher: no history entry, no effect on the main
//! navigation state, and the glyph only changes once the server confirmed.

use super::forms::Submission;
use crate::model::contact::{Contact, ContactId};

/// Form field carrying the requested favorite value.
pub const FAVORITE_FIELD: &str = "favorite";

/// Reads the favorite field of an action payload: only `"true"` means true.
pub fn parse_favorite_field(value: Option<&str>) -> bool {
    value == Some("true")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetcherState {
    Idle,
    Submitting,
}

/// Render state of the toggle button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteView {
    pub glyph: &'static str,
    pub aria_label: &'static str,
    /// Value the button submits when activated.
    pub next_value: &'static str,
}

impl FavoriteView {
    pub fn for_state(favorite: bool) -> Self {
        if favorite {
            Self {
                glyph: "★",
                aria_label: "Remove from favorites",
                next_value: "false",
            }
        } else {
            Self {
                glyph: "☆",
                aria_label: "Add to favorites",
                next_value: "true",
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteToggle {
    contact_id: ContactId,
    confirmed: bool,
    fetcher: FetcherState,
}

impl FavoriteToggle {
    pub fn new(contact: &Contact) -> Self {
        Self {
            contact_id: contact.id.clone(),
            confirmed: contact.favorite,
            fetcher: FetcherState::Idle,
        }
    }

    /// Last favorite value confirmed by the server.
    pub fn is_favorite(&self) -> bool {
        self.confirmed
    }

    pub fn fetcher_state(&self) -> FetcherState {
        self.fetcher
    }

    pub fn view(&self) -> FavoriteView {
        FavoriteView::for_state(self.confirmed)
    }

    /// Builds the non-navigating submission flipping the confirmed value.
    pub fn activate(&mut self) -> Submission {
        self.fetcher = FetcherState::Submitting;
        Submission::post(format!("/contacts/{}", self.contact_id))
            .field(FAVORITE_FIELD, self.view().next_value)
    }

    /// Accepts the revalidated record after the action completed.
    ///
    /// Records for other contacts are ignored.
    pub fn confirm(&mut self, contact: &Contact) {
        if contact.id != self.contact_id {
            return;
        }
        self.confirmed = contact.favorite;
        self.fetcher = FetcherState::Idle;
    }

    /// Drops the in-flight submission without changing the confirmed value.
    pub fn reject(&mut self) {
        self.fetcher = FetcherState::Idle;
    }
}
