//! Navigation controller contract and the in-memory router.
//!
//! # Invariants
//! - At most one main transition is pending; starting another supersedes it.
//! - Settling a superseded transition neither commits data nor touches history.
//! - A pending push that gets superseded by a replace is still recorded as a
//!   push, so the entry it would have created is not lost.

use super::forms::{FormMethod, Submission};
use super::location::Location;
use log::debug;

/// Lifecycle of the main navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationState {
    Idle,
    /// A GET navigation is running its destination loader.
    Loading,
    /// A POST submission is running a route action.
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionId(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Push,
    Replace,
    /// Move to an existing entry (back/forward).
    Traverse(usize),
}

/// Outcome of settling a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Committed,
    /// A newer transition started first; the result was dropped.
    Superseded,
    /// The transition was abandoned; committed state is unchanged.
    Failed,
}

/// What the search and link components read from the router.
pub trait NavigationController {
    fn state(&self) -> NavigationState;
    /// Committed location.
    fn location(&self) -> &Location;
    /// Destination of the pending transition, if any.
    fn pending_location(&self) -> Option<&Location>;
    fn submit(&mut self, submission: Submission, options: SubmitOptions) -> TransitionId;
}

#[derive(Debug, Clone)]
struct PendingTransition {
    id: TransitionId,
    location: Location,
    state: NavigationState,
    action: HistoryAction,
}

/// History stack plus the loader data committed for the current entry.
#[derive(Debug, Clone)]
pub struct Router<D> {
    entries: Vec<Location>,
    index: usize,
    data: Option<D>,
    pending: Option<PendingTransition>,
    next_id: u64,
}

impl<D> Router<D> {
    /// Starts with a single history entry and no loader data.
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            data: None,
            pending: None,
            next_id: 0,
        }
    }

    /// Starts with a single history entry whose loader already ran.
    pub fn with_data(initial: Location, data: D) -> Self {
        let mut router = Self::new(initial);
        router.data = Some(data);
        router
    }

    /// Loader data for the committed location.
    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    /// All history entries, including forward entries after `back`.
    pub fn history(&self) -> &[Location] {
        &self.entries
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    pub fn history_index(&self) -> usize {
        self.index
    }

    pub fn pending_id(&self) -> Option<TransitionId> {
        self.pending.as_ref().map(|pending| pending.id)
    }

    /// Link navigation: pushes `to` once its loader settles.
    pub fn navigate(&mut self, to: Location) -> TransitionId {
        self.begin(to, NavigationState::Loading, HistoryAction::Push)
    }

    /// Starts a transition to the previous entry; `None` at the first entry.
    pub fn back(&mut self) -> Option<TransitionId> {
        let target = self.index.checked_sub(1)?;
        let location = self.entries[target].clone();
        Some(self.begin(
            location,
            NavigationState::Loading,
            HistoryAction::Traverse(target),
        ))
    }

    /// Commits `data` for transition `id` at its own destination.
    pub fn settle(&mut self, id: TransitionId, data: D) -> Settled {
        match self.take_pending(id) {
            Some(pending) => {
                self.commit(pending.location, pending.action, data);
                Settled::Committed
            }
            None => Settled::Superseded,
        }
    }

    /// Commits `data` for transition `id` at the location an action redirected to.
    pub fn settle_redirect(&mut self, id: TransitionId, to: Location, data: D) -> Settled {
        match self.take_pending(id) {
            Some(pending) => {
                let action = match pending.action {
                    HistoryAction::Traverse(_) => HistoryAction::Push,
                    other => other,
                };
                self.commit(to, action, data);
                Settled::Committed
            }
            None => Settled::Superseded,
        }
    }

    /// Abandons transition `id` after a failed load, keeping the committed state.
    pub fn fail(&mut self, id: TransitionId) -> Settled {
        match self.take_pending(id) {
            Some(_) => Settled::Failed,
            None => Settled::Superseded,
        }
    }

    fn begin(
        &mut self,
        location: Location,
        state: NavigationState,
        action: HistoryAction,
    ) -> TransitionId {
        let action = match (action, self.pending.as_ref()) {
            (HistoryAction::Replace, Some(previous)) if previous.action == HistoryAction::Push => {
                HistoryAction::Push
            }
            _ => action,
        };

        if let Some(previous) = &self.pending {
            debug!(
                "event=transition_superseded module=navigation superseded_id={} location={}",
                previous.id.0, previous.location
            );
        }

        self.next_id += 1;
        let id = TransitionId(self.next_id);
        debug!(
            "event=transition_start module=navigation id={} state={state:?} action={action:?} location={location}",
            id.0
        );
        self.pending = Some(PendingTransition {
            id,
            location,
            state,
            action,
        });
        id
    }

    fn take_pending(&mut self, id: TransitionId) -> Option<PendingTransition> {
        if self.pending.as_ref().map(|pending| pending.id) == Some(id) {
            return self.pending.take();
        }

        debug!(
            "event=transition_settle module=navigation status=superseded id={}",
            id.0
        );
        None
    }

    fn commit(&mut self, location: Location, action: HistoryAction, data: D) {
        match action {
            HistoryAction::Push => {
                self.entries.truncate(self.index + 1);
                self.entries.push(location);
                self.index = self.entries.len() - 1;
            }
            HistoryAction::Replace => {
                self.entries[self.index] = location;
            }
            HistoryAction::Traverse(target) => {
                self.index = target.min(self.entries.len() - 1);
            }
        }
        self.data = Some(data);
    }
}

impl<D> NavigationController for Router<D> {
    fn state(&self) -> NavigationState {
        self.pending
            .as_ref()
            .map_or(NavigationState::Idle, |pending| pending.state)
    }

    fn location(&self) -> &Location {
        &self.entries[self.index]
    }

    fn pending_location(&self) -> Option<&Location> {
        self.pending.as_ref().map(|pending| &pending.location)
    }

    fn submit(&mut self, submission: Submission, options: SubmitOptions) -> TransitionId {
        let state = match submission.method {
            FormMethod::Get => NavigationState::Loading,
            FormMethod::Post => NavigationState::Submitting,
        };
        let action = if options.replace {
            HistoryAction::Replace
        } else {
            HistoryAction::Push
        };
        self.begin(submission.target(), state, action)
    }
}
