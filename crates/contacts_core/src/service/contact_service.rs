//! Contact use-case service.
//!
//! # Responsibility
//! - Provide the loader/action entry points used by routes.
//! - Turn absent records into `ContactNotFound` where a route requires one.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Created contacts are returned from read-back, not from the input value.

use crate::model::contact::{Contact, ContactId, ContactPatch};
use crate::repo::contact_repo::{ContactRepository, RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for contact use-cases.
#[derive(Debug)]
pub enum ContactServiceError {
    /// Target contact does not exist.
    ContactNotFound(ContactId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ContactServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent contact state: {details}"),
        }
    }
}

impl Error for ContactServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ContactServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ContactNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ContactServiceError>;

/// Contact service facade over repository implementations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists contacts for the sidebar. A blank query lists everything.
    pub fn list_contacts(&self, query: Option<&str>) -> RepoResult<Vec<Contact>> {
        let query = query.map(str::trim).filter(|value| !value.is_empty());
        self.repo.list_contacts(query)
    }

    /// Gets one contact, `None` when absent.
    pub fn get_contact(&self, id: &ContactId) -> RepoResult<Option<Contact>> {
        self.repo.get_contact(id)
    }

    /// Gets one contact, failing with `ContactNotFound` when absent.
    pub fn require_contact(&self, id: &ContactId) -> ServiceResult<Contact> {
        self.repo
            .get_contact(id)?
            .ok_or_else(|| ContactServiceError::ContactNotFound(id.clone()))
    }

    /// Creates an empty contact with a fresh id.
    pub fn create_empty_contact(&self) -> ServiceResult<Contact> {
        let contact = Contact::new();
        let id = self.repo.create_contact(&contact)?;
        info!("event=contact_create module=service status=ok contact_id={id}");

        self.repo
            .get_contact(&id)?
            .ok_or(ContactServiceError::InconsistentState(
                "created contact not found in read-back",
            ))
    }

    /// Applies a partial update and returns the stored contact.
    pub fn update_contact(&self, id: &ContactId, patch: &ContactPatch) -> ServiceResult<Contact> {
        match self.repo.update_contact(id, patch) {
            Ok(contact) => Ok(contact),
            Err(err) => {
                warn!("event=contact_update module=service status=error contact_id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Sets the favorite flag only.
    pub fn set_favorite(&self, id: &ContactId, favorite: bool) -> ServiceResult<Contact> {
        self.update_contact(id, &ContactPatch::favorite(favorite))
    }

    /// Deletes a contact by id.
    pub fn delete_contact(&self, id: &ContactId) -> ServiceResult<()> {
        self.repo.delete_contact(id)?;
        info!("event=contact_delete module=service status=ok contact_id={id}");
        Ok(())
    }
}
