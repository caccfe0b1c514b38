//! In-memory contact repository.
//!
//! Used by tests and by the server's `:memory:` mode when SQLite is not
//! wanted. Ordering and filtering match `SqliteContactRepository`.

use crate::model::contact::{Contact, ContactId, ContactPatch};
use crate::repo::contact_repo::{ContactRepository, RepoError, RepoResult};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryContactRepository {
    contacts: Mutex<Vec<Contact>>,
}

impl MemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository pre-filled with `contacts`.
    pub fn with_contacts(contacts: impl IntoIterator<Item = Contact>) -> Self {
        Self {
            contacts: Mutex::new(contacts.into_iter().collect()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Contact>> {
        // Writes are a single push or assign, so rows stay consistent after a poison.
        self.contacts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ContactRepository for MemoryContactRepository {
    fn list_contacts(&self, query: Option<&str>) -> RepoResult<Vec<Contact>> {
        let mut contacts: Vec<Contact> = self
            .lock()
            .iter()
            .filter(|contact| query.map_or(true, |needle| contact.matches_query(needle)))
            .cloned()
            .collect();

        contacts.sort_by(|left, right| {
            let left_key = (
                left.last.is_none(),
                left.last.as_deref().map(str::to_ascii_lowercase),
                left.created_at,
                &left.id,
            );
            let right_key = (
                right.last.is_none(),
                right.last.as_deref().map(str::to_ascii_lowercase),
                right.created_at,
                &right.id,
            );
            left_key.cmp(&right_key)
        });

        Ok(contacts)
    }

    fn get_contact(&self, id: &ContactId) -> RepoResult<Option<Contact>> {
        Ok(self.lock().iter().find(|contact| &contact.id == id).cloned())
    }

    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId> {
        contact.validate()?;

        let mut contacts = self.lock();
        if contacts.iter().any(|existing| existing.id == contact.id) {
            return Err(RepoError::InvalidData(format!(
                "duplicate contact id `{}`",
                contact.id
            )));
        }
        contacts.push(contact.clone());

        Ok(contact.id.clone())
    }

    fn update_contact(&self, id: &ContactId, patch: &ContactPatch) -> RepoResult<Contact> {
        let mut contacts = self.lock();
        let slot = contacts
            .iter_mut()
            .find(|contact| &contact.id == id)
            .ok_or_else(|| RepoError::NotFound(id.clone()))?;

        let mut updated = slot.clone();
        updated.apply(patch);
        updated.validate()?;
        *slot = updated.clone();

        Ok(updated)
    }

    fn delete_contact(&self, id: &ContactId) -> RepoResult<()> {
        let mut contacts = self.lock();
        let before = contacts.len();
        contacts.retain(|contact| &contact.id != id);

        if contacts.len() == before {
            return Err(RepoError::NotFound(id.clone()));
        }

        Ok(())
    }
}
