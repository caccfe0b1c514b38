use std::sync::{Arc, Mutex};

use contacts_core::{
    db::{open_db, DbResult},
    ContactRepository, ContactService, MemoryContactRepository, SqliteContactRepository,
};
use rusqlite::Connection;

use super::{config::Config, error::AppError};

/// Backing record store. SQLite connections are not `Sync`, so a single
/// connection is shared behind a mutex and every store call holds it briefly.
pub enum ContactStore {
    Sqlite(Mutex<Connection>),
    Memory(MemoryContactRepository),
}

impl ContactStore {
    /// Opens the store selected by `config.db_path`.
    pub fn open(config: &Config) -> DbResult<Self> {
        if config.uses_memory_store() {
            return Ok(Self::Memory(MemoryContactRepository::new()));
        }
        Ok(Self::Sqlite(Mutex::new(open_db(&config.db_path)?)))
    }
}

pub type ContactsService<'a> = ContactService<&'a dyn ContactRepository>;

pub struct State {
    store: ContactStore,
}

impl State {
    pub fn new(store: ContactStore) -> Arc<Self> {
        Arc::new(Self { store })
    }

    /// Runs `f` against the contact service.
    ///
    /// Must not be called across an `.await`; the SQLite lock is held for
    /// the whole closure.
    pub fn with_contacts<T>(
        &self,
        f: impl FnOnce(&ContactsService<'_>) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        match &self.store {
            ContactStore::Sqlite(conn) => {
                let conn = conn.lock().map_err(|_| AppError::StorePoisoned)?;
                let repo = SqliteContactRepository::try_new(&conn)?;
                f(&ContactService::new(&repo as &dyn ContactRepository))
            }
            ContactStore::Memory(repo) => f(&ContactService::new(repo as &dyn ContactRepository)),
        }
    }
}
