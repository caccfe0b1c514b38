//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `contacts` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Contact::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::contact::{Contact, ContactId, ContactPatch, ContactValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    first,
    last,
    twitter,
    avatar,
    notes,
    favorite,
    created_at
FROM contacts";

const CONTACT_ORDER_SQL: &str =
    "ORDER BY (last IS NULL) ASC, last COLLATE NOCASE ASC, created_at ASC, id ASC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Db(DbError),
    NotFound(ContactId),
    InvalidData(String),
    /// Connection was not opened through `open_db`/`open_db_in_memory`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store interface for contact CRUD operations.
pub trait ContactRepository {
    /// Lists contacts in store order, filtered by name when `query` is set.
    fn list_contacts(&self, query: Option<&str>) -> RepoResult<Vec<Contact>>;
    fn get_contact(&self, id: &ContactId) -> RepoResult<Option<Contact>>;
    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId>;
    /// Applies `patch` and returns the stored result.
    fn update_contact(&self, id: &ContactId, patch: &ContactPatch) -> RepoResult<Contact>;
    fn delete_contact(&self, id: &ContactId) -> RepoResult<()>;
}

impl<R: ContactRepository + ?Sized> ContactRepository for &R {
    fn list_contacts(&self, query: Option<&str>) -> RepoResult<Vec<Contact>> {
        (**self).list_contacts(query)
    }

    fn get_contact(&self, id: &ContactId) -> RepoResult<Option<Contact>> {
        (**self).get_contact(id)
    }

    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId> {
        (**self).create_contact(contact)
    }

    fn update_contact(&self, id: &ContactId, patch: &ContactPatch) -> RepoResult<Contact> {
        (**self).update_contact(id, patch)
    }

    fn delete_contact(&self, id: &ContactId) -> RepoResult<()> {
        (**self).delete_contact(id)
    }
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match
    ///   the latest migration.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        Ok(Self { conn })
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn list_contacts(&self, query: Option<&str>) -> RepoResult<Vec<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} {CONTACT_ORDER_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            let contact = parse_contact_row(row)?;
            if query.map_or(true, |needle| contact.matches_query(needle)) {
                contacts.push(contact);
            }
        }

        Ok(contacts)
    }

    fn get_contact(&self, id: &ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }

    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId> {
        contact.validate()?;

        self.conn.execute(
            "INSERT INTO contacts (
                id,
                first,
                last,
                twitter,
                avatar,
                notes,
                favorite,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8);",
            params![
                contact.id.as_str(),
                contact.first.as_deref(),
                contact.last.as_deref(),
                contact.twitter.as_deref(),
                contact.avatar.as_deref(),
                contact.notes.as_deref(),
                bool_to_int(contact.favorite),
                contact.created_at,
            ],
        )?;

        Ok(contact.id.clone())
    }

    fn update_contact(&self, id: &ContactId, patch: &ContactPatch) -> RepoResult<Contact> {
        let mut contact = self
            .get_contact(id)?
            .ok_or_else(|| RepoError::NotFound(id.clone()))?;
        contact.apply(patch);
        contact.validate()?;

        let changed = self.conn.execute(
            "UPDATE contacts
             SET
                first = ?1,
                last = ?2,
                twitter = ?3,
                avatar = ?4,
                notes = ?5,
                favorite = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?7;",
            params![
                contact.first.as_deref(),
                contact.last.as_deref(),
                contact.twitter.as_deref(),
                contact.avatar.as_deref(),
                contact.notes.as_deref(),
                bool_to_int(contact.favorite),
                id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.clone()));
        }

        Ok(contact)
    }

    fn delete_contact(&self, id: &ContactId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id.as_str()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.clone()));
        }

        Ok(())
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let id: String = row.get("id")?;

    let favorite = match row.get::<_, i64>("favorite")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid favorite value `{other}` in contacts.favorite for `{id}`"
            )));
        }
    };

    let contact = Contact {
        id: ContactId::from(id),
        first: row.get("first")?,
        last: row.get("last")?,
        twitter: row.get("twitter")?,
        avatar: row.get("avatar")?,
        notes: row.get("notes")?,
        favorite,
        created_at: row.get("created_at")?,
    };
    contact
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("{err} (contact `{}`)", contact.id)))?;
    Ok(contact)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
