//! Contact record, identity and patch types.
//!
//! # Invariants
//! - `id` is assigned at creation and never changes.
//! - Optional text fields hold `None` or a non-empty string.
//! - `favorite` defaults to `false`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Opaque, stable contact identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContactId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ContactId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Canonical contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub first: Option<String>,
    pub last: Option<String>,
    /// Social handle without the leading `@`.
    pub twitter: Option<String>,
    /// Avatar image URI.
    pub avatar: Option<String>,
    pub notes: Option<String>,
    pub favorite: bool,
    /// Unix epoch milliseconds. Secondary sort key after `last`.
    pub created_at: i64,
}

/// Validation failures for contact records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    EmptyId,
    /// A text field holds `Some("")` instead of `None`.
    EmptyField(&'static str),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "contact id cannot be empty"),
            Self::EmptyField(field) => {
                write!(f, "contact field `{field}` must be absent instead of empty")
            }
        }
    }
}

impl Error for ContactValidationError {}

impl Contact {
    /// Creates an empty contact with a generated id.
    pub fn new() -> Self {
        Self::with_id(ContactId::generate())
    }

    /// Creates an empty contact with a caller-provided id.
    pub fn with_id(id: ContactId) -> Self {
        Self {
            id,
            first: None,
            last: None,
            twitter: None,
            avatar: None,
            notes: None,
            favorite: false,
            created_at: now_epoch_ms(),
        }
    }

    /// Checks presence invariants before persistence.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ContactValidationError::EmptyId);
        }

        for (name, value) in self.text_fields() {
            if value.is_some_and(str::is_empty) {
                return Err(ContactValidationError::EmptyField(name));
            }
        }

        Ok(())
    }

    /// Whether either name field is present.
    pub fn has_name(&self) -> bool {
        self.first.is_some() || self.last.is_some()
    }

    /// Display name joined from present name fields, `None` when unnamed.
    pub fn full_name(&self) -> Option<String> {
        match (self.first.as_deref(), self.last.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
            (None, None) => None,
        }
    }

    /// Case-insensitive substring match against first and last name.
    ///
    /// An empty needle matches every contact.
    pub fn matches_query(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [self.first.as_deref(), self.last.as_deref()]
            .into_iter()
            .flatten()
            .any(|name| name.to_lowercase().contains(&needle))
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: &ContactPatch) {
        apply_field(&mut self.first, &patch.first);
        apply_field(&mut self.last, &patch.last);
        apply_field(&mut self.twitter, &patch.twitter);
        apply_field(&mut self.avatar, &patch.avatar);
        apply_field(&mut self.notes, &patch.notes);
        if let Some(favorite) = patch.favorite {
            self.favorite = favorite;
        }
    }

    fn text_fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("first", self.first.as_deref()),
            ("last", self.last.as_deref()),
            ("twitter", self.twitter.as_deref()),
            ("avatar", self.avatar.as_deref()),
            ("notes", self.notes.as_deref()),
        ]
    }
}

impl Default for Contact {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial update for a contact.
///
/// Text fields: `None` leaves the field untouched, `Some(None)` clears it,
/// `Some(Some(value))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub first: Option<Option<String>>,
    pub last: Option<Option<String>>,
    pub twitter: Option<Option<String>>,
    pub avatar: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub favorite: Option<bool>,
}

impl ContactPatch {
    /// Patch touching only the favorite flag.
    pub fn favorite(value: bool) -> Self {
        Self {
            favorite: Some(value),
            ..Self::default()
        }
    }

    /// Whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Normalizes raw form text: trims and maps blank input to `None`.
pub fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn apply_field(target: &mut Option<String>, change: &Option<Option<String>>) {
    if let Some(value) = change {
        *target = value.as_deref().and_then(normalize_text);
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
