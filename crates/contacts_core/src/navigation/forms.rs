//! Form submissions and the delete confirmation gate.

use super::location::Location;
use crate::model::contact::ContactId;

/// Prompt shown before a destructive delete is submitted.
pub const DELETE_CONFIRMATION_PROMPT: &str = "Please confirm you want to delete this record.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

/// A form-like payload submitted to a route action or loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub method: FormMethod,
    pub action: String,
    pub fields: Vec<(String, String)>,
}

impl Submission {
    pub fn get(action: impl Into<String>) -> Self {
        Self {
            method: FormMethod::Get,
            action: action.into(),
            fields: Vec::new(),
        }
    }

    pub fn post(action: impl Into<String>) -> Self {
        Self {
            method: FormMethod::Post,
            action: action.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Location a main navigation lands on for this submission.
    ///
    /// GET submissions encode their fields as query parameters; POST
    /// submissions target the bare action path.
    pub fn target(&self) -> Location {
        match self.method {
            FormMethod::Get => self
                .fields
                .iter()
                .fold(Location::new(self.action.clone()), |location, (name, value)| {
                    location.with_param(name.clone(), value.clone())
                }),
            FormMethod::Post => Location::new(self.action.clone()),
        }
    }
}

/// Builds the delete submission only after the user confirmed.
///
/// Declining returns `None`: nothing is sent and nothing changes.
pub fn confirm_delete(id: &ContactId, confirmed: bool) -> Option<Submission> {
    confirmed.then(|| Submission::post(format!("/contacts/{id}/destroy")))
}

#[cfg(test)]
mod tests {
    use super::{confirm_delete, Submission};
    use crate::model::contact::ContactId;

    #[test]
    fn get_submission_targets_query_string() {
        let target = Submission::get("/").field("q", "ry").target();
        assert_eq!(target.to_string(), "/?q=ry");
    }

    #[test]
    fn declined_delete_submits_nothing() {
        let id = ContactId::from("abc");
        assert!(confirm_delete(&id, false).is_none());
        let submission = confirm_delete(&id, true).unwrap();
        assert_eq!(submission.action, "/contacts/abc/destroy");
    }
}
