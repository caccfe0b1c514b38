//! Navigable locations.

use std::fmt::{Display, Formatter};

/// Query parameter carrying the sidebar search term.
pub const SEARCH_PARAM: &str = "q";

/// Path plus ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Returns this location with `name` set to `value`, replacing any prior value.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.params.retain(|(existing, _)| existing != &name);
        self.params.push((name, value.into()));
        self
    }

    /// First value of `name`; `Some("")` when present but empty.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    /// The search term encoded in this location.
    pub fn search_query(&self) -> Option<&str> {
        self.param(SEARCH_PARAM)
    }
}

/// Renders `path?name=value&...` without percent-encoding.
impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)?;
        for (index, (name, value)) in self.params.iter().enumerate() {
            let separator = if index == 0 { '?' } else { '&' };
            write!(f, "{separator}{name}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Location;

    #[test]
    fn empty_param_is_present() {
        let location = Location::new("/").with_param("q", "");
        assert!(location.has_param("q"));
        assert_eq!(location.search_query(), Some(""));
    }

    #[test]
    fn with_param_replaces_previous_value() {
        let location = Location::new("/").with_param("q", "a").with_param("q", "ab");
        assert_eq!(location.params.len(), 1);
        assert_eq!(location.to_string(), "/?q=ab");
    }
}
