use serde::{Deserialize, Serialize};

/// A backend-side document collection that chat queries run against.
///
/// Projects are immutable once fetched; identity is the `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    /// Backend identifier, used as the path segment of the reply endpoint.
    pub id: String,

    /// Display name shown by the selector.
    pub name: String,
}

impl Project {
    /// Creates a new Project
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
