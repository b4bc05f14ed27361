use serde::{Deserialize, Serialize};

use crate::types::Project;

/// Body returned by `GET /list_projects`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectList {
    /// Every project the backend exposes, in backend order.
    pub projects: Vec<Project>,
}
