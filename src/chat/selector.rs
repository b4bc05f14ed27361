//! Project selection.
//!
//! [`ProjectSelector`] holds the projects fetched from the backend and the id
//! the user has chosen.  Load failures never reach the user: they are logged
//! and leave the selector empty.

use crate::backend::Backend;
use crate::observability::{PROJECT_LIST_FAILURES, PROJECT_LIST_LOADS};
use crate::types::Project;

/// Label shown when no listed project is selected.
pub const PLACEHOLDER_LABEL: &str = "Select Project";

/// The list of available projects and the current selection.
#[derive(Debug, Clone, Default)]
pub struct ProjectSelector {
    projects: Vec<Project>,
    selected: Option<String>,
}

impl ProjectSelector {
    /// Creates an empty selector with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the project list.
    ///
    /// On success the list is stored and, when nothing is selected yet, the
    /// first project becomes the selection.  On failure the list is left empty
    /// and the selection untouched.  Returns true when the load succeeded; the
    /// failure itself is only logged.
    pub async fn load<B: Backend + ?Sized>(&mut self, backend: &B) -> bool {
        PROJECT_LIST_LOADS.click();
        match backend.list_projects().await {
            Ok(projects) => {
                self.store(projects);
                true
            }
            Err(err) => {
                PROJECT_LIST_FAILURES.click();
                tracing::warn!(error = %err, "error fetching projects");
                self.projects.clear();
                false
            }
        }
    }

    /// Re-fetches the project list, keeping the current selection.
    ///
    /// Unlike [`load`](Self::load), a failure keeps the previously fetched
    /// list so the selected project stays resolvable.  Returns true when the
    /// fetch succeeded.
    pub async fn reload<B: Backend + ?Sized>(&mut self, backend: &B) -> bool {
        PROJECT_LIST_LOADS.click();
        match backend.list_projects().await {
            Ok(projects) => {
                self.store(projects);
                true
            }
            Err(err) => {
                PROJECT_LIST_FAILURES.click();
                tracing::warn!(
                    error = %err,
                    kept = self.projects.len(),
                    "error refreshing projects"
                );
                false
            }
        }
    }

    fn store(&mut self, projects: Vec<Project>) {
        tracing::debug!(count = projects.len(), "loaded project list");
        self.projects = projects;
        if self.selected.is_none()
            && let Some(first) = self.projects.first()
        {
            self.selected = Some(first.id.clone());
        }
    }

    /// Selects the project with the given id.
    ///
    /// Any id is accepted; an id that matches no listed project behaves as no
    /// selection for [`selected_project`](Self::selected_project).  Returns
    /// true when the selection changed.
    pub fn select_project(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.selected.as_deref() == Some(id.as_str()) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// The fetched projects, in backend order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// The raw selected id, whether or not it names a listed project.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected project, if the selected id matches a listed project.
    pub fn selected_project(&self) -> Option<&Project> {
        let id = self.selected.as_deref()?;
        self.projects.iter().find(|project| project.id == id)
    }

    /// Looks up a listed project by id.
    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    /// The selector's label: the selected project's name or the placeholder.
    pub fn label(&self) -> &str {
        self.selected_project()
            .map(|project| project.name.as_str())
            .unwrap_or(PLACEHOLDER_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::types::{ChatReplyRequest, ChatReplyResponse};

    struct FixedProjects(Result<Vec<Project>>);

    #[async_trait::async_trait]
    impl Backend for FixedProjects {
        async fn list_projects(&self) -> Result<Vec<Project>> {
            self.0.clone()
        }

        async fn get_chat_reply(
            &self,
            _project_id: &str,
            _request: &ChatReplyRequest,
        ) -> Result<ChatReplyResponse> {
            Err(Error::connection("unused", None))
        }
    }

    fn two_projects() -> FixedProjects {
        FixedProjects(Ok(vec![
            Project::new("a", "Alpha"),
            Project::new("b", "Beta"),
        ]))
    }

    #[tokio::test]
    async fn load_selects_first_project() {
        let mut selector = ProjectSelector::new();
        selector.load(&two_projects()).await;
        assert_eq!(selector.projects().len(), 2);
        assert_eq!(selector.selected_id(), Some("a"));
        assert_eq!(selector.label(), "Alpha");
    }

    #[tokio::test]
    async fn load_keeps_existing_selection() {
        let mut selector = ProjectSelector::new();
        selector.select_project("b");
        selector.load(&two_projects()).await;
        assert_eq!(selector.selected_id(), Some("b"));
        assert_eq!(selector.label(), "Beta");
    }

    #[tokio::test]
    async fn empty_list_leaves_selection_unset() {
        let mut selector = ProjectSelector::new();
        selector.load(&FixedProjects(Ok(vec![]))).await;
        assert!(selector.projects().is_empty());
        assert_eq!(selector.selected_id(), None);
        assert_eq!(selector.label(), PLACEHOLDER_LABEL);
    }

    #[tokio::test]
    async fn failed_load_leaves_list_empty() {
        let mut selector = ProjectSelector::new();
        selector
            .load(&FixedProjects(Err(Error::internal_server("down"))))
            .await;
        assert!(selector.projects().is_empty());
        assert_eq!(selector.selected_id(), None);
        assert_eq!(selector.label(), "Select Project");
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_list() {
        let mut selector = ProjectSelector::new();
        selector.load(&two_projects()).await;
        let ok = selector
            .reload(&FixedProjects(Err(Error::connection("refused", None))))
            .await;
        assert!(!ok);
        assert_eq!(selector.projects().len(), 2);
        assert_eq!(selector.selected_id(), Some("a"));
        assert_eq!(selector.label(), "Alpha");
    }

    #[tokio::test]
    async fn reload_replaces_list_and_keeps_selection() {
        let mut selector = ProjectSelector::new();
        selector.load(&two_projects()).await;
        selector.select_project("b");
        let ok = selector
            .reload(&FixedProjects(Ok(vec![
                Project::new("b", "Beta v2"),
                Project::new("c", "Gamma"),
            ])))
            .await;
        assert!(ok);
        assert_eq!(selector.projects().len(), 2);
        assert_eq!(selector.selected_id(), Some("b"));
        assert_eq!(selector.label(), "Beta v2");
    }

    #[test]
    fn select_unknown_id_is_no_selection() {
        let mut selector = ProjectSelector::new();
        assert!(selector.select_project("ghost"));
        assert_eq!(selector.selected_id(), Some("ghost"));
        assert!(selector.selected_project().is_none());
        assert_eq!(selector.label(), PLACEHOLDER_LABEL);
    }

    #[test]
    fn reselecting_same_id_is_not_a_change() {
        let mut selector = ProjectSelector::new();
        assert!(selector.select_project("a"));
        assert!(!selector.select_project("a"));
        assert!(selector.select_project("b"));
    }
}
