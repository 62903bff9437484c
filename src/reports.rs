//! Progress tracking and project search.

use serde::Serialize;

use crate::model::{Project, ProjectStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemilleroMetrics {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub total_budget: f64,
    /// Mean of `progress` over the semillero's projects, 0 when it has none.
    pub average_progress: f64,
    /// Completed share in whole percent, rounded.
    pub completion_rate: u32,
}

/// Aggregate the projects owned by `semillero_id`.
pub fn semillero_metrics(projects: &[Project], semillero_id: &str) -> SemilleroMetrics {
    let owned: Vec<&Project> = projects
        .iter()
        .filter(|p| p.semillero_id == semillero_id)
        .collect();
    if owned.is_empty() {
        return SemilleroMetrics::default();
    }

    let total = owned.len();
    let completed = owned
        .iter()
        .filter(|p| p.status == ProjectStatus::Completado)
        .count();
    let in_progress = owned
        .iter()
        .filter(|p| p.status == ProjectStatus::EnProgreso)
        .count();
    let total_budget = owned.iter().map(|p| p.budget).sum();
    let average_progress =
        owned.iter().map(|p| f64::from(p.progress)).sum::<f64>() / total as f64;
    let completion_rate = (completed as f64 / total as f64 * 100.0).round() as u32;

    SemilleroMetrics {
        total,
        completed,
        in_progress,
        total_budget,
        average_progress,
        completion_rate,
    }
}

/// Filters of the project list. Empty sets match everything.
#[derive(Debug, Clone, Default)]
pub struct ProjectQuery {
    /// Case-insensitive, matched against title and description.
    pub search: String,
    pub statuses: Vec<ProjectStatus>,
    /// Category names as returned by [`Project::category`].
    pub categories: Vec<String>,
}

impl ProjectQuery {
    pub fn matches(&self, project: &Project) -> bool {
        let term = self.search.trim().to_lowercase();
        let text_ok = term.is_empty()
            || project.title.to_lowercase().contains(&term)
            || project.description.to_lowercase().contains(&term);
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&project.status);
        let category_ok = self.categories.is_empty()
            || self
                .categories
                .iter()
                .any(|c| c.as_str() == project.category());
        text_ok && status_ok && category_ok
    }

    pub fn filter(&self, projects: Vec<Project>) -> Vec<Project> {
        projects.into_iter().filter(|p| self.matches(p)).collect()
    }
}
