//! View state for the dashboard and its plain-text rendering.

use crate::api::{CommentResponse, TaskResponse};
use crate::domain::TaskId;

// =============================================================================
// View Mode
// =============================================================================

/// What the dashboard is currently showing next to the task list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// List only.
    #[default]
    Browsing,
    /// New-task form.
    Creating(TaskDraft),
    /// Edit form for an existing task.
    Editing { task_id: TaskId, draft: TaskDraft },
    /// Detail panel for one task.
    Viewing(TaskId),
}

impl ViewMode {
    #[must_use]
    pub const fn is_form(&self) -> bool {
        matches!(self, Self::Creating(_) | Self::Editing { .. })
    }
}

/// Form input for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

impl TaskDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

impl From<&TaskResponse> for TaskDraft {
    fn from(task: &TaskResponse) -> Self {
        Self::new(task.title.clone(), task.description.clone())
    }
}

// =============================================================================
// Banner
// =============================================================================

/// Failure category. Each maps to one generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Fetch,
    Save,
    Delete,
}

impl BannerKind {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Fetch => "Failed to load data. Please try again.",
            Self::Save => "Failed to save changes. Please try again.",
            Self::Delete => "Failed to delete. Please try again.",
        }
    }
}

/// Dismissable error notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl From<BannerKind> for Banner {
    fn from(kind: BannerKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

pub(crate) fn render_banner(banner: &Banner) -> String {
    format!("[!] {} (dismiss)", banner.message)
}

pub(crate) fn render_task_list(tasks: &[TaskResponse], selected: Option<&TaskId>) -> Vec<String> {
    let mut lines = vec![format!("Tasks ({})", tasks.len())];
    if tasks.is_empty() {
        lines.push("  No tasks yet.".to_string());
    }
    lines.extend(tasks.iter().map(|task| {
        let marker = if selected.is_some_and(|id| id.as_str() == task.id) {
            '>'
        } else {
            ' '
        };
        format!("{marker} {}", task.title)
    }));
    lines
}

pub(crate) fn render_form(heading: &str, draft: &TaskDraft) -> Vec<String> {
    vec![
        heading.to_string(),
        format!("Title: {}", draft.title),
        format!("Description: {}", draft.description),
        "[Save] [Cancel]".to_string(),
    ]
}

pub(crate) fn render_detail(task: &TaskResponse, comments: &[CommentResponse]) -> Vec<String> {
    let mut lines = vec![task.title.clone()];
    if !task.description.is_empty() {
        lines.push(task.description.clone());
    }
    lines.push(format!("Created: {}", task.created_at));
    lines.push(format!("Comments ({})", comments.len()));
    lines.extend(
        comments
            .iter()
            .map(|comment| format!("- {}: {}", comment.author, comment.content)),
    );
    lines
}

pub(crate) fn render_welcome() -> Vec<String> {
    vec!["Select a task or create a new one.".to_string()]
}
