//! Dashboard view model.
//!
//! [`Dashboard`] holds only view state. Task and comment data are copies of
//! what the API last returned and are re-fetched after every mutation.
//! Failures raise a [`Banner`] and leave the current mode in place.

use super::http::{ClientError, TaskBoardApi};
use super::view::{
    Banner, BannerKind, TaskDraft, ViewMode, render_banner, render_detail, render_form,
    render_task_list, render_welcome,
};
use crate::api::{
    CommentResponse, CreateCommentRequest, CreateTaskRequest, TaskResponse, UpdateCommentRequest,
    UpdateTaskRequest,
};
use crate::domain::{CommentId, TaskId};

/// Task list with a detail panel and a task form.
#[derive(Debug)]
pub struct Dashboard<A> {
    api: A,
    tasks: Vec<TaskResponse>,
    /// Task shown in the detail panel; survives while a form is open.
    selected: Option<TaskResponse>,
    comments: Vec<CommentResponse>,
    mode: ViewMode,
    banner: Option<Banner>,
}

impl<A: TaskBoardApi> Dashboard<A> {
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            selected: None,
            comments: Vec::new(),
            mode: ViewMode::Browsing,
            banner: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn tasks(&self) -> &[TaskResponse] {
        &self.tasks
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&TaskResponse> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn comments(&self) -> &[CommentResponse] {
        &self.comments
    }

    #[must_use]
    pub const fn mode(&self) -> &ViewMode {
        &self.mode
    }

    #[must_use]
    pub const fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Loads the task list once.
    pub async fn mount(&mut self) {
        self.refresh_tasks().await;
    }

    /// Opens the detail panel for `id`.
    pub async fn select(&mut self, id: &TaskId) {
        let loaded = async {
            let task = self.api.get_task(id).await?;
            let comments = self.api.list_comments(id).await?;
            Ok::<_, ClientError>((task, comments.comments))
        }
        .await;

        match loaded {
            Ok((task, comments)) => {
                self.selected = Some(task);
                self.comments = comments;
                self.mode = ViewMode::Viewing(id.clone());
            }
            Err(error) => self.fail(BannerKind::Fetch, &error),
        }
    }

    /// Opens an empty new-task form.
    pub fn begin_create(&mut self) {
        self.mode = ViewMode::Creating(TaskDraft::default());
    }

    /// Opens the edit form for a listed task. Returns `false` if `id` is not
    /// in the current list.
    pub fn begin_edit(&mut self, id: &TaskId) -> bool {
        let Some(task) = self.find_task(id) else {
            return false;
        };
        self.mode = ViewMode::Editing {
            task_id: id.clone(),
            draft: TaskDraft::from(task),
        };
        true
    }

    /// Form input, while a form is open.
    pub fn draft_mut(&mut self) -> Option<&mut TaskDraft> {
        match &mut self.mode {
            ViewMode::Creating(draft) | ViewMode::Editing { draft, .. } => Some(draft),
            ViewMode::Browsing | ViewMode::Viewing(_) => None,
        }
    }

    /// Sends the open form. On failure the form stays open.
    pub async fn submit(&mut self) {
        let result = match &self.mode {
            ViewMode::Creating(draft) => {
                let request = CreateTaskRequest {
                    title: Some(draft.title.clone()),
                    description: Some(draft.description.clone()),
                };
                self.api.create_task(&request).await
            }
            ViewMode::Editing { task_id, draft } => {
                let request = UpdateTaskRequest {
                    title: Some(draft.title.clone()),
                    description: Some(draft.description.clone()),
                };
                self.api.update_task(task_id, &request).await
            }
            ViewMode::Browsing | ViewMode::Viewing(_) => return,
        };

        match result {
            Ok(task) => {
                tracing::debug!(task_id = %task.id, "Task saved");
                if self
                    .selected
                    .as_ref()
                    .is_some_and(|selected| selected.id == task.id)
                {
                    self.selected = Some(task);
                }
                self.refresh_tasks().await;
                self.close_form();
            }
            Err(error) => self.fail(BannerKind::Save, &error),
        }
    }

    /// Closes the open form without saving.
    pub fn cancel(&mut self) {
        if self.mode.is_form() {
            self.close_form();
        }
    }

    /// Deletes a listed task if `confirm` approves it. Returns whether the
    /// task was deleted.
    pub async fn delete_task(
        &mut self,
        id: &TaskId,
        confirm: impl FnOnce(&TaskResponse) -> bool,
    ) -> bool {
        let Some(task) = self.find_task(id) else {
            return false;
        };
        if !confirm(task) {
            return false;
        }

        if let Err(error) = self.api.delete_task(id).await {
            self.fail(BannerKind::Delete, &error);
            return false;
        }

        let was_selected = self
            .selected
            .as_ref()
            .is_some_and(|selected| selected.id == id.as_str());
        let was_editing =
            matches!(&self.mode, ViewMode::Editing { task_id, .. } if task_id == id);

        if was_selected {
            self.selected = None;
            self.comments.clear();
        }
        if was_selected || was_editing {
            self.mode = ViewMode::Browsing;
        }

        self.refresh_tasks().await;
        true
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Adds a comment to the task being viewed.
    pub async fn add_comment(&mut self, content: &str, author: Option<&str>) {
        let Some(task_id) = self.viewing().cloned() else {
            return;
        };
        let request = CreateCommentRequest {
            content: Some(content.to_string()),
            author: author.map(str::to_string),
        };

        match self.api.create_comment(&task_id, &request).await {
            Ok(_) => self.refresh_comments(&task_id).await,
            Err(error) => self.fail(BannerKind::Save, &error),
        }
    }

    /// Replaces the content of a comment on the task being viewed.
    pub async fn edit_comment(&mut self, id: &CommentId, content: &str) {
        let Some(task_id) = self.viewing().cloned() else {
            return;
        };
        let request = UpdateCommentRequest {
            content: Some(content.to_string()),
            author: None,
        };

        match self.api.update_comment(id, &request).await {
            Ok(_) => self.refresh_comments(&task_id).await,
            Err(error) => self.fail(BannerKind::Save, &error),
        }
    }

    /// Removes a comment from the task being viewed.
    pub async fn delete_comment(&mut self, id: &CommentId) {
        let Some(task_id) = self.viewing().cloned() else {
            return;
        };

        match self.api.delete_comment(id).await {
            Ok(_) => self.refresh_comments(&task_id).await,
            Err(error) => self.fail(BannerKind::Delete, &error),
        }
    }

    // =========================================================================
    // Banner
    // =========================================================================

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Renders the whole dashboard as text lines.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(banner) = &self.banner {
            lines.push(render_banner(banner));
        }

        let selected_id = self.selected.as_ref().map(|task| TaskId::from(task.id.as_str()));
        lines.extend(render_task_list(&self.tasks, selected_id.as_ref()));
        lines.push(String::new());

        match (&self.mode, &self.selected) {
            (ViewMode::Creating(draft), _) => lines.extend(render_form("New Task", draft)),
            (ViewMode::Editing { draft, .. }, _) => lines.extend(render_form("Edit Task", draft)),
            (ViewMode::Viewing(_), Some(task)) => {
                lines.extend(render_detail(task, &self.comments));
            }
            (ViewMode::Viewing(_) | ViewMode::Browsing, _) => lines.extend(render_welcome()),
        }
        lines
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn find_task(&self, id: &TaskId) -> Option<&TaskResponse> {
        self.tasks.iter().find(|task| task.id == id.as_str())
    }

    fn viewing(&self) -> Option<&TaskId> {
        match &self.mode {
            ViewMode::Viewing(id) => Some(id),
            _ => None,
        }
    }

    fn close_form(&mut self) {
        self.mode = self.selected.as_ref().map_or(ViewMode::Browsing, |task| {
            ViewMode::Viewing(TaskId::from(task.id.as_str()))
        });
    }

    async fn refresh_tasks(&mut self) {
        match self.api.list_tasks().await {
            Ok(tasks) => self.tasks = tasks,
            Err(error) => self.fail(BannerKind::Fetch, &error),
        }
    }

    async fn refresh_comments(&mut self, task_id: &TaskId) {
        match self.api.list_comments(task_id).await {
            Ok(listing) => self.comments = listing.comments,
            Err(error) => self.fail(BannerKind::Fetch, &error),
        }
    }

    fn fail(&mut self, kind: BannerKind, error: &ClientError) {
        tracing::warn!(?kind, %error, "Dashboard action failed");
        self.banner = Some(Banner::from(kind));
    }
}

// =============================================================================
// Tests
// =============================================================================
