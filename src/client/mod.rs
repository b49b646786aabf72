//! Client side of the taskboard.
//!
//! [`HttpClient`] talks to the REST API; [`Dashboard`] is the view model a
//! front end drives and renders.

pub mod dashboard;
pub mod http;
pub mod view;

pub use dashboard::Dashboard;
pub use http::{ClientError, HttpClient, TaskBoardApi};
pub use view::{Banner, BannerKind, TaskDraft, ViewMode};
