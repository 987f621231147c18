//! Boundary services the app talks to
//!
//! The core never reaches a device capability directly. Everything goes
//! through these traits so the scheduler, log and exporter stay testable
//! with in-memory fakes.
//!
//! # Module Structure
//!
//! - `notifier` - In-process daily reminder board
//! - `renderer` - Writes the report markup to a file
//! - `share` - Hands the exported file to an external opener
//! - `alerts` - On-screen alert feed

mod alerts;
mod notifier;
mod renderer;
mod share;

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::reminder::TimeOfDay;

pub use alerts::{Alert, AlertFeed, Severity};
pub use notifier::LocalNotifier;
pub use renderer::HtmlFileRenderer;
pub use share::CommandShare;

/// Opaque identifier of one scheduled reminder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderHandle(String);

impl ReminderHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ReminderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to show when a reminder fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub time: TimeOfDay,
    pub title: String,
    pub body: String,
}

/// Outcome of the one-time permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Reference to a rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef(PathBuf);

impl FileRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no reminder scheduled for handle {0}")]
    UnknownHandle(ReminderHandle),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write report to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("failed to launch share command `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("share command exited with status {0}")]
    Exit(String),
}

/// Local notification capability
#[async_trait]
pub trait NotificationService: Send {
    /// Ask the user once whether reminders may be shown
    async fn request_permission(&mut self) -> Permission;

    /// Register a reminder that repeats every day at `reminder.time`
    async fn schedule_daily(&mut self, reminder: &Reminder) -> Result<ReminderHandle, NotifyError>;

    async fn cancel(&mut self, handle: &ReminderHandle) -> Result<(), NotifyError>;
}

/// Turns report markup into a file
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<FileRef, RenderError>;
}

/// Offers a file to the user (open, save, send...)
#[async_trait]
pub trait ShareTransport: Send + Sync {
    async fn share(&self, file: &FileRef) -> Result<(), ShareError>;
}

/// Fire-and-forget user messages
pub trait AlertSurface {
    fn show(&mut self, title: &str, body: Option<&str>);
}
