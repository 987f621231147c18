//! In-process notification service
//!
//! Reminders live on a shared board. The event loop drains due deliveries
//! every tick with [`LocalNotifier::take_due`], so nothing fires while the
//! app is closed.

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::{NotificationService, NotifyError, Permission, Reminder, ReminderHandle};
use crate::reminder::TimeOfDay;

/// A reminder that came due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub handle: ReminderHandle,
    pub title: String,
    pub body: String,
}

#[derive(Debug)]
struct Scheduled {
    reminder: Reminder,
    next_fire: NaiveDateTime,
}

#[derive(Debug, Default)]
struct Board {
    granted: bool,
    scheduled: HashMap<ReminderHandle, Scheduled>,
}

/// Daily reminder board; clones share the same board
#[derive(Debug, Clone)]
pub struct LocalNotifier {
    /// Answer given to the permission request
    allow: bool,
    board: Arc<Mutex<Board>>,
}

impl LocalNotifier {
    pub fn new(allow: bool) -> Self {
        Self {
            allow,
            board: Arc::new(Mutex::new(Board::default())),
        }
    }

    /// Number of reminders currently on the board
    #[allow(dead_code)]
    pub fn scheduled_count(&self) -> usize {
        self.board.lock().scheduled.len()
    }

    /// Collect reminders due at or before `now` and roll each one forward
    /// to its next daily occurrence.
    ///
    /// Without permission the board still advances but nothing is delivered.
    pub fn take_due(&self, now: NaiveDateTime) -> Vec<Delivery> {
        let mut board = self.board.lock();
        let granted = board.granted;
        let mut due = Vec::new();

        for (handle, entry) in board.scheduled.iter_mut() {
            if entry.next_fire > now {
                continue;
            }
            entry.next_fire = next_occurrence(entry.reminder.time, now);
            if granted {
                due.push(Delivery {
                    handle: handle.clone(),
                    title: entry.reminder.title.clone(),
                    body: entry.reminder.body.clone(),
                });
            }
        }

        if !due.is_empty() {
            tracing::info!("{} reminder(s) due", due.len());
        }
        due
    }

    fn schedule_at(&self, reminder: &Reminder, now: NaiveDateTime) -> ReminderHandle {
        let handle = ReminderHandle::new(uuid::Uuid::new_v4().to_string());
        let next_fire = next_occurrence(reminder.time, now);
        tracing::debug!("Reminder {} next fires at {}", handle, next_fire);
        self.board.lock().scheduled.insert(
            handle.clone(),
            Scheduled {
                reminder: reminder.clone(),
                next_fire,
            },
        );
        handle
    }
}

/// First instant strictly after `after` that falls on `time`
pub fn next_occurrence(time: TimeOfDay, after: NaiveDateTime) -> NaiveDateTime {
    let today = after.date().and_time(time.to_naive_time());
    if today > after {
        today
    } else {
        today + Duration::days(1)
    }
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[async_trait]
impl NotificationService for LocalNotifier {
    async fn request_permission(&mut self) -> Permission {
        self.board.lock().granted = self.allow;
        if self.allow {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn schedule_daily(&mut self, reminder: &Reminder) -> Result<ReminderHandle, NotifyError> {
        Ok(self.schedule_at(reminder, local_now()))
    }

    async fn cancel(&mut self, handle: &ReminderHandle) -> Result<(), NotifyError> {
        match self.board.lock().scheduled.remove(handle) {
            Some(_) => Ok(()),
            None => Err(NotifyError::UnknownHandle(handle.clone())),
        }
    }
}
