//! Daily patch-change reminder.
//!
//! The scheduler owns at most one live reminder. It has two states:
//!
//! ```text
//!   unarmed --arm--> armed(handle) --arm--> armed(new handle)
//!      ^                   |
//!      +------cancel-------+        cancel while unarmed: no-op
//! ```
//!
//! Re-arming releases the previous handle first so the service never holds
//! two of our reminders. That release is best-effort: if the service
//! refuses it we log and schedule anyway.

use chrono::{NaiveTime, Timelike};
use std::fmt;
use thiserror::Error;

use crate::platform::{NotificationService, NotifyError, Permission, Reminder, ReminderHandle};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("hour {0} out of range (0-23)")]
    Hour(u8),
    #[error("minute {0} out of range (0-59)")]
    Minute(u8),
}

/// Wall-clock time of day, minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::Hour(hour));
        }
        if minute > 59 {
            return Err(TimeError::Minute(minute));
        }
        Ok(Self { hour, minute })
    }

    /// Current local time, truncated to the minute
    pub fn now() -> Self {
        let now = chrono::Local::now();
        Self {
            hour: now.hour() as u8,
            minute: now.minute() as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Step the hour, wrapping around midnight
    pub fn add_hours(self, delta: i32) -> Self {
        Self {
            hour: (self.hour as i32 + delta).rem_euclid(24) as u8,
            minute: self.minute,
        }
    }

    /// Step the minute, wrapping within the hour
    pub fn add_minutes(self, delta: i32) -> Self {
        Self {
            hour: self.hour,
            minute: (self.minute as i32 + delta).rem_euclid(60) as u8,
        }
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // Range is checked on construction
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0).unwrap_or_default()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// The currently armed reminder, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSchedule {
    pub time: TimeOfDay,
    pub handle: ReminderHandle,
}

pub struct ReminderScheduler {
    service: Box<dyn NotificationService>,
    title: String,
    body: String,
    active: Option<ReminderSchedule>,
}

impl ReminderScheduler {
    pub fn new(
        service: Box<dyn NotificationService>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            service,
            title: title.into(),
            body: body.into(),
            active: None,
        }
    }

    /// Ask for notification permission. Called once per session.
    ///
    /// A denial is only logged: arming keeps working, the reminder just
    /// never shows.
    pub async fn request_permission(&mut self) -> Permission {
        let permission = self.service.request_permission().await;
        match permission {
            Permission::Granted => tracing::info!("Notification permission granted"),
            Permission::Denied => tracing::info!("Notification permission denied, reminders will not show"),
        }
        permission
    }

    /// Arm a daily reminder at `time`, replacing any existing one
    pub async fn arm(&mut self, time: TimeOfDay) -> Result<ReminderHandle, NotifyError> {
        if let Some(previous) = self.active.take() {
            // Best-effort release, arming continues regardless
            if let Err(e) = self.service.cancel(&previous.handle).await {
                tracing::warn!("Failed to release reminder {}: {}", previous.handle, e);
            }
        }

        let reminder = Reminder {
            time,
            title: self.title.clone(),
            body: self.body.clone(),
        };
        let handle = self.service.schedule_daily(&reminder).await?;
        tracing::info!("Reminder armed at {} ({})", time, handle);

        self.active = Some(ReminderSchedule {
            time,
            handle: handle.clone(),
        });
        Ok(handle)
    }

    /// Cancel the armed reminder.
    ///
    /// Returns `false` without touching the service when nothing is armed.
    pub async fn cancel(&mut self) -> bool {
        let Some(current) = self.active.take() else {
            return false;
        };

        // Fire-and-forget
        if let Err(e) = self.service.cancel(&current.handle).await {
            tracing::debug!("Cancel of {} not acknowledged: {}", current.handle, e);
        }
        tracing::info!("Reminder {} cancelled", current.handle);
        true
    }

    pub fn active(&self) -> Option<&ReminderSchedule> {
        self.active.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Permission,
        Schedule(TimeOfDay),
        Cancel(ReminderHandle),
    }

    /// Records every call and hands out sequential handles
    #[derive(Clone, Default)]
    pub struct RecordingService {
        pub calls: Arc<Mutex<Vec<Call>>>,
        pub fail_cancel: bool,
    }

    #[async_trait]
    impl NotificationService for RecordingService {
        async fn request_permission(&mut self) -> Permission {
            self.calls.lock().push(Call::Permission);
            Permission::Granted
        }

        async fn schedule_daily(&mut self, reminder: &Reminder) -> Result<ReminderHandle, NotifyError> {
            let mut calls = self.calls.lock();
            calls.push(Call::Schedule(reminder.time));
            Ok(ReminderHandle::new(format!("r{}", calls.len())))
        }

        async fn cancel(&mut self, handle: &ReminderHandle) -> Result<(), NotifyError> {
            self.calls.lock().push(Call::Cancel(handle.clone()));
            if self.fail_cancel {
                Err(NotifyError::UnknownHandle(handle.clone()))
            } else {
                Ok(())
            }
        }
    }

    fn scheduler(service: &RecordingService) -> ReminderScheduler {
        ReminderScheduler::new(Box::new(service.clone()), "Alarm Plester", "Ganti plester")
    }

    fn time(hour: u8, minute: u8) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    #[test]
    fn test_time_range() {
        assert!(TimeOfDay::new(23, 59).is_ok());
        assert_eq!(TimeOfDay::new(24, 0), Err(TimeError::Hour(24)));
        assert_eq!(TimeOfDay::new(7, 60), Err(TimeError::Minute(60)));
    }

    #[test]
    fn test_time_stepping_wraps() {
        assert_eq!(time(23, 10).add_hours(1), time(0, 10));
        assert_eq!(time(0, 10).add_hours(-1), time(23, 10));
        assert_eq!(time(5, 59).add_minutes(1), time(5, 0));
        assert_eq!(time(5, 0).add_minutes(-5), time(5, 55));
        assert_eq!(time(7, 5).to_string(), "07:05");
    }

    #[tokio::test]
    async fn test_arm_from_unarmed() {
        let service = RecordingService::default();
        let mut s = scheduler(&service);

        let handle = s.arm(time(8, 30)).await.unwrap();
        assert_eq!(*service.calls.lock(), vec![Call::Schedule(time(8, 30))]);
        assert_eq!(s.active().unwrap().handle, handle);
        assert_eq!(s.active().unwrap().time, time(8, 30));
    }

    #[tokio::test]
    async fn test_rearm_releases_previous_handle() {
        let service = RecordingService::default();
        let mut s = scheduler(&service);

        let first = s.arm(time(8, 0)).await.unwrap();
        let second = s.arm(time(21, 15)).await.unwrap();

        let calls = service.calls.lock().clone();
        let schedules = calls.iter().filter(|c| matches!(c, Call::Schedule(_))).count();
        let cancels: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Cancel(h) => Some(h.clone()),
                _ => None,
            })
            .collect();

        assert_eq!(schedules, 2);
        assert_eq!(cancels, vec![first]);
        assert_eq!(s.active().unwrap().handle, second);
    }

    #[tokio::test]
    async fn test_rearm_proceeds_when_release_fails() {
        let service = RecordingService {
            fail_cancel: true,
            ..Default::default()
        };
        let mut s = scheduler(&service);

        s.arm(time(8, 0)).await.unwrap();
        let second = s.arm(time(9, 0)).await.unwrap();
        assert_eq!(s.active().unwrap().handle, second);
    }

    #[tokio::test]
    async fn test_cancel_unarmed_is_noop() {
        let service = RecordingService::default();
        let mut s = scheduler(&service);

        assert!(!s.cancel().await);
        assert!(service.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_armed() {
        let service = RecordingService::default();
        let mut s = scheduler(&service);

        let handle = s.arm(time(8, 0)).await.unwrap();
        assert!(s.cancel().await);
        assert!(!s.is_armed());
        assert_eq!(service.calls.lock().last(), Some(&Call::Cancel(handle)));

        // Second cancel goes nowhere
        let before = service.calls.lock().len();
        assert!(!s.cancel().await);
        assert_eq!(service.calls.lock().len(), before);
    }

    #[tokio::test]
    async fn test_permission_passthrough() {
        let service = RecordingService::default();
        let mut s = scheduler(&service);
        assert_eq!(s.request_permission().await, Permission::Granted);
        assert_eq!(*service.calls.lock(), vec![Call::Permission]);
    }
}
