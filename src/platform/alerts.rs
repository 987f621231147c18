//! On-screen alert feed
//!
//! Confirmations, failures and due reminders all land here and the alerts
//! panel draws the newest few.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

use super::AlertSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Failure,
}

/// A message shown to the user
#[derive(Debug, Clone)]
pub struct Alert {
    pub title: String,
    pub body: Option<String>,
    pub severity: Severity,
    pub at: DateTime<Local>,
}

impl Alert {
    /// Single-line rendering for the status area
    pub fn line(&self) -> String {
        match &self.body {
            Some(body) => format!("{}: {}", self.title, body),
            None => self.title.clone(),
        }
    }
}

/// Bounded feed of recent alerts, newest last
#[derive(Debug)]
pub struct AlertFeed {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

impl AlertFeed {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            alerts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn latest(&self) -> Option<&Alert> {
        self.alerts.back()
    }

    /// Alerts newest first
    pub fn recent(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().rev()
    }

    // NOTE: len/is_empty are used in tests
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Show an alert drawn in the failure color
    pub fn show_failure(&mut self, title: &str, body: Option<&str>) {
        self.push(title, body, Severity::Failure);
    }

    fn push(&mut self, title: &str, body: Option<&str>, severity: Severity) {
        tracing::debug!("alert ({:?}): {} {:?}", severity, title, body);
        self.alerts.push_back(Alert {
            title: title.to_string(),
            body: body.map(str::to_string),
            severity,
            at: Local::now(),
        });
        while self.alerts.len() > self.capacity {
            self.alerts.pop_front();
        }
    }
}

impl AlertSurface for AlertFeed {
    fn show(&mut self, title: &str, body: Option<&str>) {
        self.push(title, body, Severity::Info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_is_bounded() {
        let mut feed = AlertFeed::new(2);
        feed.show("a", None);
        feed.show("b", None);
        feed.show("c", Some("body"));

        assert_eq!(feed.len(), 2);
        assert_eq!(feed.latest().unwrap().line(), "c: body");
        let titles: Vec<_> = feed.recent().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "b"]);
    }

    #[test]
    fn test_failure_severity() {
        let mut feed = AlertFeed::new(3);
        feed.show("Data tersimpan", None);
        feed.show_failure("Ekspor gagal", None);

        let severities: Vec<_> = feed.recent().map(|a| a.severity).collect();
        assert_eq!(severities, vec![Severity::Failure, Severity::Info]);
    }
}
