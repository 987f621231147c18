use chrono::NaiveDateTime;

use crate::config::Config;
use crate::observation::ObservationRecord;
use crate::platform::{
    AlertFeed, AlertSurface, DocumentRenderer, FileRef, LocalNotifier, NotifyError, ShareTransport,
};
use crate::reminder::TimeOfDay;
use crate::report::{self, ExportError};
use crate::session::{FormField, SaveOutcome, Session};
use crate::ui::Theme;

/// Which half of the time picker the arrows change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerField {
    Hour,
    Minute,
}

/// Application mode - determines what UI to show and how to handle input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    /// Single main screen: alarm, form, chart
    Main,
    /// Time picker overlay with a draft time not yet committed
    TimePicker { draft: TimeOfDay, field: PickerField },
    /// Quit requested
    Exit,
}

/// UI controller. Owns the session and routes every user action to the
/// component that handles it.
pub struct App {
    mode: AppMode,
    session: Session,
    /// Focused form selector
    focus: FormField,
    alerts: AlertFeed,
    renderer: Box<dyn DocumentRenderer>,
    share: Box<dyn ShareTransport>,
    timestamp_format: String,
    /// Source of due reminder deliveries, when the notifier is in-process
    reminder_feed: Option<LocalNotifier>,
    theme: Theme,
    last_export: Option<FileRef>,
}

impl App {
    pub fn new(
        session: Session,
        renderer: Box<dyn DocumentRenderer>,
        share: Box<dyn ShareTransport>,
        config: &Config,
    ) -> Self {
        Self {
            mode: AppMode::Main,
            session,
            focus: FormField::Skin,
            alerts: AlertFeed::new(config.appearance.alert_history),
            renderer,
            share,
            timestamp_format: config.report.timestamp_format.clone(),
            reminder_feed: None,
            theme: config.resolve_theme(),
            last_export: None,
        }
    }

    pub fn with_reminder_feed(mut self, notifier: LocalNotifier) -> Self {
        self.reminder_feed = Some(notifier);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn mode(&self) -> &AppMode {
        &self.mode
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn alerts(&self) -> &AlertFeed {
        &self.alerts
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn last_export(&self) -> Option<&FileRef> {
        self.last_export.as_ref()
    }

    pub fn records(&self) -> &[ObservationRecord] {
        self.session.log.all()
    }

    /// Chart points: x is the 1-based record position, y the pain value
    pub fn trend_points(&self) -> Vec<(f64, f64)> {
        self.session
            .log
            .pain_trend()
            .into_iter()
            .enumerate()
            .map(|(i, v)| ((i + 1) as f64, v as f64))
            .collect()
    }

    pub fn should_exit(&self) -> bool {
        matches!(self.mode, AppMode::Exit)
    }

    pub fn quit(&mut self) {
        self.mode = AppMode::Exit;
    }

    // --- Alarm ---

    /// Open the picker on the current alarm time
    pub fn open_picker(&mut self) {
        self.mode = AppMode::TimePicker {
            draft: self.session.alarm_time,
            field: PickerField::Hour,
        };
    }

    pub fn picker_step(&mut self, delta: i32) {
        if let AppMode::TimePicker { draft, field } = &mut self.mode {
            *draft = match field {
                PickerField::Hour => draft.add_hours(delta),
                PickerField::Minute => draft.add_minutes(delta),
            };
        }
    }

    pub fn picker_switch_field(&mut self) {
        if let AppMode::TimePicker { field, .. } = &mut self.mode {
            *field = match field {
                PickerField::Hour => PickerField::Minute,
                PickerField::Minute => PickerField::Hour,
            };
        }
    }

    /// Commit the picked time. Does not arm anything.
    pub fn picker_confirm(&mut self) {
        if let AppMode::TimePicker { draft, .. } = self.mode {
            self.session.alarm_time = draft;
            tracing::debug!("Alarm time set to {}", draft);
        }
        self.mode = AppMode::Main;
    }

    /// Close the picker without a choice; the alarm time stays as it was
    pub fn picker_dismiss(&mut self) {
        self.mode = AppMode::Main;
    }

    /// Arm (or re-arm) the reminder at the current alarm time
    pub async fn confirm_alarm(&mut self) -> Result<(), NotifyError> {
        let time = self.session.alarm_time;
        self.session.reminder.arm(time).await?;
        let body = format!("Jam {}:{}", time.hour(), time.minute());
        self.alerts.show("Alarm disetel", Some(&body));
        Ok(())
    }

    pub async fn stop_alarm(&mut self) {
        if self.session.reminder.cancel().await {
            self.alerts.show("Alarm dihentikan", None);
        }
    }

    /// Surface reminders that came due since the last tick
    pub fn poll_reminders(&mut self, now: NaiveDateTime) {
        let Some(feed) = &self.reminder_feed else {
            return;
        };
        for delivery in feed.take_due(now) {
            tracing::debug!("Showing reminder {}", delivery.handle);
            self.alerts.show(&delivery.title, Some(&delivery.body));
        }
    }

    // --- Form ---

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Cycle the focused selector's choice
    pub fn cycle_selection(&mut self, step: i32) {
        self.session.form.cycle(self.focus, step);
    }

    pub fn save_form(&mut self) {
        match self.session.save_form() {
            SaveOutcome::Saved => {
                self.focus = FormField::Skin;
                self.alerts.show("Data tersimpan", None);
            }
            SaveOutcome::Incomplete => self.alerts.show(
                "Data belum lengkap",
                Some("Pilih kondisi kulit, tingkat nyeri, dan cairan"),
            ),
        }
    }

    // --- Export ---

    /// Export the full log. Failures are returned untouched.
    pub async fn export(&mut self) -> Result<(), ExportError> {
        let file = report::export(
            self.session.log.all(),
            &self.timestamp_format,
            self.renderer.as_ref(),
            self.share.as_ref(),
        )
        .await?;

        let path = file.path().display().to_string();
        self.alerts.show("Laporan dibuat", Some(&path));
        self.last_export = Some(file);
        Ok(())
    }

    /// Generic failure surface for handler errors
    pub fn report_failure(&mut self, title: &str, err: &(dyn std::error::Error + 'static)) {
        let mut chain = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push_str(": ");
            chain.push_str(&cause.to_string());
            source = cause.source();
        }
        tracing::error!("{}: {}", title, chain);
        self.alerts.show_failure(title, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{FluidPresence, PainLevel, SkinCondition};
    use crate::platform::{RenderError, Severity, ShareError};
    use crate::reminder::tests::{Call, RecordingService};
    use crate::reminder::ReminderScheduler;
    use async_trait::async_trait;
    use chrono::{Duration, Local};

    struct NullRenderer;

    #[async_trait]
    impl DocumentRenderer for NullRenderer {
        async fn render(&self, _html: &str) -> Result<FileRef, RenderError> {
            Ok(FileRef::new("/mem/report.html"))
        }
    }

    struct DeclinedShare;

    #[async_trait]
    impl ShareTransport for DeclinedShare {
        async fn share(&self, _file: &FileRef) -> Result<(), ShareError> {
            Err(ShareError::Exit("exit status: 1".into()))
        }
    }

    struct AcceptingShare;

    #[async_trait]
    impl ShareTransport for AcceptingShare {
        async fn share(&self, _file: &FileRef) -> Result<(), ShareError> {
            Ok(())
        }
    }

    fn app_with(service: &RecordingService, share: Box<dyn ShareTransport>) -> App {
        let scheduler = ReminderScheduler::new(Box::new(service.clone()), "Alarm Plester", "Ganti");
        let session = Session::new(scheduler, TimeOfDay::new(8, 5).unwrap());
        App::new(session, Box::new(NullRenderer), share, &Config::default())
    }

    fn app(service: &RecordingService) -> App {
        app_with(service, Box::new(AcceptingShare))
    }

    fn fill_form(app: &mut App, skin: i32, pain: i32, fluid: i32) {
        for (steps, field) in [(skin, FormField::Skin), (pain, FormField::Pain), (fluid, FormField::Fluid)] {
            while app.focus() != field {
                app.focus_next();
            }
            for _ in 0..steps {
                app.cycle_selection(1);
            }
        }
    }

    #[tokio::test]
    async fn test_confirm_alarm_message_has_time() {
        let service = RecordingService::default();
        let mut app = app(&service);

        app.confirm_alarm().await.unwrap();
        let alert = app.alerts().latest().unwrap();
        assert_eq!(alert.title, "Alarm disetel");
        assert_eq!(alert.body.as_deref(), Some("Jam 8:5"));
        assert!(app.session().reminder.is_armed());
    }

    #[tokio::test]
    async fn test_stop_unarmed_is_silent() {
        let service = RecordingService::default();
        let mut app = app(&service);

        app.stop_alarm().await;
        assert!(app.alerts().is_empty());
        assert!(service.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_stop_armed() {
        let service = RecordingService::default();
        let mut app = app(&service);

        app.confirm_alarm().await.unwrap();
        app.stop_alarm().await;
        assert_eq!(app.alerts().latest().unwrap().title, "Alarm dihentikan");
        assert!(matches!(service.calls.lock().last(), Some(Call::Cancel(_))));
    }

    #[test]
    fn test_picker_dismiss_keeps_time() {
        let service = RecordingService::default();
        let mut app = app(&service);

        app.open_picker();
        app.picker_step(3);
        app.picker_dismiss();
        assert_eq!(app.session().alarm_time, TimeOfDay::new(8, 5).unwrap());
        assert_eq!(*app.mode(), AppMode::Main);
    }

    #[test]
    fn test_picker_confirm_updates_time() {
        let service = RecordingService::default();
        let mut app = app(&service);

        app.open_picker();
        app.picker_step(-9);
        app.picker_switch_field();
        app.picker_step(10);
        app.picker_confirm();
        assert_eq!(app.session().alarm_time, TimeOfDay::new(23, 15).unwrap());
    }

    #[tokio::test]
    async fn test_rearm_after_picking_new_time() {
        let service = RecordingService::default();
        let mut app = app(&service);

        app.confirm_alarm().await.unwrap();
        app.open_picker();
        app.picker_step(12);
        app.picker_confirm();
        app.confirm_alarm().await.unwrap();

        let calls = service.calls.lock().clone();
        assert_eq!(
            calls,
            vec![
                Call::Schedule(TimeOfDay::new(8, 5).unwrap()),
                Call::Cancel(crate::platform::ReminderHandle::new("r1")),
                Call::Schedule(TimeOfDay::new(20, 5).unwrap()),
            ]
        );
        assert_eq!(app.alerts().latest().unwrap().body.as_deref(), Some("Jam 20:5"));
    }

    #[test]
    fn test_save_flow_and_trend() {
        let service = RecordingService::default();
        let mut app = app(&service);

        // Kering / Nyeri / Tidak ada Cairan
        fill_form(&mut app, 2, 2, 3);
        app.save_form();
        // Lembab / Sangat Nyeri / Ada Cairan
        fill_form(&mut app, 4, 1, 1);
        app.save_form();

        let records = app.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].skin, SkinCondition::Dry);
        assert_eq!(records[0].fluid, FluidPresence::Absent);
        assert_eq!(records[1].pain, PainLevel::Severe);
        assert_eq!(app.trend_points(), vec![(1.0, 4.0), (2.0, 5.0)]);
        assert_eq!(app.alerts().latest().unwrap().title, "Data tersimpan");
    }

    #[test]
    fn test_incomplete_save_warns() {
        let service = RecordingService::default();
        let mut app = app(&service);

        app.cycle_selection(1);
        app.save_form();
        assert!(app.records().is_empty());
        assert_eq!(app.alerts().latest().unwrap().title, "Data belum lengkap");
    }

    #[tokio::test]
    async fn test_export_empty_log() {
        let service = RecordingService::default();
        let mut app = app(&service);

        app.export().await.unwrap();
        assert_eq!(app.last_export(), Some(&FileRef::new("/mem/report.html")));
    }

    #[tokio::test]
    async fn test_export_failure_propagates() {
        let service = RecordingService::default();
        let mut app = app_with(&service, Box::new(DeclinedShare));

        let err = app.export().await.unwrap_err();
        assert!(matches!(err, ExportError::Share(_)));
        assert!(app.last_export().is_none());

        app.report_failure("Ekspor gagal", &err);
        let alert = app.alerts().latest().unwrap();
        assert_eq!(alert.title, "Ekspor gagal");
        assert_eq!(alert.severity, Severity::Failure);
    }

    #[tokio::test]
    async fn test_due_reminder_becomes_alert() {
        use crate::platform::NotificationService;

        let mut notifier = LocalNotifier::new(true);
        notifier.request_permission().await;
        let scheduler = ReminderScheduler::new(
            Box::new(notifier.clone()),
            "Alarm Plester",
            "Sudahkah Anda mengganti plester?",
        );
        let session = Session::new(scheduler, TimeOfDay::now());
        let mut app = App::new(session, Box::new(NullRenderer), Box::new(AcceptingShare), &Config::default())
            .with_reminder_feed(notifier);

        app.confirm_alarm().await.unwrap();
        app.poll_reminders(Local::now().naive_local() + Duration::days(1));

        let alert = app.alerts().latest().unwrap();
        assert_eq!(alert.line(), "Alarm Plester: Sudahkah Anda mengganti plester?");
    }
}
