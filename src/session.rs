//! Everything the user can change during one run of the app.

use crate::observation::{FluidPresence, ObservationLog, ObservationRecord, PainLevel, SkinCondition};
use crate::platform::Permission;
use crate::reminder::{ReminderScheduler, TimeOfDay};

/// Selector on the monitoring form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Skin,
    Pain,
    Fluid,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Skin, FormField::Pain, FormField::Fluid];

    pub fn title(self) -> &'static str {
        match self {
            FormField::Skin => "Kondisi Kulit",
            FormField::Pain => "Tingkat Nyeri",
            FormField::Fluid => "Ada Cairan?",
        }
    }

    /// Option labels in display order
    pub fn options(self) -> Vec<&'static str> {
        match self {
            FormField::Skin => SkinCondition::ALL.iter().map(|v| v.label()).collect(),
            FormField::Pain => PainLevel::ALL.iter().map(|v| v.label()).collect(),
            FormField::Fluid => FluidPresence::ALL.iter().map(|v| v.label()).collect(),
        }
    }

    pub fn next(self) -> Self {
        match self {
            FormField::Skin => FormField::Pain,
            FormField::Pain => FormField::Fluid,
            FormField::Fluid => FormField::Skin,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FormField::Skin => FormField::Fluid,
            FormField::Pain => FormField::Skin,
            FormField::Fluid => FormField::Pain,
        }
    }
}

/// In-progress, not yet saved form selections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingForm {
    pub skin: Option<SkinCondition>,
    pub pain: Option<PainLevel>,
    pub fluid: Option<FluidPresence>,
}

impl PendingForm {
    /// Index of the current choice for `field`
    pub fn selected_index(&self, field: FormField) -> Option<usize> {
        match field {
            FormField::Skin => self.skin.and_then(|v| SkinCondition::ALL.iter().position(|&o| o == v)),
            FormField::Pain => self.pain.and_then(|v| PainLevel::ALL.iter().position(|&o| o == v)),
            FormField::Fluid => self.fluid.and_then(|v| FluidPresence::ALL.iter().position(|&o| o == v)),
        }
    }

    /// Move the choice for `field` by `step`, wrapping.
    ///
    /// An unset field lands on the first option going forward and the last
    /// going backward.
    pub fn cycle(&mut self, field: FormField, step: i32) {
        let len = field.options().len() as i32;
        let index: i32 = match self.selected_index(field) {
            Some(i) => (i as i32 + step).rem_euclid(len),
            None if step >= 0 => 0,
            None => len - 1,
        };
        let index = index as usize;

        match field {
            FormField::Skin => self.skin = Some(SkinCondition::ALL[index]),
            FormField::Pain => self.pain = Some(PainLevel::ALL[index]),
            FormField::Fluid => self.fluid = Some(FluidPresence::ALL[index]),
        }
    }

    /// Build a record from a fully filled form
    pub fn to_record(&self) -> Option<ObservationRecord> {
        Some(ObservationRecord::new(self.skin?, self.pain?, self.fluid?))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Outcome of a save attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Incomplete,
}

/// Session-wide state, owned by the UI controller
pub struct Session {
    pub form: PendingForm,
    pub log: ObservationLog,
    pub reminder: ReminderScheduler,
    /// Time shown in the picker and used by the next arm
    pub alarm_time: TimeOfDay,
}

impl Session {
    pub fn new(reminder: ReminderScheduler, alarm_time: TimeOfDay) -> Self {
        Self {
            form: PendingForm::default(),
            log: ObservationLog::new(),
            reminder,
            alarm_time,
        }
    }

    /// One-time startup work: the notification permission request
    pub async fn start(&mut self) -> Permission {
        self.reminder.request_permission().await
    }

    /// Append the form as a record and clear it.
    ///
    /// Incomplete forms are refused and left untouched.
    pub fn save_form(&mut self) -> SaveOutcome {
        let Some(record) = self.form.to_record() else {
            tracing::debug!("Save refused, form incomplete: {:?}", self.form);
            return SaveOutcome::Incomplete;
        };
        self.log.append(record);
        self.form.reset();
        SaveOutcome::Saved
    }
}
