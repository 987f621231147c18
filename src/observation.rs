//! Wound observations and the in-memory session log.
//!
//! Every choice field is a closed enum, so a record can only be built from
//! values the form actually offers. The log is append-only and lives for the
//! session; nothing is written to disk.

use chrono::{DateTime, Local};

/// Skin moisture around the wound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinCondition {
    VeryDry,
    Dry,
    SlightlyMoist,
    Moist,
    VeryMoist,
}

impl SkinCondition {
    pub const ALL: [SkinCondition; 5] = [
        SkinCondition::VeryDry,
        SkinCondition::Dry,
        SkinCondition::SlightlyMoist,
        SkinCondition::Moist,
        SkinCondition::VeryMoist,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SkinCondition::VeryDry => "Sangat Kering",
            SkinCondition::Dry => "Kering",
            SkinCondition::SlightlyMoist => "Sedikit Lembab",
            SkinCondition::Moist => "Lembab",
            SkinCondition::VeryMoist => "Sangat Lembab",
        }
    }
}

/// Self-reported pain level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PainLevel {
    Severe,
    Painful,
    Mild,
    None,
}

impl PainLevel {
    pub const ALL: [PainLevel; 4] = [
        PainLevel::Severe,
        PainLevel::Painful,
        PainLevel::Mild,
        PainLevel::None,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PainLevel::Severe => "Sangat Nyeri",
            PainLevel::Painful => "Nyeri",
            PainLevel::Mild => "Sedikit Nyeri",
            PainLevel::None => "Tidak Sama Sekali",
        }
    }
}

/// Whether the wound is producing exudate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluidPresence {
    Present,
    Slight,
    Absent,
}

impl FluidPresence {
    pub const ALL: [FluidPresence; 3] = [
        FluidPresence::Present,
        FluidPresence::Slight,
        FluidPresence::Absent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FluidPresence::Present => "Ada Cairan",
            FluidPresence::Slight => "Ada Sedikit Cairan",
            FluidPresence::Absent => "Tidak ada Cairan",
        }
    }
}

/// Map a pain label to its chart value.
///
/// Labels outside the table chart as 0 rather than failing.
pub fn pain_score(label: &str) -> u32 {
    match label {
        "Sangat Nyeri" => 5,
        "Nyeri" => 4,
        "Sedikit Nyeri" => 3,
        "Tidak Sama Sekali" => 0,
        _ => 0,
    }
}

/// One logged snapshot of the wound
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub skin: SkinCondition,
    pub pain: PainLevel,
    pub fluid: FluidPresence,
    /// Capture instant
    pub timestamp: DateTime<Local>,
}

impl ObservationRecord {
    pub fn new(skin: SkinCondition, pain: PainLevel, fluid: FluidPresence) -> Self {
        Self::at(skin, pain, fluid, Local::now())
    }

    pub fn at(
        skin: SkinCondition,
        pain: PainLevel,
        fluid: FluidPresence,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            skin,
            pain,
            fluid,
            timestamp,
        }
    }
}

/// Append-only, insertion-ordered observation log
#[derive(Debug, Default)]
pub struct ObservationLog {
    records: Vec<ObservationRecord>,
}

impl ObservationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ObservationRecord) {
        tracing::debug!(
            skin = record.skin.label(),
            pain = record.pain.label(),
            fluid = record.fluid.label(),
            "observation appended"
        );
        self.records.push(record);
    }

    /// All records, oldest first
    pub fn all(&self) -> &[ObservationRecord] {
        &self.records
    }

    /// Pain series for the trend chart, one point per record in log order
    pub fn pain_trend(&self) -> Vec<u32> {
        self.records
            .iter()
            .map(|r| pain_score(r.pain.label()))
            .collect()
    }

    #[allow(dead_code)] // Used in tests
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
