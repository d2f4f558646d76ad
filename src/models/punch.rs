//! Punch event model.
//!
//! A punch is a single clock-in or clock-out record. Each punch on a day
//! occupies an ordinal slot; the first four slots carry fixed meaning
//! (day start, break start, break end, day end).

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchKind {
    /// Clock in: opens a work interval.
    Start,
    /// Clock out: closes a work interval.
    End,
}

/// Where a punch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchSource {
    /// Entered by the employee through a UI.
    Manual,
    /// Recorded by a card reader.
    Hardware,
    /// Synthesized by the auto-close pass.
    SystemAutoClose,
    /// Corrected by an administrator.
    AdminCorrection,
    /// Corrected by the employee.
    UserCorrection,
}

/// Ordinal slot of a punch within its day.
///
/// Odd slots open a work interval and even slots close one.
///
/// # Example
///
/// ```
/// use worktime_engine::models::{PunchKind, PunchSlot};
///
/// assert_eq!(PunchSlot::from_ordinal(4), PunchSlot::DayEnd);
/// assert_eq!(PunchSlot::BreakEnd.kind(), PunchKind::Start);
/// assert_eq!(PunchSlot::from_ordinal(6).ordinal(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum PunchSlot {
    /// Slot 1.
    DayStart,
    /// Slot 2.
    BreakStart,
    /// Slot 3.
    BreakEnd,
    /// Slot 4.
    DayEnd,
    /// Any other ordinal (0 or 5 and above).
    Extra(u8),
}

impl PunchSlot {
    /// Maps a stored ordinal to a slot.
    pub fn from_ordinal(ordinal: u8) -> Self {
        match ordinal {
            1 => PunchSlot::DayStart,
            2 => PunchSlot::BreakStart,
            3 => PunchSlot::BreakEnd,
            4 => PunchSlot::DayEnd,
            other => PunchSlot::Extra(other),
        }
    }

    /// Returns the stored ordinal.
    pub fn ordinal(self) -> u8 {
        match self {
            PunchSlot::DayStart => 1,
            PunchSlot::BreakStart => 2,
            PunchSlot::BreakEnd => 3,
            PunchSlot::DayEnd => 4,
            PunchSlot::Extra(ordinal) => ordinal,
        }
    }

    /// Returns the punch direction this slot implies.
    pub fn kind(self) -> PunchKind {
        if self.ordinal() % 2 == 1 {
            PunchKind::Start
        } else {
            PunchKind::End
        }
    }
}

impl From<u8> for PunchSlot {
    fn from(ordinal: u8) -> Self {
        PunchSlot::from_ordinal(ordinal)
    }
}

impl From<PunchSlot> for u8 {
    fn from(slot: PunchSlot) -> Self {
        slot.ordinal()
    }
}

/// A stored punch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchEvent {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee who punched.
    pub employee_id: String,
    /// When the punch happened (local time).
    pub timestamp: NaiveDateTime,
    /// Clock in or clock out.
    pub kind: PunchKind,
    /// Ordinal slot within the day.
    pub slot: PunchSlot,
    /// Origin of the punch.
    pub source: PunchSource,
    /// Set once the punch has been altered by a correction.
    #[serde(default)]
    pub corrected: bool,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
}

impl PunchEvent {
    /// Returns the calendar day the punch belongs to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// A punch about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPunch {
    /// The employee who punched.
    pub employee_id: String,
    /// When the punch happened.
    pub timestamp: NaiveDateTime,
    /// Ordinal slot; the direction follows from it.
    pub slot: PunchSlot,
    /// Origin of the punch.
    pub source: PunchSource,
    /// Free-form note.
    pub note: Option<String>,
}

impl NewPunch {
    /// Creates a punch request for the given slot.
    pub fn new(
        employee_id: impl Into<String>,
        timestamp: NaiveDateTime,
        slot: PunchSlot,
        source: PunchSource,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            timestamp,
            slot,
            source,
            note: None,
        }
    }

    /// Attaches a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Returns the calendar day the punch will belong to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Materializes the stored event with a fresh identifier.
    pub fn into_event(self) -> PunchEvent {
        PunchEvent {
            id: Uuid::new_v4(),
            kind: self.slot.kind(),
            employee_id: self.employee_id,
            timestamp: self.timestamp,
            slot: self.slot,
            source: self.source,
            corrected: false,
            note: self.note,
        }
    }
}
