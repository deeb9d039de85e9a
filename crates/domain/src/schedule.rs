use std::ops::Range;

use chrono::{Datelike, Days, NaiveDate};
use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, ExerciseID, Focus, ReadError, SessionType, UpdateError, WorkoutPlan};

#[allow(async_fn_in_trait)]
pub trait ScheduleService {
    async fn get_schedule(&self) -> Result<Vec<ScheduleEntry>, ReadError>;
    async fn schedule_workout(
        &self,
        date: NaiveDate,
        plan: &WorkoutPlan,
    ) -> Result<ScheduleEntry, CreateError>;
    async fn complete_workout(&self, id: ScheduleEntryID) -> Result<ScheduleEntry, UpdateError>;

    async fn get_week(&self, date: NaiveDate) -> Result<Vec<ScheduleEntry>, ReadError> {
        Ok(Schedule::new(self.get_schedule().await?).entries_in_window(week_of(date)))
    }
}

#[allow(async_fn_in_trait)]
pub trait ScheduleRepository {
    async fn read_schedule(&self) -> Result<Vec<ScheduleEntry>, ReadError>;
    async fn append_schedule_entry(
        &self,
        entry: ScheduleEntry,
    ) -> Result<ScheduleEntry, CreateError>;
    async fn complete_schedule_entry(
        &self,
        id: ScheduleEntryID,
    ) -> Result<ScheduleEntry, UpdateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub id: ScheduleEntryID,
    pub date: NaiveDate,
    pub focus: Focus,
    pub session_type: SessionType,
    pub exercises: Vec<ExerciseID>,
    pub completed: bool,
}

impl ScheduleEntry {
    #[must_use]
    pub fn planned(date: NaiveDate, plan: &WorkoutPlan) -> Self {
        Self {
            id: ScheduleEntryID::random(),
            date,
            focus: plan.focus,
            session_type: plan.session_type,
            exercises: plan.exercises(),
            completed: false,
        }
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScheduleEntryID(Uuid);

impl ScheduleEntryID {
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ScheduleEntryID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ScheduleEntryID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Append-only log of scheduled workouts. Entries are never removed, only their completed
/// flag changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    #[must_use]
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    pub fn record(&mut self, entry: ScheduleEntry) -> Result<&ScheduleEntry, ScheduleError> {
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(ScheduleError::Conflict(entry.id));
        }
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn complete(&mut self, id: ScheduleEntryID) -> Result<&ScheduleEntry, ScheduleError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ScheduleError::NotFound(id))?;
        entry.completed = true;
        Ok(entry)
    }

    #[must_use]
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Entries dated within `[start, end)` in ascending order of their date. Entries with the
    /// same date keep the order in which they were recorded.
    #[must_use]
    pub fn entries_in_window(&self, window: Range<NaiveDate>) -> Vec<ScheduleEntry> {
        let mut entries = self
            .entries
            .iter()
            .filter(|e| window.contains(&e.date))
            .cloned()
            .collect::<Vec<_>>();
        entries.sort_by_key(|e| e.date);
        entries
    }

    #[must_use]
    pub fn last_completed(&self, focus: Focus) -> Option<&ScheduleEntry> {
        last_completed(&self.entries, focus)
    }
}

/// Monday to Monday window containing the date, clamped to the range of representable dates.
#[must_use]
pub fn week_of(date: NaiveDate) -> Range<NaiveDate> {
    let monday = date
        .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
        .unwrap_or(NaiveDate::MIN);
    monday..monday.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX)
}

/// Latest completed entry with the given focus. Of entries on the same day the one recorded
/// last wins.
#[must_use]
pub fn last_completed(history: &[ScheduleEntry], focus: Focus) -> Option<&ScheduleEntry> {
    history
        .iter()
        .filter(|e| e.completed && e.focus == focus)
        .max_by_key(|e| e.date)
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ScheduleError {
    #[error("schedule entry {} not found", .0.as_hyphenated())]
    NotFound(ScheduleEntryID),
    #[error("schedule entry {} already exists", .0.as_hyphenated())]
    Conflict(ScheduleEntryID),
}

impl From<ScheduleError> for CreateError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::Conflict(_) => CreateError::Conflict,
            ScheduleError::NotFound(_) => CreateError::Other(value.to_string().into()),
        }
    }
}

impl From<ScheduleError> for UpdateError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::NotFound(_) => UpdateError::NotFound,
            ScheduleError::Conflict(_) => UpdateError::Other(value.to_string().into()),
        }
    }
}
