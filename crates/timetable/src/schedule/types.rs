/// Types for time slots, schedule records and the projected weekly grid
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::catalog::normalize_time;

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All seven days in order.
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// The five teaching days rendered by timetable grids.
    pub const WEEKDAYS: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    /// Returns true for Monday through Friday.
    pub fn is_weekday(&self) -> bool {
        !matches!(self, Day::Saturday | Day::Sunday)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a day name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDay(pub String);

impl fmt::Display for UnknownDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown day: {}", self.0)
    }
}

impl std::error::Error for UnknownDay {}

impl FromStr for Day {
    type Err = UnknownDay;

    /// Parses a full English day name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Day::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownDay(trimmed.to_string()))
    }
}

/// A schedulable period as returned by `GET /timeslots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(default)]
    pub id: Option<i64>,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

impl TimeSlot {
    pub fn new(day: &str, start_time: &str, end_time: &str) -> Self {
        Self {
            id: None,
            day: day.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// The parsed day, if the server sent a recognizable day name.
    pub fn parsed_day(&self) -> Option<Day> {
        self.day.parse().ok()
    }

    /// Grid row key, e.g. `"09:00-10:00"`.
    pub fn slot_label(&self) -> String {
        format!(
            "{}-{}",
            normalize_time(&self.start_time),
            normalize_time(&self.end_time)
        )
    }

    /// Day-qualified label, e.g. `"Monday: 09:00-10:00"`.
    pub fn display_label(&self) -> String {
        format!("{}: {}", self.day.trim(), self.slot_label())
    }

    /// Two slots are the same logical slot when day, start and end agree,
    /// regardless of their server ids.
    pub fn same_slot(&self, other: &TimeSlot) -> bool {
        same_day(&self.day, &other.day)
            && normalize_time(&self.start_time) == normalize_time(&other.start_time)
            && normalize_time(&self.end_time) == normalize_time(&other.end_time)
    }
}

/// Compares day names the way `Day::from_str` reads them, falling back to
/// a trimmed case-insensitive comparison for unknown names.
pub(crate) fn same_day(a: &str, b: &str) -> bool {
    match (a.parse::<Day>(), b.parse::<Day>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}

/// Sparse schedule as stored by the scheduler: index `i` of every array
/// describes one occupied cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    /// Entries of the form `"<Day> <start>-<end>"`
    #[serde(default)]
    pub time_slots: Vec<String>,
    #[serde(default)]
    pub course_codes: Vec<String>,
    #[serde(default)]
    pub room_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructor_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The body of a timetable response. The scheduler may return a bare
/// record, a list of records (of which only the first is used), or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScheduleResponse {
    Many(Vec<ScheduleRecord>),
    One(ScheduleRecord),
    #[default]
    Empty,
}

impl ScheduleResponse {
    /// Unwraps the singleton-array form. Returns `None` when there is no record.
    pub fn record(&self) -> Option<&ScheduleRecord> {
        match self {
            ScheduleResponse::Many(records) => records.first(),
            ScheduleResponse::One(record) => Some(record),
            ScheduleResponse::Empty => None,
        }
    }
}

impl From<ScheduleRecord> for ScheduleResponse {
    fn from(record: ScheduleRecord) -> Self {
        ScheduleResponse::One(record)
    }
}

/// One occupied cell recovered from a [`ScheduleRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub day: String,
    pub slot_label: String,
    pub course_code: String,
    pub room_name: String,
}

/// Contents of an occupied grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub course_code: String,
    pub room_name: String,
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.course_code, self.room_name)
    }
}

/// Dense weekday x slot matrix.
///
/// Every day in `days` has exactly `slot_labels.len()` cells; empty cells are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub days: Vec<Day>,
    pub slot_labels: Vec<String>,
    pub cells: BTreeMap<Day, Vec<Option<GridCell>>>,
}

impl Grid {
    /// The cell at `(day, index)`, or `None` when empty or out of range.
    pub fn cell(&self, day: Day, index: usize) -> Option<&GridCell> {
        self.cells
            .get(&day)
            .and_then(|row| row.get(index))
            .and_then(|c| c.as_ref())
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells
            .values()
            .flat_map(|row| row.iter())
            .filter(|c| c.is_some())
            .count()
    }

    /// True when no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }
}

/// An instructor's preferred time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    #[serde(default)]
    pub id: Option<i64>,
    pub day: String,
    pub start_time: String,
    /// Older preference records carry only a start time
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Instructor record from `GET /instructors/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Instructor {
    /// Name as used by the preference listing, e.g. `"Ada Lovelace"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// One entry of `GET /instructors/preferences`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorPreferences {
    #[serde(default)]
    pub instructor_name: String,
    #[serde(default)]
    pub preferences: Vec<Preference>,
}

/// Body of `GET /instructors/me/preferences`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferencesResponse {
    Wrapped { preferences: Vec<Preference> },
    Bare(Vec<Preference>),
}

impl PreferencesResponse {
    pub fn into_vec(self) -> Vec<Preference> {
        match self {
            PreferencesResponse::Wrapped { preferences } => preferences,
            PreferencesResponse::Bare(preferences) => preferences,
        }
    }
}
