//! Time-slot catalog: reduces the raw `/timeslots` list to the ordered,
//! deduplicated slot labels used as grid rows, plus the checks the time
//! slot management screen runs before saving a slot.

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use super::types::{same_day, Day, TimeSlot};

static LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,2}:\d{2}(?::\d{2})?)\s*-\s*(\d{1,2}:\d{2}(?::\d{2})?)\s*$").unwrap()
});

fn parse_time(s: &str) -> Option<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()
}

/// Normalizes a wall-clock string to `HH:MM`, dropping seconds.
///
/// Input that is not a time is returned trimmed but otherwise untouched.
pub fn normalize_time(s: &str) -> String {
    match parse_time(s) {
        Some(t) => t.format("%H:%M").to_string(),
        None => s.trim().to_string(),
    }
}

/// Minutes since midnight, if `s` is a time.
pub fn minutes_of_day(s: &str) -> Option<u32> {
    parse_time(s).map(|t| t.hour() * 60 + t.minute())
}

/// Normalizes a `"<start>-<end>"` string to the catalog's label form.
///
/// Accepts spaces around the hyphen and times with seconds, so
/// `"09:00 - 10:00"` and `"09:00:00-10:00:00"` both become `"09:00-10:00"`.
pub fn canonical_label(s: &str) -> String {
    match LABEL_REGEX.captures(s) {
        Some(caps) => format!("{}-{}", normalize_time(&caps[1]), normalize_time(&caps[2])),
        None => s.trim().to_string(),
    }
}

/// Builds the ordered slot-label catalog.
///
/// Labels keep the order in which they first appear in `slots`; the
/// server's order is not re-sorted. A `(start, end)` pair repeated on
/// several days appears once.
pub fn build_catalog(slots: &[TimeSlot]) -> Vec<String> {
    let mut seen = HashSet::new();
    slots
        .iter()
        .map(TimeSlot::slot_label)
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

/// Every day of the week mapped to its slots, sorted by start time.
pub fn weekly_view(slots: &[TimeSlot]) -> BTreeMap<Day, Vec<TimeSlot>> {
    let mut week: BTreeMap<Day, Vec<TimeSlot>> =
        Day::ALL.into_iter().map(|d| (d, Vec::new())).collect();

    for slot in slots {
        if let Some(day) = slot.parsed_day() {
            week.entry(day).or_default().push(slot.clone());
        }
    }

    for day_slots in week.values_mut() {
        day_slots.sort_by_key(|s| normalize_time(&s.start_time));
    }

    week
}

/// Returns true when two slots share a day and their times intersect.
///
/// Ranges are half-open, so back-to-back slots do not overlap.
pub fn overlaps(a: &TimeSlot, b: &TimeSlot) -> bool {
    if !same_day(&a.day, &b.day) {
        return false;
    }

    match (
        minutes_of_day(&a.start_time),
        minutes_of_day(&a.end_time),
        minutes_of_day(&b.start_time),
        minutes_of_day(&b.end_time),
    ) {
        (Some(a_start), Some(a_end), Some(b_start), Some(b_end)) => {
            a_start < b_end && b_start < a_end
        }
        _ => false,
    }
}

/// Finds the first existing slot that overlaps `candidate`, skipping the
/// slot currently being edited.
pub fn find_conflict<'a>(
    existing: &'a [TimeSlot],
    candidate: &TimeSlot,
    editing_id: Option<i64>,
) -> Option<&'a TimeSlot> {
    existing
        .iter()
        .filter(|s| editing_id.is_none() || s.id != editing_id)
        .find(|s| overlaps(s, candidate))
}

/// Validation state of a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCheck {
    pub is_valid: bool,
    pub message: String,
}

impl FieldCheck {
    fn ok() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Result of checking a time slot before it is created or updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotValidation {
    pub day: FieldCheck,
    pub start_time: FieldCheck,
    pub end_time: FieldCheck,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<TimeSlot>,
}

impl SlotValidation {
    pub fn is_valid(&self) -> bool {
        self.day.is_valid && self.start_time.is_valid && self.end_time.is_valid
    }
}

/// Checks the fields of a candidate slot: a known day, both times
/// present and readable, and the end strictly after the start.
pub fn validate_time_slot(day: &str, start_time: &str, end_time: &str) -> SlotValidation {
    let day_check = if day.trim().is_empty() {
        FieldCheck::fail("Please select a day")
    } else if day.parse::<Day>().is_err() {
        FieldCheck::fail(format!("Unknown day: {}", day.trim()))
    } else {
        FieldCheck::ok()
    };

    let start = minutes_of_day(start_time);
    let end = minutes_of_day(end_time);

    let (start_check, end_check) = if start_time.trim().is_empty() || end_time.trim().is_empty() {
        (
            if start_time.trim().is_empty() {
                FieldCheck::fail("Start time is required")
            } else {
                FieldCheck::ok()
            },
            if end_time.trim().is_empty() {
                FieldCheck::fail("End time is required")
            } else {
                FieldCheck::ok()
            },
        )
    } else {
        match (start, end) {
            (None, _) | (_, None) => (
                start
                    .map(|_| FieldCheck::ok())
                    .unwrap_or_else(|| FieldCheck::fail("Start time must be HH:MM")),
                end.map(|_| FieldCheck::ok())
                    .unwrap_or_else(|| FieldCheck::fail("End time must be HH:MM")),
            ),
            (Some(s), Some(e)) if e <= s => (
                FieldCheck::fail("Start time must be before end time"),
                FieldCheck::fail("End time must be after start time"),
            ),
            _ => (FieldCheck::ok(), FieldCheck::ok()),
        }
    };

    SlotValidation {
        day: day_check,
        start_time: start_check,
        end_time: end_check,
        conflict: None,
    }
}

/// Field validation followed by a conflict check against `existing`.
pub fn check_time_slot(
    candidate: &TimeSlot,
    existing: &[TimeSlot],
    editing_id: Option<i64>,
) -> SlotValidation {
    let mut validation =
        validate_time_slot(&candidate.day, &candidate.start_time, &candidate.end_time);
    if !validation.is_valid() {
        return validation;
    }

    if let Some(conflict) = find_conflict(existing, candidate, editing_id) {
        validation.start_time = FieldCheck::fail("Conflicting time slot");
        validation.end_time = FieldCheck::fail("Conflicting time slot");
        validation.conflict = Some(conflict.clone());
    }

    validation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: &str, start: &str, end: &str) -> TimeSlot {
        TimeSlot::new(day, start, end)
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("09:00:00"), "09:00");
        assert_eq!(normalize_time("13:45"), "13:45");
        assert_eq!(normalize_time(" noon "), "noon");
    }

    #[test]
    fn test_canonical_label() {
        assert_eq!(canonical_label("09:00-10:00"), "09:00-10:00");
        assert_eq!(canonical_label(" 09:00 - 10:00 "), "09:00-10:00");
        assert_eq!(canonical_label("09:00:00-10:00:00"), "09:00-10:00");
        assert_eq!(canonical_label(" garbage "), "garbage");
    }

    #[test]
    fn test_catalog_deduplicates_across_days() {
        let slots = vec![
            slot("Monday", "09:00:00", "10:00:00"),
            slot("Tuesday", "09:00:00", "10:00:00"),
            slot("Monday", "10:00:00", "11:00:00"),
        ];
        assert_eq!(build_catalog(&slots), vec!["09:00-10:00", "10:00-11:00"]);
    }

    #[test]
    fn test_catalog_keeps_server_order() {
        let slots = vec![
            slot("Monday", "13:00", "14:00"),
            slot("Monday", "08:00", "09:00"),
            slot("Friday", "13:00", "14:00"),
            slot("Wednesday", "11:00", "12:00"),
        ];
        let catalog = build_catalog(&slots);
        assert_eq!(catalog, vec!["13:00-14:00", "08:00-09:00", "11:00-12:00"]);
        assert_eq!(build_catalog(&slots), catalog);
    }

    #[test]
    fn test_catalog_empty() {
        assert!(build_catalog(&[]).is_empty());
    }

    #[test]
    fn test_weekly_view_sorts_each_day() {
        let slots = vec![
            slot("Monday", "13:00", "14:00"),
            slot("Monday", "08:00", "09:00"),
            slot("Sunday", "10:00", "11:00"),
            slot("Someday", "10:00", "11:00"),
        ];
        let week = weekly_view(&slots);
        assert_eq!(week.len(), 7);
        let monday: Vec<_> = week[&Day::Monday].iter().map(|s| s.start_time.as_str()).collect();
        assert_eq!(monday, vec!["08:00", "13:00"]);
        assert_eq!(week[&Day::Sunday].len(), 1);
        assert!(week[&Day::Tuesday].is_empty());
    }

    #[test]
    fn test_overlaps_is_half_open() {
        let a = slot("Monday", "09:00", "10:00");
        assert!(overlaps(&a, &slot("Monday", "09:30", "10:30")));
        assert!(overlaps(&a, &slot("Monday", "08:00", "11:00")));
        assert!(!overlaps(&a, &slot("Monday", "10:00", "11:00")));
        assert!(!overlaps(&a, &slot("Tuesday", "09:00", "10:00")));
    }

    #[test]
    fn test_find_conflict_skips_slot_being_edited() {
        let existing = vec![slot("Monday", "09:00", "10:00").with_id(4)];
        let candidate = slot("Monday", "09:15", "09:45");
        assert!(find_conflict(&existing, &candidate, None).is_some());
        assert!(find_conflict(&existing, &candidate, Some(4)).is_none());
    }

    #[test]
    fn test_validate_time_slot_fields() {
        assert!(validate_time_slot("Monday", "09:00", "10:00").is_valid());

        let missing = validate_time_slot("", "", "10:00");
        assert_eq!(missing.day.message, "Please select a day");
        assert_eq!(missing.start_time.message, "Start time is required");
        assert!(missing.end_time.is_valid);

        let reversed = validate_time_slot("Monday", "10:00", "09:00");
        assert_eq!(reversed.start_time.message, "Start time must be before end time");
        assert_eq!(reversed.end_time.message, "End time must be after start time");

        let unreadable = validate_time_slot("Monday", "nine", "10:00");
        assert!(!unreadable.start_time.is_valid);
        assert!(unreadable.end_time.is_valid);
    }

    #[test]
    fn test_check_time_slot_reports_conflict() {
        let existing = vec![slot("Monday", "09:00", "10:00").with_id(1)];
        let result = check_time_slot(&slot("Monday", "09:30", "11:00"), &existing, None);
        assert!(!result.is_valid());
        assert_eq!(result.conflict.as_ref().and_then(|s| s.id), Some(1));

        let free = check_time_slot(&slot("Monday", "10:00", "11:00"), &existing, None);
        assert!(free.is_valid());
        assert!(free.conflict.is_none());
    }
}
