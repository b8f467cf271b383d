/// Pre-submit checks for instructor time-slot preferences
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::catalog::normalize_time;
use super::types::{same_day, Day, InstructorPreferences, Preference, TimeSlot};

/// Outcome of checking a preference candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceCheck {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PreferenceCheck {
    pub fn accepted() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

/// Returns true when `preference` names the same day and times as `slot`.
/// A preference without an end time matches on day and start alone.
fn preference_matches(preference: &Preference, slot: &TimeSlot) -> bool {
    same_day(&preference.day, &slot.day)
        && normalize_time(&preference.start_time) == normalize_time(&slot.start_time)
        && preference
            .end_time
            .as_deref()
            .map_or(true, |end| normalize_time(end) == normalize_time(&slot.end_time))
}

/// Checks a candidate time-slot id before it is submitted as a preference.
///
/// The id must be non-empty and name a slot in `slots`, and that slot's
/// day and times must not already be among `existing`. Existing
/// preferences are compared by value, not by id.
pub fn validate_preference_candidate(
    candidate_id: &str,
    existing: &[Preference],
    slots: &[TimeSlot],
) -> PreferenceCheck {
    let candidate_id = candidate_id.trim();
    if candidate_id.is_empty() {
        return PreferenceCheck::rejected("Please select a time slot");
    }

    let slot = candidate_id
        .parse::<i64>()
        .ok()
        .and_then(|id| slots.iter().find(|s| s.id == Some(id)));

    let Some(slot) = slot else {
        return PreferenceCheck::rejected(format!(
            "Time slot {} does not exist",
            candidate_id
        ));
    };

    if existing.iter().any(|p| preference_matches(p, slot)) {
        return PreferenceCheck::rejected(format!(
            "You already have a preference for {}",
            slot.display_label()
        ));
    }

    PreferenceCheck::accepted()
}

/// Picks one instructor's preference set out of the all-instructors
/// listing, which is keyed by full name. Instructors without preferences
/// are absent from the listing, so no match means an empty set.
pub fn preferences_for_instructor(
    listing: &[InstructorPreferences],
    full_name: &str,
) -> Vec<Preference> {
    listing
        .iter()
        .find(|entry| entry.instructor_name.trim() == full_name.trim())
        .map(|entry| entry.preferences.clone())
        .unwrap_or_default()
}

/// Groups preferences by day, keeping input order within each day.
/// Preferences with unrecognized days are left out.
pub fn group_by_day(preferences: &[Preference]) -> BTreeMap<Day, Vec<Preference>> {
    let mut grouped: BTreeMap<Day, Vec<Preference>> = BTreeMap::new();
    for preference in preferences {
        if let Ok(day) = preference.day.parse::<Day>() {
            grouped.entry(day).or_default().push(preference.clone());
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<TimeSlot> {
        vec![
            TimeSlot::new("Monday", "09:00:00", "10:00:00").with_id(1),
            TimeSlot::new("Monday", "10:00:00", "11:00:00").with_id(2),
            TimeSlot::new("Tuesday", "09:00:00", "10:00:00").with_id(3),
        ]
    }

    fn preference(id: i64, day: &str, start: &str, end: Option<&str>) -> Preference {
        Preference {
            id: Some(id),
            day: day.to_string(),
            start_time: start.to_string(),
            end_time: end.map(str::to_string),
        }
    }

    #[test]
    fn test_rejects_empty_candidate() {
        let check = validate_preference_candidate("  ", &[], &catalog());
        assert!(!check.ok);
        assert_eq!(check.reason.as_deref(), Some("Please select a time slot"));
    }

    #[test]
    fn test_rejects_unknown_candidate() {
        assert!(!validate_preference_candidate("42", &[], &catalog()).ok);
        assert!(!validate_preference_candidate("abc", &[], &catalog()).ok);
    }

    #[test]
    fn test_rejects_duplicate_by_value() {
        let existing = vec![preference(90, "Monday", "09:00", Some("10:00"))];
        let check = validate_preference_candidate("1", &existing, &catalog());
        assert!(!check.ok);
        assert_eq!(
            check.reason.as_deref(),
            Some("You already have a preference for Monday: 09:00-10:00")
        );
    }

    #[test]
    fn test_duplicate_without_end_time() {
        let existing = vec![preference(90, "Monday", "10:00:00", None)];
        assert!(!validate_preference_candidate("2", &existing, &catalog()).ok);
        assert!(validate_preference_candidate("1", &existing, &catalog()).ok);
    }

    #[test]
    fn test_accepts_new_slot() {
        let existing = vec![preference(90, "Monday", "09:00", Some("10:00"))];
        let check = validate_preference_candidate("3", &existing, &catalog());
        assert_eq!(check, PreferenceCheck::accepted());
    }

    #[test]
    fn test_preferences_for_instructor() {
        let listing = vec![
            InstructorPreferences {
                instructor_name: "Grace Hopper".to_string(),
                preferences: vec![preference(5, "Tuesday", "09:00", None)],
            },
            InstructorPreferences {
                instructor_name: "Ada Lovelace".to_string(),
                preferences: vec![preference(1, "Monday", "09:00", None)],
            },
        ];

        let ada = preferences_for_instructor(&listing, "Ada Lovelace");
        assert_eq!(ada.len(), 1);
        assert!(!validate_preference_candidate("1", &ada, &catalog()).ok);
        assert!(validate_preference_candidate("3", &ada, &catalog()).ok);

        assert!(preferences_for_instructor(&listing, "Alan Turing").is_empty());
    }

    #[test]
    fn test_group_by_day() {
        let prefs = vec![
            preference(1, "Tuesday", "09:00", None),
            preference(2, "Monday", "11:00", None),
            preference(3, "Monday", "08:00", None),
            preference(4, "Caturday", "08:00", None),
        ];
        let grouped = group_by_day(&prefs);
        assert_eq!(grouped.len(), 2);
        let monday: Vec<_> = grouped[&Day::Monday].iter().map(|p| p.id).collect();
        assert_eq!(monday, vec![Some(2), Some(3)]);
    }
}
