/// Conversion of the scheduler's parallel-array record into schedule entries
use tracing::debug;

use super::catalog::canonical_label;
use super::types::{ScheduleEntry, ScheduleResponse};

/// Parses a schedule response into one entry per occupied cell.
///
/// The singleton-array wrapping is unwrapped here. Each `timeSlots[i]` is
/// split on its first space into day and slot label; entries whose label
/// is not in `catalog`, or whose slot string has no space, are dropped.
/// A missing record yields no entries. When the course or room array is
/// shorter than `timeSlots`, the missing value is an empty string.
pub fn parse_schedule_record(raw: &ScheduleResponse, catalog: &[String]) -> Vec<ScheduleEntry> {
    let Some(record) = raw.record() else {
        return Vec::new();
    };

    let mut entries = Vec::with_capacity(record.time_slots.len());

    for (i, time_slot) in record.time_slots.iter().enumerate() {
        let Some((day, remainder)) = time_slot.trim_start().split_once(' ') else {
            debug!(slot = %time_slot, "Dropping schedule entry without a day prefix");
            continue;
        };

        let slot_label = canonical_label(remainder);
        if !catalog.contains(&slot_label) {
            debug!(slot = %time_slot, "Dropping schedule entry with unknown slot label");
            continue;
        }

        entries.push(ScheduleEntry {
            day: day.to_string(),
            slot_label,
            course_code: record.course_codes.get(i).cloned().unwrap_or_default(),
            room_name: record.room_names.get(i).cloned().unwrap_or_default(),
        });
    }

    entries
}
