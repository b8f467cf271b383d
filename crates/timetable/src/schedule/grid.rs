/// Projection of schedule entries onto the dense weekday x slot grid
use std::collections::BTreeMap;
use tracing::debug;

use super::catalog::build_catalog;
use super::parser::parse_schedule_record;
use super::types::{Day, Grid, GridCell, ScheduleEntry, ScheduleResponse, TimeSlot};

/// Places each entry at `[day][index of its slot label]`.
///
/// All five weekdays get a row of `catalog.len()` cells regardless of the
/// entries. Entries on weekends, unknown days, or unknown labels are
/// skipped. If two entries target the same cell the later one wins.
pub fn project_grid(entries: &[ScheduleEntry], catalog: &[String]) -> Grid {
    let mut cells: BTreeMap<Day, Vec<Option<GridCell>>> = Day::WEEKDAYS
        .into_iter()
        .map(|day| (day, vec![None; catalog.len()]))
        .collect();

    for entry in entries {
        let Some(index) = catalog.iter().position(|label| *label == entry.slot_label) else {
            debug!(slot = %entry.slot_label, "Skipping entry outside the catalog");
            continue;
        };

        let day = match entry.day.parse::<Day>() {
            Ok(day) if day.is_weekday() => day,
            _ => {
                debug!(day = %entry.day, "Skipping entry outside Monday-Friday");
                continue;
            }
        };

        if let Some(row) = cells.get_mut(&day) {
            row[index] = Some(GridCell {
                course_code: entry.course_code.clone(),
                room_name: entry.room_name.clone(),
            });
        }
    }

    Grid {
        days: Day::WEEKDAYS.to_vec(),
        slot_labels: catalog.to_vec(),
        cells,
    }
}

/// Runs catalog, parser and projector over freshly fetched data.
pub fn build_timetable(slots: &[TimeSlot], response: &ScheduleResponse) -> Grid {
    let catalog = build_catalog(slots);
    let entries = parse_schedule_record(response, &catalog);
    project_grid(&entries, &catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::ScheduleRecord;

    fn entry(day: &str, label: &str, course: &str, room: &str) -> ScheduleEntry {
        ScheduleEntry {
            day: day.to_string(),
            slot_label: label.to_string(),
            course_code: course.to_string(),
            room_name: room.to_string(),
        }
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_grid_is_total() {
        for n in [0usize, 1, 4] {
            let catalog: Vec<String> = (0..n).map(|i| format!("{:02}:00-{:02}:00", i, i + 1)).collect();
            let grid = project_grid(&[], &catalog);
            assert_eq!(grid.days, Day::WEEKDAYS.to_vec());
            assert_eq!(grid.cells.len(), 5);
            assert!(grid.cells.values().all(|row| row.len() == n));
            assert!(grid.is_empty());
        }
    }

    #[test]
    fn test_single_entry_lands_in_its_cell() {
        let catalog = labels(&["09:00-10:00"]);
        let grid = project_grid(&[entry("Monday", "09:00-10:00", "CS101", "R1")], &catalog);

        let cell = grid.cell(Day::Monday, 0).unwrap();
        assert_eq!(cell.course_code, "CS101");
        assert_eq!(cell.room_name, "R1");
        assert_eq!(grid.occupied_count(), 1);
        for day in [Day::Tuesday, Day::Wednesday, Day::Thursday, Day::Friday] {
            assert!(grid.cell(day, 0).is_none());
        }
    }

    #[test]
    fn test_unknown_slot_is_ignored() {
        let catalog = labels(&["09:00-10:00", "10:00-11:00"]);
        let known = vec![entry("Tuesday", "10:00-11:00", "MA201", "R2")];
        let mut with_unknown = known.clone();
        with_unknown.push(entry("Monday", "15:00-16:00", "PH301", "R3"));

        assert_eq!(project_grid(&with_unknown, &catalog), project_grid(&known, &catalog));
    }

    #[test]
    fn test_weekend_and_unknown_days_are_ignored() {
        let catalog = labels(&["09:00-10:00"]);
        let grid = project_grid(
            &[
                entry("Saturday", "09:00-10:00", "CS101", "R1"),
                entry("Holiday", "09:00-10:00", "CS102", "R1"),
            ],
            &catalog,
        );
        assert!(grid.is_empty());
        assert!(!grid.cells.contains_key(&Day::Saturday));
    }

    #[test]
    fn test_later_entry_overwrites_same_cell() {
        let catalog = labels(&["09:00-10:00"]);
        let grid = project_grid(
            &[
                entry("Friday", "09:00-10:00", "CS101", "R1"),
                entry("Friday", "09:00-10:00", "CS999", "R7"),
            ],
            &catalog,
        );
        assert_eq!(grid.cell(Day::Friday, 0).unwrap().course_code, "CS999");
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_build_timetable_pipeline() {
        let slots = vec![
            TimeSlot::new("Monday", "09:00:00", "10:00:00"),
            TimeSlot::new("Tuesday", "09:00:00", "10:00:00"),
            TimeSlot::new("Saturday", "11:00:00", "12:00:00"),
        ];
        let response = ScheduleResponse::Many(vec![ScheduleRecord {
            time_slots: vec!["Tuesday 09:00-10:00".into(), "Saturday 11:00-12:00".into()],
            course_codes: vec!["CS101".into(), "CS102".into()],
            room_names: vec!["R1".into(), "R2".into()],
            ..Default::default()
        }]);

        let grid = build_timetable(&slots, &response);
        assert_eq!(grid.slot_labels, labels(&["09:00-10:00", "11:00-12:00"]));
        assert_eq!(grid.cell(Day::Tuesday, 0).unwrap().room_name, "R1");
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_empty_catalog_while_schedule_pending() {
        let grid = build_timetable(&[], &ScheduleResponse::Empty);
        assert!(grid.slot_labels.is_empty());
        assert!(grid.cells.values().all(|row| row.is_empty()));
    }
}
