/// Weekly timetable projection: catalog, parser, grid, export and preference checks
pub mod catalog;
pub mod export;
pub mod grid;
pub mod parser;
pub mod preferences;
mod types;

pub use catalog::{
    build_catalog, canonical_label, check_time_slot, find_conflict, normalize_time, overlaps,
    validate_time_slot, weekly_view, FieldCheck, SlotValidation,
};
pub use export::{
    export_filename, export_grid, serialize_for_export, to_csv, to_xlsx, ExportError,
    ExportFormat, TimetableView, UnknownFormat,
};
pub use grid::{build_timetable, project_grid};
pub use parser::parse_schedule_record;
pub use preferences::{
    group_by_day, preferences_for_instructor, validate_preference_candidate, PreferenceCheck,
};
pub use types::*;
