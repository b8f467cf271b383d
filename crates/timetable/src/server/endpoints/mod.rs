pub mod preferences;
pub mod reports;
pub mod status;
pub mod timeslots;
pub mod timetable;
