//! Weekly timetable projection for the Academic Scheduler.
//!
//! The scheduler API returns a student's or instructor's schedule as a
//! sparse, parallel-array record. This crate turns that record plus the
//! time-slot catalog into a dense Monday-Friday grid, exports the grid as
//! CSV or XLSX, and checks instructor preference candidates before they
//! are submitted. The `server` module exposes all of this over HTTP.

pub mod api;
pub mod config;
pub mod schedule;
pub mod server;
pub mod types;
