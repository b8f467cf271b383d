//! Tabular export of a projected grid.
//!
//! The grid is flattened to rows of strings once; CSV and XLSX encoders
//! both work from those rows.

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

use super::types::Grid;

/// Placeholder written for empty cells.
pub const EMPTY_CELL: &str = "-";

/// Header of the first export column.
pub const TIME_SLOT_HEADER: &str = "Time Slot";

/// Worksheet name used for XLSX exports.
pub const SHEET_NAME: &str = "Timetable";

/// Errors that can occur while encoding an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The spreadsheet writer rejected the data
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// An export format name that is neither `csv` nor `xlsx`.
#[derive(Debug, Error)]
#[error("Unknown export format '{0}', expected 'csv' or 'xlsx'")]
pub struct UnknownFormat(pub String);

/// File formats a timetable can be exported to. Names are read
/// case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ExportFormat {
    Csv,
    #[default]
    Xlsx,
}

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("csv") {
            Ok(ExportFormat::Csv)
        } else if name.eq_ignore_ascii_case("xlsx") {
            Ok(ExportFormat::Xlsx)
        } else {
            Err(UnknownFormat(name.to_string()))
        }
    }
}

impl TryFrom<String> for ExportFormat {
    type Error = UnknownFormat;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// Whose timetable is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimetableView {
    Student,
    Instructor,
}

impl TimetableView {
    /// Parses a path segment such as `student`.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment.to_ascii_lowercase().as_str() {
            "student" => Some(TimetableView::Student),
            "instructor" => Some(TimetableView::Instructor),
            _ => None,
        }
    }
}

/// Flattens a grid to rows: a header row of `"Time Slot"` and the grid's
/// days, then one row per slot label. Occupied cells render as
/// `"<course> (<room>)"`, empty ones as `"-"`.
pub fn serialize_for_export(grid: &Grid) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(grid.slot_labels.len() + 1);

    let mut header = vec![TIME_SLOT_HEADER.to_string()];
    header.extend(grid.days.iter().map(|d| d.to_string()));
    rows.push(header);

    for (index, label) in grid.slot_labels.iter().enumerate() {
        let mut row = vec![label.clone()];
        row.extend(grid.days.iter().map(|day| match grid.cell(*day, index) {
            Some(cell) => cell.to_string(),
            None => EMPTY_CELL.to_string(),
        }));
        rows.push(row);
    }

    rows
}

/// Encodes rows as CSV. Every field is double-quoted with inner quotes
/// doubled; each row ends with `\n`.
pub fn to_csv(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        let line = row
            .iter()
            .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Encodes rows as a single-sheet XLSX workbook held in memory.
/// The first row is written bold.
pub fn to_xlsx(rows: &[Vec<String>], sheet_name: &str) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if r == 0 {
                worksheet.write_string_with_format(r as u32, c as u16, value, &header_format)?;
            } else {
                worksheet.write_string(r as u32, c as u16, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Encodes `grid` in the requested format.
pub fn export_grid(grid: &Grid, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let rows = serialize_for_export(grid);
    match format {
        ExportFormat::Csv => Ok(to_csv(&rows).into_bytes()),
        ExportFormat::Xlsx => to_xlsx(&rows, SHEET_NAME),
    }
}

/// Download name for an export. Instructor timetables use a fixed name;
/// student timetables carry the date.
pub fn export_filename(view: TimetableView, format: ExportFormat, date: NaiveDate) -> String {
    match view {
        TimetableView::Instructor => format!("Instructor_Timetable.{}", format.extension()),
        TimetableView::Student => format!(
            "Student_Timetable_{}.{}",
            date.format("%Y-%m-%d"),
            format.extension()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::grid::project_grid;
    use crate::schedule::types::ScheduleEntry;

    fn sample_grid() -> Grid {
        project_grid(
            &[ScheduleEntry {
                day: "Monday".to_string(),
                slot_label: "09:00-10:00".to_string(),
                course_code: "CS101".to_string(),
                room_name: "R1".to_string(),
            }],
            &["09:00-10:00".to_string()],
        )
    }

    #[test]
    fn test_serialize_for_export() {
        let rows = serialize_for_export(&sample_grid());
        assert_eq!(
            rows,
            vec![
                vec!["Time Slot", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday"],
                vec!["09:00-10:00", "CS101 (R1)", "-", "-", "-", "-"],
            ]
        );
    }

    #[test]
    fn test_serialize_empty_grid_has_only_header() {
        let rows = serialize_for_export(&project_grid(&[], &[]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 6);
    }

    #[test]
    fn test_csv_quotes_every_field() {
        let rows = vec![
            vec!["Time Slot".to_string(), "Monday".to_string()],
            vec!["09:00-10:00".to_string(), "Say \"hi\", all".to_string()],
        ];
        assert_eq!(
            to_csv(&rows),
            "\"Time Slot\",\"Monday\"\n\"09:00-10:00\",\"Say \"\"hi\"\", all\"\n"
        );
    }

    #[test]
    fn test_xlsx_is_a_zip_container() {
        let bytes = export_grid(&sample_grid(), ExportFormat::Xlsx).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_export_filenames() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            export_filename(TimetableView::Instructor, ExportFormat::Xlsx, date),
            "Instructor_Timetable.xlsx"
        );
        assert_eq!(
            export_filename(TimetableView::Student, ExportFormat::Csv, date),
            "Student_Timetable_2024-03-07.csv"
        );
    }

    #[test]
    fn test_format_names_ignore_case() {
        for (name, format) in [
            ("\"csv\"", ExportFormat::Csv),
            ("\"CSV\"", ExportFormat::Csv),
            ("\"Xlsx\"", ExportFormat::Xlsx),
        ] {
            assert_eq!(serde_json::from_str::<ExportFormat>(name).unwrap(), format);
        }
        assert!(serde_json::from_str::<ExportFormat>("\"pdf\"").is_err());
        assert!("ods".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_view_from_segment() {
        assert_eq!(TimetableView::from_segment("Student"), Some(TimetableView::Student));
        assert_eq!(TimetableView::from_segment("instructor"), Some(TimetableView::Instructor));
        assert_eq!(TimetableView::from_segment("admin"), None);
    }
}
