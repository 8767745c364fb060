use crate::database::attendance::AttendanceRepository;
use crate::database::course::CourseRepository;
use crate::database::error_log::ErrorLogRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::AttendedStudent;
use crate::models::error_log::ErrorLog;
use crate::models::exam_session::ExamSession;
use crate::models::report::{AttendanceReportRow, AttendanceStatus, EnrollmentListRow, ErrorReportRow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Renders the per-session CSV reports consumed by the faculty office.
pub struct ReportService<'a, R> {
    repo: &'a R,
}

impl<'a, R> ReportService<'a, R>
where
    R: AttendanceRepository + CourseRepository + ErrorLogRepository + Sync,
{
    pub fn new(repo: &'a R) -> Self {
        ReportService { repo }
    }

    /// Present rows in authentication order, then Absent rows for every
    /// rostered student who never authenticated.
    pub async fn attendance_report(&self, session: &ExamSession) -> Result<String, AppError> {
        let attended = self.repo.list_attendance_for_session(&session.id).await?;
        let roster = self.repo.list_roster_students(&session.course_id).await?;
        render_csv(&attendance_report_rows(&attended, &roster))
    }

    pub async fn error_report(&self, session: &ExamSession) -> Result<String, AppError> {
        let logs = self.repo.list_errors_for_session(&session.id).await?;
        render_csv(&error_report_rows(&logs))
    }
}

pub fn attendance_report_rows(attended: &[AttendedStudent], roster: &[EnrollmentListRow]) -> Vec<AttendanceReportRow> {
    let present: HashSet<&str> = attended.iter().map(|a| a.matriculation_number.as_str()).collect();

    let mut rows: Vec<AttendanceReportRow> = attended
        .iter()
        .map(|a| AttendanceReportRow {
            matriculation_number: a.matriculation_number.clone(),
            name: a.name.clone(),
            status: AttendanceStatus::Present,
            recorded_at: Some(a.recorded_at),
        })
        .collect();

    rows.extend(
        roster
            .iter()
            .filter(|entry| !present.contains(entry.matriculation_number.as_str()))
            .map(|entry| AttendanceReportRow {
                matriculation_number: entry.matriculation_number.clone(),
                name: entry.name.clone(),
                status: AttendanceStatus::Absent,
                recorded_at: None,
            }),
    );

    rows
}

fn error_report_rows(logs: &[ErrorLog]) -> Vec<ErrorReportRow> {
    logs.iter()
        .map(|log| ErrorReportRow {
            matriculation_number: log.matriculation_number.clone().unwrap_or_else(|| "Unknown".to_string()),
            error_type: log.error_type.clone(),
            details: log.details.clone(),
            recorded_at: log.recorded_at,
        })
        .collect()
}

pub fn render_csv<T: Serialize>(rows: &[T]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).map_err(|e| AppError::csv("Failed to serialize report row", e))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::csv("Failed to flush report", csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// One data row of an uploaded course roster CSV. The `name` column is
/// required in the file for human review but only the matric number and CA
/// mark are stored.
#[derive(Debug, Deserialize)]
pub struct RosterCsvRow {
    pub matriculation_number: String,
    #[allow(dead_code)]
    pub name: String,
    pub ca_mark: Option<f64>,
}

pub fn parse_roster_csv(content: &[u8]) -> Result<Vec<RosterCsvRow>, AppError> {
    let mut reader = csv::Reader::from_reader(content);
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: RosterCsvRow = result.map_err(|e| AppError::csv("Invalid roster CSV", e))?;
        rows.push(row);
    }
    Ok(rows)
}
