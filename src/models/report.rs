use chrono::{DateTime, Utc};
use rocket::serde::Serialize;

/// One line of the per-session attendance report. Enrolled students who never
/// authenticated appear as `Absent` with no timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReportRow {
    pub matriculation_number: String,
    pub name: String,
    pub status: AttendanceStatus,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorReportRow {
    pub matriculation_number: String,
    pub error_type: String,
    pub details: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EnrollmentListRow {
    pub matriculation_number: String,
    pub name: String,
}
