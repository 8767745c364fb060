use rocket::serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub department_id: Uuid,
    pub level_id: Uuid,
}

/// One row of a course roster: a student registered for the course together
/// with their continuous-assessment mark, if one has been recorded.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RosterEntry {
    pub id: Uuid,
    pub course_id: Uuid,
    pub matriculation_number: String,
    pub ca_mark: Option<f64>,
}

/// Outcome of a roster CSV upload. Rows naming unknown students are skipped
/// rather than failing the whole import.
#[derive(Debug, Serialize)]
pub struct RosterUploadResponse {
    pub imported: usize,
    pub skipped: Vec<String>,
}
