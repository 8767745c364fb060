use crate::auth::CurrentAdmin;
use crate::database::course::CourseRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::database::student::StudentRepository;
use crate::error::app_error::AppError;
use crate::models::course::{Course, RosterUploadResponse};
use crate::service::report::parse_roster_csv;
use rocket::serde::json::Json;
use rocket::{State, routes};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

#[rocket::get("/")]
pub async fn list_courses(pool: &State<PgPool>, current_admin: CurrentAdmin) -> Result<Json<Vec<Course>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    Ok(Json(repo.list_courses_for_department(&current_admin.0.department_id).await?))
}

/// Upload the registrar's roster CSV for a course. Rows naming students who
/// are not enrolled in the biometric system are reported back, not stored.
#[rocket::post("/<id>/roster", data = "<payload>")]
pub async fn upload_roster(
    pool: &State<PgPool>,
    current_admin: CurrentAdmin,
    id: &str,
    payload: String,
) -> Result<Json<RosterUploadResponse>, AppError> {
    let course_id = Uuid::parse_str(id)?;
    let repo = PostgresRepository { pool: pool.inner().clone() };

    let course = repo
        .get_course(&course_id)
        .await?
        .ok_or_else(|| AppError::CourseNotFound(course_id.to_string()))?;
    if course.department_id != current_admin.0.department_id {
        return Err(AppError::DepartmentMismatch);
    }

    let rows = parse_roster_csv(payload.as_bytes())?;

    let mut imported = 0;
    let mut skipped = Vec::new();
    for row in rows {
        if repo.get_student(&row.matriculation_number).await?.is_none() {
            skipped.push(row.matriculation_number);
            continue;
        }
        repo.upsert_roster_entry(&course.id, &row.matriculation_number, row.ca_mark).await?;
        imported += 1;
    }

    info!(course_code = %course.course_code, imported, skipped = skipped.len(), "roster uploaded");
    Ok(Json(RosterUploadResponse { imported, skipped }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_courses, upload_roster]
}
