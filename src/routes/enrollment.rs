use crate::auth::CurrentAdmin;
use crate::database::department::DepartmentRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::database::student::StudentRepository;
use crate::error::app_error::AppError;
use crate::models::student::{EnrollResponse, EnrollStudentRequest, EnrollmentStatusRequest, EnrollmentStatusResponse};
use crate::routes::CsvAttachment;
use crate::service::report::render_csv;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rocket::serde::json::Json;
use rocket::{State, http::Status, routes};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[rocket::post("/enroll", data = "<payload>")]
pub async fn enroll_student(
    pool: &State<PgPool>,
    current_admin: CurrentAdmin,
    payload: Json<EnrollStudentRequest>,
) -> Result<(Status, Json<EnrollResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let department = repo
        .get_department(&payload.department_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid department".to_string()))?;
    let level = repo
        .get_level(&payload.level_id)
        .await?
        .filter(|level| level.department_id == department.id)
        .ok_or_else(|| AppError::BadRequest("Invalid level for department".to_string()))?;

    if department.id != current_admin.0.department_id {
        return Err(AppError::DepartmentMismatch);
    }

    if let Some(photo) = &payload.photo {
        BASE64
            .decode(photo)
            .map_err(|_| AppError::BadRequest("Photo is not valid base64".to_string()))?;
    }

    let student = repo
        .upsert_student(
            &payload.matriculation_number,
            &payload.name,
            &department.id,
            &level.id,
            &payload.fingerprint_template,
            payload.photo.as_deref(),
        )
        .await?;
    info!(matriculation_number = %student.matriculation_number, "student enrolled");

    Ok((
        Status::Created,
        Json(EnrollResponse {
            matriculation_number: student.matriculation_number,
        }),
    ))
}

/// Station-side lookup: identify a student from the scanner's template and
/// show their profile with enrolled courses.
#[rocket::post("/status", data = "<payload>")]
pub async fn enrollment_status(pool: &State<PgPool>, payload: Json<EnrollmentStatusRequest>) -> Result<Json<EnrollmentStatusResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let student = repo
        .get_student_by_template(&payload.fingerprint_template)
        .await?
        .ok_or(AppError::StudentNotFound)?;
    let enrolled_courses = repo.list_enrolled_courses(&student.matriculation_number).await?;

    Ok(Json(EnrollmentStatusResponse {
        matriculation_number: student.matriculation_number,
        name: student.name,
        department_id: student.department_id,
        level_id: student.level_id,
        photo: student.photo,
        enrolled_courses,
    }))
}

#[rocket::get("/list/<department_id>/<level_id>")]
pub async fn download_enrollment_list(
    pool: &State<PgPool>,
    current_admin: CurrentAdmin,
    department_id: &str,
    level_id: &str,
) -> Result<CsvAttachment, AppError> {
    let department_id = Uuid::parse_str(department_id)?;
    let level_id = Uuid::parse_str(level_id)?;

    if department_id != current_admin.0.department_id {
        return Err(AppError::DepartmentMismatch);
    }

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let students = repo.list_students(&department_id, &level_id).await?;
    if students.is_empty() {
        return Err(AppError::NotFound("No students found".to_string()));
    }

    let rows: Vec<crate::models::report::EnrollmentListRow> = students
        .into_iter()
        .map(|s| crate::models::report::EnrollmentListRow {
            matriculation_number: s.matriculation_number,
            name: s.name,
        })
        .collect();

    Ok(CsvAttachment {
        filename: format!("enrollment_list_{}_{}.csv", department_id, level_id),
        content: render_csv(&rows)?,
    })
}

pub fn routes() -> Vec<rocket::Route> {
    routes![enroll_student, enrollment_status, download_enrollment_list]
}
