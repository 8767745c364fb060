use crate::auth::CurrentAdmin;
use crate::database::department::DepartmentRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::department::{Department, Level};
use rocket::serde::json::Json;
use rocket::{State, routes};
use sqlx::PgPool;

/// Public: the signup form needs the department list before any admin exists.
#[rocket::get("/departments")]
pub async fn list_departments(pool: &State<PgPool>) -> Result<Json<Vec<Department>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    Ok(Json(repo.list_departments().await?))
}

#[rocket::get("/levels")]
pub async fn list_levels(pool: &State<PgPool>, current_admin: CurrentAdmin) -> Result<Json<Vec<Level>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    Ok(Json(repo.list_levels_for_department(&current_admin.0.department_id).await?))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_departments, list_levels]
}
