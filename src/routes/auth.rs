use crate::auth::TokenSigner;
use crate::database::admin::{self, AdminRepository};
use crate::database::department::DepartmentRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::admin::{LoginRequest, SignupRequest, TokenResponse};
use rocket::serde::json::Json;
use rocket::{State, http::Status, routes};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

#[rocket::post("/signup", data = "<payload>")]
pub async fn signup(
    pool: &State<PgPool>,
    signer: &State<TokenSigner>,
    payload: Json<SignupRequest>,
) -> Result<(Status, Json<TokenResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    repo.get_department(&payload.department_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid department".to_string()))?;

    let password_hash = admin::hash_password(&payload.password)?;
    let created = repo.create_admin(&payload.username, &password_hash, &payload.department_id).await?;
    info!(username = %created.username, "admin registered");

    let token = signer.issue(&created.username)?;
    Ok((
        Status::Created,
        Json(TokenResponse {
            access_token: token,
            token_type: "bearer",
            username: created.username,
            department_id: created.department_id,
        }),
    ))
}

#[rocket::post("/login", data = "<payload>")]
pub async fn login(pool: &State<PgPool>, signer: &State<TokenSigner>, payload: Json<LoginRequest>) -> Result<Json<TokenResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };

    let Some(found) = repo.get_admin_by_username(&payload.username).await? else {
        admin::dummy_verify(&payload.password);
        return Err(AppError::InvalidCredentials);
    };

    admin::verify_password(&found, &payload.password)?;
    info!(username = %found.username, "admin logged in");

    let token = signer.issue(&found.username)?;
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer",
        username: found.username,
        department_id: found.department_id,
    }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![signup, login]
}
