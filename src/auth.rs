use crate::config::AuthConfig;
use crate::database::admin::AdminRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::admin::Admin;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{FromRequest, Outcome as RequestOutcome, Request};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Admin username.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies the stateless bearer tokens used on every admin route.
/// No server-side session table exists; the signature is the whole proof.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.token_secret.as_bytes()),
            ttl: Duration::minutes(config.token_ttl_minutes),
        }
    }

    pub fn issue(&self, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }
}

/// The authenticated admin, resolved from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub Admin);

fn bearer_token<'r>(req: &'r Request<'_>) -> Option<&'r str> {
    req.headers().get_one("Authorization")?.strip_prefix("Bearer ")
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentAdmin {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        let Some(token) = bearer_token(req) else {
            return Outcome::Error((Status::Unauthorized, AppError::Unauthorized));
        };

        let Some(signer) = req.rocket().state::<TokenSigner>() else {
            return Outcome::Error((Status::InternalServerError, AppError::Unauthorized));
        };

        let claims = match signer.verify(token) {
            Ok(claims) => claims,
            Err(err) => return Outcome::Error((Status::Unauthorized, err)),
        };

        let Some(pool) = req.rocket().state::<PgPool>() else {
            return Outcome::Error((Status::InternalServerError, AppError::Unauthorized));
        };
        let repo = PostgresRepository { pool: pool.clone() };

        match repo.get_admin_by_username(&claims.sub).await {
            Ok(Some(admin)) => {
                let current = CurrentAdmin(admin);
                req.local_cache(|| Some(current.clone()));
                Outcome::Success(current)
            }
            Ok(None) => Outcome::Error((Status::Unauthorized, AppError::AdminNotFound)),
            Err(err) => Outcome::Error((Status::InternalServerError, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(&AuthConfig {
            token_secret: "test-secret".to_string(),
            token_ttl_minutes: 60,
        })
    }

    #[test]
    fn issued_token_verifies() {
        let signer = signer();
        let token = signer.issue("invigilator").expect("token issued");
        let claims = signer.verify(&token).expect("token verifies");
        assert_eq!(claims.sub, "invigilator");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = TokenSigner::new(&AuthConfig {
            token_secret: "test-secret".to_string(),
            token_ttl_minutes: -120,
        });
        let token = signer.issue("invigilator").expect("token issued");
        assert!(matches!(signer.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = signer().issue("invigilator").expect("token issued");
        let other = TokenSigner::new(&AuthConfig {
            token_secret: "different-secret".to_string(),
            token_ttl_minutes: 60,
        });
        assert!(other.verify(&token).is_err());
    }
}
