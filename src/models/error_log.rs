use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Classification of a rejected or disputed authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    OutOfWindow,
    Duplicate,
    NotEligible,
    BiometricMismatch,
    CaMarkDispute,
}

impl RejectionReason {
    pub fn as_db(self) -> &'static str {
        match self {
            RejectionReason::OutOfWindow => "OUT_OF_WINDOW",
            RejectionReason::Duplicate => "DUPLICATE",
            RejectionReason::NotEligible => "NOT_ELIGIBLE",
            RejectionReason::BiometricMismatch => "BIOMETRIC_MISMATCH",
            RejectionReason::CaMarkDispute => "CA_MARK_DISPUTE",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "OUT_OF_WINDOW" => Some(RejectionReason::OutOfWindow),
            "DUPLICATE" => Some(RejectionReason::Duplicate),
            "NOT_ELIGIBLE" => Some(RejectionReason::NotEligible),
            "BIOMETRIC_MISMATCH" => Some(RejectionReason::BiometricMismatch),
            "CA_MARK_DISPUTE" => Some(RejectionReason::CaMarkDispute),
            _ => None,
        }
    }
}

/// A rejected or erroneous attempt, persisted for the per-session error report.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ErrorLog {
    pub id: Uuid,
    pub session_id: Uuid,
    pub matriculation_number: Option<String>,
    pub error_type: String,
    pub details: String,
    pub recorded_at: DateTime<Utc>,
}

impl ErrorLog {
    pub fn reason(&self) -> Option<RejectionReason> {
        RejectionReason::from_db(&self.error_type)
    }
}

#[derive(Debug, Serialize)]
pub struct DisputeResponse {
    pub id: Uuid,
    pub error_type: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DisputeRequest {
    pub session_id: Uuid,
    pub matriculation_number: String,
    #[validate(length(min = 1, max = 1024))]
    pub details: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_round_trips_through_db_encoding() {
        for reason in [
            RejectionReason::OutOfWindow,
            RejectionReason::Duplicate,
            RejectionReason::NotEligible,
            RejectionReason::BiometricMismatch,
            RejectionReason::CaMarkDispute,
        ] {
            assert_eq!(RejectionReason::from_db(reason.as_db()), Some(reason));
        }
    }

    #[test]
    fn unknown_classification_maps_to_none() {
        assert_eq!(RejectionReason::from_db("SOLAR_FLARE"), None);
    }
}
