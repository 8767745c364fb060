use crate::database::attendance::AttendanceRepository;
use crate::database::course::CourseRepository;
use crate::database::error_log::ErrorLogRepository;
use crate::database::exam_session::ExamSessionRepository;
use crate::database::student::StudentRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::{AuthenticateRequest, AuthenticationOutcome};
use crate::models::error_log::{DisputeRequest, ErrorLog, RejectionReason};
use crate::models::exam_session::ExamSession;
use crate::service::biometric::BiometricMatcher;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

/// Wall-clock source for window checks. Swapped for a fixed clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Both bounds inclusive: an attempt at exactly `start_time` or `end_time`
/// is inside the window.
pub fn within_window(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    now >= start && now <= end
}

pub trait AttendanceStore:
    ExamSessionRepository + StudentRepository + CourseRepository + AttendanceRepository + ErrorLogRepository + Sync
{
}

impl<T> AttendanceStore for T where
    T: ExamSessionRepository + StudentRepository + CourseRepository + AttendanceRepository + ErrorLogRepository + Sync
{
}

/// The attendance validator: evaluates one authentication attempt against a
/// session and writes exactly one row per attempt (Attendance on success,
/// ErrorLog on rejection).
pub struct AttendanceService<'a, R: AttendanceStore> {
    repo: &'a R,
    clock: &'a dyn Clock,
    matcher: &'a dyn BiometricMatcher,
}

impl<'a, R: AttendanceStore> AttendanceService<'a, R> {
    pub fn new(repo: &'a R, clock: &'a dyn Clock, matcher: &'a dyn BiometricMatcher) -> Self {
        AttendanceService { repo, clock, matcher }
    }

    pub async fn authenticate(&self, request: &AuthenticateRequest) -> Result<AuthenticationOutcome, AppError> {
        let session = self.repo.get_session(&request.session_id).await?.ok_or(AppError::SessionNotFound)?;

        let student = self
            .repo
            .get_student(&request.matriculation_number)
            .await?
            .ok_or(AppError::StudentNotFound)?;
        let matric = student.matriculation_number.as_str();

        let now = self.clock.now();
        if !within_window(now, session.start_time, session.end_time) {
            let details = format!(
                "Attempt at {} outside session window {}..{}",
                now.to_rfc3339(),
                session.start_time.to_rfc3339(),
                session.end_time.to_rfc3339()
            );
            return self.reject(&session, Some(matric), RejectionReason::OutOfWindow, &details, now).await;
        }

        if self.repo.get_attendance(&session.id, matric).await?.is_some() {
            return self
                .reject(&session, Some(matric), RejectionReason::Duplicate, "Student already authenticated for this session", now)
                .await;
        }

        let course = self
            .repo
            .get_course(&session.course_id)
            .await?
            .ok_or_else(|| AppError::CourseNotFound(session.course_id.to_string()))?;

        let on_roster = self.repo.get_roster_entry(&course.id, matric).await?.is_some();
        if student.department_id != course.department_id || student.level_id != course.level_id || !on_roster {
            let details = format!("Student not eligible for course {}", course.course_code);
            return self.reject(&session, Some(matric), RejectionReason::NotEligible, &details, now).await;
        }

        if !self.matcher.matches(&student.fingerprint_template, &request.fingerprint_sample) {
            return self
                .reject(&session, Some(matric), RejectionReason::BiometricMismatch, "Live sample did not match stored template", now)
                .await;
        }

        match self.repo.try_insert_attendance(&session.id, matric, &now).await? {
            Some(attendance) => {
                debug!(session_id = %session.id, matriculation_number = %matric, "attendance recorded");
                Ok(AuthenticationOutcome::Authenticated(attendance))
            }
            // Lost the insert race; the other attempt already succeeded.
            None => {
                self.reject(&session, Some(matric), RejectionReason::Duplicate, "Student already authenticated for this session", now)
                    .await
            }
        }
    }

    /// Log a CA-mark dispute raised at the exam hall. Disputes share the
    /// error-log table so they show up on the per-session error report.
    pub async fn dispute(&self, request: &DisputeRequest) -> Result<ErrorLog, AppError> {
        self.repo.get_session(&request.session_id).await?.ok_or(AppError::SessionNotFound)?;
        self.repo
            .get_student(&request.matriculation_number)
            .await?
            .ok_or(AppError::StudentNotFound)?;

        let now = self.clock.now();
        self.repo
            .insert_error_log(
                &request.session_id,
                Some(&request.matriculation_number),
                RejectionReason::CaMarkDispute,
                &request.details,
                &now,
            )
            .await
    }

    async fn reject(
        &self,
        session: &ExamSession,
        matriculation_number: Option<&str>,
        reason: RejectionReason,
        details: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationOutcome, AppError> {
        warn!(
            session_id = %session.id,
            matriculation_number = matriculation_number.unwrap_or("unknown"),
            reason = reason.as_db(),
            "authentication rejected"
        );
        let log = self.repo.insert_error_log(&session.id, matriculation_number, reason, details, &now).await?;
        Ok(AuthenticationOutcome::Rejected(log))
    }
}

/// Owner check shared by the authenticate and report routes.
pub fn session_owned_by(session: &ExamSession, admin_id: &Uuid) -> Result<(), AppError> {
    if session.admin_id == *admin_id {
        Ok(())
    } else {
        Err(AppError::DepartmentMismatch)
    }
}
