//! Backend seams. Each trait covers one group of REST endpoints so services
//! can be tested against fakes; [`HttpApi`] implements all of them.

use std::sync::Arc;

use async_trait::async_trait;
use codeblue_core::model::{
    CrcDashboard, EmrUploadSummary, Enrollment, EnrollmentId, NewEnrollment, PatientProfile,
    PortfolioSnapshot, ProgressAck, ProgressSnapshot, ThreadId, Trial, TrialId,
    TrialRecommendation, User, UserId,
};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

mod http;

pub use http::HttpApi;

use crate::config::ClientConfig;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("request failed with status {status}")]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error(transparent)]
    Http(reqwest::Error),
}

/// Request URLs carry credentials on sign-in, so they never reach the message.
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err.without_url())
    }
}

impl ApiError {
    /// Server-provided explanation, when the error body carried one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Look up the user matching the credentials.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown credentials.
    async fn fetch_user(&self, email: &str, password: &str) -> Result<User, ApiError>;
}

#[async_trait]
pub trait PatientApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` when the profile cannot be fetched.
    async fn profile(&self, patient_id: &UserId) -> Result<PatientProfile, ApiError>;

    /// Smart-matching suggestions, best match first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the analytics service fails.
    async fn recommendations(
        &self,
        patient_id: &UserId,
    ) -> Result<Vec<TrialRecommendation>, ApiError>;

    /// Upload an EMR PDF for extraction.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the upload is rejected.
    async fn upload_emr_pdf(
        &self,
        patient_id: &UserId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<EmrUploadSummary, ApiError>;
}

#[async_trait]
pub trait TrialsApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` when the catalog cannot be fetched.
    async fn available_trials(&self) -> Result<Vec<Trial>, ApiError>;

    /// Raw stage payload for a trial; shape is interpreted by the adapter.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the stages cannot be fetched.
    async fn trial_stages(&self, trial_id: &TrialId) -> Result<Value, ApiError>;
}

#[async_trait]
pub trait EnrollmentApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` when the listing cannot be fetched.
    async fn list_enrollments(&self, patient_id: &UserId) -> Result<Vec<Enrollment>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::Status` (400) when the patient is already enrolled.
    async fn enroll(&self, request: &NewEnrollment) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown enrollment.
    async fn withdraw(&self, enrollment_id: &EnrollmentId) -> Result<(), ApiError>;

    /// Mirror timeline progress onto the enrollment record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the update is rejected.
    async fn update_progress(
        &self,
        enrollment_id: &EnrollmentId,
        snapshot: &ProgressSnapshot,
    ) -> Result<ProgressAck, ApiError>;
}

#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` when the coordinator dashboard cannot be fetched.
    async fn crc_dashboard(&self, crc_id: &UserId) -> Result<CrcDashboard, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` when the metrics cannot be fetched.
    async fn portfolio_metrics(&self) -> Result<PortfolioSnapshot, ApiError>;
}

#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Send one message on a thread and return the agent's reply.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the agent call fails.
    async fn invoke(&self, thread_id: &ThreadId, content: &str) -> Result<String, ApiError>;
}

/// Aggregates the backend seams behind trait objects.
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn AuthApi>,
    pub patients: Arc<dyn PatientApi>,
    pub trials: Arc<dyn TrialsApi>,
    pub enrollments: Arc<dyn EnrollmentApi>,
    pub dashboards: Arc<dyn DashboardApi>,
    pub agent: Arc<dyn AgentApi>,
}

impl Backend {
    /// Every seam served by one HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the client cannot be built.
    pub fn http(config: &ClientConfig) -> Result<Self, ApiError> {
        let api = Arc::new(HttpApi::new(config.clone())?);
        Ok(Self {
            auth: api.clone(),
            patients: api.clone(),
            trials: api.clone(),
            enrollments: api.clone(),
            dashboards: api.clone(),
            agent: api,
        })
    }
}
