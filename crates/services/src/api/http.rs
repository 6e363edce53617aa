use async_trait::async_trait;
use codeblue_core::model::{
    CrcDashboard, EmrUploadSummary, Enrollment, EnrollmentId, NewEnrollment, PatientProfile,
    PortfolioSnapshot, ProgressAck, ProgressSnapshot, ThreadId, Trial, TrialId,
    TrialRecommendation, User, UserId,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AgentApi, ApiError, AuthApi, DashboardApi, EnrollmentApi, PatientApi, TrialsApi};
use crate::config::ClientConfig;

/// REST client for the Code Blue backend.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    config: ClientConfig,
}

impl HttpApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the TLS backend cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message);
        tracing::debug!(%status, ?detail, "backend rejected request");
        Err(ApiError::Status { status, detail })
    }

    async fn json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(request).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn fetch_user(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let url = self.config.endpoint(&["users", "get"]);
        Self::json(
            self.client
                .get(url)
                .query(&[("email", email), ("password", password)]),
        )
        .await
    }
}

#[async_trait]
impl PatientApi for HttpApi {
    async fn profile(&self, patient_id: &UserId) -> Result<PatientProfile, ApiError> {
        let url = self
            .config
            .endpoint(&["patient", patient_id.as_str(), "profile"]);
        Self::json(self.client.get(url)).await
    }

    async fn recommendations(
        &self,
        patient_id: &UserId,
    ) -> Result<Vec<TrialRecommendation>, ApiError> {
        let url = self
            .config
            .endpoint(&["analytics", "smart-matching", patient_id.as_str()]);
        let body: RecommendationsEnvelope = Self::json(self.client.get(url)).await?;
        Ok(body.recommended_trials)
    }

    async fn upload_emr_pdf(
        &self,
        patient_id: &UserId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<EmrUploadSummary, ApiError> {
        let url = self
            .config
            .endpoint(&["emr", "upload-pdf", patient_id.as_str()]);
        let part = Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);
        Self::json(self.client.post(url).multipart(form)).await
    }
}

#[async_trait]
impl TrialsApi for HttpApi {
    async fn available_trials(&self) -> Result<Vec<Trial>, ApiError> {
        let url = self.config.endpoint(&["trials", "available"]);
        let body: TrialsEnvelope = Self::json(self.client.get(url)).await?;
        Ok(body.available_trials)
    }

    async fn trial_stages(&self, trial_id: &TrialId) -> Result<Value, ApiError> {
        let url = self
            .config
            .endpoint(&["trials", trial_id.as_str(), "stages"]);
        let body: Value = Self::json(self.client.get(url)).await?;
        Ok(unwrap_stages(body))
    }
}

#[async_trait]
impl EnrollmentApi for HttpApi {
    async fn list_enrollments(&self, patient_id: &UserId) -> Result<Vec<Enrollment>, ApiError> {
        let url = self.config.endpoint(&["enrollments", patient_id.as_str()]);
        let body: EnrollmentsEnvelope = Self::json(self.client.get(url)).await?;
        Ok(body.enrollments)
    }

    async fn enroll(&self, request: &NewEnrollment) -> Result<(), ApiError> {
        let url = self.config.endpoint(&["enrollments"]);
        Self::send(self.client.post(url).json(request)).await?;
        Ok(())
    }

    async fn withdraw(&self, enrollment_id: &EnrollmentId) -> Result<(), ApiError> {
        let url = self
            .config
            .endpoint(&["enrollments", enrollment_id.as_str()]);
        Self::send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn update_progress(
        &self,
        enrollment_id: &EnrollmentId,
        snapshot: &ProgressSnapshot,
    ) -> Result<ProgressAck, ApiError> {
        let url = self
            .config
            .endpoint(&["enrollments", enrollment_id.as_str(), "progress"]);
        Self::json(self.client.put(url).json(snapshot)).await
    }
}

#[async_trait]
impl DashboardApi for HttpApi {
    async fn crc_dashboard(&self, crc_id: &UserId) -> Result<CrcDashboard, ApiError> {
        let url = self
            .config
            .endpoint(&["crc", crc_id.as_str(), "dashboard-data"]);
        Self::json(self.client.get(url)).await
    }

    async fn portfolio_metrics(&self) -> Result<PortfolioSnapshot, ApiError> {
        let url = self.config.endpoint(&["analytics", "dashboard-metrics"]);
        Self::json(self.client.get(url)).await
    }
}

#[async_trait]
impl AgentApi for HttpApi {
    async fn invoke(&self, thread_id: &ThreadId, content: &str) -> Result<String, ApiError> {
        let url = self
            .config
            .endpoint(&["agent", "invoke", thread_id.as_str()]);
        let body: AgentReply =
            Self::json(self.client.post(url).json(&AgentRequest { content })).await?;
        Ok(body.response)
    }
}

/// Stage endpoints answer either with the bare map or wrapped in `stages`.
fn unwrap_stages(body: Value) -> Value {
    if let Value::Object(map) = &body {
        if let Some(stages @ (Value::Object(_) | Value::Array(_))) = map.get("stages") {
            return stages.clone();
        }
    }
    body
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        match self.detail {
            Some(Value::String(detail)) => Some(detail),
            Some(other) => Some(other.to_string()),
            None => self.message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrialsEnvelope {
    #[serde(default)]
    available_trials: Vec<Trial>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationsEnvelope {
    #[serde(default)]
    recommended_trials: Vec<TrialRecommendation>,
}

#[derive(Debug, Deserialize)]
struct EnrollmentsEnvelope {
    #[serde(default)]
    enrollments: Vec<Enrollment>,
}

#[derive(Debug, Serialize)]
struct AgentRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AgentReply {
    response: String,
}
