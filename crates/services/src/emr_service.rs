use std::sync::Arc;

use codeblue_core::model::{EmrUploadSummary, UserId};

use crate::api::PatientApi;
use crate::error::EmrUploadError;

const PDF_MAGIC: &[u8] = b"%PDF";

/// True when `bytes` start with the PDF header.
#[must_use]
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Sends medical-record PDFs to the extraction endpoint.
#[derive(Clone)]
pub struct EmrService {
    patients: Arc<dyn PatientApi>,
}

impl EmrService {
    #[must_use]
    pub fn new(patients: Arc<dyn PatientApi>) -> Self {
        Self { patients }
    }

    /// # Errors
    ///
    /// Returns `EmrUploadError::NotPdf` before any request is made when the
    /// file is not a PDF, or `EmrUploadError::Api` when the upload fails.
    pub async fn upload(
        &self,
        patient_id: &UserId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<EmrUploadSummary, EmrUploadError> {
        if !looks_like_pdf(&bytes) {
            return Err(EmrUploadError::NotPdf);
        }
        let size = bytes.len();
        let summary = self
            .patients
            .upload_emr_pdf(patient_id, file_name, bytes)
            .await?;
        tracing::info!(patient = %patient_id, file_name, size, "emr uploaded");
        Ok(summary)
    }
}
