use std::sync::Arc;

use codeblue_core::model::{
    Enrollment, EnrollmentId, NewEnrollment, StatusFilter, Trial, TrialId, User,
};

use crate::api::{ApiError, EnrollmentApi, TrialsApi};
use crate::error::CatalogError;
use crate::session::SessionContext;

/// Trials that match a free-text query and a status filter.
#[must_use]
pub fn filter_trials<'a>(trials: &'a [Trial], query: &str, status: &StatusFilter) -> Vec<&'a Trial> {
    trials
        .iter()
        .filter(|trial| status.accepts(&trial.status) && trial.matches_query(query))
        .collect()
}

/// Browsing the trial catalog and joining or leaving trials.
#[derive(Clone)]
pub struct CatalogService {
    trials: Arc<dyn TrialsApi>,
    enrollments: Arc<dyn EnrollmentApi>,
    session: Arc<SessionContext>,
}

impl CatalogService {
    #[must_use]
    pub fn new(
        trials: Arc<dyn TrialsApi>,
        enrollments: Arc<dyn EnrollmentApi>,
        session: Arc<SessionContext>,
    ) -> Self {
        Self {
            trials,
            enrollments,
            session,
        }
    }

    /// # Errors
    ///
    /// Returns `ApiError` when the catalog cannot be fetched.
    pub async fn list_trials(&self) -> Result<Vec<Trial>, ApiError> {
        self.trials.available_trials().await
    }

    /// Fetches the catalog and applies [`filter_trials`].
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the catalog cannot be fetched.
    pub async fn search(&self, query: &str, status: &StatusFilter) -> Result<Vec<Trial>, ApiError> {
        let trials = self.list_trials().await?;
        Ok(filter_trials(&trials, query, status)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Enrollments of the signed-in patient.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotSignedIn` without a patient session, or
    /// `CatalogError::Api` when the listing fails.
    pub async fn my_enrollments(&self) -> Result<Vec<Enrollment>, CatalogError> {
        let user = self.patient()?;
        Ok(self.enrollments.list_enrollments(&user.main_id).await?)
    }

    /// Enrolls the signed-in patient in `trial_id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotSignedIn` without a patient session, or
    /// `CatalogError::Api` when the backend refuses (400 for a duplicate).
    pub async fn enroll(&self, trial_id: &TrialId) -> Result<(), CatalogError> {
        let user = self.patient()?;
        let request = NewEnrollment {
            patient_id: user.main_id,
            trial_id: trial_id.clone(),
        };
        self.enrollments.enroll(&request).await?;
        tracing::info!(trial = %trial_id, "enrolled");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ApiError` when the enrollment cannot be deactivated.
    pub async fn withdraw(&self, enrollment_id: &EnrollmentId) -> Result<(), CatalogError> {
        self.enrollments.withdraw(enrollment_id).await?;
        tracing::info!(enrollment = %enrollment_id, "withdrew from trial");
        Ok(())
    }

    fn patient(&self) -> Result<User, CatalogError> {
        self.session
            .current_user()
            .filter(User::is_patient)
            .ok_or(CatalogError::NotSignedIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use codeblue_core::model::{
        ProgressAck, ProgressSnapshot, TrialStatus, UserId, UserRole,
    };
    use reqwest::StatusCode;
    use serde_json::Value;
    use std::sync::Mutex;
    use storage::repository::InMemoryRepository;

    fn trial(id: &str, title: &str, status: TrialStatus) -> Trial {
        Trial {
            id: TrialId::new(id),
            title: title.to_owned(),
            status,
            condition: String::new(),
            location: "Boston, MA".to_owned(),
            sponsor: String::new(),
            description: String::new(),
            phases: None,
            distance: None,
            insurance: None,
            estimated_duration: None,
            max_participants: None,
            current_participants: None,
        }
    }

    struct FakeBackend {
        trials: Vec<Trial>,
        enrolled: Mutex<Vec<NewEnrollment>>,
    }

    #[async_trait]
    impl TrialsApi for FakeBackend {
        async fn available_trials(&self) -> Result<Vec<Trial>, ApiError> {
            Ok(self.trials.clone())
        }

        async fn trial_stages(&self, _trial_id: &TrialId) -> Result<Value, ApiError> {
            Ok(Value::Null)
        }
    }

    #[async_trait]
    impl EnrollmentApi for FakeBackend {
        async fn list_enrollments(&self, _patient_id: &UserId) -> Result<Vec<Enrollment>, ApiError> {
            Err(ApiError::NotFound)
        }

        async fn enroll(&self, request: &NewEnrollment) -> Result<(), ApiError> {
            let mut enrolled = self.enrolled.lock().unwrap();
            if enrolled.contains(request) {
                return Err(ApiError::Status {
                    status: StatusCode::BAD_REQUEST,
                    detail: Some("Patient is already enrolled in this trial".to_owned()),
                });
            }
            enrolled.push(request.clone());
            Ok(())
        }

        async fn withdraw(&self, _enrollment_id: &EnrollmentId) -> Result<(), ApiError> {
            Err(ApiError::NotFound)
        }

        async fn update_progress(
            &self,
            _enrollment_id: &EnrollmentId,
            _snapshot: &ProgressSnapshot,
        ) -> Result<ProgressAck, ApiError> {
            Err(ApiError::NotFound)
        }
    }

    fn catalog() -> (CatalogService, Arc<SessionContext>) {
        let backend = Arc::new(FakeBackend {
            trials: vec![
                trial("t1", "CARDIO-PREVENT", TrialStatus::Recruiting),
                trial("t2", "ONCO-IMMUNE", TrialStatus::Active),
                trial("t3", "CARDIO-LEGACY", TrialStatus::Completed),
            ],
            enrolled: Mutex::new(Vec::new()),
        });
        let session = Arc::new(SessionContext::new(Arc::new(InMemoryRepository::new())));
        (
            CatalogService::new(backend.clone(), backend, Arc::clone(&session)),
            session,
        )
    }

    fn user(role: UserRole) -> User {
        User {
            main_id: UserId::new("p-1"),
            email: "p@example.org".to_owned(),
            first_name: String::new(),
            last_name: String::new(),
            user_type: role,
        }
    }

    #[test]
    fn filter_combines_query_and_status() {
        let trials = vec![
            trial("t1", "CARDIO-PREVENT", TrialStatus::Recruiting),
            trial("t3", "CARDIO-LEGACY", TrialStatus::Completed),
        ];
        let all = filter_trials(&trials, "cardio", &StatusFilter::All);
        assert_eq!(all.len(), 2);
        let recruiting = filter_trials(&trials, "cardio", &StatusFilter::parse("Recruiting"));
        assert_eq!(recruiting.len(), 1);
        assert_eq!(recruiting[0].id, TrialId::new("t1"));
        assert_eq!(filter_trials(&trials, "boston", &StatusFilter::All).len(), 2);
    }

    #[tokio::test]
    async fn search_filters_fetched_catalog() {
        let (catalog, _) = catalog();
        let found = catalog
            .search("onco", &StatusFilter::All)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "ONCO-IMMUNE");
    }

    #[tokio::test]
    async fn enroll_requires_a_patient_session() {
        let (catalog, session) = catalog();
        let err = catalog.enroll(&TrialId::new("t1")).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotSignedIn));

        session.login(user(UserRole::Crc)).await.unwrap();
        let err = catalog.enroll(&TrialId::new("t1")).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotSignedIn));
    }

    #[tokio::test]
    async fn duplicate_enrollment_surfaces_backend_detail() {
        let (catalog, session) = catalog();
        session.login(user(UserRole::Patient)).await.unwrap();

        catalog.enroll(&TrialId::new("t1")).await.unwrap();
        let err = catalog.enroll(&TrialId::new("t1")).await.unwrap_err();
        match err {
            CatalogError::Api(api) => assert_eq!(
                api.detail(),
                Some("Patient is already enrolled in this trial")
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn listing_own_enrollments_needs_a_patient() {
        let (catalog, session) = catalog();
        assert!(matches!(
            catalog.my_enrollments().await,
            Err(CatalogError::NotSignedIn)
        ));

        session.login(user(UserRole::Patient)).await.unwrap();
        assert!(matches!(
            catalog.my_enrollments().await,
            Err(CatalogError::Api(ApiError::NotFound))
        ));
    }
}
