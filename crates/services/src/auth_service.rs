use std::sync::Arc;

use codeblue_core::model::User;

use crate::api::AuthApi;
use crate::error::SignInError;
use crate::session::SessionContext;

/// Credential sign-in on top of the session context.
#[derive(Clone)]
pub struct AuthService {
    auth: Arc<dyn AuthApi>,
    session: Arc<SessionContext>,
}

impl AuthService {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthApi>, session: Arc<SessionContext>) -> Self {
        Self { auth, session }
    }

    /// Looks up the user for the credentials and makes them the current
    /// session.
    ///
    /// # Errors
    ///
    /// Returns `SignInError::MissingCredentials` for blank input,
    /// `SignInError::UnknownUser` when the backend has no match, and
    /// `SignInError::Session` when the user cannot be stored.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, SignInError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(SignInError::MissingCredentials);
        }
        let user = self.auth.fetch_user(email, password).await?;
        self.session.login(user.clone()).await?;
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `SignInError::Session` when the stored session cannot be removed.
    pub async fn sign_out(&self) -> Result<(), SignInError> {
        self.session.logout().await?;
        Ok(())
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use codeblue_core::model::{UserId, UserRole};
    use storage::repository::InMemoryRepository;

    use crate::api::ApiError;

    struct OneUser;

    #[async_trait]
    impl AuthApi for OneUser {
        async fn fetch_user(&self, email: &str, password: &str) -> Result<User, ApiError> {
            if email == "ada@example.org" && password == "secret" {
                Ok(User {
                    main_id: UserId::new("p-7"),
                    email: email.to_owned(),
                    first_name: "Ada".to_owned(),
                    last_name: "Lovelace".to_owned(),
                    user_type: UserRole::Patient,
                })
            } else {
                Err(ApiError::NotFound)
            }
        }
    }

    fn service() -> AuthService {
        let session = Arc::new(SessionContext::new(Arc::new(InMemoryRepository::new())));
        AuthService::new(Arc::new(OneUser), session)
    }

    #[tokio::test]
    async fn blank_credentials_are_rejected() {
        let auth = service();
        let err = auth.sign_in("  ", "secret").await.unwrap_err();
        assert!(matches!(err, SignInError::MissingCredentials));
        let err = auth.sign_in("ada@example.org", "").await.unwrap_err();
        assert!(matches!(err, SignInError::MissingCredentials));
    }

    #[tokio::test]
    async fn unknown_user_leaves_session_empty() {
        let auth = service();
        let err = auth
            .sign_in("ada@example.org", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, SignInError::UnknownUser));
        assert!(auth.session().current_user().is_none());
    }

    #[tokio::test]
    async fn sign_in_then_out() {
        let auth = service();
        let user = auth
            .sign_in(" ada@example.org ", "secret")
            .await
            .unwrap();
        assert_eq!(user.main_id, UserId::new("p-7"));
        assert_eq!(auth.session().current_user(), Some(user));

        auth.sign_out().await.unwrap();
        assert!(auth.session().current_user().is_none());
    }
}
