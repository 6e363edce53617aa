use std::sync::Arc;

use codeblue_core::model::User;
use storage::repository::SessionRepository;
use tokio::sync::watch;

use crate::error::SessionError;

/// Single owner of the signed-in user.
///
/// Restored from the device at start-up, replaced on login, cleared on
/// logout. Screens read it through [`SessionContext::current_user`] or watch
/// it with [`SessionContext::subscribe`].
pub struct SessionContext {
    repo: Arc<dyn SessionRepository>,
    current: watch::Sender<Option<User>>,
}

impl SessionContext {
    #[must_use]
    pub fn new(repo: Arc<dyn SessionRepository>) -> Self {
        Self {
            repo,
            current: watch::Sender::new(None),
        }
    }

    /// Loads the stored user, if any. An unreadable record counts as signed out.
    pub async fn restore(&self) -> Option<User> {
        let user = match self.repo.load_user().await {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable stored session");
                None
            }
        };
        self.current.send_replace(user.clone());
        user
    }

    /// Persists `user` and makes it the current session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the user cannot be stored; the
    /// current session is left unchanged.
    pub async fn login(&self, user: User) -> Result<(), SessionError> {
        self.repo.save_user(&user).await?;
        tracing::info!(user = %user.main_id, role = ?user.user_type, "signed in");
        self.current.send_replace(Some(user));
        Ok(())
    }

    /// Ends the session. The in-memory user is cleared even if the stored
    /// record cannot be removed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the stored record cannot be removed.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.current.send_replace(None);
        self.repo.clear_user().await?;
        tracing::info!("signed out");
        Ok(())
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }
}
