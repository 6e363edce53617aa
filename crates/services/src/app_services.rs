use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::api::Backend;
use crate::auth_service::AuthService;
use crate::catalog_service::CatalogService;
use crate::chat_service::ChatService;
use crate::config::ClientConfig;
use crate::dashboard_service::DashboardService;
use crate::emr_service::EmrService;
use crate::error::AppServicesError;
use crate::progress::ProgressBridge;
use crate::session::SessionContext;
use crate::timeline_service::TimelineService;

/// Assembles app-facing services around one session and one backend.
#[derive(Clone)]
pub struct AppServices {
    config: ClientConfig,
    session: Arc<SessionContext>,
    auth: Arc<AuthService>,
    catalog: Arc<CatalogService>,
    dashboards: Arc<DashboardService>,
    emr: Arc<EmrService>,
    timelines: Arc<TimelineService>,
    chat: Arc<ChatService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP backend, and
    /// restore any session saved on the device.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or HTTP client
    /// setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        config: ClientConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let backend = Backend::http(&config)?;
        let services = Self::from_parts(&storage, &backend, config, clock);
        let restored = services.session.restore().await;
        tracing::info!(
            db_url,
            api = %services.config.base_url(),
            signed_in = restored.is_some(),
            "app services ready"
        );
        Ok(services)
    }

    /// Wires services over already-built storage and backend seams.
    #[must_use]
    pub fn from_parts(
        storage: &Storage,
        backend: &Backend,
        config: ClientConfig,
        clock: Clock,
    ) -> Self {
        let session = Arc::new(SessionContext::new(Arc::clone(&storage.session)));
        let auth = Arc::new(AuthService::new(
            Arc::clone(&backend.auth),
            Arc::clone(&session),
        ));
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&backend.trials),
            Arc::clone(&backend.enrollments),
            Arc::clone(&session),
        ));
        let dashboards = Arc::new(DashboardService::new(
            Arc::clone(&backend.patients),
            Arc::clone(&backend.trials),
            Arc::clone(&backend.enrollments),
            Arc::clone(&backend.dashboards),
        ));
        let emr = Arc::new(EmrService::new(Arc::clone(&backend.patients)));
        let bridge = ProgressBridge::new(
            Arc::clone(&storage.progress),
            Arc::clone(&backend.enrollments),
            Arc::clone(&session),
        );
        let timelines = Arc::new(TimelineService::new(
            Arc::clone(&backend.trials),
            bridge,
            config.sync_debounce(),
        ));
        let chat = Arc::new(ChatService::new(Arc::clone(&backend.agent), clock));

        Self {
            config,
            session,
            auth,
            catalog,
            dashboards,
            emr,
            timelines,
            chat,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionContext> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn dashboards(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboards)
    }

    #[must_use]
    pub fn emr(&self) -> Arc<EmrService> {
        Arc::clone(&self.emr)
    }

    #[must_use]
    pub fn timelines(&self) -> Arc<TimelineService> {
        Arc::clone(&self.timelines)
    }

    #[must_use]
    pub fn chat(&self) -> Arc<ChatService> {
        Arc::clone(&self.chat)
    }
}
