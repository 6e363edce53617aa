use std::sync::Arc;

use services::{
    AppServices, AuthService, CatalogService, ChatService, DashboardService, EmrService,
    SessionContext, TimelineService,
};

/// What the UI needs from the application composition root.
pub trait UiApp: Send + Sync {
    fn session(&self) -> Arc<SessionContext>;
    fn auth(&self) -> Arc<AuthService>;
    fn catalog(&self) -> Arc<CatalogService>;
    fn dashboards(&self) -> Arc<DashboardService>;
    fn emr(&self) -> Arc<EmrService>;
    fn timelines(&self) -> Arc<TimelineService>;
    fn chat(&self) -> Arc<ChatService>;
}

impl UiApp for AppServices {
    fn session(&self) -> Arc<SessionContext> {
        AppServices::session(self)
    }

    fn auth(&self) -> Arc<AuthService> {
        AppServices::auth(self)
    }

    fn catalog(&self) -> Arc<CatalogService> {
        AppServices::catalog(self)
    }

    fn dashboards(&self) -> Arc<DashboardService> {
        AppServices::dashboards(self)
    }

    fn emr(&self) -> Arc<EmrService> {
        AppServices::emr(self)
    }

    fn timelines(&self) -> Arc<TimelineService> {
        AppServices::timelines(self)
    }

    fn chat(&self) -> Arc<ChatService> {
        AppServices::chat(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    session: Arc<SessionContext>,
    auth: Arc<AuthService>,
    catalog: Arc<CatalogService>,
    dashboards: Arc<DashboardService>,
    emr: Arc<EmrService>,
    timelines: Arc<TimelineService>,
    chat: Arc<ChatService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            session: app.session(),
            auth: app.auth(),
            catalog: app.catalog(),
            dashboards: app.dashboards(),
            emr: app.emr(),
            timelines: app.timelines(),
            chat: app.chat(),
        }
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

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
