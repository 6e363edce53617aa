#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod auth_service;
pub mod catalog_service;
pub mod chat_service;
pub mod config;
pub mod dashboard_service;
pub mod emr_service;
pub mod error;
pub mod progress;
pub mod session;
pub mod timeline_service;

pub use codeblue_core::Clock;

pub use api::{ApiError, Backend, HttpApi};
pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use catalog_service::{CatalogService, filter_trials};
pub use chat_service::{ChatService, TypingDelay};
pub use config::{ClientConfig, ConfigError};
pub use dashboard_service::{
    CoordinatorDashboard, DashboardService, PatientDashboard, ProgressOverview,
};
pub use emr_service::EmrService;
pub use error::{
    AppServicesError, CatalogError, ChatError, EmrUploadError, SessionError, SignInError,
    TimelineError,
};
pub use progress::{ProgressBridge, SaveReport, SyncStatus, SyncWriter};
pub use session::SessionContext;
pub use timeline_service::{TimelineService, TrialTimeline};
