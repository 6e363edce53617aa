mod chat;
mod coordinator;
mod dashboard;
mod login;
mod records;
mod state;
mod timeline;
mod trials;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use chat::ChatView;
pub use coordinator::CoordinatorView;
pub use dashboard::DashboardView;
pub use login::LoginView;
pub use records::RecordsView;
pub use state::{SectionNotice, ViewError, ViewState, outcome_kind, view_state_from_resource};
pub use timeline::TimelineView;
pub use trials::TrialsView;
