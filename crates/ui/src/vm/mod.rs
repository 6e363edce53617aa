mod chat_vm;
mod dashboard_vm;
mod markdown_vm;
mod time_fmt;
mod timeline_vm;
mod trial_vm;

pub use chat_vm::{ChatBubbleVm, map_conversation};
pub use dashboard_vm::{
    EnrollmentCardVm, MetricTileVm, OverviewVm, PatientRowVm, RecommendationVm, StageDotVm,
    crc_metric_tiles, map_enrollment_cards, map_patient_rows, map_recommendations,
    portfolio_tiles, risk_class,
};
pub use markdown_vm::{markdown_to_html, plain_text_to_html, sanitize_html};
pub use time_fmt::{format_backend_date, format_clock_time};
pub use timeline_vm::{StageColor, StageNodeVm, TaskVm, TimelineVm, map_timeline};
pub use trial_vm::{STATUS_FILTER_OPTIONS, TrialCardVm, map_trial_cards, status_class};
