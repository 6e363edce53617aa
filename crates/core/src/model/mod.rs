mod dashboard;
mod enrollment;
mod ids;
mod profile;
mod progress;
mod stage;
mod trial;
mod user;

pub use dashboard::{
    CrcAlert, CrcDashboard, CrcMetrics, ManagedPatient, PortfolioMetrics, PortfolioSnapshot,
    RecentActivity,
};
pub use enrollment::{
    DEFAULT_STAGE_COUNT, Enrollment, EnrollmentStatus, NewEnrollment, ProgressAck, RiskLevel,
    StageMarker, TrialDetails,
};
pub use ids::{EnrollmentId, ParseIdError, ThreadId, TrialId, UserId};
pub use profile::{EmrUploadSummary, PatientProfile};
pub use progress::{CompletionMatrix, ExpandedSet, ProgressSnapshot, percent};
pub use stage::{Stage, StageLabelStyle, Task, stage_shape};
pub use trial::{StatusFilter, Trial, TrialRecommendation, TrialStatus};
pub use user::{User, UserRole};
