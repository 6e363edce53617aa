use thiserror::Error;

use crate::model::ParseIdError;
use crate::tracker::TrackerError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}
