#![forbid(unsafe_code)]

pub mod adapter;
pub mod chat;
pub mod error;
pub mod fetch;
pub mod model;
pub mod time;
pub mod tracker;

pub use error::Error;
pub use fetch::FetchOutcome;
pub use time::Clock;
pub use tracker::{CompletionTracker, StageState, TrackerError};
