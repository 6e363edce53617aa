mod bridge;
mod writer;

pub use bridge::{ProgressBridge, SaveReport};
pub use writer::{SyncStatus, SyncWriter};
