use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a scheduled follow-up in the deferred queue.
    pub struct TaskId;
}

/// Identifies one generated puzzle instance. Bumped on every regeneration so
/// follow-ups scheduled for an older instance can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl InstanceId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// A vertex in one of the fixed puzzle graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u8);

/// One of the 25 dragons in the tournament, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RacerId(pub u8);

impl RacerId {
    /// Zero-based heat group (five racers per group).
    pub fn group(self) -> u8 {
        (self.0 - 1) / 5
    }
}

/// One of the twelve balls on the weighing table, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u8);
