//! Coarse progress reporting for the analysis pipeline.
//!
//! Progress is published on a `tokio::sync::watch` channel: sends never
//! block, a slow consumer only ever misses intermediate states, and no
//! consumer at all is fine.

use serde::Serialize;

/// Pipeline phase, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Fetching,
    Scoring,
    Aggregating,
    Done,
    Failed,
}

/// One progress snapshot: current phase plus a rough percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub phase: Phase,
    pub percent: u8,
}

impl Progress {
    #[must_use]
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            percent: 0,
        }
    }

    #[must_use]
    pub fn new(phase: Phase, percent: u8) -> Self {
        Self { phase, percent }
    }
}
