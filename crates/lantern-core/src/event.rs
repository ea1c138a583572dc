//! Events a [`Session`](crate::session::Session) emits as its deferred
//! follow-ups fall due. The host drains them after each `advance`.

use crate::fixed::Millis;
use crate::id::InstanceId;
use crate::puzzle::{FollowUp, PuzzleOutcome, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A display delay ended and the engine committed the follow-up.
    Resolved {
        instance: InstanceId,
        follow_up: FollowUp,
        step: Step,
        at: Millis,
    },
    /// Outcome callback: the instance was solved.
    Won {
        instance: InstanceId,
        optimized: bool,
        at: Millis,
    },
    /// Outcome callback: the instance was lost.
    Failed { instance: InstanceId, at: Millis },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    Resolved,
    Won,
    Failed,
}

impl SessionEvent {
    pub fn kind(&self) -> SessionEventKind {
        match self {
            SessionEvent::Resolved { .. } => SessionEventKind::Resolved,
            SessionEvent::Won { .. } => SessionEventKind::Won,
            SessionEvent::Failed { .. } => SessionEventKind::Failed,
        }
    }

    pub fn instance(&self) -> InstanceId {
        match self {
            SessionEvent::Resolved { instance, .. }
            | SessionEvent::Won { instance, .. }
            | SessionEvent::Failed { instance, .. } => *instance,
        }
    }

    /// The outcome carried by a `Won` or `Failed` event.
    pub fn outcome(&self) -> Option<PuzzleOutcome> {
        match self {
            SessionEvent::Won { optimized, .. } => Some(PuzzleOutcome::win(*optimized)),
            SessionEvent::Failed { .. } => Some(PuzzleOutcome::fail()),
            SessionEvent::Resolved { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_events_carry_verdicts() {
        let won = SessionEvent::Won {
            instance: InstanceId(3),
            optimized: true,
            at: 500,
        };
        assert_eq!(won.kind(), SessionEventKind::Won);
        assert_eq!(won.instance(), InstanceId(3));
        assert_eq!(won.outcome(), Some(PuzzleOutcome::win(true)));

        let failed = SessionEvent::Failed {
            instance: InstanceId(4),
            at: 0,
        };
        assert_eq!(failed.outcome(), Some(PuzzleOutcome::fail()));

        let resolved = SessionEvent::Resolved {
            instance: InstanceId(4),
            follow_up: FollowUp::ClearPans,
            step: Step::Applied,
            at: 1500,
        };
        assert_eq!(resolved.outcome(), None);
    }
}
