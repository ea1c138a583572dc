//! Drives one puzzle instance through its display delays.
//!
//! A [`Session`] owns the live [`PuzzleInstance`], a virtual clock, and a
//! [`DeferredQueue`] of follow-ups. Player actions go through [`Session::act`];
//! the host advances the clock with [`Session::advance`] and receives the
//! resulting [`SessionEvent`]s, including the final `Won` / `Failed`
//! callback once the outcome delay has elapsed.
//!
//! Every queued follow-up is tagged with the [`InstanceId`] current when it
//! was scheduled. [`Session::reset`] moves to a new id, so anything left over
//! from the previous instance is discarded when it falls due.

use serde::{Deserialize, Serialize};

use crate::deferred::DeferredQueue;
use crate::event::SessionEvent;
use crate::fixed::Millis;
use crate::id::InstanceId;
use crate::instance::{Action, PuzzleInstance};
use crate::puzzle::{Advisory, FollowUp, Meter, PuzzleKind, PuzzleOutcome, Step};
use crate::rng::SimRng;

// ---------------------------------------------------------------------------
// Timings
// ---------------------------------------------------------------------------

/// Pause between deciding an outcome and reporting it, per puzzle kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeDelays {
    pub switches: Millis,
    pub jugs: Millis,
    pub graph: Millis,
    pub river: Millis,
    pub cat: Millis,
    pub spider: Millis,
    pub horses: Millis,
    pub balls: Millis,
}

impl Default for OutcomeDelays {
    fn default() -> Self {
        Self {
            switches: 0,
            jugs: 500,
            graph: 500,
            river: 800,
            cat: 1000,
            spider: 500,
            horses: 0,
            balls: 0,
        }
    }
}

impl OutcomeDelays {
    pub fn get(&self, kind: PuzzleKind) -> Millis {
        match kind {
            PuzzleKind::Switches => self.switches,
            PuzzleKind::Jugs => self.jugs,
            PuzzleKind::Graph => self.graph,
            PuzzleKind::River => self.river,
            PuzzleKind::Cat => self.cat,
            PuzzleKind::Spider => self.spider,
            PuzzleKind::Horses => self.horses,
            PuzzleKind::Balls => self.balls,
        }
    }
}

/// All presentational delays, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub outcome: OutcomeDelays,
    pub crossing: Millis,
    pub weighing_display: Millis,
    pub adversary_response: Millis,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            outcome: OutcomeDelays::default(),
            crossing: 1000,
            weighing_display: 1500,
            adversary_response: 300,
        }
    }
}

impl Timings {
    /// No delays at all; every follow-up falls due on the next `advance(0)`.
    pub fn instant() -> Self {
        Self {
            outcome: OutcomeDelays {
                switches: 0,
                jugs: 0,
                graph: 0,
                river: 0,
                cat: 0,
                spider: 0,
                horses: 0,
                balls: 0,
            },
            crossing: 0,
            weighing_display: 0,
            adversary_response: 0,
        }
    }

    pub fn follow_up(&self, follow_up: FollowUp) -> Millis {
        match follow_up {
            FollowUp::LandCrossing => self.crossing,
            FollowUp::ClearPans => self.weighing_display,
            FollowUp::AdversaryTurn => self.adversary_response,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("action for {got} sent to a {expected} session")]
    KindMismatch {
        expected: PuzzleKind,
        got: PuzzleKind,
    },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Resolve(FollowUp),
    Deliver(PuzzleOutcome),
}

#[derive(Debug, Clone)]
pub struct Session {
    kind: PuzzleKind,
    instance: InstanceId,
    puzzle: PuzzleInstance,
    rng: SimRng,
    queue: DeferredQueue<Task>,
    now: Millis,
    timings: Timings,
}

impl Session {
    pub fn new(kind: PuzzleKind, seed: u64, timings: Timings) -> Self {
        let mut rng = SimRng::new(seed);
        let puzzle = PuzzleInstance::generate(kind, &mut rng);
        Self {
            kind,
            instance: InstanceId(0),
            puzzle,
            rng,
            queue: DeferredQueue::new(),
            now: 0,
            timings,
        }
    }

    /// Wrap an already-built instance, e.g. one with a fixed hidden answer.
    pub fn with_instance(puzzle: PuzzleInstance, seed: u64, timings: Timings) -> Self {
        Self {
            kind: puzzle.kind(),
            instance: InstanceId(0),
            puzzle,
            rng: SimRng::new(seed),
            queue: DeferredQueue::new(),
            now: 0,
            timings,
        }
    }

    pub fn kind(&self) -> PuzzleKind {
        self.kind
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance
    }

    pub fn puzzle(&self) -> &PuzzleInstance {
        &self.puzzle
    }

    pub fn puzzle_mut(&mut self) -> &mut PuzzleInstance {
        &mut self.puzzle
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn meter(&self) -> Meter {
        self.puzzle.meter()
    }

    pub fn outcome(&self) -> Option<PuzzleOutcome> {
        self.puzzle.outcome()
    }

    /// Whether a display delay is holding up player input.
    pub fn is_busy(&self) -> bool {
        self.queue.has_blocking(self.instance)
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.queue.next_due()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }

    /// Apply a player action to the current instance.
    pub fn act(&mut self, action: Action) -> Result<Step, SessionError> {
        if action.kind() != self.kind {
            return Err(SessionError::KindMismatch {
                expected: self.kind,
                got: action.kind(),
            });
        }
        if self.is_busy() {
            return Ok(Step::Rejected(Advisory::Busy));
        }
        let step = self
            .puzzle
            .apply(action)
            .map_err(|a| SessionError::KindMismatch {
                expected: self.kind,
                got: a.kind(),
            })?;
        self.schedule_for(step, self.now);
        Ok(step)
    }

    fn schedule_for(&mut self, step: Step, base: Millis) {
        match step {
            Step::Pending(f) => {
                let delay = self.timings.follow_up(f);
                self.queue
                    .schedule(base, delay, self.instance, true, Task::Resolve(f));
            }
            Step::Finished(outcome) => {
                let delay = self.timings.outcome.get(self.kind);
                log::debug!(
                    "{} instance {:?} finished (solved={}, optimized={}), reporting in {delay} ms",
                    self.kind,
                    self.instance,
                    outcome.solved,
                    outcome.optimized
                );
                self.queue
                    .schedule(base, delay, self.instance, false, Task::Deliver(outcome));
            }
            _ => {}
        }
    }

    /// Move the clock forward and run every follow-up that falls due.
    pub fn advance(&mut self, ms: Millis) -> Vec<SessionEvent> {
        self.now = self.now.saturating_add(ms);
        let mut events = Vec::new();
        while let Some(task) = self.queue.pop_due(self.now) {
            if task.instance != self.instance {
                log::debug!("dropping stale follow-up for {:?}", task.instance);
                continue;
            }
            match task.payload {
                Task::Resolve(follow_up) => {
                    let step = self.puzzle.resolve(follow_up);
                    events.push(SessionEvent::Resolved {
                        instance: task.instance,
                        follow_up,
                        step,
                        at: task.due,
                    });
                    self.schedule_for(step, task.due);
                }
                Task::Deliver(outcome) => {
                    let event = if outcome.solved {
                        SessionEvent::Won {
                            instance: task.instance,
                            optimized: outcome.optimized,
                            at: task.due,
                        }
                    } else {
                        SessionEvent::Failed {
                            instance: task.instance,
                            at: task.due,
                        }
                    };
                    events.push(event);
                }
            }
        }
        events
    }

    /// Advance until nothing is pending, collecting every event.
    pub fn settle(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(due) = self.queue.next_due() {
            let wait = due.saturating_sub(self.now);
            events.extend(self.advance(wait));
        }
        events
    }

    /// Discard the current instance and everything scheduled for it, then
    /// generate a fresh hidden configuration.
    pub fn reset(&mut self) {
        let dropped = self.queue.cancel_instance(self.instance);
        self.instance = self.instance.next();
        self.puzzle = PuzzleInstance::generate(self.kind, &mut self.rng);
        log::debug!(
            "{} regenerated as {:?} ({dropped} follow-ups cancelled)",
            self.kind,
            self.instance
        );
    }
}
