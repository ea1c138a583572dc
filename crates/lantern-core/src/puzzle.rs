//! The capability interface every puzzle engine implements.
//!
//! An engine is a small state machine: it is generated from a seeded RNG,
//! accepts typed player actions through [`Puzzle::apply`], and eventually
//! reaches a terminal [`PuzzleOutcome`]. Engines never fail with an error for
//! gameplay conditions; everything a player can do wrong is an [`Advisory`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rng::SimRng;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// The eight puzzle kinds, named as they appear in chapter data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleKind {
    Switches,
    Jugs,
    Graph,
    River,
    Cat,
    Spider,
    Horses,
    Balls,
}

impl PuzzleKind {
    pub const ALL: [PuzzleKind; 8] = [
        PuzzleKind::Switches,
        PuzzleKind::Jugs,
        PuzzleKind::Graph,
        PuzzleKind::River,
        PuzzleKind::Cat,
        PuzzleKind::Spider,
        PuzzleKind::Horses,
        PuzzleKind::Balls,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PuzzleKind::Switches => "switches",
            PuzzleKind::Jugs => "jugs",
            PuzzleKind::Graph => "graph",
            PuzzleKind::River => "river",
            PuzzleKind::Cat => "cat",
            PuzzleKind::Spider => "spider",
            PuzzleKind::Horses => "horses",
            PuzzleKind::Balls => "balls",
        }
    }
}

impl fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no puzzle kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown puzzle kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for PuzzleKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PuzzleKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Outcomes and steps
// ---------------------------------------------------------------------------

/// Terminal verdict of one puzzle attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PuzzleOutcome {
    pub solved: bool,
    /// Only ever true when `solved` is true.
    pub optimized: bool,
}

impl PuzzleOutcome {
    pub fn win(optimized: bool) -> Self {
        Self {
            solved: true,
            optimized,
        }
    }

    pub fn fail() -> Self {
        Self {
            solved: false,
            optimized: false,
        }
    }
}

/// A non-fatal reason an action changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Advisory {
    // switches
    RoomEntered,
    RoomNotEntered,
    IncompleteAnswer,
    // jugs
    EmptyVessel,
    SameVessel,
    VesselFull,
    NothingToUndo,
    // stone gate
    AlreadyHere,
    NotConnected,
    AlreadyDrawn,
    // bridge
    NoLamp,
    GroupFull,
    NobodySelected,
    // shared by graph and board puzzles
    OutOfRange,
    NotAdjacent,
    AdversaryTurn,
    // tournament
    TrackFull,
    TooFewRacers,
    // weighing
    EmptyScale,
    NoWeighingsLeft,
    /// A display delay is still pending.
    Busy,
    /// The instance already has an outcome.
    Finished,
}

/// Work an engine asks its host to perform after a display delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FollowUp {
    /// Commit a bridge crossing that is underway.
    LandCrossing,
    /// Empty both pans after showing a weighing result.
    ClearPans,
    /// Let the adversary answer the player's move.
    AdversaryTurn,
}

/// Result of applying one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// State changed; the puzzle continues.
    Applied,
    /// State changed and a follow-up must be resolved before the next action.
    Pending(FollowUp),
    /// Valid action that happened to change nothing.
    NoEffect(Advisory),
    /// Invalid action; nothing changed.
    Rejected(Advisory),
    /// The action ended the attempt.
    Finished(PuzzleOutcome),
}

impl Step {
    pub fn advisory(&self) -> Option<Advisory> {
        match self {
            Step::NoEffect(a) | Step::Rejected(a) => Some(*a),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<PuzzleOutcome> {
        match self {
            Step::Finished(o) => Some(*o),
            _ => None,
        }
    }

    pub fn changed_state(&self) -> bool {
        matches!(self, Step::Applied | Step::Pending(_) | Step::Finished(_))
    }
}

// ---------------------------------------------------------------------------
// Status meters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeterKind {
    MinutesWaited,
    PoursUsed,
    EdgesDrawn,
    SecondsElapsed,
    InspectionsLeft,
    MovesLeft,
    RaceNumber,
    WeighingsLeft,
}

/// One number for the host's status line, with an optional ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Meter {
    pub kind: MeterKind,
    pub value: u32,
    pub limit: Option<u32>,
}

impl Meter {
    pub fn new(kind: MeterKind, value: u32, limit: Option<u32>) -> Self {
        Self { kind, value, limit }
    }
}

// ---------------------------------------------------------------------------
// Puzzle trait
// ---------------------------------------------------------------------------

/// Common surface of the eight engines.
pub trait Puzzle: Sized {
    type Action;

    const KIND: PuzzleKind;

    /// Build a fresh instance with a hidden configuration drawn from `rng`.
    fn generate(rng: &mut SimRng) -> Self;

    fn apply(&mut self, action: Self::Action) -> Step;

    /// Resolve a follow-up previously requested through [`Step::Pending`].
    fn resolve(&mut self, follow_up: FollowUp) -> Step {
        let _ = follow_up;
        Step::NoEffect(Advisory::Finished)
    }

    fn outcome(&self) -> Option<PuzzleOutcome>;

    fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    fn meter(&self) -> Meter;
}
