//! Dragon tournament: find the three fastest of 25 dragons using races of at
//! most five, without a stopwatch. Only finishing order is observed.

use serde::{Deserialize, Serialize};

use crate::id::RacerId;
use crate::puzzle::{Advisory, Meter, MeterKind, Puzzle, PuzzleKind, PuzzleOutcome, Step};
use crate::rng::SimRng;

pub const RACERS: u8 = 25;
pub const GROUP_SIZE: u8 = 5;
pub const TRACK_LIMIT: usize = 5;
pub const MIN_RACERS: usize = 2;
pub const OPTIMAL_RACES: usize = 7;
/// Racers the magnifying glass clears from contention.
pub const GLASS_REVEALS: usize = 4;

const TOP_SPEEDS: [u32; 3] = [999, 950, 900];
const BASE_SPEED_LO: u32 = 100;
const BASE_SPEED_HI: u32 = 600;

/// Which two of the podium ranks share a starting group.
const PAIRINGS: [([usize; 2], usize); 3] = [([0, 1], 2), ([1, 2], 0), ([0, 2], 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentAction {
    /// Put a racer on the track, or take them off again.
    Enter(RacerId),
    Race,
    /// Guessed podium, fastest first.
    Submit([Option<RacerId>; 3]),
}

/// Finishing order of one race, winner first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceResult(pub Vec<RacerId>);

#[derive(Debug, Clone)]
pub struct TournamentPuzzle {
    /// `speeds[id - 1]`; all distinct.
    speeds: Vec<u32>,
    track: Vec<RacerId>,
    log: Vec<RaceResult>,
    rng: SimRng,
    outcome: Option<PuzzleOutcome>,
}

impl TournamentPuzzle {
    /// Build from explicit speeds (index 0 is racer 1).
    pub fn with_speeds(speeds: Vec<u32>, rng: SimRng) -> Self {
        debug_assert_eq!(speeds.len(), RACERS as usize);
        Self {
            speeds,
            track: Vec::with_capacity(TRACK_LIMIT),
            log: Vec::new(),
            rng,
            outcome: None,
        }
    }

    fn speed(&self, id: RacerId) -> u32 {
        self.speeds[(id.0 - 1) as usize]
    }

    /// The true podium, fastest first.
    pub fn podium(&self) -> [RacerId; 3] {
        let mut all: Vec<RacerId> = (1..=RACERS).map(RacerId).collect();
        all.sort_by_key(|id| std::cmp::Reverse(self.speed(*id)));
        [all[0], all[1], all[2]]
    }

    pub fn track(&self) -> &[RacerId] {
        &self.track
    }

    pub fn races(&self) -> &[RaceResult] {
        &self.log
    }

    /// Magnifying glass: four random racers that are certainly off the podium.
    pub fn magnifier_reveal(&mut self) -> Vec<RacerId> {
        let podium = self.podium();
        let mut others: Vec<RacerId> = (1..=RACERS)
            .map(RacerId)
            .filter(|id| !podium.contains(id))
            .collect();
        self.rng.shuffle(&mut others);
        others.truncate(GLASS_REVEALS);
        others.sort();
        others
    }

    fn enter(&mut self, id: RacerId) -> Step {
        if !(1..=RACERS).contains(&id.0) {
            return Step::Rejected(Advisory::OutOfRange);
        }
        if let Some(pos) = self.track.iter().position(|r| *r == id) {
            self.track.remove(pos);
            return Step::Applied;
        }
        if self.track.len() >= TRACK_LIMIT {
            return Step::Rejected(Advisory::TrackFull);
        }
        self.track.push(id);
        Step::Applied
    }

    fn race(&mut self) -> Step {
        if self.track.len() < MIN_RACERS {
            return Step::Rejected(Advisory::TooFewRacers);
        }
        let mut order = std::mem::take(&mut self.track);
        order.sort_by_key(|id| std::cmp::Reverse(self.speed(*id)));
        self.log.push(RaceResult(order));
        Step::Applied
    }

    fn submit(&mut self, guess: [Option<RacerId>; 3]) -> Step {
        let [Some(a), Some(b), Some(c)] = guess else {
            return Step::Rejected(Advisory::IncompleteAnswer);
        };
        let outcome = if [a, b, c] == self.podium() {
            PuzzleOutcome::win(self.log.len() <= OPTIMAL_RACES)
        } else {
            PuzzleOutcome::fail()
        };
        self.outcome = Some(outcome);
        Step::Finished(outcome)
    }
}

impl Puzzle for TournamentPuzzle {
    type Action = TournamentAction;

    const KIND: PuzzleKind = PuzzleKind::Horses;

    /// Plants the podium so that two of its members share a group of five
    /// and the third sits alone in another group; everyone else gets a
    /// distinct slower speed.
    fn generate(rng: &mut SimRng) -> Self {
        let mut own = rng.fork();

        let mut pool: Vec<u32> = (BASE_SPEED_LO..BASE_SPEED_HI).collect();
        own.shuffle(&mut pool);
        let mut speeds: Vec<u32> = pool[..RACERS as usize].to_vec();

        let (pair, loner) = PAIRINGS[own.below(PAIRINGS.len() as u64) as usize];
        let groups = RACERS / GROUP_SIZE;
        let pair_group = own.below(groups as u64) as u8;
        let loner_group = {
            let g = own.below(groups as u64 - 1) as u8;
            if g >= pair_group { g + 1 } else { g }
        };

        let mut slots: Vec<u8> = (0..GROUP_SIZE).collect();
        own.shuffle(&mut slots);
        for (rank, slot) in pair.iter().zip(slots) {
            speeds[(pair_group * GROUP_SIZE + slot) as usize] = TOP_SPEEDS[*rank];
        }
        let slot = own.below(GROUP_SIZE as u64) as u8;
        speeds[(loner_group * GROUP_SIZE + slot) as usize] = TOP_SPEEDS[loner];

        Self::with_speeds(speeds, own)
    }

    fn apply(&mut self, action: TournamentAction) -> Step {
        if self.outcome.is_some() {
            return Step::Rejected(Advisory::Finished);
        }
        match action {
            TournamentAction::Enter(id) => self.enter(id),
            TournamentAction::Race => self.race(),
            TournamentAction::Submit(guess) => self.submit(guess),
        }
    }

    fn outcome(&self) -> Option<PuzzleOutcome> {
        self.outcome
    }

    fn meter(&self) -> Meter {
        Meter::new(
            MeterKind::RaceNumber,
            self.log.len() as u32,
            Some(OPTIMAL_RACES as u32),
        )
    }
}
