//! Switch-heat deduction: four switches in the hall, four bulbs behind a
//! door. The player may flip switches and let time pass, but only gets one
//! look inside. A bulb that was on long enough stays warm after being
//! switched off, which is what makes four-way identification possible.

use serde::{Deserialize, Serialize};

use crate::puzzle::{Advisory, Meter, MeterKind, Puzzle, PuzzleKind, PuzzleOutcome, Step};
use crate::rng::SimRng;

/// Heat gained per wait by every switch that is on.
pub const HEAT_PER_WAIT: u32 = 10;
/// Minutes of waiting still counted as an optimal solve.
pub const OPTIMAL_MINUTES: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Switch {
    A,
    B,
    C,
    D,
}

impl Switch {
    pub const ALL: [Switch; 4] = [Switch::A, Switch::B, Switch::C, Switch::D];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchState {
    pub on: bool,
    pub heat: u32,
}

/// What the player sees of one bulb once inside the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulbReading {
    pub lit: bool,
    pub warm: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    Toggle(Switch),
    Wait,
    EnterRoom,
    /// Guessed switch for each bulb, bulb 1 first.
    Submit([Option<Switch>; 4]),
}

#[derive(Debug, Clone)]
pub struct SwitchRoom {
    /// `wiring[bulb]` is the switch driving that bulb.
    wiring: [Switch; 4],
    switches: [SwitchState; 4],
    in_room: bool,
    minutes: u32,
    outcome: Option<PuzzleOutcome>,
}

impl SwitchRoom {
    pub fn with_wiring(wiring: [Switch; 4]) -> Self {
        Self {
            wiring,
            switches: [SwitchState::default(); 4],
            in_room: false,
            minutes: 0,
            outcome: None,
        }
    }

    pub fn switch(&self, s: Switch) -> SwitchState {
        self.switches[s.index()]
    }

    pub fn in_room(&self) -> bool {
        self.in_room
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Bulb readings, available only after entering the room.
    pub fn observe(&self) -> Option<[BulbReading; 4]> {
        if !self.in_room {
            return None;
        }
        Some(self.wiring.map(|s| {
            let state = self.switches[s.index()];
            BulbReading {
                lit: state.on,
                warm: state.heat > 0,
            }
        }))
    }

    /// The hidden wiring, shown to the player after a failed guess.
    pub fn reveal(&self) -> Option<[Switch; 4]> {
        self.outcome.map(|_| self.wiring)
    }

    fn submit(&mut self, guesses: [Option<Switch>; 4]) -> Step {
        if !self.in_room {
            return Step::Rejected(Advisory::RoomNotEntered);
        }
        if guesses.iter().any(Option::is_none) {
            return Step::Rejected(Advisory::IncompleteAnswer);
        }
        let correct = guesses
            .iter()
            .zip(self.wiring.iter())
            .all(|(g, w)| *g == Some(*w));
        let outcome = if correct {
            PuzzleOutcome::win(self.minutes <= OPTIMAL_MINUTES)
        } else {
            PuzzleOutcome::fail()
        };
        self.outcome = Some(outcome);
        Step::Finished(outcome)
    }
}

impl Puzzle for SwitchRoom {
    type Action = SwitchAction;

    const KIND: PuzzleKind = PuzzleKind::Switches;

    fn generate(rng: &mut SimRng) -> Self {
        let mut wiring = Switch::ALL;
        rng.shuffle(&mut wiring);
        Self::with_wiring(wiring)
    }

    fn apply(&mut self, action: SwitchAction) -> Step {
        if self.outcome.is_some() {
            return Step::Rejected(Advisory::Finished);
        }
        match action {
            SwitchAction::Toggle(_) | SwitchAction::Wait | SwitchAction::EnterRoom
                if self.in_room =>
            {
                Step::Rejected(Advisory::RoomEntered)
            }
            SwitchAction::Toggle(s) => {
                let state = &mut self.switches[s.index()];
                state.on = !state.on;
                Step::Applied
            }
            SwitchAction::Wait => {
                self.minutes += HEAT_PER_WAIT;
                for state in self.switches.iter_mut().filter(|s| s.on) {
                    state.heat += HEAT_PER_WAIT;
                }
                Step::Applied
            }
            SwitchAction::EnterRoom => {
                self.in_room = true;
                Step::Applied
            }
            SwitchAction::Submit(guesses) => self.submit(guesses),
        }
    }

    fn outcome(&self) -> Option<PuzzleOutcome> {
        self.outcome
    }

    fn meter(&self) -> Meter {
        Meter::new(MeterKind::MinutesWaited, self.minutes, None)
    }
}
