//! Twelve balls, one of them off-weight, and a balance that may be used three
//! times. Find the odd ball and say whether it is heavy or light.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::fixed::f64_to_fixed64;
use crate::id::BallId;
use crate::puzzle::{
    Advisory, FollowUp, Meter, MeterKind, Puzzle, PuzzleKind, PuzzleOutcome, Step,
};
use crate::rng::SimRng;

pub const BALLS: u8 = 12;
pub const MAX_WEIGHINGS: usize = 3;

const NORMAL_WEIGHT: u32 = 10;
const EDGE_BALLS: [u8; 3] = [1, 11, 12];
const MIDDLE_CHANCE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bias {
    Heavy,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pan {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tilt {
    LeftHeavier,
    RightHeavier,
    Balanced,
}

/// One use of the balance, as shown in the weighing log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weighing {
    pub left: BTreeSet<BallId>,
    pub right: BTreeSet<BallId>,
    pub tilt: Tilt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeighingAction {
    /// Put a ball on a pan; placing it on the pan it already sits on
    /// returns it to the table.
    Place { ball: BallId, pan: Pan },
    Weigh,
    Submit {
        ball: Option<BallId>,
        bias: Option<Bias>,
    },
}

#[derive(Debug, Clone)]
pub struct WeighingPuzzle {
    odd: BallId,
    bias: Bias,
    left: BTreeSet<BallId>,
    right: BTreeSet<BallId>,
    log: Vec<Weighing>,
    showing_result: bool,
    outcome: Option<PuzzleOutcome>,
}

impl WeighingPuzzle {
    pub fn with_odd_ball(odd: BallId, bias: Bias) -> Self {
        Self {
            odd,
            bias,
            left: BTreeSet::new(),
            right: BTreeSet::new(),
            log: Vec::new(),
            showing_result: false,
            outcome: None,
        }
    }

    fn weight(&self, ball: BallId) -> u32 {
        match (ball == self.odd, self.bias) {
            (false, _) => NORMAL_WEIGHT,
            (true, Bias::Heavy) => NORMAL_WEIGHT + 1,
            (true, Bias::Light) => NORMAL_WEIGHT - 1,
        }
    }

    pub fn pan(&self, pan: Pan) -> &BTreeSet<BallId> {
        match pan {
            Pan::Left => &self.left,
            Pan::Right => &self.right,
        }
    }

    pub fn log(&self) -> &[Weighing] {
        &self.log
    }

    pub fn weighings_left(&self) -> usize {
        MAX_WEIGHINGS.saturating_sub(self.log.len())
    }

    pub fn showing_result(&self) -> bool {
        self.showing_result
    }

    /// The magnet picks out the odd ball, without telling its bias.
    pub fn magnet_reveal(&self) -> BallId {
        self.odd
    }

    pub fn reveal(&self) -> Option<(BallId, Bias)> {
        self.outcome.map(|_| (self.odd, self.bias))
    }

    fn place(&mut self, ball: BallId, pan: Pan) -> Step {
        if !(1..=BALLS).contains(&ball.0) {
            return Step::Rejected(Advisory::OutOfRange);
        }
        if self.weighings_left() == 0 {
            return Step::Rejected(Advisory::NoWeighingsLeft);
        }
        let (target, other) = match pan {
            Pan::Left => (&mut self.left, &mut self.right),
            Pan::Right => (&mut self.right, &mut self.left),
        };
        if !target.remove(&ball) {
            other.remove(&ball);
            target.insert(ball);
        }
        Step::Applied
    }

    fn weigh(&mut self) -> Step {
        if self.weighings_left() == 0 {
            return Step::Rejected(Advisory::NoWeighingsLeft);
        }
        if self.left.is_empty() && self.right.is_empty() {
            return Step::Rejected(Advisory::EmptyScale);
        }
        let l: u32 = self.left.iter().map(|b| self.weight(*b)).sum();
        let r: u32 = self.right.iter().map(|b| self.weight(*b)).sum();
        let tilt = match l.cmp(&r) {
            std::cmp::Ordering::Greater => Tilt::LeftHeavier,
            std::cmp::Ordering::Less => Tilt::RightHeavier,
            std::cmp::Ordering::Equal => Tilt::Balanced,
        };
        self.log.push(Weighing {
            left: self.left.clone(),
            right: self.right.clone(),
            tilt,
        });
        self.showing_result = true;
        Step::Pending(FollowUp::ClearPans)
    }

    fn submit(&mut self, ball: Option<BallId>, bias: Option<Bias>) -> Step {
        let (Some(ball), Some(bias)) = (ball, bias) else {
            return Step::Rejected(Advisory::IncompleteAnswer);
        };
        let outcome = if ball == self.odd && bias == self.bias {
            // The balance refuses a fourth weighing, so every solve qualifies.
            PuzzleOutcome::win(self.log.len() <= MAX_WEIGHINGS)
        } else {
            PuzzleOutcome::fail()
        };
        self.outcome = Some(outcome);
        Step::Finished(outcome)
    }
}

impl Puzzle for WeighingPuzzle {
    type Action = WeighingAction;

    const KIND: PuzzleKind = PuzzleKind::Balls;

    /// Four times in five the odd ball is one of 2..=10; otherwise one of
    /// 1, 11 and 12. Heavy and light are equally likely.
    fn generate(rng: &mut SimRng) -> Self {
        let odd = if rng.chance(f64_to_fixed64(MIDDLE_CHANCE)) {
            rng.range_inclusive(2, 10) as u8
        } else {
            EDGE_BALLS[rng.below(EDGE_BALLS.len() as u64) as usize]
        };
        let bias = if rng.chance(f64_to_fixed64(0.5)) {
            Bias::Heavy
        } else {
            Bias::Light
        };
        Self::with_odd_ball(BallId(odd), bias)
    }

    fn apply(&mut self, action: WeighingAction) -> Step {
        if self.outcome.is_some() {
            return Step::Rejected(Advisory::Finished);
        }
        if self.showing_result {
            return Step::Rejected(Advisory::Busy);
        }
        match action {
            WeighingAction::Place { ball, pan } => self.place(ball, pan),
            WeighingAction::Weigh => self.weigh(),
            WeighingAction::Submit { ball, bias } => self.submit(ball, bias),
        }
    }

    fn resolve(&mut self, follow_up: FollowUp) -> Step {
        match follow_up {
            FollowUp::ClearPans if self.showing_result => {
                self.left.clear();
                self.right.clear();
                self.showing_result = false;
                Step::Applied
            }
            _ => Step::NoEffect(Advisory::Finished),
        }
    }

    fn outcome(&self) -> Option<PuzzleOutcome> {
        self.outcome
    }

    fn meter(&self) -> Meter {
        Meter::new(
            MeterKind::WeighingsLeft,
            self.weighings_left() as u32,
            Some(MAX_WEIGHINGS as u32),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(id: u8) -> BallId {
        BallId(id)
    }

    fn load(p: &mut WeighingPuzzle, left: &[u8], right: &[u8]) {
        for id in left {
            p.apply(WeighingAction::Place { ball: b(*id), pan: Pan::Left });
        }
        for id in right {
            p.apply(WeighingAction::Place { ball: b(*id), pan: Pan::Right });
        }
    }

    fn weigh(p: &mut WeighingPuzzle) -> Tilt {
        assert_eq!(p.apply(WeighingAction::Weigh), Step::Pending(FollowUp::ClearPans));
        let tilt = p.log().last().unwrap().tilt;
        assert_eq!(p.resolve(FollowUp::ClearPans), Step::Applied);
        tilt
    }

    #[test]
    fn placement_moves_and_returns_balls() {
        let mut p = WeighingPuzzle::with_odd_ball(b(5), Bias::Heavy);
        load(&mut p, &[1, 2], &[3]);
        p.apply(WeighingAction::Place { ball: b(1), pan: Pan::Right });
        assert_eq!(p.pan(Pan::Left).len(), 1);
        assert!(p.pan(Pan::Right).contains(&b(1)));
        p.apply(WeighingAction::Place { ball: b(1), pan: Pan::Right });
        assert!(!p.pan(Pan::Right).contains(&b(1)));
        assert!(!p.pan(Pan::Left).contains(&b(1)));
    }

    #[test]
    fn balance_reports_the_heavier_side() {
        let mut p = WeighingPuzzle::with_odd_ball(b(5), Bias::Heavy);
        load(&mut p, &[5, 6], &[7, 8]);
        assert_eq!(weigh(&mut p), Tilt::LeftHeavier);
        assert!(p.pan(Pan::Left).is_empty());

        let mut p = WeighingPuzzle::with_odd_ball(b(5), Bias::Light);
        load(&mut p, &[5, 6], &[7, 8]);
        assert_eq!(weigh(&mut p), Tilt::RightHeavier);

        load(&mut p, &[1], &[2]);
        assert_eq!(weigh(&mut p), Tilt::Balanced);
        assert_eq!(p.log()[1].left, BTreeSet::from([b(1)]));
    }

    #[test]
    fn pans_stay_loaded_while_result_shows() {
        let mut p = WeighingPuzzle::with_odd_ball(b(2), Bias::Light);
        load(&mut p, &[1], &[3]);
        p.apply(WeighingAction::Weigh);
        assert!(p.showing_result());
        assert_eq!(
            p.apply(WeighingAction::Place { ball: b(4), pan: Pan::Left }),
            Step::Rejected(Advisory::Busy)
        );
        assert_eq!(p.pan(Pan::Left).len(), 1);
    }

    #[test]
    fn empty_scale_and_fourth_weighing_are_rejected() {
        let mut p = WeighingPuzzle::with_odd_ball(b(2), Bias::Light);
        assert_eq!(p.apply(WeighingAction::Weigh), Step::Rejected(Advisory::EmptyScale));
        for _ in 0..3 {
            load(&mut p, &[1], &[3]);
            weigh(&mut p);
        }
        assert_eq!(p.meter().value, 0);
        assert_eq!(
            p.apply(WeighingAction::Place { ball: b(1), pan: Pan::Left }),
            Step::Rejected(Advisory::NoWeighingsLeft)
        );
        assert_eq!(p.apply(WeighingAction::Weigh), Step::Rejected(Advisory::NoWeighingsLeft));
    }

    #[test]
    fn submission_verdicts() {
        let mut p = WeighingPuzzle::with_odd_ball(b(7), Bias::Light);
        assert_eq!(
            p.apply(WeighingAction::Submit { ball: Some(b(7)), bias: None }),
            Step::Rejected(Advisory::IncompleteAnswer)
        );
        assert_eq!(
            p.apply(WeighingAction::Submit { ball: Some(b(7)), bias: Some(Bias::Light) }),
            Step::Finished(PuzzleOutcome::win(true))
        );

        let mut p = WeighingPuzzle::with_odd_ball(b(7), Bias::Light);
        assert_eq!(
            p.apply(WeighingAction::Submit { ball: Some(b(7)), bias: Some(Bias::Heavy) }),
            Step::Finished(PuzzleOutcome::fail())
        );
        assert_eq!(p.reveal(), Some((b(7), Bias::Light)));
    }

    #[test]
    fn generator_prefers_the_middle() {
        let mut rng = SimRng::new(2024);
        let mut middle = 0;
        let mut heavy = 0;
        for _ in 0..2000 {
            let p = WeighingPuzzle::generate(&mut rng);
            assert!((1..=12).contains(&p.odd.0));
            if (2..=10).contains(&p.odd.0) {
                middle += 1;
            }
            if p.bias == Bias::Heavy {
                heavy += 1;
            }
        }
        assert!((1500..1700).contains(&middle), "middle = {middle}");
        assert!((850..1150).contains(&heavy), "heavy = {heavy}");
    }

    #[test]
    fn magnet_finds_the_odd_ball() {
        let p = WeighingPuzzle::with_odd_ball(b(9), Bias::Heavy);
        assert_eq!(p.magnet_reveal(), b(9));
        assert_eq!(p.reveal(), None);
    }
}
