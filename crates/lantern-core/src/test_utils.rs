//! Reference solvers shared by unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`. Every solver
//! plays through the [`PuzzleDriver`] seam using only what a player could
//! observe, so the same code drives a bare [`Session`] here and a whole
//! campaign in downstream crates.

use std::collections::HashMap;

use crate::graph::Graph;
use crate::id::{BallId, NodeId, RacerId};
use crate::instance::{Action, PuzzleInstance};
use crate::puzzle::{Puzzle, PuzzleKind, Step};
use crate::puzzles::bridge::Traveller;
use crate::puzzles::pursuit::{OPTIMAL_MOVES, flee_options};
use crate::puzzles::switches::{BulbReading, Switch};
use crate::puzzles::weighing::{Bias, Pan, Tilt};
use crate::puzzles::*;
use crate::session::Session;

// ===========================================================================
// Driver seam
// ===========================================================================

/// Anything that can feed actions to one live puzzle.
pub trait PuzzleDriver {
    fn puzzle(&self) -> &PuzzleInstance;
    fn act(&mut self, action: Action) -> Step;
    /// Let every pending display delay elapse.
    fn settle(&mut self);
}

impl PuzzleDriver for Session {
    fn puzzle(&self) -> &PuzzleInstance {
        Session::puzzle(self)
    }

    fn act(&mut self, action: Action) -> Step {
        Session::act(self, action).expect("solver sent an action of the session's kind")
    }

    fn settle(&mut self) {
        Session::settle(self);
    }
}

fn act_settled(driver: &mut impl PuzzleDriver, action: Action) -> Step {
    let step = driver.act(action);
    driver.settle();
    step
}

// ===========================================================================
// Fixed plans
// ===========================================================================

/// One Eulerian trail over the stone gate, odd vertex to odd vertex.
pub const EULER_TRAIL: [u8; 16] = [4, 2, 1, 3, 2, 5, 3, 4, 5, 6, 4, 7, 6, 8, 7, 5];

/// Six pours from [8,0,0] to [1,4,3].
pub const JUG_PLAN: [(usize, usize); 6] = [(0, 1), (1, 2), (2, 0), (1, 2), (0, 1), (1, 2)];

/// The 29-second crossing schedule.
pub const BRIDGE_SCHEDULE: [&[Traveller]; 7] = [
    &[Traveller::Dog, Traveller::An],
    &[Traveller::Dog],
    &[Traveller::Bear, Traveller::Robo],
    &[Traveller::An],
    &[Traveller::Dog, Traveller::Guest],
    &[Traveller::Dog],
    &[Traveller::Dog, Traveller::An],
];

/// Box sweep that corners the cat on the sixth day at the latest.
pub const HIDEOUT_SWEEP: [u8; 6] = [2, 3, 4, 2, 3, 4];

/// Non-adaptive three-weighing plan: `(left pan, right pan)` per weighing.
pub const WEIGHING_PLAN: [([u8; 4], [u8; 4]); 3] = [
    ([4, 5, 6, 8], [1, 2, 3, 7]),
    ([7, 9, 10, 11], [1, 2, 6, 8]),
    ([2, 6, 9, 12], [3, 5, 8, 11]),
];

// ===========================================================================
// Deduction helpers
// ===========================================================================

/// Read the switch room after: A and B on, wait, B off, C on.
pub fn deduce_wiring(readings: [BulbReading; 4]) -> [Option<Switch>; 4] {
    readings.map(|r| {
        Some(match (r.lit, r.warm) {
            (true, true) => Switch::A,
            (false, true) => Switch::B,
            (true, false) => Switch::C,
            (false, false) => Switch::D,
        })
    })
}

fn tilt_sign(t: Tilt) -> i8 {
    match t {
        Tilt::LeftHeavier => 1,
        Tilt::RightHeavier => -1,
        Tilt::Balanced => 0,
    }
}

/// Which pan a ball sits on in each planned weighing: +1 left, -1 right.
pub fn weighing_code(ball: BallId) -> [i8; 3] {
    WEIGHING_PLAN.map(|(left, right)| {
        if left.contains(&ball.0) {
            1
        } else if right.contains(&ball.0) {
            -1
        } else {
            0
        }
    })
}

/// Decode three tilts of [`WEIGHING_PLAN`] into the odd ball and its bias.
pub fn decode_weighings(tilts: [Tilt; 3]) -> Option<(BallId, Bias)> {
    let seen = tilts.map(tilt_sign);
    (1..=weighing::BALLS).map(BallId).find_map(|ball| {
        let code = weighing_code(ball);
        if code == seen {
            Some((ball, Bias::Heavy))
        } else if code.map(|c| -c) == seen {
            Some((ball, Bias::Light))
        } else {
            None
        }
    })
}

/// A move from `player` that forces a capture within `moves_left` moves
/// against every tie-break the adversary might take.
pub fn chase_move(
    graph: &Graph,
    player: NodeId,
    adversary: NodeId,
    moves_left: u32,
) -> Option<NodeId> {
    if moves_left == 0 {
        return None;
    }
    let mut memo = HashMap::new();
    graph.neighbors(player).iter().copied().find(|&n| {
        n == adversary || forced_after(graph, n, adversary, moves_left - 1, &mut memo)
    })
}

fn forced_after(
    graph: &Graph,
    player: NodeId,
    adversary: NodeId,
    moves_left: u32,
    memo: &mut HashMap<(NodeId, NodeId, u32), bool>,
) -> bool {
    let mut replies = flee_options(graph, player, adversary);
    if replies.is_empty() {
        replies.push(adversary);
    }
    replies
        .into_iter()
        .all(|a| a == player || can_catch(graph, player, a, moves_left, memo))
}

fn can_catch(
    graph: &Graph,
    player: NodeId,
    adversary: NodeId,
    moves_left: u32,
    memo: &mut HashMap<(NodeId, NodeId, u32), bool>,
) -> bool {
    if moves_left == 0 {
        return false;
    }
    if let Some(&known) = memo.get(&(player, adversary, moves_left)) {
        return known;
    }
    let result = graph.neighbors(player).iter().any(|&n| {
        n == adversary || forced_after(graph, n, adversary, moves_left - 1, memo)
    });
    memo.insert((player, adversary, moves_left), result);
    result
}

// ===========================================================================
// Solvers
// ===========================================================================

/// Play the driver's current puzzle to an optimal win.
pub fn solve(driver: &mut impl PuzzleDriver) -> Step {
    match driver.puzzle().kind() {
        PuzzleKind::Switches => solve_switches(driver),
        PuzzleKind::Jugs => solve_jugs(driver),
        PuzzleKind::Graph => solve_trail(driver),
        PuzzleKind::River => solve_bridge(driver),
        PuzzleKind::Cat => solve_hideout(driver),
        PuzzleKind::Spider => solve_pursuit(driver),
        PuzzleKind::Horses => solve_tournament(driver),
        PuzzleKind::Balls => solve_weighing(driver),
    }
}

fn solve_switches(driver: &mut impl PuzzleDriver) -> Step {
    for action in [
        SwitchAction::Toggle(Switch::A),
        SwitchAction::Toggle(Switch::B),
        SwitchAction::Wait,
        SwitchAction::Toggle(Switch::B),
        SwitchAction::Toggle(Switch::C),
        SwitchAction::EnterRoom,
    ] {
        driver.act(Action::Switches(action));
    }
    let PuzzleInstance::Switches(room) = driver.puzzle() else {
        unreachable!("dispatched on kind");
    };
    let readings = room.observe().expect("room was entered");
    act_settled(driver, Action::Switches(SwitchAction::Submit(deduce_wiring(readings))))
}

fn solve_jugs(driver: &mut impl PuzzleDriver) -> Step {
    let mut last = Step::Applied;
    for (from, to) in JUG_PLAN {
        last = act_settled(driver, Action::Jugs(JugAction::Pour { from, to }));
    }
    last
}

fn solve_trail(driver: &mut impl PuzzleDriver) -> Step {
    let mut last = Step::Applied;
    for n in EULER_TRAIL {
        last = act_settled(driver, Action::Graph(TrailAction::Select(NodeId(n))));
    }
    last
}

fn solve_bridge(driver: &mut impl PuzzleDriver) -> Step {
    let mut last = Step::Applied;
    for group in BRIDGE_SCHEDULE {
        for t in group {
            driver.act(Action::River(BridgeAction::Select(*t)));
        }
        driver.act(Action::River(BridgeAction::Cross));
        driver.settle();
        let PuzzleInstance::River(p) = driver.puzzle() else {
            unreachable!("dispatched on kind");
        };
        if let Some(o) = p.outcome() {
            last = Step::Finished(o);
        }
    }
    last
}

fn solve_hideout(driver: &mut impl PuzzleDriver) -> Step {
    let mut last = Step::Applied;
    for b in HIDEOUT_SWEEP {
        last = act_settled(driver, Action::Cat(HideoutAction::Inspect(b)));
        if matches!(last, Step::Finished(_)) {
            break;
        }
    }
    last
}

fn solve_pursuit(driver: &mut impl PuzzleDriver) -> Step {
    loop {
        let PuzzleInstance::Spider(p) = driver.puzzle() else {
            unreachable!("dispatched on kind");
        };
        if let Some(o) = p.outcome() {
            return Step::Finished(o);
        }
        let left = OPTIMAL_MOVES.saturating_sub(p.moves());
        let next = chase_move(p.graph(), p.player(), p.adversary(), left)
            .expect("a forced capture exists within the optimal move count");
        driver.act(Action::Spider(PursuitAction::Move(next)));
        driver.settle();
    }
}

fn last_race(driver: &impl PuzzleDriver) -> Vec<RacerId> {
    let PuzzleInstance::Horses(p) = driver.puzzle() else {
        unreachable!("dispatched on kind");
    };
    p.races().last().map(|r| r.0.clone()).unwrap_or_default()
}

fn race(driver: &mut impl PuzzleDriver, racers: &[RacerId]) -> Vec<RacerId> {
    for r in racers {
        driver.act(Action::Horses(TournamentAction::Enter(*r)));
    }
    driver.act(Action::Horses(TournamentAction::Race));
    last_race(driver)
}

/// Five heats, a race of heat winners, then one race among the five
/// remaining contenders for second and third.
fn solve_tournament(driver: &mut impl PuzzleDriver) -> Step {
    let heats: Vec<Vec<RacerId>> = (0..5u8)
        .map(|g| {
            let group: Vec<RacerId> = (1..=5).map(|i| RacerId(g * 5 + i)).collect();
            race(driver, &group)
        })
        .collect();
    let winners: Vec<RacerId> = heats.iter().map(|h| h[0]).collect();
    let final_order = race(driver, &winners);
    let heat_of = |winner: RacerId| &heats[winner.group() as usize];
    let (a, b, c) = (
        heat_of(final_order[0]),
        heat_of(final_order[1]),
        heat_of(final_order[2]),
    );
    let runoff = race(driver, &[a[1], a[2], b[0], b[1], c[0]]);
    let guess = [Some(a[0]), Some(runoff[0]), Some(runoff[1])];
    act_settled(driver, Action::Horses(TournamentAction::Submit(guess)))
}

fn solve_weighing(driver: &mut impl PuzzleDriver) -> Step {
    let mut tilts = [Tilt::Balanced; 3];
    for (i, (left, right)) in WEIGHING_PLAN.iter().enumerate() {
        for (pan, balls) in [(Pan::Left, left), (Pan::Right, right)] {
            for b in balls {
                driver.act(Action::Balls(WeighingAction::Place {
                    ball: BallId(*b),
                    pan,
                }));
            }
        }
        driver.act(Action::Balls(WeighingAction::Weigh));
        let PuzzleInstance::Balls(p) = driver.puzzle() else {
            unreachable!("dispatched on kind");
        };
        tilts[i] = p.log()[i].tilt;
        driver.settle();
    }
    let (ball, bias) = decode_weighings(tilts).expect("plan separates all 24 cases");
    act_settled(
        driver,
        Action::Balls(WeighingAction::Submit {
            ball: Some(ball),
            bias: Some(bias),
        }),
    )
}
