//! Lantern Core -- puzzle engines for the lantern journey.
//!
//! This crate holds the eight self-contained logic puzzles and the machinery
//! to drive one of them from a host: seeded instance generation, typed player
//! actions, and display delays modelled as cancellable follow-ups.
//!
//! # Driving a puzzle
//!
//! ```rust,ignore
//! let mut session = Session::new(PuzzleKind::Jugs, seed, Timings::default());
//! session.act(Action::Jugs(JugAction::Pour { from: 0, to: 1 }))?;
//! for event in session.advance(16) {
//!     // Won / Failed arrive here once the outcome delay has passed.
//! }
//! ```
//!
//! # Key Types
//!
//! - [`puzzle::Puzzle`] -- capability trait every engine implements.
//! - [`instance::PuzzleInstance`] / [`instance::Action`] -- tagged dispatch
//!   keyed by [`puzzle::PuzzleKind`].
//! - [`session::Session`] -- one live instance, its virtual clock and its
//!   [`deferred::DeferredQueue`].
//! - [`graph::Graph`] -- the fixed stone-gate and spider-web layouts, with
//!   breadth-first distances.
//! - [`rng::SimRng`] -- SplitMix64, the only source of randomness.

pub mod deferred;
pub mod event;
pub mod fixed;
pub mod graph;
pub mod id;
pub mod instance;
pub mod puzzle;
pub mod puzzles;
pub mod rng;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
