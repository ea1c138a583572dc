//! The eight puzzle engines.

pub mod bridge;
pub mod hideout;
pub mod jugs;
pub mod pursuit;
pub mod switches;
pub mod tournament;
pub mod trail;
pub mod weighing;

pub use bridge::{BridgeAction, BridgePuzzle, Traveller};
pub use hideout::{HideoutAction, HideoutPuzzle};
pub use jugs::{JugAction, JugPuzzle};
pub use pursuit::{PursuitAction, PursuitPuzzle};
pub use switches::{SwitchAction, SwitchRoom};
pub use tournament::{TournamentAction, TournamentPuzzle};
pub use trail::{TrailAction, TrailPuzzle};
pub use weighing::{WeighingAction, WeighingPuzzle};
