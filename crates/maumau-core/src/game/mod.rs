pub mod config;
pub mod error;
pub mod snapshot;
pub mod state;

pub use config::{AceRule, GameConfig, QueenRule, RuleSet, StartingPlayer};
pub use error::GameError;
pub use snapshot::GameSnapshot;
pub use state::{Direction, Game, GameOutcome, TableLayout, TurnOutcome};
