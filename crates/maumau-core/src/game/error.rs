use crate::model::deck::DeckError;
use crate::rules::IllegalMove;
use core::fmt;

/// Faults that end a game. None of them is recoverable: each means either a
/// strategy broke the legality contract or the configuration cannot be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    IllegalMove {
        player: usize,
        strategy: String,
        violation: IllegalMove,
    },
    ExhaustedSupply,
    TurnLimit {
        limit: u64,
    },
    InvalidConfig {
        message: String,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::IllegalMove {
                player,
                strategy,
                violation,
            } => write!(
                f,
                "player {player} ({strategy}) made an illegal move: {violation}"
            ),
            GameError::ExhaustedSupply => write!(f, "{}", DeckError::EmptyDiscard),
            GameError::TurnLimit { limit } => {
                write!(f, "game did not finish within {limit} turns")
            }
            GameError::InvalidConfig { message } => {
                write!(f, "invalid game configuration: {message}")
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::IllegalMove { violation, .. } => Some(violation),
            _ => None,
        }
    }
}

impl From<DeckError> for GameError {
    fn from(err: DeckError) -> Self {
        match err {
            DeckError::EmptyDiscard => GameError::ExhaustedSupply,
        }
    }
}
