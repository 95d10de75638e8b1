use super::state::{Direction, Game};
use crate::model::card::Card;
use crate::model::suit::{Suit, suit_ordinal};
use core::fmt;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Point-in-time view of a table, used for turn tracing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub deck: usize,
    pub discard: usize,
    pub active: usize,
    pub top: Card,
    pub asked: Option<Suit>,
    pub direction: Direction,
    pub hands: Vec<Vec<Card>>,
}

impl GameSnapshot {
    pub fn capture<R: RngCore>(game: &Game<R>) -> Self {
        Self {
            deck: game.deck().len(),
            discard: game.discard().len(),
            active: game.active(),
            top: game.top(),
            asked: game.asked(),
            direction: game.direction(),
            hands: game
                .players()
                .iter()
                .map(|p| p.hand().cards().to_vec())
                .collect(),
        }
    }

    pub fn card_count(&self) -> usize {
        self.deck + self.discard + self.hands.iter().map(Vec::len).sum::<usize>() + 1
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// `-> deck discard active top asked direction [hand] [hand] ...`
impl fmt::Display for GameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "-> {} {} {} {} {} {}",
            self.deck,
            self.discard,
            self.active,
            self.top,
            suit_ordinal(self.asked),
            self.direction.step()
        )?;
        for hand in &self.hands {
            f.write_str(" [")?;
            for (i, card) in hand.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{card}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}
