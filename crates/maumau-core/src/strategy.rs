use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::suit::Suit;
use rand::RngCore;

/// What a strategy may look at when asked for a move.
pub struct TableView<'a> {
    pub hand: &'a [Card],
    pub top: Card,
    pub asked: Option<Suit>,
    /// Remaining draw pile, for strategies that count cards.
    pub deck: &'a Deck,
}

/// A hand position to play and, for wild cards, the suit to demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub index: usize,
    pub declared: Option<Suit>,
}

impl Choice {
    pub const fn play(index: usize) -> Self {
        Self {
            index,
            declared: None,
        }
    }

    pub const fn wild(index: usize, declared: Suit) -> Self {
        Self {
            index,
            declared: Some(declared),
        }
    }
}

/// Stateless decision policy shared by any number of players.
///
/// Returning `None` means "no playable card"; the engine then forces a draw.
/// A returned choice must name a card that is legal under
/// [`rules::is_valid`](crate::rules::is_valid), and must declare a suit
/// exactly when that card is wild. Breaking either rule aborts the game.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    fn choose(&self, view: &TableView<'_>, rng: &mut dyn RngCore) -> Option<Choice>;
}
