use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::suit::Suit;
use crate::rules::{IllegalMove, Play};
use crate::strategy::{Strategy, TableView};
use core::fmt;
use rand::RngCore;
use std::sync::Arc;

/// A hand bound to a shared strategy.
#[derive(Clone)]
pub struct Player {
    hand: Hand,
    strategy: Arc<dyn Strategy>,
}

impl Player {
    pub fn new(strategy: Arc<dyn Strategy>) -> Self {
        Self::with_hand(Hand::new(), strategy)
    }

    pub fn with_hand(hand: Hand, strategy: Arc<dyn Strategy>) -> Self {
        Self { hand, strategy }
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    pub fn receive(&mut self, card: Card) {
        self.hand.add(card);
    }

    pub fn is_out(&self) -> bool {
        self.hand.is_empty()
    }

    /// Asks the strategy for a move and takes the chosen card out of the hand.
    /// Suit declarations on non-wild cards are dropped here.
    pub fn play(
        &mut self,
        top: Card,
        asked: Option<Suit>,
        deck: &Deck,
        rng: &mut dyn RngCore,
    ) -> Result<Option<Play>, IllegalMove> {
        let view = TableView {
            hand: self.hand.cards(),
            top,
            asked,
            deck,
        };
        let Some(choice) = self.strategy.choose(&view, rng) else {
            return Ok(None);
        };
        let hand_len = self.hand.len();
        let card = self
            .hand
            .remove_at(choice.index)
            .ok_or(IllegalMove::IndexOutOfRange {
                index: choice.index,
                hand_len,
            })?;
        let declared = if card.is_wild() { choice.declared } else { None };
        Ok(Some(Play::new(card, declared)))
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("hand", &self.hand)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
