use super::config::{AceRule, GameConfig, QueenRule, StartingPlayer};
use super::error::GameError;
use super::snapshot::GameSnapshot;
use crate::model::card::Card;
use crate::model::deck::{Deck, DeckError};
use crate::model::hand::Hand;
use crate::model::player::Player;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::rules::{self, Play};
use crate::strategy::Strategy;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub const fn step(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    pub const fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// What happened during one call to [`Game::play_turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The player had no move and drew a card.
    Drew { player: usize },
    Played { player: usize, play: Play },
    /// The player emptied their hand with this play.
    Won { player: usize, play: Play },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: usize,
    pub turns: u64,
}

/// Explicit table state for setting up a game mid-play.
pub struct TableLayout {
    pub players: Vec<Player>,
    pub deck: Deck,
    pub discard: Vec<Card>,
    pub top: Card,
    pub asked: Option<Suit>,
    pub active: usize,
    pub direction: Direction,
}

/// One game of Mau-Mau from the deal to the first empty hand.
#[derive(Debug)]
pub struct Game<R> {
    config: GameConfig,
    players: Vec<Player>,
    active: usize,
    direction: Direction,
    deck: Deck,
    discard: Vec<Card>,
    top: Card,
    asked: Option<Suit>,
    turns: u64,
    rng: R,
}

impl<R: RngCore> Game<R> {
    /// Shuffles a fresh shoe, deals `starting_cards` to each player in turn,
    /// flips the top card and picks who moves first.
    pub fn new(
        config: GameConfig,
        strategies: Vec<Arc<dyn Strategy>>,
        mut rng: R,
    ) -> Result<Self, GameError> {
        config
            .validate(strategies.len())
            .map_err(|message| GameError::InvalidConfig { message })?;

        let mut deck = Deck::shuffled(config.shoes, &mut rng);
        let mut players: Vec<Player> = strategies.into_iter().map(Player::new).collect();
        for _ in 0..config.starting_cards {
            for player in players.iter_mut() {
                player.receive(deck.draw().ok_or(DeckError::EmptyDiscard)?);
            }
        }
        let top = deck.draw().ok_or(DeckError::EmptyDiscard)?;

        let active = match config.starting_player {
            StartingPlayer::Fixed => 0,
            StartingPlayer::Random => rng.gen_range(0..players.len()),
        };

        Ok(Self {
            config,
            players,
            active,
            direction: Direction::Forward,
            deck,
            discard: Vec::new(),
            top,
            asked: None,
            turns: 0,
            rng,
        })
    }

    pub fn from_layout(config: GameConfig, layout: TableLayout, rng: R) -> Result<Self, GameError> {
        if layout.players.len() < 2 {
            return Err(GameError::InvalidConfig {
                message: format!("at least 2 players required, got {}", layout.players.len()),
            });
        }
        if layout.active >= layout.players.len() {
            return Err(GameError::InvalidConfig {
                message: format!("active player {} is not seated", layout.active),
            });
        }
        Ok(Self {
            config,
            players: layout.players,
            active: layout.active,
            direction: layout.direction,
            deck: layout.deck,
            discard: layout.discard,
            top: layout.top,
            asked: layout.asked,
            turns: 0,
            rng,
        })
    }

    /// Plays turns until somebody runs out of cards.
    pub fn run(&mut self) -> Result<GameOutcome, GameError> {
        loop {
            if let TurnOutcome::Won { player, .. } = self.play_turn()? {
                return Ok(GameOutcome {
                    winner: player,
                    turns: self.turns,
                });
            }
        }
    }

    pub fn play_turn(&mut self) -> Result<TurnOutcome, GameError> {
        if let Some(limit) = self.config.turn_limit
            && self.turns >= limit
        {
            return Err(GameError::TurnLimit { limit });
        }
        self.turns += 1;

        let player = self.active;
        let choice = self.players[player]
            .play(self.top, self.asked, &self.deck, &mut self.rng)
            .map_err(|violation| self.illegal(player, violation))?;

        let Some(play) = choice else {
            self.deal_to(player, 1)?;
            self.advance();
            return Ok(TurnOutcome::Drew { player });
        };

        rules::validate_play(play, self.top, self.asked)
            .map_err(|violation| self.illegal(player, violation))?;
        let previous = std::mem::replace(&mut self.top, play.card);
        self.discard.push(previous);
        self.asked = play.declared;

        if self.players[player].is_out() {
            return Ok(TurnOutcome::Won { player, play });
        }

        match play.card.rank {
            Rank::Ace if self.config.rules.ace == AceRule::SkipNext => self.advance(),
            Rank::Seven => {
                self.advance();
                self.deal_to(self.active, 2)?;
            }
            Rank::Queen => {
                if self.players.len() == 2 && self.config.rules.two_player_queen == QueenRule::Skip
                {
                    self.advance();
                } else {
                    self.direction = self.direction.reversed();
                }
            }
            _ => {}
        }
        self.advance();

        Ok(TurnOutcome::Played { player, play })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn hand(&self, player: usize) -> Option<&Hand> {
        self.players.get(player).map(Player::hand)
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    pub fn top(&self) -> Card {
        self.top
    }

    pub fn asked(&self) -> Option<Suit> {
        self.asked
    }

    pub fn turns(&self) -> u64 {
        self.turns
    }

    /// Cards on the table: deck, discard pile, every hand and the top card.
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.discard.len()
            + self.players.iter().map(|p| p.hand().len()).sum::<usize>()
            + 1
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }

    /// Moves the turn one seat along the current direction.
    fn advance(&mut self) {
        let seats = self.players.len();
        self.active = match self.direction {
            Direction::Forward => (self.active + 1) % seats,
            Direction::Backward => (self.active + seats - 1) % seats,
        };
    }

    fn draw_card(&mut self) -> Result<Card, GameError> {
        if let Some(card) = self.deck.draw() {
            return Ok(card);
        }
        self.deck.recycle(&mut self.discard, &mut self.rng)?;
        Ok(self.deck.draw().ok_or(DeckError::EmptyDiscard)?)
    }

    fn deal_to(&mut self, player: usize, count: usize) -> Result<(), GameError> {
        for _ in 0..count {
            let card = self.draw_card()?;
            self.players[player].receive(card);
        }
        Ok(())
    }

    fn illegal(&self, player: usize, violation: rules::IllegalMove) -> GameError {
        GameError::IllegalMove {
            player,
            strategy: self.players[player].strategy_name().to_string(),
            violation,
        }
    }
}
