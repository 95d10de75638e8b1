use crate::model::deck::CARDS_PER_SHOE;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STARTING_CARDS: usize = 5;
pub const DEFAULT_SHOES: usize = 1;
pub const MAX_SHOES: usize = 64;

/// Everything a single game needs besides its strategies and random source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_cards: usize,
    pub shoes: usize,
    pub starting_player: StartingPlayer,
    pub rules: RuleSet,
    /// Aborts a game that has not finished after this many turns.
    pub turn_limit: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_cards: DEFAULT_STARTING_CARDS,
            shoes: DEFAULT_SHOES,
            starting_player: StartingPlayer::Random,
            rules: RuleSet::default(),
            turn_limit: None,
        }
    }
}

impl GameConfig {
    pub fn total_cards(&self) -> usize {
        CARDS_PER_SHOE * self.shoes
    }

    /// Checks that a table of `player_count` players can be dealt.
    pub fn validate(&self, player_count: usize) -> Result<(), String> {
        if player_count < 2 {
            return Err(format!("at least 2 players required, got {player_count}"));
        }
        if self.shoes == 0 {
            return Err("at least one shoe is required".to_string());
        }
        if self.shoes > MAX_SHOES {
            return Err(format!(
                "at most {MAX_SHOES} shoes are supported, got {}",
                self.shoes
            ));
        }
        let fits = self
            .starting_cards
            .checked_mul(player_count)
            .and_then(|cards| cards.checked_add(1))
            .is_some_and(|cards| cards <= self.total_cards());
        if !fits {
            return Err(format!(
                "dealing {} cards to {player_count} players plus a top card needs more than the {} shoe(s) hold ({} cards)",
                self.starting_cards,
                self.shoes,
                self.total_cards()
            ));
        }
        if self.turn_limit == Some(0) {
            return Err("turn limit must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartingPlayer {
    /// Player 0 always moves first.
    Fixed,
    /// Uniformly random among all players.
    #[default]
    Random,
}

/// Effects whose interpretation differs between table traditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub ace: AceRule,
    pub two_player_queen: QueenRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AceRule {
    /// The next player in turn order loses their turn.
    #[default]
    SkipNext,
    /// Aces play like any other card.
    NoEffect,
}

/// How a queen behaves when only two players are seated. With three or more
/// players a queen always reverses direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueenRule {
    /// The opponent is skipped and the queen's player moves again.
    #[default]
    Skip,
    /// Direction is reversed, which leaves turn order unchanged.
    Reverse,
}

impl FromStr for StartingPlayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "fixed" | "first" => Ok(StartingPlayer::Fixed),
            "random" => Ok(StartingPlayer::Random),
            other => Err(format!("unknown starting player '{other}' (expected fixed or random)")),
        }
    }
}

impl FromStr for AceRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "skip_next" | "skip" => Ok(AceRule::SkipNext),
            "no_effect" | "none" => Ok(AceRule::NoEffect),
            other => Err(format!("unknown ace rule '{other}' (expected skip_next or no_effect)")),
        }
    }
}

impl FromStr for QueenRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "skip" => Ok(QueenRule::Skip),
            "reverse" => Ok(QueenRule::Reverse),
            other => Err(format!("unknown queen rule '{other}' (expected skip or reverse)")),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('-', "_")
}
