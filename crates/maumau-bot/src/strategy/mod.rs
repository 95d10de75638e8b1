mod always_draw;
mod greedy_first;
mod random;

pub use always_draw::AlwaysDrawAi;
pub use greedy_first::GreedyFirstAi;
pub use random::RandomAi;

use core::fmt;
use core::str::FromStr;
use maumau_core::model::card::Card;
use maumau_core::strategy::{Choice, Strategy, TableView};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Level, event};

/// The closed set of decision policies a seat can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[serde(alias = "randomAI")]
    Random,
    #[serde(alias = "onlyFirstAI")]
    GreedyFirst,
    #[serde(alias = "onlyBuyAI")]
    AlwaysDraw,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Random,
        StrategyKind::GreedyFirst,
        StrategyKind::AlwaysDraw,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::GreedyFirst => "greedy_first",
            StrategyKind::AlwaysDraw => "always_draw",
        }
    }

    pub fn instantiate(self) -> Arc<dyn Strategy> {
        match self {
            StrategyKind::Random => Arc::new(RandomAi),
            StrategyKind::GreedyFirst => Arc::new(GreedyFirstAi),
            StrategyKind::AlwaysDraw => Arc::new(AlwaysDrawAi),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "random" | "randomai" => Ok(StrategyKind::Random),
            "greedy_first" | "greedy" | "onlyfirstai" => Ok(StrategyKind::GreedyFirst),
            "always_draw" | "draw" | "onlybuyai" => Ok(StrategyKind::AlwaysDraw),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown strategy '{}' (expected random, greedy_first or always_draw)",
            self.0
        )
    }
}

impl std::error::Error for UnknownStrategy {}

fn log_decision(strategy: &str, view: &TableView<'_>, choice: Option<Choice>, reason: &str) {
    if !tracing::enabled!(target: "maumau_bot::decision", Level::TRACE) {
        return;
    }

    let chosen = choice
        .and_then(|c| view.hand.get(c.index))
        .map(Card::to_string)
        .unwrap_or_else(|| "draw".to_string());

    event!(
        target: "maumau_bot::decision",
        Level::TRACE,
        strategy,
        hand_size = view.hand.len(),
        top = %view.top,
        asked = ?view.asked,
        deck_size = view.deck.len(),
        chosen = %chosen,
        reason,
    );
}
