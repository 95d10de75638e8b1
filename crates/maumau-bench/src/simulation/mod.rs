use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use maumau_core::game::{Game, GameError, GameOutcome, TurnOutcome};
use maumau_core::strategy::Strategy;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsError, RunStatistics};
use crate::config::{ResolvedOutputs, SimulationConfig};

/// Plays batches of independent games and aggregates the winners.
pub struct SimulationRunner {
    config: SimulationConfig,
    outputs: ResolvedOutputs,
    strategies: Vec<Arc<dyn Strategy>>,
    pool: Option<ThreadPool>,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub statistics: RunStatistics,
    pub batches: Vec<WinTally>,
    pub elapsed_secs: f64,
    pub jsonl_path: Option<PathBuf>,
    pub summary_path: Option<PathBuf>,
    pub plot_path: Option<PathBuf>,
}

/// Wins per seat over some number of finished games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinTally {
    pub games: u64,
    pub wins: Vec<u64>,
    pub turns: u64,
}

impl WinTally {
    pub fn new(players: usize) -> Self {
        Self {
            games: 0,
            wins: vec![0; players],
            turns: 0,
        }
    }

    pub fn record(&mut self, outcome: &GameOutcome) {
        self.games += 1;
        self.turns += outcome.turns;
        if let Some(wins) = self.wins.get_mut(outcome.winner) {
            *wins += 1;
        }
    }

    pub fn merge(mut self, other: WinTally) -> Self {
        self.games += other.games;
        self.turns += other.turns;
        if self.wins.len() < other.wins.len() {
            self.wins.resize(other.wins.len(), 0);
        }
        for (mine, theirs) in self.wins.iter_mut().zip(other.wins) {
            *mine += theirs;
        }
        self
    }
}

#[derive(Debug, Serialize)]
struct BatchRow<'a> {
    run_id: &'a str,
    batch: usize,
    games: u64,
    wins: &'a [u64],
    focus_wins: u64,
    avg_turns: f64,
}

impl SimulationRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: SimulationConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let strategies: Vec<Arc<dyn Strategy>> = config
            .players
            .iter()
            .map(|player| player.strategy.instantiate())
            .collect();

        config
            .game
            .validate(strategies.len())
            .map_err(|message| RunnerError::Config { message })?;
        config
            .trials
            .validate()
            .map_err(|err| RunnerError::Config {
                message: err.to_string(),
            })?;

        let threads = config.effective_threads();
        let pool = if threads > 1 {
            Some(ThreadPoolBuilder::new().num_threads(threads).build()?)
        } else {
            None
        };

        Ok(Self {
            config,
            outputs,
            strategies,
            pool,
        })
    }

    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map(ThreadPool::current_num_threads)
            .unwrap_or(1)
    }

    /// Execute every batch, then write the configured artifacts.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        let trials = &self.config.trials;
        let start = Instant::now();
        event!(
            target: "maumau_bench::run",
            Level::INFO,
            run_id = %self.config.run_id,
            players = self.strategies.len(),
            batches = trials.batches,
            games_per_batch = trials.games_per_batch,
            threads = self.threads(),
            "simulation started"
        );

        let mut batches = Vec::new();
        for batch in 0..trials.batches {
            let tally = match &self.pool {
                Some(pool) => pool.install(|| self.play_batch_parallel(batch))?,
                None => self.play_batch_sequential(batch)?,
            };
            event!(
                target: "maumau_bench::batch",
                Level::DEBUG,
                batch,
                games = tally.games,
                wins = ?tally.wins,
                turns = tally.turns
            );
            batches.push(tally);
        }

        let elapsed_secs = start.elapsed().as_secs_f64();
        let statistics = RunStatistics::from_batches(&self.config, &batches)?;

        let jsonl_path = match self.outputs.jsonl.as_deref() {
            Some(path) => {
                self.write_batch_rows(path, &batches)?;
                Some(path.to_path_buf())
            }
            None => None,
        };

        let summary_path = match self.outputs.summary_md.as_deref() {
            Some(path) => {
                statistics.write_markdown(path)?;
                Some(path.to_path_buf())
            }
            None => None,
        };

        let plot_path = match self.outputs.plots_dir.as_deref() {
            Some(dir) => match statistics.render_plot(dir) {
                Ok(path) => Some(path),
                Err(err) => {
                    event!(target: "maumau_bench::run", Level::WARN, error = %err, "plot skipped");
                    eprintln!("WARN: {err}");
                    None
                }
            },
            None => None,
        };

        event!(
            target: "maumau_bench::run",
            Level::INFO,
            run_id = %self.config.run_id,
            games = statistics.games,
            focus_mean = statistics.focus.mean,
            focus_std_dev = statistics.focus.std_dev,
            elapsed_secs,
            "simulation finished"
        );

        Ok(RunSummary {
            statistics,
            batches,
            elapsed_secs,
            jsonl_path,
            summary_path,
            plot_path,
        })
    }

    fn play_batch_sequential(&self, batch: usize) -> Result<WinTally, RunnerError> {
        let mut tally = WinTally::new(self.strategies.len());
        for game in 0..self.config.trials.games_per_batch {
            tally.record(&self.play_game(batch, game)?);
        }
        Ok(tally)
    }

    fn play_batch_parallel(&self, batch: usize) -> Result<WinTally, RunnerError> {
        let seats = self.strategies.len();
        (0..self.config.trials.games_per_batch)
            .into_par_iter()
            .map(|game| self.play_game(batch, game))
            .try_fold(
                || WinTally::new(seats),
                |mut tally, outcome| {
                    tally.record(&outcome?);
                    Ok::<_, RunnerError>(tally)
                },
            )
            .try_reduce(|| WinTally::new(seats), |a, b| Ok(a.merge(b)))
    }

    fn play_game(&self, batch: usize, game_index: usize) -> Result<GameOutcome, RunnerError> {
        let trace_turns = self.config.logging.trace_turns;
        let failed = |source: GameError| RunnerError::Game {
            batch,
            game: game_index,
            source,
        };

        let mut game = Game::new(
            self.config.game,
            self.strategies.clone(),
            StdRng::from_entropy(),
        )
        .map_err(failed)?;

        loop {
            if trace_turns {
                event!(
                    target: "maumau_bench::turn",
                    Level::DEBUG,
                    batch,
                    game = game_index,
                    turn = game.turns(),
                    snapshot = %game.snapshot()
                );
            }
            if let TurnOutcome::Won { player, .. } = game.play_turn().map_err(failed)? {
                return Ok(GameOutcome {
                    winner: player,
                    turns: game.turns(),
                });
            }
        }
    }

    fn write_batch_rows(&self, path: &Path, batches: &[WinTally]) -> Result<(), RunnerError> {
        ensure_parent(path.parent())?;
        let mut writer = BufWriter::new(File::create(path)?);
        let focus = self.config.report.focus_player;
        for (batch, tally) in batches.iter().enumerate() {
            let row = BatchRow {
                run_id: &self.config.run_id,
                batch,
                games: tally.games,
                wins: &tally.wins,
                focus_wins: tally.wins.get(focus).copied().unwrap_or(0),
                avg_turns: if tally.games == 0 {
                    0.0
                } else {
                    tally.turns as f64 / tally.games as f64
                },
            };
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize batch row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game {game} of batch {batch} failed: {source}")]
    Game {
        batch: usize,
        game: usize,
        #[source]
        source: GameError,
    },
    #[error("invalid configuration: {message}")]
    Config { message: String },
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
