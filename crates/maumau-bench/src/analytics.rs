use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;
use thiserror::Error;

use crate::config::SimulationConfig;
use crate::simulation::WinTally;

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("no batches were played")]
    NoBatches,
    #[error("batch {batch} reports {found} seats but the table has {expected}")]
    SeatMismatch {
        batch: usize,
        found: usize,
        expected: usize,
    },
    #[error("focus player {focus} is not seated at a {seats}-player table")]
    FocusOutOfRange { focus: usize, seats: usize },
    #[error("failed to build normal distribution: {0}")]
    Distribution(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render plot: {0}")]
    Plot(String),
}

/// Aggregated results of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStatistics {
    pub run_id: String,
    pub players: Vec<PlayerReport>,
    pub focus_player: usize,
    pub batches: usize,
    pub games: u64,
    pub avg_turns: f64,
    pub focus: BatchMetric,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub name: String,
    pub strategy: String,
    pub wins: u64,
    pub win_share: f64,
}

/// Distribution of the focus player's wins per batch.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BatchMetric {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub ci95: (f64, f64),
}

impl RunStatistics {
    pub fn from_batches(
        config: &SimulationConfig,
        batches: &[WinTally],
    ) -> Result<Self, AnalyticsError> {
        if batches.is_empty() {
            return Err(AnalyticsError::NoBatches);
        }

        let seats = config.players.len();
        let focus_player = config.report.focus_player;
        if focus_player >= seats {
            return Err(AnalyticsError::FocusOutOfRange {
                focus: focus_player,
                seats,
            });
        }
        let mut totals = WinTally::new(seats);
        let mut samples = Vec::with_capacity(batches.len());
        for (batch, tally) in batches.iter().enumerate() {
            if tally.wins.len() != seats {
                return Err(AnalyticsError::SeatMismatch {
                    batch,
                    found: tally.wins.len(),
                    expected: seats,
                });
            }
            samples.push(tally.wins[focus_player] as f64);
            totals = totals.merge(tally.clone());
        }

        let players = config
            .player_labels()
            .into_iter()
            .zip(&config.players)
            .zip(&totals.wins)
            .map(|((name, player), &wins)| PlayerReport {
                name,
                strategy: player.strategy.to_string(),
                wins,
                win_share: share(wins, totals.games),
            })
            .collect();

        let avg_turns = if totals.games == 0 {
            0.0
        } else {
            totals.turns as f64 / totals.games as f64
        };

        Ok(Self {
            run_id: config.run_id.clone(),
            players,
            focus_player,
            batches: batches.len(),
            games: totals.games,
            avg_turns,
            focus: BatchMetric::from_samples(&samples)?,
        })
    }

    /// `mean+-std` of the focus player's wins per batch.
    pub fn mean_std_line(&self) -> String {
        format!("{}+-{}", self.focus.mean, self.focus.std_dev)
    }

    pub fn win_count_lines(&self) -> Vec<String> {
        self.players
            .iter()
            .enumerate()
            .map(|(seat, player)| {
                format!(
                    "{seat} {} {} {:.4}",
                    player.strategy, player.wins, player.win_share
                )
            })
            .collect()
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let mut rows = String::new();
        rows.push_str(&format!("# Simulation Summary: {}\n\n", self.run_id));
        rows.push_str(&format!(
            "{} games in {} batches, {:.1} turns per game on average\n\n",
            self.games, self.batches, self.avg_turns
        ));
        rows.push_str(&format!(
            "Focus player {}: {:.3} ± {:.3} wins per batch (variance {:.3}, 95% CI [{:.3}, {:.3}])\n\n",
            self.focus_player,
            self.focus.mean,
            self.focus.std_dev,
            self.focus.variance,
            self.focus.ci95.0,
            self.focus.ci95.1,
        ));
        rows.push_str("| Seat | Player | Strategy | Wins | Win % |\n");
        rows.push_str("|------|--------|----------|------|-------|\n");

        for (seat, player) in self.players.iter().enumerate() {
            rows.push_str(&format!(
                "| {seat} | {name} | {strategy} | {wins} | {share:.1}% |\n",
                name = player.name,
                strategy = player.strategy,
                wins = player.wins,
                share = player.win_share * 100.0,
            ));
        }

        if let Some(dir) = path.as_ref().parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| AnalyticsError::Io {
                context: "creating summary directory",
                source: e,
            })?;
        }
        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }

    pub fn render_plot(&self, dir: impl AsRef<Path>) -> Result<PathBuf, AnalyticsError> {
        let dir = dir.as_ref();
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| AnalyticsError::Io {
                context: "creating plots directory",
                source: e,
            })?;
        }

        let output_path = dir.join("win_share.png");
        let players = self.players.clone();
        let focus_player = self.focus_player;

        let prev_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));

        let plot_attempt = std::panic::catch_unwind(move || {
            let root = BitMapBackend::new(&output_path, (800, 480)).into_drawing_area();
            root.fill(&WHITE)
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            let y_max = players
                .iter()
                .map(|p| p.win_share)
                .fold(0.0f64, f64::max)
                .max(0.1)
                * 1.1;

            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .caption("Win share per seat", ("sans-serif", 22))
                .set_label_area_size(LabelAreaPosition::Left, 50)
                .set_label_area_size(LabelAreaPosition::Bottom, 60)
                .build_cartesian_2d(0..players.len(), 0.0..y_max)
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            chart
                .configure_mesh()
                .disable_mesh()
                .y_desc("Share of games won")
                .x_desc("Seat")
                .x_label_formatter(&|idx| {
                    players
                        .get(*idx)
                        .map(|player| player.name.clone())
                        .unwrap_or_default()
                })
                .draw()
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            chart
                .draw_series(players.iter().enumerate().map(|(idx, player)| {
                    let color = if idx == focus_player { &BLUE } else { &RED };
                    Rectangle::new([(idx, 0.0), (idx + 1, player.win_share)], color.filled())
                }))
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            drop(chart);

            root.present()
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            drop(root);

            Ok(output_path)
        });

        std::panic::set_hook(prev_hook);

        match plot_attempt {
            Ok(result) => result,
            Err(_) => Err(AnalyticsError::Plot(
                "plotters panicked while rendering (missing font support?)".into(),
            )),
        }
    }
}

impl BatchMetric {
    fn from_samples(samples: &[f64]) -> Result<Self, AnalyticsError> {
        let mean = samples.mean();
        let variance = samples.population_variance();
        let std_dev = variance.sqrt();
        Ok(Self {
            mean,
            variance,
            std_dev,
            ci95: confidence_interval(samples, mean)?,
        })
    }
}

fn share(wins: u64, games: u64) -> f64 {
    if games == 0 {
        0.0
    } else {
        wins as f64 / games as f64
    }
}

fn confidence_interval(samples: &[f64], mean: f64) -> Result<(f64, f64), AnalyticsError> {
    if samples.len() < 2 {
        return Ok((mean, mean));
    }
    let normal =
        Normal::new(0.0, 1.0).map_err(|e| AnalyticsError::Distribution(e.to_string()))?;
    let z = normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0);
    let std_error = samples.std_dev() / (samples.len() as f64).sqrt();
    let margin = z * std_error;
    Ok((mean - margin, mean + margin))
}
