use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};

use maumau_bench::config::{PlayerConfig, ReportMode, SimulationConfig};
use maumau_bench::logging::init_logging;
use maumau_bench::simulation::SimulationRunner;
use maumau_bot::StrategyKind;
use maumau_core::game::{AceRule, QueenRule, StartingPlayer};

/// Monte-Carlo harness for Mau-Mau strategies.
#[derive(Debug, Parser)]
#[command(
    name = "maumau-bench",
    author,
    version,
    about = "Plays batches of Mau-Mau games between bots and reports win statistics"
)]
struct Cli {
    /// Optional YAML configuration file; flags override its values.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Cards dealt to each player.
    #[arg(long, value_name = "N")]
    starting_cards: Option<usize>,

    /// Games per batch.
    #[arg(long, value_name = "N")]
    num_games: Option<usize>,

    /// Number of batches.
    #[arg(long, value_name = "N")]
    num_tests: Option<usize>,

    /// Comma-separated strategies, one per seat (e.g. randomAI,onlyFirstAI).
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    ais: Option<Vec<StrategyKind>>,

    /// Pick the first player uniformly at random instead of seat 0.
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    random_start: Option<bool>,

    /// Number of 52-card decks shuffled together.
    #[arg(long, value_name = "N")]
    decks: Option<usize>,

    /// Log a table snapshot before every turn (forces a single thread).
    #[arg(long)]
    debug: bool,

    /// Ace effect: skip_next or no_effect.
    #[arg(long, value_name = "RULE")]
    ace_rule: Option<AceRule>,

    /// Two-player queen effect: skip or reverse.
    #[arg(long, value_name = "RULE")]
    queen_rule: Option<QueenRule>,

    /// Abort a game that runs longer than this many turns.
    #[arg(long, value_name = "TURNS")]
    turn_limit: Option<u64>,

    /// Seat whose wins per batch are summarised.
    #[arg(long, value_name = "SEAT")]
    focus_player: Option<usize>,

    /// Output format for stdout.
    #[arg(long, value_enum, value_name = "MODE")]
    report: Option<ReportMode>,

    /// Worker threads for parallel games.
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

impl Cli {
    fn apply_overrides(self, config: &mut SimulationConfig) {
        if let Some(run_id) = self.run_id {
            config.run_id = run_id;
        }
        if let Some(cards) = self.starting_cards {
            config.game.starting_cards = cards;
        }
        if let Some(games) = self.num_games {
            config.trials.games_per_batch = games;
        }
        if let Some(batches) = self.num_tests {
            config.trials.batches = batches;
        }
        if let Some(ais) = self.ais {
            config.players = ais.into_iter().map(PlayerConfig::new).collect();
        }
        if let Some(random) = self.random_start {
            config.game.starting_player = if random {
                StartingPlayer::Random
            } else {
                StartingPlayer::Fixed
            };
        }
        if let Some(decks) = self.decks {
            config.game.shoes = decks;
        }
        if self.debug {
            config.logging.trace_turns = true;
        }
        if let Some(rule) = self.ace_rule {
            config.game.rules.ace = rule;
        }
        if let Some(rule) = self.queen_rule {
            config.game.rules.two_player_queen = rule;
        }
        if let Some(limit) = self.turn_limit {
            config.game.turn_limit = Some(limit);
        }
        if let Some(focus) = self.focus_player {
            config.report.focus_player = focus;
        }
        if let Some(mode) = self.report {
            config.report.mode = mode;
        }
        if let Some(threads) = self.threads {
            config.trials.threads = Some(threads);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let validate_only = cli.validate_only;
    cli.apply_overrides(&mut config);
    config.validate().context("invalid configuration")?;

    let outputs = config.resolved_outputs();
    let _logging_guard = init_logging(&config.logging, &outputs)?;

    if validate_only {
        eprintln!(
            "Configuration '{}' is valid: {} players, {} games in {} batches",
            config.run_id,
            config.players.len(),
            config.trials.total_games(),
            config.trials.batches
        );
        return Ok(());
    }

    let mode = config.report.mode;
    let runner = SimulationRunner::new(config, outputs)?;
    let summary = runner.run()?;
    let stats = &summary.statistics;

    match mode {
        ReportMode::MeanStd => println!("{}", stats.mean_std_line()),
        ReportMode::WinCounts => {
            for line in stats.win_count_lines() {
                println!("{line}");
            }
        }
    }

    if let Some(path) = summary.summary_path.as_ref() {
        eprintln!("Summary table: {}", path.display());
    }
    if let Some(path) = summary.jsonl_path.as_ref() {
        eprintln!("Batch rows: {}", path.display());
    }
    if let Some(path) = summary.plot_path.as_ref() {
        eprintln!("Win share plot: {}", path.display());
    }

    Ok(())
}
