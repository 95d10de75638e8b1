use clap::ValueEnum;
use maumau_bot::StrategyKind;
use maumau_core::game::GameConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_GAMES_PER_BATCH: usize = 100;
const DEFAULT_BATCHES: usize = 100;
const MAX_GAMES_PER_BATCH: usize = 10_000_000;
const MAX_BATCHES: usize = 1_000_000;
const MAX_TOTAL_GAMES: u64 = 1_000_000_000_000;
const MAX_THREADS: usize = 1024;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root simulation configuration, loaded from YAML or built from defaults.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimulationConfig {
    #[serde(default = "default_run_id")]
    pub run_id: String,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default = "default_players")]
    pub players: Vec<PlayerConfig>,
    #[serde(default)]
    pub trials: TrialConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            run_id: default_run_id(),
            game: GameConfig::default(),
            players: default_players(),
            trials: TrialConfig::default(),
            report: ReportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut cfg = Self::load(path)?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(cfg)
    }

    /// Parse a YAML file without validating it, so overrides can still be
    /// applied before [`SimulationConfig::validate`] runs.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path.to_path_buf(),
        })?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        validate_players(&self.players)?;
        self.game
            .validate(self.players.len())
            .map_err(|message| invalid("game", message))?;
        self.trials.validate()?;
        self.report.validate(self.players.len())?;
        self.logging.normalize();
        if self.logging.level().is_none() {
            return Err(invalid(
                "logging.tracing_level",
                format!("unknown level '{}'", self.logging.tracing_level),
            ));
        }
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        let resolve = |template: &Option<String>| {
            template
                .as_deref()
                .map(|value| resolve_template(&self.run_id, value))
        };
        ResolvedOutputs {
            summary_md: resolve(&self.report.summary_md),
            jsonl: resolve(&self.report.jsonl),
            plots_dir: resolve(&self.report.plots_dir),
            log_file: resolve(&self.logging.file),
        }
    }

    /// Labels used in reports, one per seat.
    pub fn player_labels(&self) -> Vec<String> {
        self.players
            .iter()
            .enumerate()
            .map(|(index, player)| player.label(index))
            .collect()
    }

    /// Turn tracing interleaves badly across workers, so it forces one thread.
    pub fn effective_threads(&self) -> usize {
        if self.logging.trace_turns {
            return 1;
        }
        self.trials.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

fn default_run_id() -> String {
    "maumau".to_string()
}

fn default_players() -> Vec<PlayerConfig> {
    vec![
        PlayerConfig::new(StrategyKind::Random),
        PlayerConfig::new(StrategyKind::Random),
    ]
}

/// One seat at the table. Seat 0 is the first entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayerConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub strategy: StrategyKind,
}

impl PlayerConfig {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            name: None,
            strategy,
        }
    }

    pub fn label(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("p{index}_{}", self.strategy))
    }
}

/// How many games are played: `batches` samples of `games_per_batch` games.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrialConfig {
    pub games_per_batch: usize,
    pub batches: usize,
    pub threads: Option<usize>,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            games_per_batch: DEFAULT_GAMES_PER_BATCH,
            batches: DEFAULT_BATCHES,
            threads: None,
        }
    }
}

impl TrialConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.games_per_batch == 0 {
            return Err(invalid(
                "trials.games_per_batch",
                "number of games must be greater than zero",
            ));
        }
        if self.batches == 0 {
            return Err(invalid("trials.batches", "batches must be at least 1"));
        }
        if self.games_per_batch > MAX_GAMES_PER_BATCH {
            return Err(invalid(
                "trials.games_per_batch",
                format!("at most {MAX_GAMES_PER_BATCH} games per batch are supported"),
            ));
        }
        if self.batches > MAX_BATCHES {
            return Err(invalid(
                "trials.batches",
                format!("at most {MAX_BATCHES} batches are supported"),
            ));
        }
        let total = (self.games_per_batch as u64).checked_mul(self.batches as u64);
        if !total.is_some_and(|games| games <= MAX_TOTAL_GAMES) {
            return Err(invalid(
                "trials",
                format!("at most {MAX_TOTAL_GAMES} games per run are supported"),
            ));
        }
        match self.threads {
            Some(0) => return Err(invalid("trials.threads", "threads must be at least 1")),
            Some(threads) if threads > MAX_THREADS => {
                return Err(invalid(
                    "trials.threads",
                    format!("at most {MAX_THREADS} threads are supported"),
                ));
            }
            _ => {}
        }
        Ok(())
    }

    /// Saturates for configurations that have not been validated.
    pub fn total_games(&self) -> u64 {
        (self.games_per_batch as u64).saturating_mul(self.batches as u64)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// `mean+-std` of the focus player's wins per batch.
    #[default]
    #[value(alias = "mean_std")]
    MeanStd,
    /// One line per player with total wins.
    #[value(alias = "win_counts")]
    WinCounts,
}

/// Output configuration. Every artifact path is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub mode: ReportMode,
    pub focus_player: usize,
    pub summary_md: Option<String>,
    pub jsonl: Option<String>,
    pub plots_dir: Option<String>,
}

impl ReportConfig {
    fn validate(&self, player_count: usize) -> Result<(), ValidationError> {
        if self.focus_player >= player_count {
            return Err(invalid(
                "report.focus_player",
                format!(
                    "focus player {} is not seated at a {player_count}-player table",
                    self.focus_player
                ),
            ));
        }
        for (label, value) in [
            ("report.summary_md", &self.summary_md),
            ("report.jsonl", &self.jsonl),
            ("report.plots_dir", &self.plots_dir),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(invalid(label, "path must not be empty"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub file: Option<String>,
    /// Emit a snapshot of the table before every turn.
    #[serde(default)]
    pub trace_turns: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            format: LogFormat::default(),
            file: None,
            trace_turns: false,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.enable_structured || self.trace_turns
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(invalid("run_id", "run_id must not be empty"));
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(invalid(
            "run_id",
            "run_id may only contain alphanumeric characters, '.', '_' or '-'",
        ));
    }

    Ok(())
}

fn validate_players(players: &[PlayerConfig]) -> Result<(), ValidationError> {
    if players.len() < 2 {
        return Err(invalid("players", "at least two players must be seated"));
    }

    let mut seen = HashSet::new();
    for (index, player) in players.iter().enumerate() {
        let Some(name) = player.name.as_deref() else {
            continue;
        };
        if name.trim().is_empty() {
            return Err(invalid(
                format!("players[{index}].name"),
                "player name must not be empty",
            ));
        }
        if !seen.insert(name) {
            return Err(invalid(
                "players",
                format!("player name '{name}' defined more than once"),
            ));
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.into(),
        message: message.into(),
    }
}

/// Fully resolved output paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub summary_md: Option<PathBuf>,
    pub jsonl: Option<PathBuf>,
    pub plots_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
