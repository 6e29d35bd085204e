//! Trainer configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::EngineOptions;
use crate::error::{Error, Result};

/// Path of an optional JSON config file.
pub const CONFIG_ENV: &str = "TRAINER_CONFIG";
pub const ENGINE_ENV: &str = "TRAINER_ENGINE";
pub const BOOK_ENV: &str = "TRAINER_BOOK";
pub const BIND_ENV: &str = "TRAINER_BIND";
pub const SEED_ENV: &str = "TRAINER_SEED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Engine executable, looked up on PATH when not absolute
    pub engine_path: String,
    pub engine: EngineOptions,
    /// Explicit Polyglot book; the default locations are searched when unset
    pub book_path: Option<PathBuf>,
    pub default_elo: i32,
    pub analysis_time_secs: f64,
    /// Seeds the session RNG for reproducible play
    pub rng_seed: Option<u64>,
    /// How long shutdown waits for an in-flight analysis
    pub shutdown_grace_secs: f64,
    pub bind: String,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            engine_path: "stockfish".to_string(),
            engine: EngineOptions::default(),
            book_path: None,
            default_elo: 1500,
            analysis_time_secs: 1.0,
            rng_seed: None,
            shutdown_grace_secs: 5.0,
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl TrainerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        let config = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Defaults, then `TRAINER_CONFIG` if set, then environment overrides.
    pub fn load() -> Result<Self> {
        let base = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `TRAINER_*` overrides read through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(engine) = lookup(ENGINE_ENV) {
            self.engine_path = engine;
        }
        if let Some(book) = lookup(BOOK_ENV) {
            self.book_path = Some(PathBuf::from(book));
        }
        if let Some(bind) = lookup(BIND_ENV) {
            self.bind = bind;
        }
        if let Some(seed) = lookup(SEED_ENV) {
            let seed = seed
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{SEED_ENV} must be an unsigned integer, got {seed:?}")))?;
            self.rng_seed = Some(seed);
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        for (name, secs) in [
            ("analysis_time_secs", self.analysis_time_secs),
            ("shutdown_grace_secs", self.shutdown_grace_secs),
        ] {
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(Error::Config(format!("{name} must be a non-negative number of seconds")));
            }
        }
        Ok(())
    }

    pub fn analysis_time(&self) -> Duration {
        Duration::try_from_secs_f64(self.analysis_time_secs).unwrap_or_default()
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::try_from_secs_f64(self.shutdown_grace_secs).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TrainerConfig::default();
        assert_eq!(config.engine_path, "stockfish");
        assert_eq!(config.default_elo, 1500);
        assert_eq!(config.analysis_time(), Duration::from_secs(1));
        assert_eq!(config.engine.multi_pv, 5);
        assert!(config.book_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_elo": 1900, "engine": {{"threads": 2}}}}"#).unwrap();

        let config = TrainerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_elo, 1900);
        assert_eq!(config.engine.threads, 2);
        assert_eq!(config.engine.hash_mb, 256);
        assert_eq!(config.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(TrainerConfig::from_file(file.path()), Err(Error::Json(_))));
        assert!(matches!(
            TrainerConfig::from_file("/nonexistent/trainer.json"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENGINE_ENV, "/opt/stockfish"),
            (BOOK_ENV, "books/mine.bin"),
            (SEED_ENV, "42"),
        ]
        .into_iter()
        .collect();

        let config = TrainerConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.engine_path, "/opt/stockfish");
        assert_eq!(config.book_path, Some(PathBuf::from("books/mine.bin")));
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_seed_and_times() {
        let result = TrainerConfig::default().with_overrides(|key| {
            (key == SEED_ENV).then(|| "minus one".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));

        let config = TrainerConfig {
            analysis_time_secs: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.with_overrides(|_| None), Err(Error::Config(_))));
    }
}
