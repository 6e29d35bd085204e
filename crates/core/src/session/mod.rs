//! A training session: one engine, an optional book and the bot's personality
//!
//! The session is the only owner of the engine handle. Every analysis goes
//! through its [`AnalysisScheduler`], so at most one search is in flight.

pub mod pipeline;
mod result;

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use shakmaty::{Chess, Position};
use tracing::{debug, info};

use crate::book::{self, OpeningBook};
use crate::config::TrainerConfig;
use crate::engine::{EngineGateway, StockfishEngine};
use crate::error::{Error, Result};
use crate::evaluator::{detect_game_phase, hints_for};
use crate::scheduler::{AnalysisScheduler, SchedulerState};
use crate::selection::{EloRating, PersonalityProfile, PersonalityUpdate};

pub use pipeline::CycleContext;
pub use result::{AnalysisResult, MoveSource};

pub struct TrainingSession<G> {
    scheduler: AnalysisScheduler<G>,
    book: RwLock<Option<Arc<OpeningBook>>>,
    personality: RwLock<PersonalityProfile>,
    rng: Mutex<StdRng>,
    config: TrainerConfig,
}

impl TrainingSession<StockfishEngine> {
    /// Starts the configured engine and loads the opening book.
    ///
    /// Fails with [`Error::EngineUnavailable`] when the engine cannot be
    /// started; a missing book only disables book moves.
    pub fn start(config: TrainerConfig) -> Result<Self> {
        let engine = StockfishEngine::new(&config.engine_path).map_err(Error::EngineUnavailable)?;
        let book = book::load_default(config.book_path.as_deref());
        Self::with_gateway(engine, book, config)
    }
}

impl<G> TrainingSession<G>
where
    G: EngineGateway + 'static,
{
    /// Builds a session around an already running engine.
    pub fn with_gateway(mut gateway: G, book: Option<OpeningBook>, config: TrainerConfig) -> Result<Self> {
        gateway
            .configure(&config.engine)
            .map_err(Error::EngineUnavailable)?;

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            scheduler: AnalysisScheduler::new(gateway),
            book: RwLock::new(book.map(Arc::new)),
            personality: RwLock::new(PersonalityProfile::default()),
            rng: Mutex::new(rng),
            config,
        })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn has_book(&self) -> bool {
        self.book_handle().is_some()
    }

    /// The configured default rating, saturated into range.
    pub fn default_elo(&self) -> EloRating {
        EloRating::clamped(self.config.default_elo)
    }

    /// One full selection cycle.
    ///
    /// Only a rejected dispatch is returned as an error; engine failures are
    /// captured in the result together with a random legal fallback move.
    pub async fn try_analyze(
        &self,
        position: &Chess,
        elo: EloRating,
        time_limit: Duration,
    ) -> Result<AnalysisResult> {
        if position.is_game_over() {
            return Ok(AnalysisResult::game_over());
        }
        if self.scheduler.is_running() {
            return Err(Error::ConcurrentDispatchRejected);
        }

        let ctx = CycleContext {
            elo,
            phase: detect_game_phase(position),
            personality: self.personality(),
        };
        let mut rng = self.cycle_rng();
        debug!(elo = elo.get(), phase = ctx.phase.as_str(), "analysis requested");

        if let Some(book) = self.book_handle() {
            if let Some(result) = pipeline::book_result(position, &book, &ctx, &mut rng) {
                return Ok(result);
            }
        }

        let lines = pipeline::lines_for(position);
        let search_position = position.clone();
        let handle = self.scheduler.dispatch(move |engine: &mut G| {
            Ok(engine.analyze(&search_position, time_limit, lines)?)
        })?;
        let analysis = handle.wait().await;

        Ok(pipeline::engine_result(position, analysis, &ctx, &mut rng))
    }

    /// Like [`try_analyze`](Self::try_analyze), with a rejection captured in
    /// the result's `error`.
    pub async fn analyze(&self, position: &Chess, elo: EloRating, time_limit: Duration) -> AnalysisResult {
        match self.try_analyze(position, elo, time_limit).await {
            Ok(result) => result,
            Err(e) => AnalysisResult::failed(e),
        }
    }

    pub fn hints(&self, position: &Chess) -> Vec<String> {
        hints_for(position)
    }

    /// Snapshot of the current personality.
    pub fn personality(&self) -> PersonalityProfile {
        *self.personality.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a partial update and returns the new profile.
    pub fn set_personality(&self, update: &PersonalityUpdate) -> PersonalityProfile {
        let mut profile = self.personality.write().unwrap_or_else(PoisonError::into_inner);
        profile.apply(update);
        info!(?profile, "personality updated");
        *profile
    }

    /// Waits for any in-flight analysis, closes the book, then the engine.
    pub async fn shutdown(&self) {
        let drained = self.scheduler.drain(self.config.shutdown_grace()).await;
        self.book.write().unwrap_or_else(PoisonError::into_inner).take();
        self.scheduler.close().await;
        info!(drained, "training session closed");
    }

    fn book_handle(&self) -> Option<Arc<OpeningBook>> {
        self.book.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Independent RNG for one cycle, derived from the session RNG.
    fn cycle_rng(&self) -> StdRng {
        let mut master = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        StdRng::seed_from_u64(master.next_u64())
    }
}
