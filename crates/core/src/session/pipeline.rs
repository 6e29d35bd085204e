//! The steps of one selection cycle, free of any I/O

use rand::Rng;
use shakmaty::{Chess, Position};
use tracing::{debug, info, warn};

use super::result::{AnalysisResult, MoveSource};
use crate::book::{select_book_move, OpeningBook};
use crate::engine::{format_evaluation, CandidateLine, Evaluation};
use crate::error::{Error, Result};
use crate::evaluator::{evaluate_position, GamePhase};
use crate::game::{move_to_uci, random_legal_move};
use crate::selection::{classify_moves, EloRating, MoveSelector, PersonalityProfile};

/// Most lines ever requested from the engine.
pub const MAX_LINES: usize = 8;

/// Nominal evaluation reported for book moves.
pub const BOOK_EVALUATION: Evaluation = Evaluation::Centipawns(15);

/// Inputs fixed at dispatch time
#[derive(Debug, Clone, Copy)]
pub struct CycleContext {
    pub elo: EloRating,
    pub phase: GamePhase,
    pub personality: PersonalityProfile,
}

/// Lines to request for `position`.
pub fn lines_for(position: &Chess) -> usize {
    position.legal_moves().len().min(MAX_LINES)
}

/// `None` on a book miss.
pub fn book_result<R>(
    position: &Chess,
    book: &OpeningBook,
    ctx: &CycleContext,
    rng: &mut R,
) -> Option<AnalysisResult>
where
    R: Rng + ?Sized,
{
    if ctx.phase != GamePhase::Opening {
        return None;
    }

    let entries = book.lookup(position);
    let entry = select_book_move(&entries, ctx.elo, rng)?;
    info!(uci = %entry.uci, weight = entry.weight, candidates = entries.len(), "book move");

    Some(AnalysisResult {
        suggested_move: Some(entry.uci.clone()),
        best_move: Some(entry.uci.clone()),
        evaluation: Some(BOOK_EVALUATION),
        eval_text: "Book move".to_string(),
        moves: Vec::new(),
        source: Some(MoveSource::Book),
        position_evaluation: Some(evaluate_position(position)),
        diagnostics: None,
        message: Some("Book move".to_string()),
        error: None,
    })
}

/// Classifies and selects from the engine's lines, or falls back to a
/// random legal move when the analysis failed.
pub fn engine_result<R>(
    position: &Chess,
    analysis: Result<Vec<CandidateLine>>,
    ctx: &CycleContext,
    rng: &mut R,
) -> AnalysisResult
where
    R: Rng + ?Sized,
{
    let lines = match analysis {
        Ok(lines) if !lines.is_empty() => lines,
        Ok(_) => return fallback_result(position, &Error::EmptyResult, rng),
        Err(e) => return fallback_result(position, &e, rng),
    };

    let classified = classify_moves(lines);
    let selector = MoveSelector::new(ctx.elo, ctx.phase, ctx.personality);
    let Some(selection) = selector.select(&classified, rng) else {
        return fallback_result(position, &Error::EmptyResult, rng);
    };

    let suggested = selection.chosen.mv().to_string();
    let diagnostics = selection.diagnostics;
    let best = &classified[0];
    let evaluation = Some(best.line.score);
    debug!(
        suggested = %suggested,
        best = %best.mv(),
        candidates = classified.len(),
        "engine move selected"
    );

    AnalysisResult {
        suggested_move: Some(suggested),
        best_move: Some(best.mv().to_string()),
        evaluation,
        eval_text: format_evaluation(evaluation),
        position_evaluation: Some(evaluate_position(position)),
        diagnostics: Some(diagnostics),
        moves: classified,
        source: Some(MoveSource::Engine),
        message: None,
        error: None,
    }
}

/// Uniform random legal move, carrying the error that caused it.
pub fn fallback_result<R>(position: &Chess, error: &Error, rng: &mut R) -> AnalysisResult
where
    R: Rng + ?Sized,
{
    let Some(mv) = random_legal_move(position, rng) else {
        return AnalysisResult::failed(error);
    };
    let uci = move_to_uci(&mv);
    warn!(error = %error, fallback = %uci, "engine analysis unavailable, playing a random legal move");

    AnalysisResult {
        suggested_move: Some(uci),
        position_evaluation: Some(evaluate_position(position)),
        message: Some("Engine analysis failed, playing a random legal move".to_string()),
        ..AnalysisResult::failed(error)
    }
}
