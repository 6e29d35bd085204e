//! Terminal front end for the trainer

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use chess_trainer_core::{
    parse_fen, AnalysisResult, EloRating, StockfishEngine, TrainerConfig, TrainingGame,
    TrainingSession,
};
use shakmaty::{Chess, Position};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let config = match TrainerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            process::exit(1);
        }
    };

    let outcome = match args[1].as_str() {
        "hints" => match args.get(2) {
            Some(fen) => print_hints(fen),
            None => usage_error(&args[0], "hints \"<fen>\""),
        },
        "suggest" => match args.get(2) {
            Some(fen) => runtime.block_on(suggest(config, fen, args.get(3))),
            None => usage_error(&args[0], "suggest \"<fen>\" [elo]"),
        },
        "play" => runtime.block_on(play(config, args.get(2))),
        _ => {
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [arguments]", program);
    println!();
    println!("Commands:");
    println!("  suggest \"<fen>\" [elo]   Suggest a move for a player of the given rating");
    println!("  hints \"<fen>\"           Show training hints for a position");
    println!("  play [elo]              Play against the trainer from the starting position");
    println!();
    println!("Environment:");
    println!("  TRAINER_CONFIG, TRAINER_ENGINE, TRAINER_BOOK, TRAINER_SEED");
}

fn usage_error(program: &str, usage: &str) -> chess_trainer_core::Result<()> {
    println!("Usage: {} {}", program, usage);
    process::exit(1);
}

fn parse_elo(arg: Option<&String>, config: &TrainerConfig) -> chess_trainer_core::Result<EloRating> {
    match arg {
        Some(raw) => {
            let value: i32 = raw
                .parse()
                .map_err(|_| chess_trainer_core::Error::Config(format!("invalid ELO: {raw}")))?;
            EloRating::new(value)
        }
        None => Ok(EloRating::clamped(config.default_elo)),
    }
}

fn print_hints(fen: &str) -> chess_trainer_core::Result<()> {
    let position = parse_fen(fen)?;
    for hint in chess_trainer_core::evaluator::hints_for(&position) {
        println!("  - {}", hint);
    }
    Ok(())
}

fn print_result(result: &AnalysisResult) {
    if let Some(mv) = &result.suggested_move {
        println!("Suggested move: {}", mv);
    }
    if let Some(best) = &result.best_move {
        println!("Best move:      {}", best);
    }
    println!("Evaluation:     {}", result.eval_text);
    for classified in &result.moves {
        println!(
            "  {} accuracy {:>5.1}%  {}",
            classified.line.summary(),
            classified.accuracy,
            classified.quality.as_str()
        );
    }
    if let Some(message) = &result.message {
        println!("{}", message);
    }
    if let Some(error) = &result.error {
        println!("Warning: {}", error);
    }
}

async fn suggest(config: TrainerConfig, fen: &str, elo: Option<&String>) -> chess_trainer_core::Result<()> {
    let position = parse_fen(fen)?;
    let elo = parse_elo(elo, &config)?;
    let time = config.analysis_time();

    let session = TrainingSession::<StockfishEngine>::start(config)?;
    let result = session.analyze(&position, elo, time).await;
    print_result(&result);

    println!();
    println!("Hints:");
    for hint in session.hints(&position) {
        println!("  - {}", hint);
    }

    session.shutdown().await;
    Ok(())
}

async fn play(config: TrainerConfig, elo: Option<&String>) -> chess_trainer_core::Result<()> {
    let elo = parse_elo(elo, &config)?;
    let time = config.analysis_time();
    let session = TrainingSession::<StockfishEngine>::start(config)?;
    let mut game = TrainingGame::new();

    println!("You play white against a {} rated trainer.", elo);
    println!("Enter moves in UCI (e2e4), 'hint', 'reset' or 'quit'.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !game.is_game_over() {
        print!("{}> ", game.history().len() / 2 + 1);
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let input = line?;
        match input.trim() {
            "" => continue,
            "quit" => break,
            "reset" => {
                game.reset();
                println!("New game.");
                continue;
            }
            "hint" => {
                for hint in session.hints(game.position()) {
                    println!("  - {}", hint);
                }
                continue;
            }
            uci => {
                if let Err(e) = game.make_move(uci) {
                    println!("{}", e);
                    continue;
                }
            }
        }

        if game.is_game_over() {
            break;
        }

        let position: Chess = game.position().clone();
        let result = session.analyze(&position, elo, time).await;
        match &result.suggested_move {
            Some(reply) => {
                game.make_move(reply)?;
                println!("Trainer plays {} ({})", reply, result.eval_text);
            }
            None => {
                print_result(&result);
                break;
            }
        }
        if game.position().is_check() {
            println!("Check!");
        }
    }

    println!("{}", game.result_text());
    session.shutdown().await;
    Ok(())
}
