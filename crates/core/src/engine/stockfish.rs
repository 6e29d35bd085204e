//! Stockfish chess engine interface
//!
//! Spawns Stockfish as a subprocess and communicates via UCI protocol.

use shakmaty::{fen::Fen, Chess, EnPassantMode, Position};
use std::collections::{BTreeMap, HashSet};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::analysis::{CandidateLine, Evaluation};
use super::gateway::{EngineError, EngineGateway, EngineOptions};

/// Maximum number of lines to read before giving up on a UCI response.
pub const MAX_UCI_LINES: usize = 100_000;

/// Wrapper around Stockfish chess engine
pub struct StockfishEngine {
    /// The child process
    process: Child,
    /// Stdin for sending commands
    stdin: ChildStdin,
    /// Stdout reader for receiving responses
    stdout: BufReader<ChildStdout>,
    /// Name reported via `id name`
    name: String,
    /// Option names the engine advertised during the handshake
    supported_options: HashSet<String>,
    /// MultiPV value currently set in the engine
    multi_pv: usize,
    closed: bool,
}

/// A parsed `info` line that carries a score and a principal variation.
#[derive(Debug, Clone, PartialEq)]
struct InfoLine {
    multipv: usize,
    depth: u32,
    score: Evaluation,
    bound: bool,
    nodes: Option<u64>,
    time_ms: Option<u64>,
    pv: Vec<String>,
}

impl StockfishEngine {
    /// Creates a new Stockfish engine instance
    ///
    /// # Arguments
    /// * `path` - Path to stockfish binary (or "stockfish" if in PATH)
    ///
    /// # Example
    /// ```ignore
    /// let mut engine = StockfishEngine::new("stockfish")?;
    /// ```
    pub fn new(path: &str) -> Result<Self, EngineError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => EngineError::NotFound(path.to_string()),
                _ => EngineError::Spawn(e.to_string()),
            })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("Failed to open stdin".into()))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("Failed to open stdout".into()))?;

        let mut engine = StockfishEngine {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            name: String::new(),
            supported_options: HashSet::new(),
            multi_pv: 1,
            closed: false,
        };

        engine.init_uci()?;
        info!(engine = %engine.name, path, "engine started");

        Ok(engine)
    }

    /// Returns the engine's name as reported via UCI protocol.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sends a command to the engine
    fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        writeln!(self.stdin, "{}", cmd)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Reads a line from the engine
    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        let bytes = self.stdout.read_line(&mut line)?;
        if bytes == 0 {
            return Err(EngineError::Protocol("Engine closed unexpectedly".into()));
        }
        Ok(line.trim().to_string())
    }

    /// Reads lines until we get the expected response
    fn read_until(&mut self, expected: &str) -> Result<Vec<String>, EngineError> {
        let mut lines = Vec::new();
        for _ in 0..MAX_UCI_LINES {
            let line = self.read_line()?;
            let done = line.starts_with(expected);
            lines.push(line);
            if done {
                return Ok(lines);
            }
        }
        Err(EngineError::Protocol(format!("No '{}' received", expected)))
    }

    /// Initialize UCI protocol
    fn init_uci(&mut self) -> Result<(), EngineError> {
        self.send("uci")?;
        for line in self.read_until("uciok")? {
            if let Some(name) = line.strip_prefix("id name ") {
                self.name = name.to_string();
            } else if let Some(option) = parse_option_name(&line) {
                self.supported_options.insert(option);
            }
        }
        if self.name.is_empty() {
            self.name = "Unknown Engine".to_string();
        }

        self.wait_ready()
    }

    fn wait_ready(&mut self) -> Result<(), EngineError> {
        self.send("isready")?;
        self.read_until("readyok")?;
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        if !self.supported_options.contains(name) {
            debug!(option = name, "engine does not support option, skipping");
            return Ok(());
        }
        self.send(&format!("setoption name {} value {}", name, value))
    }

    fn set_multi_pv(&mut self, lines: usize) -> Result<(), EngineError> {
        if lines != self.multi_pv {
            self.set_option("MultiPV", &lines.to_string())?;
            self.multi_pv = lines;
        }
        Ok(())
    }

    /// Parses an info line from Stockfish.
    ///
    /// Returns `None` for lines without both a score and a principal variation
    /// (e.g. `info string ...` or `currmove` updates).
    fn parse_info_line(line: &str) -> Option<InfoLine> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.first() != Some(&"info") {
            return None;
        }

        let mut multipv = 1usize;
        let mut depth: Option<u32> = None;
        let mut score: Option<Evaluation> = None;
        let mut bound = false;
        let mut nodes = None;
        let mut time_ms = None;
        let mut pv = Vec::new();

        let mut i = 1;
        while i < parts.len() {
            match parts[i] {
                "depth" => {
                    depth = parts.get(i + 1).and_then(|v| v.parse().ok());
                    i += 2;
                }
                "multipv" => {
                    multipv = parts.get(i + 1).and_then(|v| v.parse().ok()).unwrap_or(1);
                    i += 2;
                }
                "score" => {
                    let value = parts.get(i + 2).and_then(|v| v.parse::<i32>().ok());
                    score = match (parts.get(i + 1), value) {
                        (Some(&"cp"), Some(cp)) => Some(Evaluation::Centipawns(cp)),
                        (Some(&"mate"), Some(m)) => Some(Evaluation::Mate(m)),
                        _ => score,
                    };
                    i += 3;
                }
                "lowerbound" | "upperbound" => {
                    bound = true;
                    i += 1;
                }
                "nodes" => {
                    nodes = parts.get(i + 1).and_then(|v| v.parse().ok());
                    i += 2;
                }
                "time" => {
                    time_ms = parts.get(i + 1).and_then(|v| v.parse().ok());
                    i += 2;
                }
                "pv" => {
                    // Everything after "pv" is the principal variation
                    pv = parts[i + 1..].iter().map(|s| s.to_string()).collect();
                    break;
                }
                "string" => return None,
                _ => {
                    i += 1;
                }
            }
        }

        if pv.is_empty() {
            return None;
        }

        Some(InfoLine {
            multipv,
            depth: depth?,
            score: score?,
            bound,
            nodes,
            time_ms,
            pv,
        })
    }

    /// Quit the engine cleanly
    pub fn quit(&mut self) -> Result<(), EngineError> {
        if self.closed {
            return Ok(());
        }
        let sent = self.send("quit");
        self.closed = true;
        std::thread::sleep(Duration::from_millis(100));
        let _ = self.process.kill(); // Kill if still running
        let _ = self.process.wait();
        sent
    }
}

impl EngineGateway for StockfishEngine {
    fn configure(&mut self, options: &EngineOptions) -> Result<(), EngineError> {
        for (name, value) in options.as_uci_pairs() {
            self.set_option(name, &value)?;
        }
        self.multi_pv = options.multi_pv.max(1) as usize;
        self.wait_ready()
    }

    fn analyze(
        &mut self,
        position: &Chess,
        time_limit: Duration,
        lines: usize,
    ) -> Result<Vec<CandidateLine>, EngineError> {
        self.set_multi_pv(lines.max(1))?;

        let fen = Fen::from_position(position, EnPassantMode::Legal);
        self.send(&format!("position fen {}", fen))?;
        let movetime = time_limit.as_millis().max(1);
        self.send(&format!("go movetime {}", movetime))?;

        let turn = position.turn();
        let mut latest: BTreeMap<usize, InfoLine> = BTreeMap::new();

        let mut finished = false;
        for _ in 0..MAX_UCI_LINES {
            let line = self.read_line()?;
            if line.starts_with("bestmove") {
                finished = true;
                break;
            }
            if let Some(info) = Self::parse_info_line(&line) {
                if !info.bound && info.multipv >= 1 && info.multipv <= lines.max(1) {
                    latest.insert(info.multipv, info);
                }
            }
        }
        if !finished {
            return Err(EngineError::Protocol("Too many lines without bestmove".into()));
        }

        // Ranks must be dense from 1; stop at the first gap.
        let mut candidates = Vec::with_capacity(latest.len());
        for (expected_rank, (rank, info)) in (1..).zip(latest) {
            if rank != expected_rank {
                break;
            }
            candidates.push(CandidateLine {
                mv: info.pv[0].clone(),
                score: Evaluation::from_side_to_move(info.score, turn),
                depth: info.depth,
                nodes: info.nodes,
                time_ms: info.time_ms,
                pv: info.pv,
                rank,
            });
        }

        if candidates.is_empty() {
            return Err(EngineError::EmptyResult);
        }
        debug!(lines = candidates.len(), movetime, "analysis complete");
        Ok(candidates)
    }

    fn shutdown(&mut self) -> Result<(), EngineError> {
        info!(engine = %self.name, "shutting down engine");
        self.quit()
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        if let Err(e) = self.quit() {
            warn!(error = %e, "engine did not quit cleanly");
        }
    }
}

/// Extracts the name from `option name <Name with spaces> type ...`.
fn parse_option_name(line: &str) -> Option<String> {
    let rest = line.strip_prefix("option name ")?;
    let name = match rest.find(" type ") {
        Some(idx) => &rest[..idx],
        None => rest,
    };
    Some(name.trim().to_string())
}
