//! UCI front end.
//!
//! The loop multiplexes two event sources without blocking on either: a
//! reader thread forwards stdin lines over a channel, and between 5 ms
//! waits on that channel the dispatcher gets polled so worker replies
//! are harvested promptly. All engine output goes to stdout; logging
//! stays on stderr so the protocol stream is never polluted.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::board::{Move, KING_VALUE};
use crate::game::Game;
use crate::search::{Dispatcher, EvalResult, PoolError, SearchOptions, LOT_ERR, LOT_STALE, MAX_DEPTH};

pub const ENGINE_NAME: &str = "Packmate";
pub const ENGINE_AUTHOR: &str = "the Packmate authors";

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Depth a `go` without an explicit depth searches to.
const DEFAULT_DEPTH: u16 = 6;

/// Sticky search settings carried across `go` commands.
struct Limits {
    depth: u16,
    pos_score: bool,
    mate_search: bool,
    searchmoves: Vec<Move>,
}

impl Limits {
    fn options(&self) -> SearchOptions {
        SearchOptions {
            mate_search: self.mate_search,
            pos_score: self.pos_score,
            cut_slack: 0,
        }
    }
}

/// Render a score for the `info` line: centipawns below the mate
/// threshold, `mate Y` (moves, not plies) beyond it.
#[must_use]
pub fn format_score(v: i32) -> String {
    if v.abs() < i32::MAX / 4 {
        format!("cp {v}")
    } else {
        let y = (if v > 0 { KING_VALUE - v + 1 } else { -KING_VALUE - v }) / 2;
        format!("mate {y}")
    }
}

/// One `info` line for a finished root move, principal variation
/// included. Sentinels in the line render as MATE/STALE/ERR markers.
#[must_use]
pub fn format_info(game: &Game, r: &EvalResult, depth: u16, evals: u64, time_ms: u64) -> String {
    let time_ms = time_ms.max(1);
    let mut line = format!(
        "info depth {} score {} nodes {} nps {} time {} pv {}",
        depth,
        format_score(r.score),
        evals,
        evals / time_ms * 1000,
        time_ms,
        game.current.move_to_uci(r.mv),
    );
    let mut d = MAX_DEPTH - 1;
    while d > 0 && r.lot[d].is_null() {
        d -= 1;
    }
    for j in (1..d).rev() {
        let m = r.lot[j];
        if m.is_null() {
            line.push_str(" MATE");
            break;
        }
        if m == LOT_STALE {
            line.push_str(" STALE");
            break;
        }
        if m == LOT_ERR {
            line.push_str(" ERR");
            break;
        }
        line.push(' ');
        line.push_str(&m.to_string());
    }
    line
}

/// Publish a finished search epoch: per-root info lines, the selection
/// summary, and the final `bestmove`.
fn publish_result(game: &Game, limits: &Limits, dispatcher: &Dispatcher) {
    let time_ms = dispatcher.last_search_ms;
    for r in &game.last_search_result {
        println!(
            "{}",
            format_info(game, r, limits.depth, dispatcher.total_evals, time_ms)
        );
    }
    let picked = game.select_move(&game.last_search_result, &limits.options());
    println!(
        "info string moveselect num {} rep {}",
        game.last_search_result.len(),
        game.repetition_count()
    );
    if picked.mv.is_null() {
        if game.is_mate() {
            println!("info string checkmate");
        } else if game.is_stalemate() {
            println!("info string stalemate score 0");
        }
        println!("bestmove 0000");
    } else {
        println!("bestmove {}", game.current.move_to_uci(picked.mv));
    }
    io::stdout().flush().ok();
}

/// Apply a `position` command: `startpos` or a FEN, then the move list.
/// Consumption stops at the first move that is not legal.
pub fn handle_position(game: &mut Game, tokens: &[&str]) {
    let mut i = 1;
    match tokens.get(i) {
        Some(&"startpos") => {
            game.set_fen(START_FEN).expect("startpos FEN");
            i += 1;
        }
        Some(&"fen") => {
            i += 1;
            let start = i;
            while i < tokens.len() && tokens[i] != "moves" {
                i += 1;
            }
            let fen = tokens[start..i].join(" ");
            if let Err(err) = game.set_fen(&fen) {
                warn!("bad FEN '{fen}': {err}");
                return;
            }
        }
        _ => return,
    }

    if tokens.get(i) == Some(&"moves") {
        i += 1;
        while i < tokens.len() {
            match game.current.parse_uci_move(game.side_to_move, tokens[i]) {
                Some(m) => game.exec_move(m),
                None => {
                    warn!("illegal move '{}' in position command", tokens[i]);
                    break;
                }
            }
            i += 1;
        }
    }
}

/// Parse a `go` command and start the search. Returns false when the
/// command was fully handled without starting one (perft).
fn handle_go(
    game: &mut Game,
    dispatcher: &mut Dispatcher,
    limits: &mut Limits,
    tokens: &[&str],
) -> bool {
    let mut wtime: Option<u64> = None;
    let mut btime: Option<u64> = None;
    let mut explicit_budget = false;
    limits.mate_search = false;
    limits.searchmoves.clear();

    let clamp_depth = |d: u16| d.clamp(1, MAX_DEPTH as u16 - 1);

    let mut i = 1;
    while i < tokens.len() {
        match tokens[i] {
            "searchmoves" => {
                // Everything after the keyword is a root-move filter.
                i += 1;
                while i < tokens.len() {
                    match game.current.parse_uci_move(game.side_to_move, tokens[i]) {
                        Some(m) => limits.searchmoves.push(m),
                        None => break,
                    }
                    i += 1;
                }
                continue;
            }
            "wtime" => {
                wtime = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
                continue;
            }
            "btime" => {
                btime = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
                continue;
            }
            "winc" | "binc" | "movestogo" | "nodes" | "movetime" => {
                // Parsed for protocol compatibility; the only hard limit
                // this engine honors is depth plus the external stop.
                debug!("go token '{}' noted but not enforced", tokens[i]);
                i += 2;
                continue;
            }
            "depth" => {
                if let Some(d) = tokens.get(i + 1).and_then(|s| s.parse().ok()) {
                    limits.depth = clamp_depth(d);
                    explicit_budget = true;
                }
                i += 2;
                continue;
            }
            "mate" => {
                limits.mate_search = true;
                if let Some(d) = tokens.get(i + 1).and_then(|s| s.parse().ok()) {
                    limits.depth = clamp_depth(d);
                }
                explicit_budget = true;
                i += 2;
                continue;
            }
            "perft" => {
                if let Some(d) = tokens.get(i + 1).and_then(|s| s.parse::<u32>().ok()) {
                    let started = std::time::Instant::now();
                    let nodes = game.current.perft(game.side_to_move, d);
                    println!(
                        "info string perft {} nodes {} time {}",
                        d,
                        nodes,
                        started.elapsed().as_millis()
                    );
                    io::stdout().flush().ok();
                }
                return false;
            }
            "posscore" => {
                if let Some(v) = tokens.get(i + 1) {
                    limits.pos_score = *v == "1" || *v == "true";
                }
                i += 2;
                continue;
            }
            "infinite" | "ponder" => {
                // No hard deadline exists anyway; searches run until the
                // depth is exhausted or a stop arrives.
                explicit_budget = true;
                i += 1;
                continue;
            }
            other => {
                debug!("unknown go token '{other}'");
                i += 1;
            }
        }
    }

    // Soft time management: with a clock but no explicit budget, nudge
    // the sticky depth by how the previous search went.
    if !explicit_budget && (wtime.is_some() || btime.is_some()) {
        if dispatcher.last_search_ms > 0 && dispatcher.last_search_ms < 100 {
            limits.depth = clamp_depth(limits.depth + 1);
        } else if dispatcher.last_search_ms > 5000 {
            limits.depth = clamp_depth(limits.depth.saturating_sub(1));
        }
        info!("adaptive depth {}", limits.depth);
    }

    let searchmoves = limits.searchmoves.clone();
    game.start_search(dispatcher, limits.depth, limits.options(), &searchmoves);
    true
}

/// Run the UCI session until `quit` or stdin closes.
///
/// Fails immediately when the worker pool cannot be built; an engine
/// with zero crunchers is useless.
pub fn run_uci_loop(workers: usize) -> Result<(), PoolError> {
    let mut dispatcher = Dispatcher::new(workers)?;
    let mut game = Game::new();
    let mut limits = Limits {
        depth: DEFAULT_DEPTH,
        pos_score: true,
        mate_search: false,
        searchmoves: Vec::new(),
    };
    let mut searching = false;

    let lines = spawn_stdin_reader();
    info!(
        "{ENGINE_NAME} ready, {} workers",
        dispatcher.worker_count()
    );

    loop {
        let finished = game.process_search_queue(&mut dispatcher);
        if searching && finished {
            publish_result(&game, &limits, &dispatcher);
            searching = false;
        }

        let line = match lines.recv_timeout(Duration::from_millis(5)) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = tokens.first() else {
            continue;
        };

        match command {
            "uci" => {
                println!("id name {ENGINE_NAME}");
                println!("id author {ENGINE_AUTHOR}");
                println!("option name Posscore type check default false");
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "setoption" => handle_setoption(&tokens, &mut limits),
            "ucinewgame" => {
                dispatcher.stop();
                searching = false;
            }
            "position" => handle_position(&mut game, &tokens),
            "go" => {
                searching = handle_go(&mut game, &mut dispatcher, &mut limits, &tokens);
            }
            "stop" => {
                dispatcher.stop();
                game.last_search_result.clear();
                searching = false;
            }
            "quit" => {
                dispatcher.stop();
                break;
            }
            "d" => {
                println!(
                    "History: {} MateSearch: {} posscore: {} depth: {}",
                    game.board_history.len(),
                    limits.mate_search,
                    limits.pos_score,
                    limits.depth
                );
                print!("{}", game.current.render());
                println!(
                    "{} Repetition: {}",
                    game.current.status_line(),
                    game.repetition_count()
                );
            }
            _ => {
                warn!("unknown command: {line}");
                println!("Unknown command: {line}");
            }
        }
        io::stdout().flush().ok();
    }
    Ok(())
}

fn handle_setoption(tokens: &[&str], limits: &mut Limits) {
    // setoption name <id> [value <x>]
    let mut name = String::new();
    let mut value = String::new();
    let mut i = 1;
    if tokens.get(i) == Some(&"name") {
        i += 1;
    }
    while i < tokens.len() && tokens[i] != "value" {
        if !name.is_empty() {
            name.push(' ');
        }
        name.push_str(tokens[i]);
        i += 1;
    }
    if tokens.get(i) == Some(&"value") {
        i += 1;
        while i < tokens.len() {
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(tokens[i]);
            i += 1;
        }
    }
    if name.eq_ignore_ascii_case("posscore") {
        limits.pos_score = value.eq_ignore_ascii_case("true");
        info!("posscore set to {}", limits.pos_score);
    } else {
        debug!("ignoring option '{name}'");
    }
}

/// Forward stdin lines over a channel so the main loop can poll the
/// dispatcher between reads. The channel closes when stdin does.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = channel();
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .expect("failed to spawn stdin reader");
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centipawn_scores_format_as_cp() {
        assert_eq!(format_score(42), "cp 42");
        assert_eq!(format_score(-310), "cp -310");
    }

    #[test]
    fn mate_scores_format_as_mate() {
        // A mate found with 5 plies remaining scores KING_VALUE + 5.
        let v = KING_VALUE + 5;
        assert_eq!(format_score(v), "mate -2");
        let v = KING_VALUE - 4; // mate for us, 4 plies used
        assert!(format_score(v).starts_with("mate "));
    }

    #[test]
    fn position_command_applies_moves() {
        let mut game = Game::new();
        handle_position(&mut game, &["position", "startpos", "moves", "e2e4", "e7e5"]);
        assert_eq!(game.move_history.len(), 2);
        assert_eq!(game.side_to_move, crate::board::Color::White);
    }

    #[test]
    fn position_command_stops_at_illegal_move() {
        let mut game = Game::new();
        handle_position(
            &mut game,
            &["position", "startpos", "moves", "e2e4", "e2e4", "d7d5"],
        );
        // The second e2e4 is illegal for black; d7d5 must not be played.
        assert_eq!(game.move_history.len(), 1);
    }

    #[test]
    fn position_command_accepts_fen() {
        let mut game = Game::new();
        handle_position(
            &mut game,
            &["position", "fen", "7k/6Q1/5K2/8/8/8/8/8", "b", "-", "-", "0", "1"],
        );
        assert!(game.valid_moves().is_empty());
        assert!(game.is_mate());
    }
}
