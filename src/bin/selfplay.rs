//! Engine-vs-engine driver.
//!
//! Plays the engine against itself with independent depths per side,
//! nudging each depth by how long the previous search took: under 100 ms
//! the side searches one ply deeper next time, over 5 seconds one ply
//! shallower. Stops on mate, stalemate, or a fivefold repetition.

use std::thread::{available_parallelism, sleep};
use std::time::Duration;

use packmate::board::Color;
use packmate::game::Game;
use packmate::search::{Dispatcher, SearchOptions, MAX_DEPTH};

fn main() {
    env_logger::init();

    let workers = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            available_parallelism()
                .map(|n| n.get().saturating_sub(1).max(1))
                .unwrap_or(1)
        });
    let mut dispatcher = Dispatcher::new(workers).unwrap_or_else(|err| {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    });

    let mut game = Game::new();
    let mut white_depth: u16 = 7;
    let mut black_depth: u16 = 7;
    let opts = SearchOptions {
        pos_score: true,
        ..SearchOptions::default()
    };

    loop {
        print!("{}", game.current.render());
        println!("{}", game.current.status_line());

        let depth = match game.side_to_move {
            Color::White => &mut white_depth,
            Color::Black => &mut black_depth,
        };
        game.start_search(&mut dispatcher, *depth, opts, &[]);
        while !game.process_search_queue(&mut dispatcher) {
            sleep(Duration::from_millis(10));
        }

        if dispatcher.last_search_ms < 100 {
            *depth = (*depth + 1).min(MAX_DEPTH as u16 - 1);
        }
        if dispatcher.last_search_ms > 5000 {
            *depth = depth.saturating_sub(1).max(1);
        }

        let picked = game.select_move(&game.last_search_result, &opts);
        if picked.mv.is_null() {
            if game.is_mate() {
                println!("{} is mated", game.side_to_move);
            } else {
                println!("stalemate");
            }
            break;
        }
        println!(
            "{}: R{} WD{} BD{} played {} ({} evals, {} ms)",
            game.board_history.len(),
            game.repetition_count(),
            white_depth,
            black_depth,
            game.current.move_to_uci(picked.mv),
            dispatcher.total_evals,
            dispatcher.last_search_ms,
        );
        game.exec_result(picked);
        if game.repetition_count() > 5 {
            println!("draw by repetition");
            break;
        }
    }
}
