use std::thread::available_parallelism;

use packmate::uci;

fn main() {
    env_logger::init();

    // First CLI argument overrides the worker count; default leaves one
    // core to the controller.
    let workers = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            available_parallelism()
                .map(|n| n.get().saturating_sub(1).max(1))
                .unwrap_or(1)
        });

    if let Err(err) = uci::run_uci_loop(workers) {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }
}
