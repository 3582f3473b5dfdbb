//! Wall-clock instrumentation around the search

use std::time::{Duration, Instant};

use tictactoe_core::{ai, Board, SearchReport};

/// Search result plus the time it took
#[derive(Clone, Copy, Debug)]
pub struct TimedSearch {
    pub report: Option<SearchReport>,
    pub elapsed: Duration,
}

/// Run [`ai::search`] and log how long it took
pub fn timed_search(board: &Board) -> TimedSearch {
    let start = Instant::now();
    let report = ai::search(board);
    let elapsed = start.elapsed();

    match &report {
        Some(r) => {
            tracing::info!("Processing time: {:.3?}", elapsed);
            tracing::debug!(
                "Search from {}: {} value={} nodes={}",
                board,
                r.action,
                r.value,
                r.nodes
            );
        }
        None => tracing::debug!("No search from terminal board {}", board),
    }

    TimedSearch { report, elapsed }
}

/// Milliseconds as a float, for JSON output
pub fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}
