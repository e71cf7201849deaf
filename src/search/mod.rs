//! Search kernels and the root-level work distribution.
//!
//! Two interchangeable kernels, plain negamax and principal-variation
//! search, walk the move tree with alpha-beta pruning. Checkmate is
//! detected as a line ending in king capture one ply later; a null-move
//! re-search disambiguates stalemate from mate. Root moves are searched
//! in parallel by a pool of worker threads (`pool`), fed and harvested by
//! a polling dispatcher (`dispatch`).

mod dispatch;
mod negamax;
mod pool;
mod pvs;


#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use dispatch::{Completed, Dispatcher};
pub use negamax::negamax;
pub use pool::{PoolError, SearchReply, SearchTask, WorkerPool};
pub use pvs::pvs;

use crate::board::Move;

/// Principal variations are capped at this many plies; one fixed-size
/// array per search result keeps recursion allocation-free.
pub const MAX_DEPTH: usize = 16;

/// The principal variation, indexed by remaining depth: `lot[d]` is the
/// move chosen with `d` plies left to search.
pub type Lot = [Move; MAX_DEPTH];

/// Line-of-thought sentinel: the line ends in stalemate here.
pub const LOT_STALE: Move = Move::from_raw(0xFFFF);
/// Line-of-thought sentinel: a stored move was not legal on replay.
pub const LOT_ERR: Move = Move::from_raw(0xFFEE);

/// Outcome of searching one subtree.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvalResult {
    /// Score from the searched side's point of view.
    pub score: i32,
    /// Best move at the subtree root.
    pub mv: Move,
    /// Remaining depth at which this score originated; 0 means a leaf
    /// evaluation at full depth.
    pub depth: u16,
    /// Best line found, indexed by remaining depth.
    pub lot: Lot,
}

impl EvalResult {
    /// A result holding the "no move found yet" sentinel score.
    #[must_use]
    pub fn sentinel() -> EvalResult {
        EvalResult {
            score: i32::MIN + 1,
            mv: Move::NULL,
            depth: 0,
            lot: [Move::NULL; MAX_DEPTH],
        }
    }
}

impl Default for EvalResult {
    fn default() -> EvalResult {
        EvalResult::sentinel()
    }
}

/// Per-search configuration threaded through the kernels.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchOptions {
    /// Mate-search mode: leaf evaluations return 0 so only mate distance
    /// differentiates lines.
    pub mate_search: bool,
    /// Add mobility counts to leaf evaluations. Costs cutoff density.
    pub pos_score: bool,
    /// Slack subtracted from beta in the cutoff test; 0 is exact search,
    /// 100 trades up to a pawn of accuracy for earlier cutoffs.
    pub cut_slack: i32,
}

/// Counters accumulated by one search task.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    /// Leaf evaluations (king-capture short circuits included).
    pub evals: u64,
    /// Alpha-beta cutoffs taken.
    pub cuts: u64,
    /// King captures found (mate-line terminations).
    pub checks: u64,
    /// Stalemates disambiguated.
    pub stales: u64,
}

impl SearchStats {
    pub fn reset(&mut self) {
        *self = SearchStats::default();
    }

    pub fn absorb(&mut self, other: &SearchStats) {
        self.evals += other.evals;
        self.cuts += other.cuts;
        self.checks += other.checks;
        self.stales += other.stales;
    }
}
