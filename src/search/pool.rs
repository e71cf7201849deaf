//! Worker pool for root-move search tasks.
//!
//! Each worker is a named thread running one search task at a time,
//! strictly sequentially; parallelism exists only across workers. Tasks
//! and replies travel over channels, and per-worker halt flags give the
//! controller a way to interrupt a search mid-tree.

use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, warn};

use crate::board::{Board, Color};
use crate::sync::HaltFlag;

use super::{pvs, EvalResult, SearchOptions, SearchStats};

/// One root-move search order: the position after the root move, with
/// the opponent to move.
#[derive(Clone, Copy, Debug)]
pub struct SearchTask {
    pub board: Board,
    pub side: Color,
    pub depth: u16,
    pub mate_search: bool,
    pub pos_score: bool,
}

/// What a worker sends back when a task finishes or is halted.
#[derive(Clone, Copy, Debug)]
pub struct SearchReply {
    pub best: EvalResult,
    pub evals: u64,
    pub elapsed_ms: u64,
    /// True when the task was cancelled; the result is best-effort and
    /// the controller discards it.
    pub halted: bool,
}

/// Pool construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A pool without workers cannot search anything.
    NoWorkers,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::NoWorkers => write!(f, "worker pool must have at least one worker"),
        }
    }
}

impl std::error::Error for PoolError {}

struct Worker {
    /// `None` once the pool is shutting down; dropping the sender ends
    /// the worker loop.
    task_tx: Option<Sender<SearchTask>>,
    reply_rx: Receiver<SearchReply>,
    halt: HaltFlag,
    handle: Option<JoinHandle<()>>,
}

/// A fixed set of search workers addressed by index.
pub struct WorkerPool {
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Spawn `count` workers. A pool of size zero is refused; the engine
    /// cannot run without crunchers.
    pub fn new(count: usize) -> Result<WorkerPool, PoolError> {
        if count == 0 {
            return Err(PoolError::NoWorkers);
        }
        let mut workers = Vec::with_capacity(count);
        for id in 0..count {
            let (task_tx, task_rx) = channel::<SearchTask>();
            let (reply_tx, reply_rx) = channel::<SearchReply>();
            let halt = HaltFlag::new();
            let worker_halt = halt.clone();
            let handle = thread::Builder::new()
                .name(format!("cruncher-{id}"))
                .spawn(move || worker_loop(&task_rx, &reply_tx, &worker_halt))
                .expect("failed to spawn search worker");
            workers.push(Worker {
                task_tx: Some(task_tx),
                reply_rx,
                halt,
                handle: Some(handle),
            });
        }
        debug!("worker pool up with {count} workers");
        Ok(WorkerPool { workers })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Hand a task to worker `idx`.
    pub fn send(&self, idx: usize, task: SearchTask) {
        let delivered = match &self.workers[idx].task_tx {
            Some(tx) => tx.send(task).is_ok(),
            None => false,
        };
        if !delivered {
            warn!("worker {idx} is gone; task dropped");
        }
    }

    /// Non-blocking poll for worker `idx`'s reply.
    #[must_use]
    pub fn try_recv(&self, idx: usize) -> Option<SearchReply> {
        match self.workers[idx].reply_rx.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("worker {idx} hung up");
                None
            }
        }
    }

    /// Block until worker `idx` replies. Used while draining a stopped
    /// search epoch.
    #[must_use]
    pub fn recv(&self, idx: usize) -> Option<SearchReply> {
        self.workers[idx].reply_rx.recv().ok()
    }

    /// Raise worker `idx`'s halt word.
    pub fn halt(&self, idx: usize) {
        self.workers[idx].halt.raise();
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Halt anything still searching, close the task channels, join.
        for worker in &mut self.workers {
            worker.halt.raise();
            worker.task_tx.take();
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                let _ = handle.join();
            }
        }
    }
}

/// One worker's life: receive a task, lower the halt word, run the
/// principal-variation kernel to completion or cancellation, reply.
fn worker_loop(tasks: &Receiver<SearchTask>, replies: &Sender<SearchReply>, halt: &HaltFlag) {
    while let Ok(task) = tasks.recv() {
        halt.lower();
        let opts = SearchOptions {
            mate_search: task.mate_search,
            pos_score: task.pos_score,
            cut_slack: 0,
        };
        let mut stats = SearchStats::default();
        let started = Instant::now();
        let best = pvs(
            task.depth,
            &task.board,
            i32::MIN + 1,
            i32::MAX,
            task.side,
            -1,
            0,
            &opts,
            &mut stats,
            halt.as_atomic(),
        );
        let reply = SearchReply {
            best,
            evals: stats.evals,
            elapsed_ms: started.elapsed().as_millis() as u64,
            halted: halt.is_raised(),
        };
        if replies.send(reply).is_err() {
            break;
        }
    }
}
