//! Root-move dispatcher.
//!
//! The controller splits a search at the root: one task per legal root
//! move, searched to depth-1 by whichever worker is free. The queue is
//! only ever touched by the controller thread; workers communicate back
//! through their reply channels. Polling is cheap enough to interleave
//! with the UCI input loop at millisecond granularity.

use std::collections::VecDeque;
use std::time::Instant;

use log::{debug, info};

use crate::board::Move;

use super::pool::{PoolError, SearchReply, SearchTask, WorkerPool};

struct RootTask {
    mv: Move,
    task: SearchTask,
    /// Index of the worker crunching this task, `None` while queued.
    worker: Option<usize>,
}

/// A finished root-move search, ready for the game layer to absorb.
#[derive(Clone, Copy, Debug)]
pub struct Completed {
    pub mv: Move,
    /// Depth the task was searched to (root depth minus one).
    pub depth: u16,
    pub reply: SearchReply,
}

/// Controller-side scheduler for one search epoch.
pub struct Dispatcher {
    pool: WorkerPool,
    queue: VecDeque<RootTask>,
    completed: Vec<Completed>,
    epoch_start: Instant,
    /// Wall time of the last finished epoch, in milliseconds.
    pub last_search_ms: u64,
    /// Evaluations summed over the last epoch's replies.
    pub total_evals: u64,
}

impl Dispatcher {
    pub fn new(workers: usize) -> Result<Dispatcher, PoolError> {
        Ok(Dispatcher {
            pool: WorkerPool::new(workers)?,
            queue: VecDeque::new(),
            completed: Vec::new(),
            epoch_start: Instant::now(),
            last_search_ms: 0,
            total_evals: 0,
        })
    }

    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.pool.len()
    }

    /// True when no tasks are queued or being crunched.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Start a new epoch. Any previous epoch must have been drained or
    /// stopped first.
    pub fn begin(&mut self, tasks: Vec<(Move, SearchTask)>) {
        debug_assert!(self.queue.is_empty(), "previous epoch still running");
        self.completed.clear();
        self.total_evals = 0;
        self.epoch_start = Instant::now();
        info!("dispatching {} root tasks", tasks.len());
        for (mv, task) in tasks {
            self.queue.push_back(RootTask {
                mv,
                task,
                worker: None,
            });
        }
    }

    /// One poll cycle: hand queued tasks to idle workers, harvest any
    /// replies. Returns true when the epoch is finished.
    pub fn process_once(&mut self) -> bool {
        if self.queue.is_empty() {
            return true;
        }

        let mut busy = vec![false; self.pool.len()];
        for entry in &self.queue {
            if let Some(w) = entry.worker {
                busy[w] = true;
            }
        }

        // Deploy queued tasks onto free workers.
        for entry in self.queue.iter_mut().filter(|e| e.worker.is_none()) {
            let Some(idle) = busy.iter().position(|&b| !b) else {
                break;
            };
            busy[idle] = true;
            entry.worker = Some(idle);
            self.pool.send(idle, entry.task);
        }

        // Harvest replies from crunching workers.
        let mut i = 0;
        while i < self.queue.len() {
            let Some(w) = self.queue[i].worker else {
                i += 1;
                continue;
            };
            if let Some(reply) = self.pool.try_recv(w) {
                let entry = self.queue.remove(i).expect("indexed entry exists");
                self.total_evals += reply.evals;
                if reply.halted {
                    debug!("discarding halted reply for {}", entry.mv);
                } else {
                    self.completed.push(Completed {
                        mv: entry.mv,
                        depth: entry.task.depth,
                        reply,
                    });
                }
            } else {
                i += 1;
            }
        }

        if self.queue.is_empty() {
            self.last_search_ms = self.epoch_start.elapsed().as_millis() as u64;
            true
        } else {
            false
        }
    }

    /// Take the finished tasks harvested so far.
    pub fn drain_completed(&mut self) -> Vec<Completed> {
        std::mem::take(&mut self.completed)
    }

    /// Cancel the epoch: raise every crunching worker's halt word, wait
    /// out their replies, and drop whatever never got assigned. Nothing
    /// from a stopped epoch survives.
    pub fn stop(&mut self) {
        let crunching: Vec<usize> = self.queue.iter().filter_map(|e| e.worker).collect();
        if !crunching.is_empty() {
            info!("halting {} workers", crunching.len());
        }
        for &w in &crunching {
            self.pool.halt(w);
        }
        for &w in &crunching {
            let _ = self.pool.recv(w);
        }
        self.queue.clear();
        self.completed.clear();
    }
}
