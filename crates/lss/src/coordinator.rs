//! Parallel exploration of the search tree.
//!
//! A coordinator thread runs the search down to the split level and queues
//! every branch reaching it as a task. Workers of a `rayon` pool finish the
//! tasks with the sequential search, and a monitor thread collects their
//! results, stops the run on the first solution, and notices exhaustion once
//! every worker has signed off.

use crate::block_vector::BlockVector;
use crate::config::CoordinatorConfig;
use crate::progress;
use crate::search::{BranchState, SearchAlgorithm, SearchControl};
use crate::{Error, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::Mutex;
use std::thread;
use tracing::{debug, info};

const RESULT_QUEUE_SIZE: usize = 100;

/// Result of a search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The candidate vectors of the first leaf found.
    Found(Vec<BlockVector>),

    /// The tree holds no leaf, or none among the labels that were kept.
    Exhausted,
}

enum Task {
    Branch(BranchState),
    NoMoreTasks,
}

enum WorkerMessage {
    Finished(Option<Vec<BlockVector>>),
    WorkerDone,
}

/// Runs a search with a pool of workers.
#[derive(Debug)]
pub struct Coordinator<'a> {
    algorithm: &'a SearchAlgorithm,
    config: CoordinatorConfig,
}

impl<'a> Coordinator<'a> {
    /// Creates a coordinator for `algorithm`.
    pub fn new(algorithm: &'a SearchAlgorithm, config: CoordinatorConfig) -> Self {
        Self { algorithm, config }
    }

    /// Runs the search to its first solution or to exhaustion.
    pub fn run(&self) -> Result<SearchOutcome> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
            .map_err(|e| Error::DefaultError(e.to_string()))?;

        let control = SearchControl::new();
        let (task_tx, task_rx) = sync_channel(self.config.queue_size);
        let task_rx = Mutex::new(task_rx);
        let (result_tx, result_rx) = sync_channel(RESULT_QUEUE_SIZE);
        let solution = Mutex::new(None);

        info!(
            "Searching with {} workers, split level {}",
            self.config.workers,
            self.algorithm.split_level()
        );
        thread::scope(|scope| {
            if self.config.progress {
                let estimate = progress::estimate_leaf_number(self.algorithm.parameters());
                let control = &control;
                scope.spawn(move || progress::track(control, estimate));
            }
            scope.spawn(|| self.monitor(result_rx, &control, &solution));

            let coordinator_tx = task_tx.clone();
            scope.spawn(|| self.dispatch(coordinator_tx, &control));

            pool.scope(|s| {
                for id in 0..self.config.workers {
                    let task_tx = task_tx.clone();
                    let result_tx = result_tx.clone();
                    let (control, task_rx) = (&control, &task_rx);
                    s.spawn(move |_| self.work(id, task_rx, task_tx, result_tx, control));
                }
                drop(result_tx);
            });
        });

        match solution.into_inner() {
            Ok(Some(candidates)) => Ok(SearchOutcome::Found(candidates)),
            Ok(None) => Ok(SearchOutcome::Exhausted),
            Err(e) => Err(Error::DefaultError(e.to_string())),
        }
    }

    /// Seed of the generator of the worker running `state`.
    fn task_seed(&self, state: &BranchState) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.config.seed.to_le_bytes());
        hasher.update(state.descriptor());
        hasher.finalize().into()
    }

    fn dispatch(&self, tasks: SyncSender<Task>, control: &SearchControl) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let mut count = 0usize;
        self.algorithm.parallel_search(
            self.algorithm.initial_state(),
            self.config.skip,
            &mut rng,
            control,
            &mut |state| {
                debug!("Dispatching branch at level {}", state.level());
                if tasks.send(Task::Branch(state)).is_ok() {
                    count += 1;
                }
            },
        );
        info!("Dispatched {} tasks", count);
        let _ = tasks.send(Task::NoMoreTasks);
    }

    fn work(
        &self,
        id: usize,
        tasks: &Mutex<Receiver<Task>>,
        repost: SyncSender<Task>,
        results: SyncSender<WorkerMessage>,
        control: &SearchControl,
    ) {
        let mut finished = 0usize;
        loop {
            let task = match tasks.lock() {
                Ok(rx) => rx.recv(),
                Err(_) => break,
            };
            match task {
                Ok(Task::Branch(_)) if control.is_terminated() => {}
                Ok(Task::Branch(state)) => {
                    let mut rng = ChaCha8Rng::from_seed(self.task_seed(&state));
                    let found = self.algorithm.sequential_search(
                        state,
                        self.config.skip,
                        &mut rng,
                        control,
                    );
                    finished += 1;
                    if results.send(WorkerMessage::Finished(found)).is_err() {
                        break;
                    }
                }
                Ok(Task::NoMoreTasks) => {
                    // Leave the sentinel for the other workers.
                    let _ = repost.send(Task::NoMoreTasks);
                    break;
                }
                Err(_) => break,
            }
        }
        debug!("Worker {} done after {} tasks", id, finished);
        let _ = results.send(WorkerMessage::WorkerDone);
    }

    fn monitor(
        &self,
        results: Receiver<WorkerMessage>,
        control: &SearchControl,
        solution: &Mutex<Option<Vec<BlockVector>>>,
    ) {
        let mut done = 0;
        while done < self.config.workers {
            match results.recv() {
                Ok(WorkerMessage::Finished(Some(candidates))) => {
                    if let Ok(mut solution) = solution.lock() {
                        if solution.is_none() {
                            info!("Found a solution after {} leaves", control.leaves());
                            *solution = Some(candidates);
                        }
                    }
                    control.terminate();
                }
                Ok(WorkerMessage::Finished(None)) => {}
                Ok(WorkerMessage::WorkerDone) => done += 1,
                Err(_) => break,
            }
        }
        control.terminate();
    }
}
