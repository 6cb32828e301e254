//! The round-based dispatch loop: walks a flat list of [`Object`]s once per
//! round, dispatching every object that is ready to a bounded worker pool
//! and cascading failures through objects whose dependencies have already
//! failed, until a round makes no progress.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, unbounded};
use future::Reason;
use lifecycle::ExecutorError;

mod object;

pub use object::{Object, Status};


/// The outcome of a full scheduler run, used by callers to decide an exit
/// code or report a summary.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Objects that reached `Created` with a successful setup.
    pub created: Vec<String>,
    /// Objects that reached `Created` but whose own setup failed.
    pub failed: Vec<(String, String)>,
    /// Objects that were marked `Unresolved` because a dependency failed.
    pub unresolved: Vec<(String, Reason)>,
    /// Objects that never became ready and never had a failed dependency --
    /// a graph stall, most likely a dependency cycle.
    pub stalled: Vec<String>,
}

impl RunReport {
    /// Whether anything in the scenario failed to fully succeed.
    pub fn has_problems(&self) -> bool {
        !self.failed.is_empty() || !self.unresolved.is_empty() || !self.stalled.is_empty()
    }
}

pub struct Scheduler {
    workers: usize,
}

impl Scheduler {
    pub fn new(workers: usize) -> Scheduler {
        Scheduler {
            workers: workers.max(1),
        }
    }

    /// Runs every object in `objects` to completion.
    ///
    /// Each round is a strict three-phase step: first the whole list is
    /// scanned once, against the future states as they stood at the start
    /// of the round, to decide which objects have a failed dependency and
    /// which are ready; only once that snapshot is complete does the round
    /// act on it, cascading the failed ones and handing the ready ones to
    /// the worker pool; the coordinator then drains exactly that many acks
    /// before starting the next round. Splitting scan from action this way
    /// keeps a future completed mid-round from being observed by another
    /// object in the same scan -- dependents only ever see completions
    /// from a prior round. The run ends when a round's scan finds nothing
    /// to cascade and nothing to dispatch.
    pub fn run(&self, objects: &[Arc<Object>]) -> RunReport {
        let (job_tx, job_rx) = bounded::<Arc<Object>>(self.workers);
        // Unbounded: a worker must never block sending its ack back, or a
        // full ack buffer and a coordinator still mid-dispatch can deadlock
        // each other when a round has more ready objects than `workers`.
        let (ack_tx, ack_rx) = unbounded::<(Arc<Object>, Result<(), ExecutorError>)>();

        let handles: Vec<_> = (0..self.workers)
            .map(|_| {
                let job_rx = job_rx.clone();
                let ack_tx = ack_tx.clone();
                thread::spawn(move || {
                    while let Ok(object) = job_rx.recv() {
                        let result = create_and_cascade(&object);
                        if ack_tx.send((object, result)).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();
        drop(ack_tx);

        loop {
            let mut to_cascade: Vec<(Arc<Object>, Reason)> = Vec::new();
            let mut to_dispatch: Vec<Arc<Object>> = Vec::new();
            for object in objects {
                if let Some(reason) = object.failed_deps() {
                    to_cascade.push((object.clone(), reason));
                } else if object.ready() {
                    to_dispatch.push(object.clone());
                }
            }

            if to_cascade.is_empty() && to_dispatch.is_empty() {
                log::info!("nothing left to do");
                break;
            }

            for (object, reason) in &to_cascade {
                cascade(object, reason.clone());
                log::info!("not creating {}: {reason}", object.name());
            }

            for object in &to_dispatch {
                job_tx
                    .send(object.clone())
                    .expect("worker pool outlives the round it is dispatched in");
            }

            for _ in 0..to_dispatch.len() {
                let (object, result) = ack_rx
                    .recv()
                    .expect("worker pool outlives the round it is dispatched in");
                match result {
                    Ok(()) => log::info!("created {}", object.name()),
                    Err(e) => log::error!("creation of {} failed: {e}", object.name()),
                }
            }
        }

        drop(job_tx);
        for handle in handles {
            let _ = handle.join();
        }

        report(objects)
    }
}

fn cascade(object: &Object, reason: Reason) {
    for future in object.completes() {
        future
            .fail(reason.clone())
            .expect("parser guarantees each future has exactly one completer");
    }
}

fn create_and_cascade(object: &Object) -> Result<(), ExecutorError> {
    match object.create() {
        Ok(()) => {
            for future in object.completes() {
                future
                    .complete()
                    .expect("parser guarantees each future has exactly one completer");
            }
            Ok(())
        }
        Err(e) => {
            let reason = Reason::new(e.to_string());
            object.record_setup_failure(reason.clone());
            for future in object.completes() {
                future
                    .fail(reason.clone())
                    .expect("parser guarantees each future has exactly one completer");
            }
            Err(e)
        }
    }
}

fn report(objects: &[Arc<Object>]) -> RunReport {
    let mut report = RunReport::default();
    for object in objects {
        match object.status() {
            Status::Created => match object.last_reason() {
                Some(reason) => report
                    .failed
                    .push((object.name().to_string(), reason.to_string())),
                None => report.created.push(object.name().to_string()),
            },
            Status::Unresolved => {
                let reason = object
                    .last_reason()
                    .unwrap_or_else(|| Reason::new("unresolved with no recorded reason"));
                report
                    .unresolved
                    .push((object.name().to_string(), reason));
            }
            Status::Unknown | Status::Running => {
                report.stalled.push(object.name().to_string());
            }
        }
    }
    report
}
