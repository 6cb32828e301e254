use std::sync::Arc;

use future::{Future, Reason};
use lifecycle::Lifecycle;
use parking_lot::Mutex;

/// Where an object sits in its lifecycle.
///
/// `Created` is terminal whether the object's own setup succeeded or failed;
/// `Unresolved` is terminal and reserved for objects that never attempted
/// setup because one of their dependencies failed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Unknown,
    Running,
    Created,
    Unresolved,
}

impl Status {
    /// Whether this object has already been handed to (or excused from) the
    /// worker pool, and so should be skipped by future rounds.
    pub fn consumed(self) -> bool {
        matches!(self, Status::Running | Status::Created)
    }
}

/// One node in the scenario tree: a named unit of work that awaits some
/// futures, completes others, and knows how to set itself up.
pub struct Object {
    name: String,
    lifecycle: Option<Arc<dyn Lifecycle + Send + Sync>>,
    awaits: Vec<Future>,
    completes: Vec<Future>,
    status: Mutex<Status>,
    last_reason: Mutex<Option<Reason>>,
}

impl Object {
    /// `lifecycle` is `None` for an object whose `data` payload was absent
    /// or null: `create` is then a no-op success.
    pub fn new(
        name: impl Into<String>,
        lifecycle: Option<Arc<dyn Lifecycle + Send + Sync>>,
        awaits: Vec<Future>,
        completes: Vec<Future>,
    ) -> Object {
        Object {
            name: name.into(),
            lifecycle,
            awaits,
            completes,
            status: Mutex::new(Status::Unknown),
            last_reason: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        *self.status.lock()
    }

    /// The reason this object was marked `Unresolved`, if it was.
    pub fn last_reason(&self) -> Option<Reason> {
        self.last_reason.lock().clone()
    }

    pub fn completes(&self) -> &[Future] {
        &self.completes
    }

    fn set_status(&self, status: Status) {
        *self.status.lock() = status;
    }

    /// Records that this object's own setup failed, so that a later report
    /// can tell a clean `Created` apart from one whose setup errored. Does
    /// not change `status`: `create` has already moved it to `Created`.
    pub fn record_setup_failure(&self, reason: Reason) {
        *self.last_reason.lock() = Some(reason);
    }

    /// If this object has already been dispatched or excused, does nothing.
    /// Otherwise, if any awaited future has failed, marks this object
    /// `Unresolved` and returns the failure reason to cascade.
    pub fn failed_deps(&self) -> Option<Reason> {
        if self.status().consumed() {
            return None;
        }
        for awaited in &self.awaits {
            let (done, reason) = awaited.result();
            if done {
                if let Some(reason) = reason {
                    self.set_status(Status::Unresolved);
                    *self.last_reason.lock() = Some(reason.clone());
                    return Some(reason);
                }
            }
        }
        None
    }

    /// Whether every awaited future has resolved (successfully or not -- a
    /// failed dependency is handled by [`Object::failed_deps`], not here) and
    /// this object has not already been consumed.
    pub fn ready(&self) -> bool {
        if self.status().consumed() {
            return false;
        }
        self.awaits.iter().all(|f| f.result().0)
    }

    /// Runs this object's setup lifecycle. Always ends in `Created`, whether
    /// setup succeeded or failed; the `Result` tells the caller whether to
    /// complete or fail this object's completed futures. An object with no
    /// lifecycle attached (a `data`-less node) succeeds trivially.
    pub fn create(&self) -> Result<(), lifecycle::ExecutorError> {
        self.set_status(Status::Running);
        let result = match &self.lifecycle {
            Some(lifecycle) => lifecycle.setup().run().map(|_output| ()),
            None => Ok(()),
        };
        self.set_status(Status::Created);
        result
    }
}
