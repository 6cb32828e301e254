//! Single-assignment completion signal shared between objects in a scenario.
//!
//! A [`Future`] starts unresolved. Exactly one producer later calls
//! [`Future::complete`] or [`Future::fail`]; any number of consumers call
//! [`Future::result`] to observe the current state, before or after that
//! happens. There is no blocking wait: the scheduler polls `result` once per
//! round instead.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

#[cfg(test)]
mod future_tests;

/// The reason a future failed.
///
/// Cheaply cloned so the same failure can be cascaded, unchanged, to every
/// future an object completes and from there to every downstream object that
/// awaits one of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reason(Arc<str>);

impl Reason {
    pub fn new(message: impl Into<String>) -> Reason {
        Reason(Arc::from(message.into()))
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Reason {}

impl From<String> for Reason {
    fn from(message: String) -> Reason {
        Reason::new(message)
    }
}

impl From<&str> for Reason {
    fn from(message: &str) -> Reason {
        Reason::new(message)
    }
}

/// A future was completed or failed a second time.
///
/// The parser guarantees every future has exactly one completer, so a valid
/// scenario never produces this; it exists so a bug in the wiring (or a
/// future implementation) fails loudly instead of silently overwriting an
/// already-observed result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlreadySettled;

impl fmt::Display for AlreadySettled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("future was already settled")
    }
}

impl std::error::Error for AlreadySettled {}

#[derive(Debug, Default)]
struct State {
    done: bool,
    reason: Option<Reason>,
}

/// A single-assignment completion signal.
#[derive(Clone, Debug)]
pub struct Future {
    name: String,
    state: Arc<Mutex<State>>,
}

impl Future {
    pub fn new(name: impl Into<String>) -> Future {
        Future {
            name: name.into(),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `(done, reason)`: whether the future has resolved yet, and if it
    /// failed, why.
    pub fn result(&self) -> (bool, Option<Reason>) {
        let state = self.state.lock();
        (state.done, state.reason.clone())
    }

    /// Marks this future done without a failure reason.
    ///
    /// # Errors
    /// Returns [`AlreadySettled`] if this future was already done. The
    /// parser's single-completer invariant means this never fires in a
    /// valid scenario.
    pub fn complete(&self) -> Result<(), AlreadySettled> {
        let mut state = self.state.lock();
        if state.done {
            return Err(AlreadySettled);
        }
        state.done = true;
        Ok(())
    }

    /// Marks this future done with a failure reason.
    ///
    /// # Errors
    /// Returns [`AlreadySettled`] if this future was already done.
    pub fn fail(&self, reason: Reason) -> Result<(), AlreadySettled> {
        let mut state = self.state.lock();
        if state.done {
            return Err(AlreadySettled);
        }
        state.done = true;
        state.reason = Some(reason);
        Ok(())
    }
}
