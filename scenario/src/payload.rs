//! Per-type `data` schemas. Every type tag the parser knows about resolves
//! to one of these, which in turn implements [`Lifecycle`] by handing the
//! `setup`/`teardown` argv straight to an [`Executor`].

use lifecycle::{Executor, Lifecycle};
use serde::Deserialize;

/// Shared shape of the `vm` and `vpn` payloads: an argv for each half of the
/// lifecycle. Kept as two distinct types (rather than one shared struct)
/// because new types are expected to diverge as fields are added to one but
/// not the other.
#[derive(Debug, Deserialize)]
pub struct Vm {
    setup: Vec<String>,
    teardown: Vec<String>,
}

impl Lifecycle for Vm {
    fn setup(&self) -> Executor {
        Executor::new(self.setup.clone())
    }

    fn teardown(&self) -> Executor {
        Executor::new(self.teardown.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct Vpn {
    setup: Vec<String>,
    teardown: Vec<String>,
}

impl Lifecycle for Vpn {
    fn setup(&self) -> Executor {
        Executor::new(self.setup.clone())
    }

    fn teardown(&self) -> Executor {
        Executor::new(self.teardown.clone())
    }
}
