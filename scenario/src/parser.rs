//! Depth-first conversion of a decoded scenario tree into a flat list of
//! scheduler [`Object`]s, wiring up shared [`Future`]s as it goes.
//!
//! A single traversal resolves both the forward-reference case (an
//! `awaits` mentions a future before anything `completes` it) and the
//! well-formedness checks: every future must end up with exactly one
//! completer.

use std::collections::BTreeSet;
use std::io::Read;
use std::sync::Arc;

use future::Future;
use lifecycle::Lifecycle;
use scheduler::Object;

use crate::error::{Error, GraphError, ParseError};
use crate::payload::{Vm, Vpn};
use crate::wire::ScenarioNode;

/// Parses a scenario from `reader` and returns its objects in declaration
/// order (depth-first, post-order -- a node is appended only after all of
/// its children have been).
pub fn parse(reader: impl Read) -> Result<Vec<Arc<Object>>, Error> {
    let root: ScenarioNode = serde_json::from_reader(reader).map_err(ParseError::Json)?;
    let mut parser = Parser::default();
    parser.convert(&root)?;
    parser.finish()
}

#[derive(Default)]
struct Parser {
    futures: std::collections::HashMap<String, Future>,
    unresolved: BTreeSet<String>,
    duplicated: BTreeSet<String>,
    objects: Vec<Arc<Object>>,
}

impl Parser {
    /// A name declared as a `completes` entry: reuses an existing future
    /// (clearing it from `unresolved` if this was the forward-reference
    /// case), records a second declaration as `duplicated`, or creates a
    /// fresh future.
    fn make_future(&mut self, name: &str) -> Future {
        if let Some(existing) = self.futures.get(name) {
            let existing = existing.clone();
            if !self.unresolved.remove(name) {
                self.duplicated.insert(name.to_string());
            }
            return existing;
        }
        let future = Future::new(name);
        self.futures.insert(name.to_string(), future.clone());
        future
    }

    /// A name declared as an `awaits` entry: reuses an existing future, or
    /// creates one and marks it `unresolved` until something completes it.
    fn make_future_ref(&mut self, name: &str) -> Future {
        if let Some(existing) = self.futures.get(name) {
            return existing.clone();
        }
        let future = Future::new(name);
        self.futures.insert(name.to_string(), future.clone());
        self.unresolved.insert(name.to_string());
        future
    }

    fn convert(&mut self, node: &ScenarioNode) -> Result<(), ParseError> {
        let lifecycle = build_lifecycle(&node.type_tag, node.data.as_ref())?;

        let completes = node
            .completes
            .iter()
            .map(|name| self.make_future(name))
            .collect();
        let awaits = node
            .awaits
            .iter()
            .map(|name| self.make_future_ref(name))
            .collect();

        for child in &node.children {
            self.convert(child)?;
        }

        self.objects.push(Arc::new(Object::new(
            node.name.clone(),
            lifecycle,
            awaits,
            completes,
        )));
        Ok(())
    }

    fn finish(self) -> Result<Vec<Arc<Object>>, Error> {
        if !self.unresolved.is_empty() {
            return Err(GraphError::Unresolved(self.unresolved.into_iter().collect()).into());
        }
        if !self.duplicated.is_empty() {
            return Err(GraphError::Duplicated(self.duplicated.into_iter().collect()).into());
        }
        Ok(self.objects)
    }
}

/// Resolves `type_tag` to a payload schema and decodes `data` into it. A
/// `data`-less node (`None`) has no lifecycle at all, regardless of type.
fn build_lifecycle(
    type_tag: &str,
    data: Option<&serde_json::Value>,
) -> Result<Option<Arc<dyn Lifecycle + Send + Sync>>, ParseError> {
    let Some(data) = data else {
        return Ok(None);
    };
    if data.is_null() {
        return Ok(None);
    }
    let lifecycle: Arc<dyn Lifecycle + Send + Sync> = match type_tag {
        "vm" => Arc::new(serde_json::from_value::<Vm>(data.clone()).map_err(|e| {
            ParseError::BadData {
                type_tag: type_tag.to_string(),
                source: e,
            }
        })?),
        "vpn" => Arc::new(serde_json::from_value::<Vpn>(data.clone()).map_err(|e| {
            ParseError::BadData {
                type_tag: type_tag.to_string(),
                source: e,
            }
        })?),
        other => return Err(ParseError::UnknownType(other.to_string())),
    };
    Ok(Some(lifecycle))
}
