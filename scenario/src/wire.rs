//! The JSON shape a scenario arrives in, decoded only as far as the
//! recursive tree structure -- each node's `data` payload is left as a raw
//! [`serde_json::Value`] until the parser knows which `type` schema to
//! decode it against.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ScenarioNode {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub name: String,
    #[serde(default)]
    pub awaits: Vec<String>,
    #[serde(default)]
    pub completes: Vec<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub children: Vec<ScenarioNode>,
}
