//! Types shared by several tables.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::reorder::OrderedItem;

/// A reference to another CMDB object by name, as FortiOS nests them:
/// `"srcaddr": [{"name": "all"}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NamedRef {
    pub name: String,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for NamedRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Join reference names for display.
pub fn join_names(refs: &[NamedRef]) -> String {
    refs.iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The `policyid` projection of tables that only sort by id.
#[serde_as]
#[derive(Debug, Deserialize)]
pub(crate) struct PolicyIdEntry {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub(crate) policyid: u64,
}

impl From<PolicyIdEntry> for OrderedItem<u64> {
    fn from(entry: PolicyIdEntry) -> Self {
        OrderedItem::new(entry.policyid, entry.policyid)
    }
}
