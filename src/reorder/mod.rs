//! Ordered-table reconciliation.
//!
//! FortiOS keeps firewall policies, proxy policies and central SNAT maps in
//! evaluation order, and the only way to change that order is to move one
//! entry directly after (or before) another. This module sorts such a table
//! by id or name using nothing but that primitive:
//!
//! 1. fetch a `{id, key}` snapshot of the table in appliance order,
//! 2. stop early if the snapshot already satisfies the requested order,
//! 3. otherwise stable-sort the snapshot in memory and replay the result
//!    as one move per adjacent pair, stopping at the first rejected move.
//!
//! Nothing is cached between calls. A failed reorder leaves the table
//! partially sorted; sorting again recomputes from the new state.

mod check;
mod execute;
mod fetch;

use std::cmp::Ordering;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::{FortiClient, MovePosition};
use crate::error::Result;
use crate::models::{CentralSnatMap, Policy, ProxyPolicy};
use crate::traits::Reorder;

pub use check::is_sorted;
pub use execute::{plan, reconcile, replay, MoveAfter};
pub(crate) use fetch::fetch_projection;

/// Field a table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// The numeric entry id (`policyid`).
    Id,
    /// The entry name.
    Name,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Id => f.write_str("id"),
            SortKey::Name => f.write_str("name"),
        }
    }
}

/// Sort direction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    /// Compare two keys so that `Less` means `a` belongs before `b`.
    pub fn compare(self, a: &SortValue, b: &SortValue) -> Ordering {
        match self {
            Direction::Ascending => a.cmp(b),
            Direction::Descending => b.cmp(a),
        }
    }
}

/// Requested ordering of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SortSpec {
    pub key: SortKey,
    #[serde(default)]
    pub direction: Direction,
}

impl SortSpec {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: Direction::Ascending,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            direction: Direction::Descending,
        }
    }
}

/// A sort key value. Names compare byte-wise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum SortValue {
    Int(u64),
    Text(String),
}

impl From<u64> for SortValue {
    fn from(value: u64) -> Self {
        SortValue::Int(value)
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        SortValue::Text(value)
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_string())
    }
}

/// One entry of a table snapshot: its identifier and the key it sorts by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderedItem<I> {
    pub id: I,
    pub key: SortValue,
}

impl<I> OrderedItem<I> {
    pub fn new(id: I, key: impl Into<SortValue>) -> Self {
        Self {
            id,
            key: key.into(),
        }
    }
}

/// What a completed sort did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortOutcome {
    /// Entries in the snapshot.
    pub entries: usize,
    /// Move calls issued.
    pub moves: usize,
}

impl SortOutcome {
    /// True when the table was already in order and nothing was moved.
    pub fn is_noop(&self) -> bool {
        self.moves == 0
    }
}

/// The ordered tables, for callers that pick one at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderedCollection {
    /// `firewall/policy`
    Policy,
    /// `firewall/proxy-policy`
    ProxyPolicy,
    /// `firewall/central-snat-map`
    CentralSnatMap,
}

impl OrderedCollection {
    pub const ALL: [OrderedCollection; 3] = [
        OrderedCollection::Policy,
        OrderedCollection::ProxyPolicy,
        OrderedCollection::CentralSnatMap,
    ];

    /// Entity name used in errors and logs.
    pub fn entity(self) -> &'static str {
        match self {
            OrderedCollection::Policy => Policy::ENTITY,
            OrderedCollection::ProxyPolicy => ProxyPolicy::ENTITY,
            OrderedCollection::CentralSnatMap => CentralSnatMap::ENTITY,
        }
    }

    /// Keys this table can be sorted by.
    pub fn sort_keys(self) -> &'static [SortKey] {
        match self {
            OrderedCollection::Policy => Policy::SORT_KEYS,
            OrderedCollection::ProxyPolicy => ProxyPolicy::SORT_KEYS,
            OrderedCollection::CentralSnatMap => CentralSnatMap::SORT_KEYS,
        }
    }

    /// Sort the table on the appliance.
    pub async fn sort(self, client: &FortiClient, spec: SortSpec) -> Result<SortOutcome> {
        match self {
            OrderedCollection::Policy => Policy::sort(client, spec).await,
            OrderedCollection::ProxyPolicy => ProxyPolicy::sort(client, spec).await,
            OrderedCollection::CentralSnatMap => CentralSnatMap::sort(client, spec).await,
        }
    }

    /// Report whether the table already satisfies `spec`, without mutating it.
    pub async fn is_sorted(self, client: &FortiClient, spec: SortSpec) -> Result<bool> {
        match self {
            OrderedCollection::Policy => Policy::is_sorted(client, spec).await,
            OrderedCollection::ProxyPolicy => ProxyPolicy::is_sorted(client, spec).await,
            OrderedCollection::CentralSnatMap => CentralSnatMap::is_sorted(client, spec).await,
        }
    }

    /// Fetch the `{id, key}` snapshot in appliance order.
    pub async fn snapshot(
        self,
        client: &FortiClient,
        key: SortKey,
    ) -> Result<Vec<OrderedItem<u64>>> {
        match self {
            OrderedCollection::Policy => Policy::fetch_order(client, key).await,
            OrderedCollection::ProxyPolicy => ProxyPolicy::fetch_order(client, key).await,
            OrderedCollection::CentralSnatMap => CentralSnatMap::fetch_order(client, key).await,
        }
    }

    /// Move one entry directly after or before another.
    pub async fn move_entry(
        self,
        client: &FortiClient,
        id: u64,
        position: MovePosition,
        target: u64,
    ) -> Result<()> {
        match self {
            OrderedCollection::Policy => Policy::move_to(client, &id, position, &target).await,
            OrderedCollection::ProxyPolicy => {
                ProxyPolicy::move_to(client, &id, position, &target).await
            }
            OrderedCollection::CentralSnatMap => {
                CentralSnatMap::move_to(client, &id, position, &target).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_compare_mirrors_ascending() {
        let low = SortValue::Int(1);
        let high = SortValue::Int(2);
        assert_eq!(Direction::Ascending.compare(&low, &high), Ordering::Less);
        assert_eq!(Direction::Descending.compare(&low, &high), Ordering::Greater);
        assert_eq!(Direction::Descending.compare(&low, &low), Ordering::Equal);
    }

    #[test]
    fn test_text_keys_compare_bytewise() {
        let upper = SortValue::from("Zulu");
        let lower = SortValue::from("alpha");
        assert_eq!(Direction::Ascending.compare(&upper, &lower), Ordering::Less);
    }

    #[test]
    fn test_sort_spec_deserializes_with_default_direction() {
        let spec: SortSpec = serde_json::from_str(r#"{"key": "name"}"#).unwrap();
        assert_eq!(spec, SortSpec::ascending(SortKey::Name));
    }

    #[test]
    fn test_only_policies_sort_by_name() {
        for collection in OrderedCollection::ALL {
            assert!(collection.sort_keys().contains(&SortKey::Id));
        }
        assert!(OrderedCollection::Policy.sort_keys().contains(&SortKey::Name));
        assert!(!OrderedCollection::ProxyPolicy.sort_keys().contains(&SortKey::Name));
        assert!(!OrderedCollection::CentralSnatMap.sort_keys().contains(&SortKey::Name));
    }
}
