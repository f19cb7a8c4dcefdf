//! Mock server state management.
//!
//! Provides the in-memory CMDB for the mock FortiOS appliance. Tables are
//! keyed by `<category>/<collection>` (e.g. `firewall/policy`) and keep
//! their entries in evaluation order.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::MovePosition;

/// One configuration table.
#[derive(Debug, Clone)]
pub struct MockTable {
    /// Name of the master-key field (`policyid` or `name`).
    pub key_field: String,
    /// Entries in table order.
    pub entries: Vec<Value>,
}

impl MockTable {
    pub fn new(key_field: &str, entries: Vec<Value>) -> Self {
        Self {
            key_field: key_field.to_string(),
            entries,
        }
    }

    fn position(&self, mkey: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| mkey_of(e, &self.key_field).as_deref() == Some(mkey))
    }

    fn numeric(&self) -> bool {
        self.key_field == "policyid"
    }
}

/// A move request the appliance received, whether or not it was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub table: String,
    pub id: String,
    pub position: MovePosition,
    pub target: String,
    pub applied: bool,
}

/// Why a mutation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Table or entry does not exist.
    NotFound,
    /// The request is malformed or conflicts with existing state.
    Invalid,
    /// Injected failure.
    Injected,
}

/// Shared state for the mock server.
#[derive(Debug, Default)]
pub struct MockState {
    /// Tables indexed by `<category>/<collection>`.
    pub tables: HashMap<String, MockTable>,

    /// Every move request, in arrival order.
    pub moves: Vec<MoveRecord>,

    /// Reject the N-th move request (1-based, counted across all tables).
    pub fail_on_move: Option<usize>,

    /// Optional authentication token. If set, requests must carry it as a
    /// bearer token.
    pub required_token: Option<String>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add or replace a table.
    pub fn with_table(mut self, table: &str, key_field: &str, entries: Vec<Value>) -> Self {
        self.tables
            .insert(table.to_string(), MockTable::new(key_field, entries));
        self
    }

    /// Reject the N-th move request.
    pub fn with_fail_on_move(mut self, n: usize) -> Self {
        self.fail_on_move = Some(n);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    pub fn table(&self, table: &str) -> Option<&MockTable> {
        self.tables.get(table)
    }

    /// Master keys of a table in order.
    pub fn keys(&self, table: &str) -> Vec<String> {
        self.tables
            .get(table)
            .map(|t| {
                t.entries
                    .iter()
                    .filter_map(|e| mkey_of(e, &t.key_field))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get an entry by master key.
    pub fn get_entry(&self, table: &str, mkey: &str) -> Option<&Value> {
        let t = self.tables.get(table)?;
        t.position(mkey).map(|i| &t.entries[i])
    }

    /// Append an entry and return its master key.
    ///
    /// Numeric tables assign the next free id when the body has none (or 0).
    pub fn insert_entry(&mut self, table: &str, body: Value) -> Result<Value, Rejection> {
        let Value::Object(mut object) = body else {
            return Err(Rejection::Invalid);
        };
        let t = self.tables.get_mut(table).ok_or(Rejection::NotFound)?;

        if t.numeric() {
            let requested = object.get(&t.key_field).and_then(as_u64).unwrap_or(0);
            let id = if requested == 0 {
                t.entries
                    .iter()
                    .filter_map(|e| e.get(&t.key_field).and_then(as_u64))
                    .max()
                    .unwrap_or(0)
                    + 1
            } else {
                requested
            };
            object.insert(t.key_field.clone(), Value::from(id));
        }

        let mkey = object.get(&t.key_field).cloned().ok_or(Rejection::Invalid)?;
        let value = Value::Object(object);
        let key = mkey_of(&value, &t.key_field).ok_or(Rejection::Invalid)?;
        if t.position(&key).is_some() {
            return Err(Rejection::Invalid);
        }
        t.entries.push(value);
        Ok(mkey)
    }

    /// Merge `patch` into an entry. Renames are honored.
    pub fn update_entry(&mut self, table: &str, mkey: &str, patch: Value) -> Result<(), Rejection> {
        let Value::Object(patch) = patch else {
            return Err(Rejection::Invalid);
        };
        let t = self.tables.get_mut(table).ok_or(Rejection::NotFound)?;
        let index = t.position(mkey).ok_or(Rejection::NotFound)?;

        if let Some(Value::Object(entry)) = t.entries.get_mut(index) {
            merge(entry, patch);
        }
        Ok(())
    }

    /// Remove an entry.
    pub fn delete_entry(&mut self, table: &str, mkey: &str) -> Result<(), Rejection> {
        let t = self.tables.get_mut(table).ok_or(Rejection::NotFound)?;
        let index = t.position(mkey).ok_or(Rejection::NotFound)?;
        t.entries.remove(index);
        Ok(())
    }

    /// Relocate `id` directly after or before `target`.
    ///
    /// Every call is logged and counts toward `fail_on_move`.
    pub fn move_entry(
        &mut self,
        table: &str,
        id: &str,
        position: MovePosition,
        target: &str,
    ) -> Result<(), Rejection> {
        let call = self.moves.len() + 1;
        let result = if self.fail_on_move == Some(call) {
            Err(Rejection::Injected)
        } else {
            self.relocate(table, id, position, target)
        };

        self.moves.push(MoveRecord {
            table: table.to_string(),
            id: id.to_string(),
            position,
            target: target.to_string(),
            applied: result.is_ok(),
        });
        result
    }

    fn relocate(
        &mut self,
        table: &str,
        id: &str,
        position: MovePosition,
        target: &str,
    ) -> Result<(), Rejection> {
        if id == target {
            return Err(Rejection::Invalid);
        }
        let t = self.tables.get_mut(table).ok_or(Rejection::NotFound)?;
        let from = t.position(id).ok_or(Rejection::NotFound)?;
        t.position(target).ok_or(Rejection::NotFound)?;

        let entry = t.entries.remove(from);
        let anchor = t.position(target).ok_or(Rejection::NotFound)?;
        let to = match position {
            MovePosition::After => anchor + 1,
            MovePosition::Before => anchor,
        };
        t.entries.insert(to, entry);
        Ok(())
    }

    /// Moves that reached the table.
    pub fn applied_moves(&self) -> impl Iterator<Item = &MoveRecord> {
        self.moves.iter().filter(|m| m.applied)
    }
}

/// Render an entry's master key the way it appears in a URL.
pub(crate) fn mkey_of(entry: &Value, key_field: &str) -> Option<String> {
    match entry.get(key_field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn merge(entry: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (field, value) in patch {
        entry.insert(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policies(ids: &[u64]) -> MockState {
        let entries = ids
            .iter()
            .map(|id| json!({"policyid": id, "name": format!("p{id}")}))
            .collect();
        MockState::new().with_table("firewall/policy", "policyid", entries)
    }

    #[test]
    fn test_move_after_and_before() {
        let mut state = policies(&[30, 10, 20]);

        state
            .move_entry("firewall/policy", "30", MovePosition::After, "20")
            .unwrap();
        assert_eq!(state.keys("firewall/policy"), ["10", "20", "30"]);

        state
            .move_entry("firewall/policy", "20", MovePosition::Before, "10")
            .unwrap();
        assert_eq!(state.keys("firewall/policy"), ["20", "10", "30"]);
        assert_eq!(state.moves.len(), 2);
    }

    #[test]
    fn test_move_to_missing_target_is_rejected_and_logged() {
        let mut state = policies(&[1, 2]);

        let result = state.move_entry("firewall/policy", "1", MovePosition::After, "99");
        assert_eq!(result, Err(Rejection::NotFound));
        assert_eq!(state.keys("firewall/policy"), ["1", "2"]);
        assert_eq!(state.moves.len(), 1);
        assert!(!state.moves[0].applied);
    }

    #[test]
    fn test_injected_failure_hits_only_the_nth_move() {
        let mut state = policies(&[3, 2, 1]).with_fail_on_move(2);

        assert!(state
            .move_entry("firewall/policy", "2", MovePosition::Before, "3")
            .is_ok());
        assert_eq!(
            state.move_entry("firewall/policy", "1", MovePosition::Before, "2"),
            Err(Rejection::Injected)
        );
        assert!(state
            .move_entry("firewall/policy", "1", MovePosition::Before, "2")
            .is_ok());
        assert_eq!(state.keys("firewall/policy"), ["1", "2", "3"]);
        assert_eq!(state.applied_moves().count(), 2);
    }

    #[test]
    fn test_insert_assigns_next_policy_id() {
        let mut state = policies(&[4, 9]);

        let mkey = state
            .insert_entry("firewall/policy", json!({"name": "new"}))
            .unwrap();
        assert_eq!(mkey, json!(10));
        assert_eq!(state.keys("firewall/policy"), ["4", "9", "10"]);
    }

    #[test]
    fn test_insert_duplicate_name_is_rejected() {
        let mut state = MockState::new().with_table(
            "firewall/addrgrp",
            "name",
            vec![json!({"name": "web"})],
        );

        let result = state.insert_entry("firewall/addrgrp", json!({"name": "web"}));
        assert_eq!(result, Err(Rejection::Invalid));
    }

    #[test]
    fn test_update_renames_entry() {
        let mut state = MockState::new().with_table(
            "firewall/addrgrp",
            "name",
            vec![json!({"name": "web", "comment": "old"})],
        );

        state
            .update_entry("firewall/addrgrp", "web", json!({"name": "web-v2"}))
            .unwrap();
        assert!(state.get_entry("firewall/addrgrp", "web").is_none());
        assert_eq!(
            state.get_entry("firewall/addrgrp", "web-v2").unwrap()["comment"],
            "old"
        );
    }
}
