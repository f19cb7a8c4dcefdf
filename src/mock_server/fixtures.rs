//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic CMDB entries.

use serde_json::{json, Value};

use super::state::MockState;

pub const POLICY_TABLE: &str = "firewall/policy";
pub const PROXY_POLICY_TABLE: &str = "firewall/proxy-policy";
pub const CENTRAL_SNAT_TABLE: &str = "firewall/central-snat-map";
pub const ADDRESS_GROUP_TABLE: &str = "firewall/addrgrp";
pub const SERVICE_TABLE: &str = "firewall.service/custom";

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Ordered tables
    // =========================================================================

    /// A firewall policy with the usual any-to-any shape.
    pub fn policy(policyid: u64, name: &str) -> Value {
        json!({
            "policyid": policyid,
            "name": name,
            "status": "enable",
            "action": "accept",
            "srcintf": [{"name": "port1"}],
            "dstintf": [{"name": "port2"}],
            "srcaddr": [{"name": "all"}],
            "dstaddr": [{"name": "all"}],
            "service": [{"name": "HTTPS"}],
            "schedule": "always",
            "nat": "disable",
            "logtraffic": "utm",
            "comments": ""
        })
    }

    pub fn proxy_policy(policyid: u64, name: &str) -> Value {
        json!({
            "policyid": policyid,
            "name": name,
            "proxy": "explicit-web",
            "action": "accept",
            "srcaddr": [{"name": "all"}],
            "dstaddr": [{"name": "all"}],
            "service": [{"name": "webproxy"}],
            "status": "enable"
        })
    }

    pub fn snat_entry(policyid: u64, orig_addr: &str) -> Value {
        json!({
            "policyid": policyid,
            "status": "enable",
            "orig-addr": [{"name": orig_addr}],
            "dst-addr": [{"name": "all"}],
            "protocol": 0,
            "nat": "enable",
            "nat-ippool": [],
            "comments": ""
        })
    }

    // =========================================================================
    // Named objects
    // =========================================================================

    pub fn address_group(name: &str, members: &[&str]) -> Value {
        let member: Vec<Value> = members.iter().map(|m| json!({"name": m})).collect();
        json!({
            "name": name,
            "type": "default",
            "member": member,
            "comment": "",
            "color": 0
        })
    }

    pub fn service(name: &str, tcp_portrange: &str) -> Value {
        json!({
            "name": name,
            "protocol": "TCP/UDP/SCTP",
            "tcp-portrange": tcp_portrange,
            "udp-portrange": "",
            "category": "General",
            "comment": ""
        })
    }

    /// Policies in the order given, named `<name>`.
    pub fn policies(entries: &[(u64, &str)]) -> Vec<Value> {
        entries
            .iter()
            .map(|(id, name)| Self::policy(*id, name))
            .collect()
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// A small appliance whose ordered tables are all out of order.
    pub fn default_scenario() -> MockState {
        MockState::new()
            .with_table(
                POLICY_TABLE,
                "policyid",
                Self::policies(&[(30, "web-out"), (10, "dns-out"), (20, "mail-in")]),
            )
            .with_table(
                PROXY_POLICY_TABLE,
                "policyid",
                vec![
                    Self::proxy_policy(3, "guest-web"),
                    Self::proxy_policy(1, "staff-web"),
                    Self::proxy_policy(2, "contractor-web"),
                ],
            )
            .with_table(
                CENTRAL_SNAT_TABLE,
                "policyid",
                vec![
                    Self::snat_entry(2, "lan-subnet"),
                    Self::snat_entry(1, "dmz-subnet"),
                ],
            )
            .with_table(
                ADDRESS_GROUP_TABLE,
                "name",
                vec![
                    Self::address_group("web-servers", &["web01", "web02"]),
                    Self::address_group("mail-servers", &["mx01"]),
                ],
            )
            .with_table(
                SERVICE_TABLE,
                "name",
                vec![
                    Self::service("HTTPS", "443"),
                    Self::service("app-ports", "8080-8090 9443"),
                ],
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_tables() {
        let state = Fixtures::default_scenario();
        assert_eq!(state.keys(POLICY_TABLE), ["30", "10", "20"]);
        assert_eq!(state.keys(PROXY_POLICY_TABLE), ["3", "1", "2"]);
        assert_eq!(state.keys(ADDRESS_GROUP_TABLE), ["web-servers", "mail-servers"]);
        assert!(state.get_entry(SERVICE_TABLE, "HTTPS").is_some());
    }

    #[test]
    fn test_policy_fixture_deserializes() {
        let policy: crate::Policy = serde_json::from_value(Fixtures::policy(7, "x")).unwrap();
        assert_eq!(policy.policyid, 7);
        assert_eq!(policy.name, "x");
    }

    #[test]
    fn test_snat_fixture_deserializes() {
        let entry: crate::CentralSnatMap =
            serde_json::from_value(Fixtures::snat_entry(2, "lan")).unwrap();
        assert_eq!(entry.policyid, 2);
        assert_eq!(entry.orig_addr[0].name, "lan");
    }
}
