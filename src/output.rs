//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::models::join_names;
use crate::{AddressGroup, CentralSnatMap, Policy, ProxyPolicy, ServiceCustom, SortOutcome};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(title: String) -> Vec<String> {
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

fn push_opt(lines: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        lines.push(format!("{label:<16}{value}"));
    }
}

impl PrettyPrint for Policy {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Policy #{}", self.policyid));

        push_opt(&mut lines, "Name:", Some(&self.name));
        push_opt(&mut lines, "Action:", self.action.as_deref());
        push_opt(&mut lines, "Status:", self.status.as_deref());
        lines.push(format!(
            "{:<16}{} -> {}",
            "Interfaces:",
            join_names(&self.srcintf),
            join_names(&self.dstintf)
        ));
        lines.push(format!(
            "{:<16}{} -> {}",
            "Addresses:",
            join_names(&self.srcaddr),
            join_names(&self.dstaddr)
        ));
        push_opt(&mut lines, "Services:", Some(&join_names(&self.service)));
        push_opt(&mut lines, "Schedule:", self.schedule.as_deref());
        push_opt(&mut lines, "NAT:", self.nat.as_deref());
        push_opt(&mut lines, "Logging:", self.logtraffic.as_deref());
        push_opt(&mut lines, "Comments:", self.comments.as_deref());

        lines.join("\n")
    }
}

impl PrettyPrint for ProxyPolicy {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Proxy Policy #{}", self.policyid));

        push_opt(&mut lines, "Name:", self.name.as_deref());
        push_opt(&mut lines, "Proxy:", self.proxy.as_deref());
        push_opt(&mut lines, "Action:", self.action.as_deref());
        push_opt(&mut lines, "Status:", self.status.as_deref());
        lines.push(format!(
            "{:<16}{} -> {}",
            "Addresses:",
            join_names(&self.srcaddr),
            join_names(&self.dstaddr)
        ));
        push_opt(&mut lines, "Comments:", self.comments.as_deref());

        lines.join("\n")
    }
}

impl PrettyPrint for CentralSnatMap {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Central SNAT #{}", self.policyid));

        push_opt(&mut lines, "Status:", self.status.as_deref());
        lines.push(format!(
            "{:<16}{} -> {}",
            "Interfaces:",
            join_names(&self.srcintf),
            join_names(&self.dstintf)
        ));
        lines.push(format!(
            "{:<16}{} -> {}",
            "Addresses:",
            join_names(&self.orig_addr),
            join_names(&self.dst_addr)
        ));
        push_opt(&mut lines, "NAT:", self.nat.as_deref());
        push_opt(&mut lines, "IP Pools:", Some(&join_names(&self.nat_ippool)));

        lines.join("\n")
    }
}

impl PrettyPrint for AddressGroup {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Address Group: {}", self.name));

        lines.push(format!("{:<16}{}", "Members:", self.member.len()));
        for member in &self.member {
            lines.push(format!("  - {}", member.name));
        }
        push_opt(&mut lines, "Comment:", self.comment.as_deref());

        lines.join("\n")
    }
}

impl PrettyPrint for ServiceCustom {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Service: {}", self.name));

        push_opt(&mut lines, "Protocol:", self.protocol.as_deref());
        push_opt(&mut lines, "TCP Ports:", self.tcp_portrange.as_deref());
        push_opt(&mut lines, "UDP Ports:", self.udp_portrange.as_deref());
        push_opt(&mut lines, "Category:", self.category.as_deref());

        lines.join("\n")
    }
}

impl PrettyPrint for SortOutcome {
    fn pretty_print(&self) -> String {
        if self.is_noop() {
            format!("Already sorted ({} entries, no moves)", self.entries)
        } else {
            format!("Sorted {} entries with {} moves", self.entries, self.moves)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_pretty_print_format() {
        let policy: Policy = serde_json::from_value(serde_json::json!({
            "policyid": 4,
            "name": "allow-dns",
            "action": "accept",
            "srcaddr": [{"name": "lan"}],
            "dstaddr": [{"name": "dns-servers"}],
            "comments": ""
        }))
        .unwrap();

        let output = policy.pretty_print();
        assert!(output.starts_with("Policy #4"));
        assert!(output.contains("allow-dns"));
        assert!(output.contains("lan -> dns-servers"));
        assert!(!output.contains("Comments:"));
    }

    #[test]
    fn test_outcome_pretty_print() {
        let noop = SortOutcome {
            entries: 3,
            moves: 0,
        };
        assert!(noop.pretty_print().starts_with("Already sorted"));

        let sorted = SortOutcome {
            entries: 3,
            moves: 2,
        };
        assert_eq!(sorted.pretty_print(), "Sorted 3 entries with 2 moves");
    }
}
