//! CLI output formatting tests.
//!
//! - JSON output with --json flag
//! - Pretty-print output as default

use fortiapi::{AddressGroup, CentralSnatMap, Policy, PrettyPrint, ServiceCustom, SortOutcome};

fn make_test_policy() -> Policy {
    serde_json::from_value(serde_json::json!({
        "policyid": 12,
        "name": "web-out",
        "status": "enable",
        "action": "accept",
        "srcintf": [{"name": "internal"}],
        "dstintf": [{"name": "wan1"}],
        "srcaddr": [{"name": "lan-subnet"}],
        "dstaddr": [{"name": "all"}],
        "service": [{"name": "HTTP"}, {"name": "HTTPS"}],
        "schedule": "always",
        "nat": "enable",
        "logtraffic": "all",
        "comments": "outbound browsing"
    }))
    .unwrap()
}

// ============================================================================
// JSON Output Tests
// ============================================================================

#[test]
fn test_json_output_uses_appliance_field_names() {
    let policy = make_test_policy();
    let json_output = serde_json::to_string_pretty(&policy).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert_eq!(parsed["policyid"], 12);
    assert_eq!(parsed["srcaddr"][0]["name"], "lan-subnet");
    assert_eq!(parsed["logtraffic"], "all");
}

#[test]
fn test_json_output_for_snat_is_kebab_case() {
    let entry: CentralSnatMap = serde_json::from_value(serde_json::json!({
        "policyid": "3",
        "orig-addr": [{"name": "lan"}],
        "dst-addr": [{"name": "all"}],
        "nat-ippool": [{"name": "pool1"}]
    }))
    .unwrap();

    let parsed = serde_json::to_value(&entry).unwrap();
    assert_eq!(parsed["policyid"], 3);
    assert_eq!(parsed["orig-addr"][0]["name"], "lan");
    assert!(parsed.get("orig_addr").is_none());
}

#[test]
fn test_json_flag_for_list_outputs_array() {
    let policies = vec![make_test_policy(), make_test_policy()];
    let json_output = serde_json::to_string_pretty(&policies).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
}

#[test]
fn test_sort_outcome_json() {
    let outcome = SortOutcome {
        entries: 5,
        moves: 4,
    };
    let parsed = serde_json::to_value(outcome).unwrap();
    assert_eq!(parsed, serde_json::json!({"entries": 5, "moves": 4}));
}

// ============================================================================
// Pretty-Print Tests
// ============================================================================

#[test]
fn test_default_output_is_not_json() {
    let pretty_output = make_test_policy().pretty_print();

    let parse_result: Result<serde_json::Value, _> = serde_json::from_str(&pretty_output);
    assert!(parse_result.is_err(), "Default output should NOT be valid JSON");
}

#[test]
fn test_policy_pretty_print_shows_key_fields() {
    let output = make_test_policy().pretty_print();

    assert!(output.contains("Policy #12"));
    assert!(output.contains("web-out"));
    assert!(output.contains("internal -> wan1"));
    assert!(output.contains("HTTP, HTTPS"));
    assert!(output.contains("outbound browsing"));
}

#[test]
fn test_address_group_pretty_print_lists_members() {
    let group: AddressGroup = serde_json::from_value(serde_json::json!({
        "name": "web-servers",
        "member": [{"name": "web01"}, {"name": "web02"}]
    }))
    .unwrap();

    let output = group.pretty_print();
    assert!(output.contains("Address Group: web-servers"));
    assert!(output.contains("  - web01"));
    assert!(output.contains("  - web02"));
}

#[test]
fn test_service_pretty_print_skips_empty_ranges() {
    let service: ServiceCustom = serde_json::from_value(serde_json::json!({
        "name": "HTTPS",
        "protocol": "TCP/UDP/SCTP",
        "tcp-portrange": "443",
        "udp-portrange": ""
    }))
    .unwrap();

    let output = service.pretty_print();
    assert!(output.contains("443"));
    assert!(!output.contains("UDP Ports:"));
}

#[test]
fn test_sort_outcome_pretty_print() {
    let outcome = SortOutcome {
        entries: 0,
        moves: 0,
    };
    assert_eq!(outcome.pretty_print(), "Already sorted (0 entries, no moves)");
}
