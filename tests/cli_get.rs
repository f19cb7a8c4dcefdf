//! Execution tests for the get and list commands.
//!
//! Uses wiremock to mock the FortiOS API and test the actual execution flow.

use fortiapi::{
    AddressGroup, CentralSnatMap, FortiClient, FortiError, Get, List, Policy, ServiceCustom,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn results(entries: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "http_method": "GET",
        "results": entries,
        "status": "success",
        "http_status": 200
    }))
}

#[tokio::test]
async fn test_get_policy_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/policy/7"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(results(serde_json::json!([{
            "policyid": 7,
            "name": "allow-dns",
            "action": "accept",
            "service": [{"name": "DNS"}]
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let policy = Policy::get(&client, 7).await.unwrap();

    assert_eq!(policy.policyid, 7);
    assert_eq!(policy.name, "allow-dns");
    assert_eq!(policy.service[0].name, "DNS");
}

#[tokio::test]
async fn test_get_missing_policy_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/policy/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "status": "error",
            "http_status": 404
        })))
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let err = Policy::get(&client, 99).await.unwrap_err();

    assert!(matches!(
        err,
        FortiError::NotFound {
            entity_type: "Policy",
            ..
        }
    ));
}

#[tokio::test]
async fn test_get_empty_results_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/central-snat-map/3"))
        .respond_with(results(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let err = CentralSnatMap::get(&client, 3).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_get_address_group_encodes_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/addrgrp/web%20servers"))
        .respond_with(results(serde_json::json!([{
            "name": "web servers",
            "member": [{"name": "web01"}]
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let group = AddressGroup::get(&client, "web servers".to_string())
        .await
        .unwrap();

    assert_eq!(group.name, "web servers");
    assert_eq!(group.member.len(), 1);
}

#[tokio::test]
async fn test_get_passes_vdom() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall.service/custom/HTTPS"))
        .and(query_param("vdom", "dmz"))
        .respond_with(results(serde_json::json!([{
            "name": "HTTPS",
            "tcp-portrange": "443"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri())
        .unwrap()
        .with_vdom("dmz");
    let service = ServiceCustom::get(&client, "HTTPS".to_string()).await.unwrap();

    assert_eq!(service.tcp_ranges(), ["443"]);
}

#[tokio::test]
async fn test_list_policies_keeps_table_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/policy"))
        .respond_with(results(serde_json::json!([
            {"policyid": 5, "name": "e"},
            {"policyid": 2, "name": "b"},
            {"policyid": 9, "name": "i"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let policies = Policy::list(&client).await.unwrap();

    let ids: Vec<u64> = policies.iter().map(|p| p.policyid).collect();
    assert_eq!(ids, [5, 2, 9]);
}

#[tokio::test]
async fn test_list_surfaces_api_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall.service/custom"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "status": "error",
            "http_status": 403,
            "error": -37
        })))
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let err = ServiceCustom::list(&client).await.unwrap_err();

    match err {
        FortiError::ApiError {
            message,
            status_code,
        } => {
            assert_eq!(status_code, Some(403));
            assert!(message.contains("error code -37"));
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/addrgrp"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let err = AddressGroup::list(&client).await.unwrap_err();

    assert!(matches!(
        err,
        FortiError::RateLimited {
            retry_after_secs: Some(30)
        }
    ));
}
