//! Tests for the MCP server tools.
//!
//! Uses wiremock to mock the FortiOS API and test tool dispatch.

use fortiapi::mcp::{EntityType, FortiServer, GetParams, ListParams, OrderParams};
use fortiapi::{Direction, FortiClient, OrderedCollection, SortKey};
use rmcp::handler::server::ServerHandler;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Extract text from CallToolResult content.
fn extract_text(result: &rmcp::model::CallToolResult) -> &str {
    let content = &result.content[0];
    content.raw.as_text().expect("Expected text content").text.as_str()
}

fn results(entries: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "results": entries,
        "status": "success",
        "http_status": 200
    }))
}

fn server_for(mock_server: &MockServer) -> FortiServer {
    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    FortiServer::new(client)
}

#[test]
fn get_info_names_the_server() {
    let client = FortiClient::new("test-token", "https://fw.example.com").unwrap();
    let info = FortiServer::new(client).get_info();

    assert_eq!(info.server_info.name, "fortiapi");
    assert!(info.capabilities.tools.is_some());
    assert!(info.instructions.unwrap().contains("sorted"));
}

#[tokio::test]
async fn test_mcp_get_policy_returns_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/policy/3"))
        .respond_with(results(serde_json::json!([{
            "policyid": 3,
            "name": "allow-web",
            "action": "accept"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = server_for(&mock_server)
        .handle_get(GetParams {
            entity: EntityType::Policy,
            id: "3".to_string(),
        })
        .await
        .expect("handle_get should succeed");

    assert!(!result.is_error.unwrap_or(false));
    let text = extract_text(&result);
    assert!(text.contains("allow-web"));
    assert!(text.contains("\"policyid\": 3"));
}

#[tokio::test]
async fn test_mcp_get_missing_service_is_resource_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall.service/custom/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = server_for(&mock_server)
        .handle_get(GetParams {
            entity: EntityType::Service,
            id: "nope".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.code, rmcp::model::ErrorCode::RESOURCE_NOT_FOUND);
    assert!(err.message.contains("nope"));
}

#[tokio::test]
async fn test_mcp_list_proxy_policies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/proxy-policy"))
        .respond_with(results(serde_json::json!([
            {"policyid": 2, "name": "guest"},
            {"policyid": 1, "name": "staff"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = server_for(&mock_server)
        .handle_list(ListParams {
            entity: EntityType::ProxyPolicy,
        })
        .await
        .unwrap();

    let items: serde_json::Value = serde_json::from_str(extract_text(&result)).unwrap();
    assert_eq!(items.as_array().unwrap().len(), 2);
    assert_eq!(items[0]["policyid"], 2);
}

#[tokio::test]
async fn test_mcp_sort_policies_by_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/policy"))
        .and(query_param("format", "policyid|name"))
        .respond_with(results(serde_json::json!([
            {"policyid": 1, "name": "b"},
            {"policyid": 2, "name": "a"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/cmdb/firewall/policy/1"))
        .and(query_param("action", "move"))
        .and(query_param("after", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = server_for(&mock_server)
        .handle_sort(OrderParams {
            collection: OrderedCollection::Policy,
            key: SortKey::Name,
            direction: Direction::Ascending,
        })
        .await
        .unwrap();

    let outcome: serde_json::Value = serde_json::from_str(extract_text(&result)).unwrap();
    assert_eq!(outcome, serde_json::json!({"entries": 2, "moves": 1}));
}

#[tokio::test]
async fn test_mcp_sort_reports_aborted_reorder_as_internal_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/policy"))
        .respond_with(results(serde_json::json!([
            {"policyid": 2, "name": "b"},
            {"policyid": 1, "name": "a"}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = server_for(&mock_server)
        .handle_sort(OrderParams {
            collection: OrderedCollection::Policy,
            key: SortKey::Id,
            direction: Direction::Ascending,
        })
        .await
        .unwrap_err();

    assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    assert!(err.message.contains("0 of 1"));
}

#[tokio::test]
async fn test_mcp_check_order_descending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/central-snat-map"))
        .and(query_param("format", "policyid"))
        .respond_with(results(serde_json::json!([
            {"policyid": 9},
            {"policyid": 4}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = server_for(&mock_server)
        .handle_check_order(OrderParams {
            collection: OrderedCollection::CentralSnatMap,
            key: SortKey::Id,
            direction: Direction::Descending,
        })
        .await
        .unwrap();

    let report: serde_json::Value = serde_json::from_str(extract_text(&result)).unwrap();
    assert_eq!(report["sorted"], true);
    assert_eq!(report["direction"], "descending");
}
