//! MCP Server handler for the FortiOS API.

use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData as McpError, Implementation,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
        ToolsCapability,
    },
    service::RequestContext,
    RoleServer,
};
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    mcp::{EntityType, GetParams, ListParams, OrderParams},
    AddressGroup, CentralSnatMap, FortiClient, FortiError, Get, List, Policy, ProxyPolicy,
    ServiceCustom,
};

/// FortiOS MCP Server.
///
/// Implements the MCP ServerHandler trait, providing tools to inspect
/// configuration tables and keep ordered tables sorted.
///
/// # Tools
///
/// - `get` - Fetch a single entry
/// - `list` - List a whole table
/// - `sort` - Sort an ordered table on the appliance
/// - `check_order` - Report whether an ordered table is sorted
///
/// # Example
///
/// ```no_run
/// use fortiapi::mcp::FortiServer;
///
/// # fn main() -> fortiapi::Result<()> {
/// let server = FortiServer::from_env()?;
/// // Server can now be used with rmcp transport
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FortiServer {
    client: Arc<FortiClient>,
}

impl FortiServer {
    /// Create a new FortiServer from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `FORTIOS_API_TOKEN` or `FORTIOS_API_URL` is not set.
    pub fn from_env() -> crate::Result<Self> {
        let client = FortiClient::from_env()?;
        Ok(Self::new(client))
    }

    /// Create a new FortiServer with an existing client.
    pub fn new(client: FortiClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Generate JSON Schema for a type.
    fn schema<T: JsonSchema>() -> Arc<serde_json::Map<String, serde_json::Value>> {
        let schema = schemars::schema_for!(T);
        let value = serde_json::to_value(&schema).unwrap_or(serde_json::json!({}));
        match value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        }
    }

    /// Convert FortiError to McpError.
    fn to_mcp_error(err: FortiError) -> McpError {
        match &err {
            FortiError::NotFound { entity_type, id } => {
                McpError::resource_not_found(format!("{entity_type} '{id}' not found"), None)
            }
            FortiError::ConfigMissing(msg) | FortiError::InvalidArgument(msg) => {
                McpError::invalid_params(msg.clone(), None)
            }
            FortiError::UnsupportedSortKey { .. } => {
                McpError::invalid_params(err.to_string(), None)
            }
            _ => McpError::internal_error(err.to_string(), None),
        }
    }

    fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    fn policy_id(id: &str) -> Result<u64, McpError> {
        id.parse()
            .map_err(|_| McpError::invalid_params("Policy id must be a number", None))
    }

    /// Handle the `get` tool.
    ///
    /// # Errors
    ///
    /// Returns an MCP error if a policy id is not numeric or the
    /// underlying API call fails.
    pub async fn handle_get(&self, params: GetParams) -> Result<CallToolResult, McpError> {
        let client = &self.client;
        match params.entity {
            EntityType::Policy => {
                let policy = Policy::get(client, Self::policy_id(&params.id)?)
                    .await
                    .map_err(Self::to_mcp_error)?;
                Self::json_result(&policy)
            }
            EntityType::ProxyPolicy => {
                let policy = ProxyPolicy::get(client, Self::policy_id(&params.id)?)
                    .await
                    .map_err(Self::to_mcp_error)?;
                Self::json_result(&policy)
            }
            EntityType::CentralSnatMap => {
                let entry = CentralSnatMap::get(client, Self::policy_id(&params.id)?)
                    .await
                    .map_err(Self::to_mcp_error)?;
                Self::json_result(&entry)
            }
            EntityType::AddressGroup => {
                let group = AddressGroup::get(client, params.id)
                    .await
                    .map_err(Self::to_mcp_error)?;
                Self::json_result(&group)
            }
            EntityType::Service => {
                let service = ServiceCustom::get(client, params.id)
                    .await
                    .map_err(Self::to_mcp_error)?;
                Self::json_result(&service)
            }
        }
    }

    /// Handle the `list` tool.
    pub async fn handle_list(&self, params: ListParams) -> Result<CallToolResult, McpError> {
        let client = &self.client;
        match params.entity {
            EntityType::Policy => {
                let items = Policy::list(client).await.map_err(Self::to_mcp_error)?;
                Self::json_result(&items)
            }
            EntityType::ProxyPolicy => {
                let items = ProxyPolicy::list(client)
                    .await
                    .map_err(Self::to_mcp_error)?;
                Self::json_result(&items)
            }
            EntityType::CentralSnatMap => {
                let items = CentralSnatMap::list(client)
                    .await
                    .map_err(Self::to_mcp_error)?;
                Self::json_result(&items)
            }
            EntityType::AddressGroup => {
                let items = AddressGroup::list(client)
                    .await
                    .map_err(Self::to_mcp_error)?;
                Self::json_result(&items)
            }
            EntityType::Service => {
                let items = ServiceCustom::list(client)
                    .await
                    .map_err(Self::to_mcp_error)?;
                Self::json_result(&items)
            }
        }
    }

    /// Handle the `sort` tool.
    pub async fn handle_sort(&self, params: OrderParams) -> Result<CallToolResult, McpError> {
        let outcome = params
            .collection
            .sort(&self.client, params.spec())
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json_result(&outcome)
    }

    /// Handle the `check_order` tool.
    pub async fn handle_check_order(&self, params: OrderParams) -> Result<CallToolResult, McpError> {
        let sorted = params
            .collection
            .is_sorted(&self.client, params.spec())
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json_result(&serde_json::json!({
            "collection": params.collection,
            "key": params.key,
            "direction": params.direction,
            "sorted": sorted,
        }))
    }
}

impl ServerHandler for FortiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "fortiapi".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "FortiOS API MCP Server - Inspect policies, SNAT maps, address groups and \
                 services, and keep ordered tables sorted."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = vec![
            Tool::new(
                "get",
                "Fetch a single FortiOS configuration entry. \
                 Policies, proxy policies and central SNAT entries by numeric policy id; \
                 address groups and services by name.",
                Self::schema::<GetParams>(),
            ),
            Tool::new(
                "list",
                "List a whole FortiOS table. Ordered tables are returned in evaluation order.",
                Self::schema::<ListParams>(),
            ),
            Tool::new(
                "sort",
                "Sort an ordered table (policy, proxy_policy, central_snat_map) on the \
                 appliance by id, or by name for policy. Changes evaluation order. \
                 Does nothing if already sorted.",
                Self::schema::<OrderParams>(),
            ),
            Tool::new(
                "check_order",
                "Report whether an ordered table is already sorted. Read-only.",
                Self::schema::<OrderParams>(),
            ),
        ];

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::json!({}));

        match request.name.as_ref() {
            "get" => {
                let params: GetParams = serde_json::from_value(args)
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                self.handle_get(params).await
            }
            "list" => {
                let params: ListParams = serde_json::from_value(args)
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                self.handle_list(params).await
            }
            "sort" => {
                let params: OrderParams = serde_json::from_value(args)
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                self.handle_sort(params).await
            }
            "check_order" => {
                let params: OrderParams = serde_json::from_value(args)
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                self.handle_check_order(params).await
            }
            other => Err(McpError::invalid_params(
                format!("Unknown tool: {other}"),
                None,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, OrderedCollection, SortKey};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            rmcp::model::RawContent::Text(t) => &t.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn schema_generates_for_params() {
        assert!(!FortiServer::schema::<GetParams>().is_empty());
        assert!(!FortiServer::schema::<ListParams>().is_empty());
        assert!(!FortiServer::schema::<OrderParams>().is_empty());
    }

    #[test]
    fn server_implements_handler() {
        fn assert_server_handler<T: ServerHandler>() {}
        assert_server_handler::<FortiServer>();
    }

    #[tokio::test]
    async fn handle_get_rejects_non_numeric_policy_id() {
        let mock_server = MockServer::start().await;
        let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
        let server = FortiServer::new(client);

        let params = GetParams {
            entity: EntityType::Policy,
            id: "allow-web".to_string(),
        };

        let err = server.handle_get(params).await.unwrap_err();
        assert!(err.message.contains("number"));
    }

    #[tokio::test]
    async fn handle_sort_returns_outcome() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/firewall/central-snat-map"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "results": [{"policyid": 2}, {"policyid": 1}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/api/v2/cmdb/firewall/central-snat-map/2"))
            .and(query_param("action", "move"))
            .and(query_param("after", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
        let server = FortiServer::new(client);

        let params = OrderParams {
            collection: OrderedCollection::CentralSnatMap,
            key: SortKey::Id,
            direction: Direction::Ascending,
        };

        let result = server.handle_sort(params).await.unwrap();
        assert!(!result.is_error.unwrap_or(false));

        let outcome: serde_json::Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(outcome["entries"], 2);
        assert_eq!(outcome["moves"], 1);
    }

    #[tokio::test]
    async fn handle_check_order_rejects_unsupported_key_without_calls() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
        let server = FortiServer::new(client);

        let params = OrderParams {
            collection: OrderedCollection::ProxyPolicy,
            key: SortKey::Name,
            direction: Direction::Ascending,
        };

        let err = server.handle_check_order(params).await.unwrap_err();
        assert!(err.message.contains("cannot be sorted by name"));
    }

    #[tokio::test]
    async fn handle_check_order_reports_sorted() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/firewall/policy"))
            .and(query_param("format", "policyid|name"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "results": [
                    {"policyid": 9, "name": "a-first"},
                    {"policyid": 2, "name": "b-second"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
        let server = FortiServer::new(client);

        let params = OrderParams {
            collection: OrderedCollection::Policy,
            key: SortKey::Name,
            direction: Direction::Ascending,
        };

        let result = server.handle_check_order(params).await.unwrap();
        let report: serde_json::Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(report["sorted"], true);
        assert_eq!(report["collection"], "policy");
    }

    #[tokio::test]
    async fn handle_list_address_groups() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/firewall/addrgrp"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "results": [{"name": "web-servers", "member": [{"name": "web01"}]}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
        let server = FortiServer::new(client);

        let result = server
            .handle_list(ListParams {
                entity: EntityType::AddressGroup,
            })
            .await
            .unwrap();

        let items: serde_json::Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(items[0]["name"], "web-servers");
    }
}
