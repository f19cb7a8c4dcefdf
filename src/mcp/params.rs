//! MCP tool parameter types with JSON Schema support.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::{Direction, OrderedCollection, SortKey, SortSpec};

/// Entity types supported by MCP tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Firewall policy (id = policyid).
    Policy,
    /// Proxy policy (id = policyid).
    ProxyPolicy,
    /// Central SNAT map entry (id = policyid).
    CentralSnatMap,
    /// Address group (id = name).
    AddressGroup,
    /// Custom service (id = name).
    Service,
}

/// Parameters for the `get` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetParams {
    /// The type of entity to fetch.
    pub entity: EntityType,
    /// The policy id, or the name for named objects.
    pub id: String,
}

/// Parameters for the `list` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListParams {
    /// The type of entity to list.
    pub entity: EntityType,
}

/// Parameters for the `sort` and `check_order` MCP tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OrderParams {
    /// The ordered table.
    pub collection: OrderedCollection,
    /// Field to order by (`name` is only available for `policy`).
    pub key: SortKey,
    /// Sort direction (defaults to ascending).
    #[serde(default)]
    pub direction: Direction,
}

impl OrderParams {
    pub fn spec(&self) -> SortSpec {
        SortSpec {
            key: self.key,
            direction: self.direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_params_schema_generates() {
        let schema = schemars::schema_for!(GetParams);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("entity"));
        assert!(json.contains("id"));
    }

    #[test]
    fn order_params_schema_generates() {
        let schema = schemars::schema_for!(OrderParams);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("collection"));
        assert!(json.contains("key"));
        assert!(json.contains("direction"));
        assert!(json.contains("central_snat_map"));
    }

    #[test]
    fn entity_type_schema_has_variants() {
        let schema = schemars::schema_for!(EntityType);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("policy"));
        assert!(json.contains("proxy_policy"));
        assert!(json.contains("address_group"));
        assert!(json.contains("service"));
    }

    #[test]
    fn get_params_deserializes() {
        let json = r#"{"entity": "address_group", "id": "web-servers"}"#;
        let params: GetParams = serde_json::from_str(json).unwrap();
        assert!(matches!(params.entity, EntityType::AddressGroup));
        assert_eq!(params.id, "web-servers");
    }

    #[test]
    fn order_params_default_to_ascending() {
        let json = r#"{"collection": "policy", "key": "name"}"#;
        let params: OrderParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.collection, OrderedCollection::Policy);
        assert_eq!(params.spec(), SortSpec::ascending(SortKey::Name));
    }

    #[test]
    fn order_params_reject_unknown_direction() {
        let json = r#"{"collection": "policy", "key": "id", "direction": "sideways"}"#;
        assert!(serde_json::from_str::<OrderParams>(json).is_err());
    }
}
