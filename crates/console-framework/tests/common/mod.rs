#![allow(dead_code)]

use console_framework::mock::MockTransport;
use console_framework::{
    ConsoleConfig, Field, MemoryNavigator, Resource, ResourceGateway, ResourceId,
    ResourceListController, Session, SessionClient, Transport,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

// --- Test Entity ---

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub kit_ids: Option<Vec<ResourceId>>,
    #[serde(default)]
    pub is_system: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub price: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub kit_ids: Field<Vec<ResourceId>>,
}

impl Resource for Item {
    type Patch = ItemPatch;
    const COLLECTION: &'static str = "items";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn is_guarded(&self) -> bool {
        self.is_system
    }

    fn draft_defaults() -> ItemPatch {
        ItemPatch {
            price: Field::Value(0),
            ..Default::default()
        }
    }

    fn to_draft(&self) -> ItemPatch {
        ItemPatch {
            name: Field::Value(self.name.clone()),
            price: Field::Value(self.price),
            kit_ids: Field::from_nullable(self.kit_ids.clone()),
        }
    }
}

// --- Fixtures ---

pub fn item(id: ResourceId, name: &str) -> Value {
    json!({ "id": id, "name": name, "price": id * 10 })
}

pub fn system_item(id: ResourceId, name: &str) -> Value {
    json!({ "id": id, "name": name, "price": 0, "isSystem": true })
}

/// A list envelope whose rows are numbered from the page offset.
pub fn page(page: u32, limit: u32, total: u64) -> Value {
    let first = u64::from((page - 1) * limit) + 1;
    let last = (first + u64::from(limit) - 1).min(total);
    let data: Vec<Value> = (first..=last)
        .map(|id| item(id as ResourceId, &format!("item-{id}")))
        .collect();
    json!({ "data": data, "total": total, "page": page, "limit": limit })
}

pub fn list_path(page: u32) -> String {
    format!("/items?page={page}&limit=10")
}

pub fn client(
    transport: Arc<dyn Transport>,
    config: &ConsoleConfig,
    start: &str,
) -> (Arc<SessionClient>, Arc<MemoryNavigator>) {
    let navigator = Arc::new(MemoryNavigator::new(start));
    let client = Arc::new(SessionClient::new(
        transport,
        Arc::new(Session::new()),
        navigator.clone(),
        config,
    ));
    (client, navigator)
}

pub fn screen(mock: &MockTransport) -> ResourceListController<Item> {
    let (client, _) = client(Arc::new(mock.clone()), &ConsoleConfig::default(), "/items");
    ResourceListController::new(ResourceGateway::new(client), 10)
}

pub fn screen_with_navigator(
    mock: &MockTransport,
) -> (ResourceListController<Item>, Arc<MemoryNavigator>) {
    let (client, navigator) =
        client(Arc::new(mock.clone()), &ConsoleConfig::default(), "/items");
    (
        ResourceListController::new(ResourceGateway::new(client), 10),
        navigator,
    )
}
