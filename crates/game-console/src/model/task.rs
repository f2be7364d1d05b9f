use console_framework::{Field, Resource, ResourceId};
use serde::{Deserialize, Serialize};

/// A quest players complete for coins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reward_coins: i64,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub title: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub description: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub reward_coins: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub is_active: Field<bool>,
}

impl Resource for Task {
    type Patch = TaskPatch;
    const COLLECTION: &'static str = "tasks";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn draft_defaults() -> TaskPatch {
        TaskPatch {
            reward_coins: Field::Value(0),
            is_active: Field::Value(true),
            ..Default::default()
        }
    }

    fn to_draft(&self) -> TaskPatch {
        TaskPatch {
            title: Field::Value(self.title.clone()),
            description: Field::from_nullable(self.description.clone()),
            reward_coins: Field::Value(self.reward_coins),
            is_active: Field::Value(self.is_active),
        }
    }
}
