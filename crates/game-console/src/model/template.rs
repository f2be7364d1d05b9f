use console_framework::{Field, Resource, ResourceId};
use serde::{Deserialize, Serialize};

/// Item template: the static definition game items are minted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub power: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub rarity: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub power: Field<i64>,
}

impl Resource for Template {
    type Patch = TemplatePatch;
    const COLLECTION: &'static str = "templates";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn draft_defaults() -> TemplatePatch {
        TemplatePatch {
            rarity: Field::Value("common".to_string()),
            power: Field::Value(0),
            ..Default::default()
        }
    }

    fn to_draft(&self) -> TemplatePatch {
        TemplatePatch {
            name: Field::Value(self.name.clone()),
            rarity: Field::Value(self.rarity.clone()),
            power: Field::Value(self.power),
        }
    }
}
