use console_framework::{Field, Resource, ResourceId};
use serde::{Deserialize, Serialize};

/// A bundle of item templates granted together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kit {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template_ids: Vec<ResourceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KitPatch {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub description: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub template_ids: Field<Vec<ResourceId>>,
}

impl Resource for Kit {
    type Patch = KitPatch;
    const COLLECTION: &'static str = "kits";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn draft_defaults() -> KitPatch {
        KitPatch {
            template_ids: Field::Value(Vec::new()),
            ..Default::default()
        }
    }

    fn to_draft(&self) -> KitPatch {
        KitPatch {
            name: Field::Value(self.name.clone()),
            description: Field::from_nullable(self.description.clone()),
            template_ids: Field::Value(self.template_ids.clone()),
        }
    }
}
