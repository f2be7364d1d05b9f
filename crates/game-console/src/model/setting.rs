use console_framework::{Field, Resource, ResourceId};
use serde::{Deserialize, Serialize};

/// A runtime key/value setting of the game server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub id: ResourceId,
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub is_system: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingPatch {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub key: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub value: Field<String>,
}

impl Resource for Setting {
    type Patch = SettingPatch;
    const COLLECTION: &'static str = "settings";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn is_guarded(&self) -> bool {
        self.is_system
    }

    fn guard_message(&self) -> String {
        format!("Setting \"{}\" is managed by the server", self.key)
    }

    fn to_draft(&self) -> SettingPatch {
        SettingPatch {
            key: Field::Value(self.key.clone()),
            value: Field::from_nullable(self.value.clone()),
        }
    }
}
