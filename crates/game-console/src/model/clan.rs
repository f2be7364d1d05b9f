use console_framework::{Field, Resource, ResourceId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clan {
    pub id: ResourceId,
    pub name: String,
    pub tag: String,
    #[serde(default)]
    pub leader_id: Option<ResourceId>,
    #[serde(default)]
    pub member_ids: Vec<ResourceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanPatch {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub tag: Field<String>,
    /// Picked with a single-user selector.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub leader_id: Field<ResourceId>,
    /// Picked with a multi-user selector.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub member_ids: Field<Vec<ResourceId>>,
}

impl Resource for Clan {
    type Patch = ClanPatch;
    const COLLECTION: &'static str = "clans";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn draft_defaults() -> ClanPatch {
        ClanPatch {
            member_ids: Field::Value(Vec::new()),
            ..Default::default()
        }
    }

    fn to_draft(&self) -> ClanPatch {
        ClanPatch {
            name: Field::Value(self.name.clone()),
            tag: Field::Value(self.tag.clone()),
            leader_id: Field::from_nullable(self.leader_id),
            member_ids: Field::Value(self.member_ids.clone()),
        }
    }
}
