use console_framework::{Field, Resource, ResourceId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarStatus {
    #[default]
    Scheduled,
    Active,
    Finished,
}

/// A clan-versus-clan war.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct War {
    pub id: ResourceId,
    pub attacker_clan_id: ResourceId,
    pub defender_clan_id: ResourceId,
    #[serde(default)]
    pub status: WarStatus,
    /// RFC 3339 timestamp as sent by the backend.
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub winner_clan_id: Option<ResourceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarPatch {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub attacker_clan_id: Field<ResourceId>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub defender_clan_id: Field<ResourceId>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub status: Field<WarStatus>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub starts_at: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub winner_clan_id: Field<ResourceId>,
}

impl Resource for War {
    type Patch = WarPatch;
    const COLLECTION: &'static str = "wars";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn draft_defaults() -> WarPatch {
        WarPatch {
            status: Field::Value(WarStatus::Scheduled),
            ..Default::default()
        }
    }

    fn to_draft(&self) -> WarPatch {
        WarPatch {
            attacker_clan_id: Field::Value(self.attacker_clan_id),
            defender_clan_id: Field::Value(self.defender_clan_id),
            status: Field::Value(self.status),
            starts_at: Field::from_nullable(self.starts_at.clone()),
            winner_clan_id: Field::from_nullable(self.winner_clan_id),
        }
    }
}
