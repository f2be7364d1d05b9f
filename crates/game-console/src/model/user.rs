use console_framework::{Field, Resource, ResourceId};
use serde::{Deserialize, Serialize};

/// A player account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: ResourceId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub coins: i64,
    #[serde(default)]
    pub clan_id: Option<ResourceId>,
    #[serde(default)]
    pub is_banned: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub username: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub email: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub level: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub coins: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub clan_id: Field<ResourceId>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub is_banned: Field<bool>,
}

impl Resource for User {
    type Patch = UserPatch;
    const COLLECTION: &'static str = "users";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn draft_defaults() -> UserPatch {
        UserPatch {
            level: Field::Value(1),
            coins: Field::Value(0),
            is_banned: Field::Value(false),
            ..Default::default()
        }
    }

    fn to_draft(&self) -> UserPatch {
        UserPatch {
            username: Field::Value(self.username.clone()),
            email: Field::from_nullable(self.email.clone()),
            level: Field::Value(self.level),
            coins: Field::Value(self.coins),
            clan_id: Field::from_nullable(self.clan_id),
            is_banned: Field::Value(self.is_banned),
        }
    }
}
