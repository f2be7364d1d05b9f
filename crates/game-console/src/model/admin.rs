use console_framework::{Field, Resource, ResourceId};
use serde::{Deserialize, Serialize};

/// A console operator. The built-in account is flagged `isSystem` and cannot be edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: ResourceId,
    pub username: String,
    #[serde(default)]
    pub is_system: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPatch {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub username: Field<String>,
    /// Write-only; left absent unless the operator types a new one.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub password: Field<String>,
}

impl Resource for Admin {
    type Patch = AdminPatch;
    const COLLECTION: &'static str = "admins";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn is_guarded(&self) -> bool {
        self.is_system
    }

    fn guard_message(&self) -> String {
        format!("Admin \"{}\" is a system account and cannot be modified", self.username)
    }

    fn to_draft(&self) -> AdminPatch {
        AdminPatch {
            username: Field::Value(self.username.clone()),
            password: Field::Absent,
        }
    }
}
