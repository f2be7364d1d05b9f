//! # Entity Models
//!
//! One module per backend collection. Each pairs a **record** (what the API returns, camelCase on
//! the wire) with a **patch** (what create/update send). Every patch field is a [`Field`]:
//! `Absent` leaves the stored value alone, `Null` clears it, `Value` sets it.
//!
//! | Record | Collection | Guarded | Relations |
//! |--------|------------|---------|-----------|
//! | [`User`] | `users` | no | clan (one) |
//! | [`Clan`] | `clans` | no | leader (one user), members (many users) |
//! | [`War`] | `wars` | no | attacker, defender, winner (one clan each) |
//! | [`ShopItem`] | `shop-items` | no | kits (many); image attachment |
//! | [`Kit`] | `kits` | no | templates (many) |
//! | [`Template`] | `templates` | no | - |
//! | [`Task`] | `tasks` | no | - |
//! | [`Admin`] | `admins` | `isSystem` | - |
//! | [`Setting`] | `settings` | `isSystem` | - |
//!
//! [`Field`]: console_framework::Field

pub mod admin;
pub mod clan;
pub mod kit;
pub mod setting;
pub mod shop_item;
pub mod task;
pub mod template;
pub mod user;
pub mod war;

pub use admin::{Admin, AdminPatch};
pub use clan::{Clan, ClanPatch};
pub use kit::{Kit, KitPatch};
pub use setting::{Setting, SettingPatch};
pub use shop_item::{ShopItem, ShopItemPatch};
pub use task::{Task, TaskPatch};
pub use template::{Template, TemplatePatch};
pub use user::{User, UserPatch};
pub use war::{War, WarPatch, WarStatus};

#[cfg(test)]
mod tests {
    use super::*;
    use console_framework::Resource;
    use serde_json::json;

    #[test]
    fn edit_drafts_leave_write_only_fields_absent() {
        let item: ShopItem = serde_json::from_value(json!({
            "id": 4, "name": "Axe", "price": 30, "currency": "gems", "image": "uploads/axe.png"
        }))
        .unwrap();
        let draft = serde_json::to_value(item.to_draft()).unwrap();
        assert_eq!(
            draft,
            json!({"name": "Axe", "price": 30, "currency": "gems", "kitIds": []})
        );

        let admin = Admin { id: 2, username: "ops".into(), is_system: false };
        assert_eq!(serde_json::to_value(admin.to_draft()).unwrap(), json!({"username": "ops"}));
    }

    #[test]
    fn missing_nullable_values_seed_explicit_nulls() {
        let user: User = serde_json::from_value(json!({"id": 1, "username": "ann"})).unwrap();
        let draft = user.to_draft();
        assert_eq!(draft.email, console_framework::Field::Null);
        assert!(draft.email.is_present());
        assert_eq!(draft.clan_id, console_framework::Field::Null);
        assert_eq!(draft.level, console_framework::Field::Value(0));
    }

    #[test]
    fn system_rows_are_guarded() {
        let setting = Setting { id: 1, key: "maintenance".into(), value: None, is_system: true };
        assert!(setting.is_guarded());
        assert_eq!(setting.guard_message(), "Setting \"maintenance\" is managed by the server");
        assert!(!User::draft_defaults().is_banned.value().copied().unwrap_or(true));
    }
}
