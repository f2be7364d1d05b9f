use console_framework::{Attachment, Field, Resource, ResourceId};
use serde::{Deserialize, Serialize};

/// Form field the item image is uploaded under.
pub const IMAGE_FIELD: &str = "image";

/// Something players can buy, optionally bundled into kits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItem {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub currency: String,
    /// Stored path of the uploaded image.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub kit_ids: Vec<ResourceId>,
}

impl ShopItem {
    /// Wraps image bytes for [`ResourceListController::attach`](console_framework::ResourceListController::attach).
    pub fn image_attachment(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Attachment {
        Attachment::new(IMAGE_FIELD, file_name, content_type, bytes)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItemPatch {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub price: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub currency: Field<String>,
    /// Set to `Null` to drop the current image; uploads go through attachments.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub image: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub kit_ids: Field<Vec<ResourceId>>,
}

impl Resource for ShopItem {
    type Patch = ShopItemPatch;
    const COLLECTION: &'static str = "shop-items";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn draft_defaults() -> ShopItemPatch {
        ShopItemPatch {
            price: Field::Value(0),
            currency: Field::Value("coins".to_string()),
            kit_ids: Field::Value(Vec::new()),
            ..Default::default()
        }
    }

    // The image path is left out: editing never re-sends it.
    fn to_draft(&self) -> ShopItemPatch {
        ShopItemPatch {
            name: Field::Value(self.name.clone()),
            price: Field::Value(self.price),
            currency: Field::Value(self.currency.clone()),
            image: Field::Absent,
            kit_ids: Field::Value(self.kit_ids.clone()),
        }
    }
}
