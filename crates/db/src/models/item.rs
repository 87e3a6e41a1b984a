//! Item entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::inventory::{ItemDraft, ItemPatch};
use stockroom_core::types::{ItemId, Timestamp};

/// A row from the `items` table.
///
/// Serialized with camelCase keys; absent optional fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quantity: i32,
    pub location: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Item {
    /// The stored fields as a candidate record, the base for a partial update.
    pub fn to_draft(&self) -> ItemDraft {
        ItemDraft {
            name: Some(self.name.clone()),
            quantity: Some(self.quantity),
            location: self.location.clone(),
            description: self.description.clone(),
            sku: self.sku.clone(),
            category: self.category.clone(),
        }
    }
}

/// DTO for creating an item. Validated by the repository before insert.
pub type CreateItem = ItemDraft;

/// DTO for updating an item. Any subset of fields; `null` clears optional ones.
pub type UpdateItem = ItemPatch;
