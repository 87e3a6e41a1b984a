//! Item validation rules and partial-update merge semantics.
//!
//! Handlers and the repository layer never write a record that has not
//! passed through [`validate_item`]. Updates are expressed as an
//! [`ItemPatch`] which is merged onto the stored record first, so the rule
//! set always sees a whole candidate record.

use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationErrors};

use crate::error::{CoreError, FieldError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of an item name, in characters.
pub const MAX_NAME_LEN: u64 = 100;

/// Smallest quantity an item may hold.
pub const MIN_QUANTITY: i32 = 0;

pub const NAME_REQUIRED: &str = "Name is required";
pub const NAME_TOO_LONG: &str = "Name cannot exceed 100 characters";
pub const QUANTITY_REQUIRED: &str = "Quantity is required";
pub const QUANTITY_NEGATIVE: &str = "Quantity cannot be negative";
pub const SKU_TAKEN: &str = "SKU already exists";

// ---------------------------------------------------------------------------
// Candidate record
// ---------------------------------------------------------------------------

/// A candidate item as supplied by a client or produced by a merge.
///
/// Every field is optional here. The bound checks below only run on
/// present values; presence of `name` and `quantity` is checked by
/// [`validate_item`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct ItemDraft {
    #[validate(length(max = MAX_NAME_LEN))]
    pub name: Option<String>,
    #[validate(range(min = MIN_QUANTITY))]
    pub quantity: Option<i32>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
}

impl ItemDraft {
    /// Trim every string field and drop the ones left empty.
    fn normalized(self) -> Self {
        Self {
            name: normalize_text(self.name),
            quantity: self.quantity,
            location: normalize_text(self.location),
            description: normalize_text(self.description),
            sku: normalize_text(self.sku),
            category: normalize_text(self.category),
        }
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// An item that satisfied every rule and is ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidItem {
    pub name: String,
    pub quantity: i32,
    pub location: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
}

/// Apply the rule set to a candidate record.
///
/// String fields are trimmed first (an empty string counts as absent). On
/// failure every violated field is reported, ordered by field name.
pub fn validate_item(draft: ItemDraft) -> Result<ValidItem, CoreError> {
    let draft = draft.normalized();
    let mut errors = match draft.validate() {
        Ok(()) => Vec::new(),
        Err(report) => collect_field_errors(&report),
    };
    if draft.name.is_none() {
        errors.push(FieldError::new("name", NAME_REQUIRED));
    }
    if draft.quantity.is_none() {
        errors.push(FieldError::new("quantity", QUANTITY_REQUIRED));
    }

    match draft {
        ItemDraft {
            name: Some(name),
            quantity: Some(quantity),
            location,
            description,
            sku,
            category,
        } if errors.is_empty() => Ok(ValidItem {
            name,
            quantity,
            location,
            description,
            sku,
            category,
        }),
        _ => {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            Err(CoreError::InvalidFields(errors))
        }
    }
}

fn collect_field_errors(report: &ValidationErrors) -> Vec<FieldError> {
    report
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter()
                .map(move |e| FieldError::new(field.clone(), rule_message(&field, &e.code)))
        })
        .collect()
}

/// Map a failed bound check (validator's rule code) to its client message.
fn rule_message(field: &str, code: &str) -> String {
    match (field, code) {
        ("name", "length") => NAME_TOO_LONG.to_string(),
        ("quantity", "range") => QUANTITY_NEGATIVE.to_string(),
        _ => format!("{field} is invalid"),
    }
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

/// One field of a partial update.
///
/// A key missing from the JSON body is `Absent` and keeps the stored value;
/// an explicit `null` clears it; anything else overwrites it. Fields using
/// this type must be annotated `#[serde(default)]` so that missing keys
/// deserialize to `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    /// Resolve this patch against the current value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Absent => current,
            Patch::Null => None,
            Patch::Value(v) => Some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|v| v.map_or(Patch::Null, Patch::Value))
    }
}

/// A partial update to an item. Unknown keys (e.g. `id`, `createdAt`) are
/// ignored so clients can send back a record they previously fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub name: Patch<String>,
    pub quantity: Patch<i32>,
    pub location: Patch<String>,
    pub description: Patch<String>,
    pub sku: Patch<String>,
    pub category: Patch<String>,
}

impl ItemPatch {
    /// Merge this patch onto an existing record, producing a new candidate.
    pub fn apply_to(self, base: ItemDraft) -> ItemDraft {
        ItemDraft {
            name: self.name.apply(base.name),
            quantity: self.quantity.apply(base.quantity),
            location: self.location.apply(base.location),
            description: self.description.apply(base.description),
            sku: self.sku.apply(base.sku),
            category: self.category.apply(base.category),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
