//! Repository for the `items` table.

use sqlx::{PgPool, Postgres, Transaction};
use stockroom_core::error::CoreError;
use stockroom_core::inventory::{validate_item, ValidItem};
use stockroom_core::types::ItemId;
use uuid::Uuid;

use crate::models::item::{CreateItem, Item, UpdateItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, quantity, location, description, sku, category, created_at, updated_at";

/// Failure modes of [`ItemRepo::create`] and [`ItemRepo::update`].
#[derive(Debug, thiserror::Error)]
pub enum ItemWriteError {
    /// The candidate record broke one or more validation rules.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// Another item already carries this SKU.
    #[error("SKU '{0}' is already assigned to another item")]
    DuplicateSku(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Provides CRUD operations for inventory items.
pub struct ItemRepo;

impl ItemRepo {
    /// List every item, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Item>(&query).fetch_all(pool).await
    }

    /// Find an item by its ID.
    pub async fn find_by_id(pool: &PgPool, id: ItemId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Validate and insert a new item, returning the stored row.
    ///
    /// The SKU check and the insert share one transaction, serialized per
    /// SKU by an advisory lock.
    pub async fn create(pool: &PgPool, input: CreateItem) -> Result<Item, ItemWriteError> {
        let item = validate_item(input)?;

        let mut tx = pool.begin().await?;
        if let Some(sku) = &item.sku {
            ensure_sku_available(&mut tx, sku, None).await?;
        }

        let query = format!(
            "INSERT INTO items (id, name, quantity, location, description, sku, category) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Item>(&query)
            .bind(Uuid::now_v7())
            .bind(&item.name)
            .bind(item.quantity)
            .bind(&item.location)
            .bind(&item.description)
            .bind(&item.sku)
            .bind(&item.category)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(created)
    }

    /// Merge a partial update onto an existing item and store the result.
    ///
    /// The row is locked for the duration of the merge, so concurrent
    /// updates to the same item apply one after another (last write wins).
    /// Returns `None` if no row with the given `id` exists; nothing is
    /// created in that case.
    pub async fn update(
        pool: &PgPool,
        id: ItemId,
        input: UpdateItem,
    ) -> Result<Option<Item>, ItemWriteError> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let item: ValidItem = validate_item(input.apply_to(current.to_draft()))?;
        if let Some(sku) = &item.sku {
            ensure_sku_available(&mut tx, sku, Some(id)).await?;
        }

        let query = format!(
            "UPDATE items SET \
                name = $2, \
                quantity = $3, \
                location = $4, \
                description = $5, \
                sku = $6, \
                category = $7, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(&item.location)
            .bind(&item.description)
            .bind(&item.sku)
            .bind(&item.category)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(updated))
    }

    /// Delete an item. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: ItemId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Fail with [`ItemWriteError::DuplicateSku`] if another item holds `sku`.
///
/// Takes a transaction-scoped advisory lock on the SKU first, so two
/// writers claiming the same SKU cannot both pass the check.
async fn ensure_sku_available(
    tx: &mut Transaction<'_, Postgres>,
    sku: &str,
    exclude_id: Option<ItemId>,
) -> Result<(), ItemWriteError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(sku)
        .execute(&mut **tx)
        .await?;

    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS (\
            SELECT 1 FROM items WHERE sku = $1 AND ($2::uuid IS NULL OR id <> $2)\
         )",
    )
    .bind(sku)
    .bind(exclude_id)
    .fetch_one(&mut **tx)
    .await?;

    if taken {
        tracing::debug!(sku, "Rejected duplicate SKU");
        return Err(ItemWriteError::DuplicateSku(sku.to_string()));
    }
    Ok(())
}
