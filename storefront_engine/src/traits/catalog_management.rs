use thiserror::Error;

use crate::{
    db_types::{Category, NewCategory, NewProduct, Product},
    sfe_api::{CategoryUpdate, ProductQueryFilter, ProductUpdate, ReorderEntry},
};

/// Catalog behaviour a storage backend must provide.
///
/// Categories carry a globally unique, dense `sort_order`. All mutating category methods preserve
/// that invariant; the documented mechanics follow the swap strategy (displace the conflicting
/// holder through a temporary slot above the range in use) rather than cascade shifting.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// All categories, sorted by `sort_order` ascending.
    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogApiError>;

    async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError>;

    /// Create a category. When no position is requested, `max + 1` is assigned. When the requested
    /// position is already held, every category at or above it shifts up by one first.
    async fn create_category(&self, category: NewCategory) -> Result<Category, CatalogApiError>;

    /// Apply a validated partial update. A requested position that is held by another category
    /// results in a two-element transposition: the holder moves to the target's vacated position.
    async fn update_category(&self, id: i64, update: CategoryUpdate) -> Result<Option<Category>, CatalogApiError>;

    /// Apply a (full or partial) permutation of positions in one batch, staging colliding moves
    /// through temporary slots above the range in use. Returns the number of writes applied.
    async fn reorder_categories(&self, entries: &[ReorderEntry]) -> Result<usize, CatalogApiError>;

    /// Delete a category and close the gap: every position above the deleted one decrements.
    async fn delete_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError>;

    /// Repair tool: renumber all categories `1..N` by creation time. Idempotent; this is the
    /// documented recovery path after an [`CatalogApiError::OrderingConflict`].
    async fn renumber_categories(&self) -> Result<usize, CatalogApiError>;

    async fn fetch_products(&self, filter: ProductQueryFilter) -> Result<Vec<Product>, CatalogApiError>;

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError>;

    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;

    async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, CatalogApiError>;

    async fn delete_product(&self, id: i64) -> Result<bool, CatalogApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The position sequence is in conflict: {0}. Run the renumbering repair tool.")]
    OrderingConflict(String),
    #[error("The requested category (id {0}) does not exist")]
    CategoryNotFound(i64),
    #[error("The requested update would result in a no-op.")]
    ModificationNoOp,
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref de) = e {
            if de.is_unique_violation() {
                return CatalogApiError::OrderingConflict(de.message().to_string());
            }
        }
        CatalogApiError::DatabaseError(e.to_string())
    }
}
