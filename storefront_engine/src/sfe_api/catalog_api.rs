use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Category, NewCategory, NewProduct, Product},
    sfe_api::{CategoryUpdate, ProductQueryFilter, ProductUpdate, ReorderEntry},
    traits::{CatalogApiError, CatalogManagement},
};

/// `CatalogApi` surfaces the category/product catalog, including the ordinal sequence over
/// categories. Every mutating category call preserves the uniqueness and density invariants of
/// the sequence; see [`CatalogManagement`] for the mechanics.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogApiError> {
        self.db.fetch_categories().await
    }

    pub async fn category(&self, id: i64) -> Result<Option<Category>, CatalogApiError> {
        self.db.fetch_category(id).await
    }

    pub async fn create_category(&self, category: NewCategory) -> Result<Category, CatalogApiError> {
        let category = self.db.create_category(category).await?;
        info!("🔄️🗂️ Category [{}] created at position {}", category.name, category.sort_order);
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: i64,
        update: CategoryUpdate,
    ) -> Result<Option<Category>, CatalogApiError> {
        trace!("🔄️🗂️ Updating category #{id}");
        self.db.update_category(id, update).await
    }

    /// Apply a drag-and-drop permutation. The entry list may cover any subset of the categories.
    pub async fn reorder_categories(&self, entries: &[ReorderEntry]) -> Result<usize, CatalogApiError> {
        let writes = self.db.reorder_categories(entries).await?;
        info!("🔄️🗂️ Reorder of {} categories applied with {writes} writes", entries.len());
        Ok(writes)
    }

    pub async fn delete_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError> {
        self.db.delete_category(id).await
    }

    /// The corrective tool for a broken sequence: renumber every category `1..N` by creation
    /// time. Idempotent and safe to re-run.
    pub async fn renumber_categories(&self) -> Result<usize, CatalogApiError> {
        let count = self.db.renumber_categories().await?;
        info!("🔄️🗂️ Repair complete. {count} categories renumbered.");
        Ok(count)
    }

    pub async fn products(&self, filter: ProductQueryFilter) -> Result<Vec<Product>, CatalogApiError> {
        self.db.fetch_products(filter).await
    }

    pub async fn product(&self, id: i64) -> Result<Option<Product>, CatalogApiError> {
        self.db.fetch_product(id).await
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        self.db.create_product(product).await
    }

    pub async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, CatalogApiError> {
        self.db.update_product(id, update).await
    }

    pub async fn delete_product(&self, id: i64) -> Result<bool, CatalogApiError> {
        self.db.delete_product(id).await
    }
}
