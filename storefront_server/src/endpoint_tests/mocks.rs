use mockall::mock;
use storefront_engine::{
    db_types::{
        CallbackOutcome,
        Category,
        NewCategory,
        NewOrder,
        NewProduct,
        Order,
        OrderKey,
        OrderStatus,
        Product,
    },
    sfe_api::{CategoryUpdate, OrderQueryFilter, OrderUpdate, ProductQueryFilter, ProductUpdate, ReorderEntry},
    traits::{
        CatalogApiError,
        CatalogManagement,
        OrderApiError,
        OrderManagement,
        PaymentReconciliation,
        ReconciliationApiError,
    },
};

mock! {
    pub CatalogManager {}
    impl CatalogManagement for CatalogManager {
        async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogApiError>;
        async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError>;
        async fn create_category(&self, category: NewCategory) -> Result<Category, CatalogApiError>;
        async fn update_category(&self, id: i64, update: CategoryUpdate) -> Result<Option<Category>, CatalogApiError>;
        async fn reorder_categories(&self, entries: &[ReorderEntry]) -> Result<usize, CatalogApiError>;
        async fn delete_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError>;
        async fn renumber_categories(&self) -> Result<usize, CatalogApiError>;
        async fn fetch_products(&self, filter: ProductQueryFilter) -> Result<Vec<Product>, CatalogApiError>;
        async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError>;
        async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;
        async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, CatalogApiError>;
        async fn delete_product(&self, id: i64) -> Result<bool, CatalogApiError>;
    }
}

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn create_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;
        async fn fetch_order(&self, key: &OrderKey) -> Result<Option<Order>, OrderApiError>;
        async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderApiError>;
        async fn update_order(&self, key: &OrderKey, update: OrderUpdate) -> Result<Option<Order>, OrderApiError>;
        async fn update_order_status(&self, key: &OrderKey, status: OrderStatus) -> Result<Option<Order>, OrderApiError>;
        async fn delete_order(&self, key: &OrderKey) -> Result<Option<Order>, OrderApiError>;
    }
}

mock! {
    pub PaymentManager {}
    impl PaymentReconciliation for PaymentManager {
        async fn attach_provider_transaction(&self, key: &OrderKey, trans_id: &str) -> Result<Order, ReconciliationApiError>;
        async fn record_callback(&self, trans_id: &str, paid: bool) -> Result<CallbackOutcome, ReconciliationApiError>;
        async fn apply_poll_result(&self, key: &OrderKey, paid: bool) -> Result<Order, ReconciliationApiError>;
    }
}
