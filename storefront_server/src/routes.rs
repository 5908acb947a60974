//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Payment-provider handlers live in [`crate::payment_routes`].

use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use storefront_engine::{
    db_types::{NewCategory, NewOrder, NewProduct, OrderKey},
    sfe_api::{CategoryUpdate, OrderUpdate, ProductQueryFilter, ProductUpdate},
    traits::{CatalogManagement, OrderManagement},
    CatalogApi,
    OrderApi,
};

use crate::{
    config::ServerOptions,
    data_objects::{JsonResponse, OrderSearchQuery, ReorderRequest, StatusUpdateRequest},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------  Categories  ----------------------------------------------------
route!(categories => Get "/categories" impl CatalogManagement);
pub async fn categories<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET all categories");
    let categories = api.categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

route!(create_category => Post "/categories" impl CatalogManagement);
pub async fn create_category<B: CatalogManagement>(
    body: web::Json<NewCategory>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let new_category = body.into_inner();
    debug!("💻️ POST new category [{}]", new_category.name);
    let category = api.create_category(new_category).await?;
    Ok(HttpResponse::Created().json(category))
}

route!(update_category => Patch "/categories/{id}" impl CatalogManagement);
pub async fn update_category<B: CatalogManagement>(
    path: web::Path<i64>,
    body: web::Json<CategoryUpdate>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PATCH category #{id}");
    let category =
        api.update_category(id, body.into_inner()).await?.ok_or(ServerError::NoRecordFound(format!("Category {id}")))?;
    Ok(HttpResponse::Ok().json(category))
}

route!(delete_category => Delete "/categories/{id}" impl CatalogManagement);
pub async fn delete_category<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE category #{id}");
    api.delete_category(id).await?.ok_or(ServerError::NoRecordFound(format!("Category {id}")))?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Category deleted successfully")))
}

route!(reorder_categories => Post "/categories/reorder" impl CatalogManagement);
pub async fn reorder_categories<B: CatalogManagement>(
    body: web::Json<ReorderRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let entries = body.into_inner().categories;
    debug!("💻️ POST reorder of {} categories", entries.len());
    api.reorder_categories(&entries).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Category order updated successfully")))
}

route!(fix_category_orders => Post "/admin/fix_category_orders" impl CatalogManagement);
pub async fn fix_category_orders<B: CatalogManagement>(
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    info!("💻️ POST repair of the category ordering");
    let count = api.renumber_categories().await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("{count} categories renumbered sequentially"))))
}

//----------------------------------------------   Products  ----------------------------------------------------
route!(products => Get "/products" impl CatalogManagement);
pub async fn products<B: CatalogManagement>(
    query: web::Query<ProductQueryFilter>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET products");
    let products = api.products(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_by_id => Get "/products/{id}" impl CatalogManagement);
pub async fn product_by_id<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let product = api.product(id).await?.ok_or(ServerError::NoRecordFound(format!("Product {id}")))?;
    Ok(HttpResponse::Ok().json(product))
}

route!(create_product => Post "/products" impl CatalogManagement);
pub async fn create_product<B: CatalogManagement>(
    body: web::Json<NewProduct>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product = api.create_product(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

route!(update_product => Patch "/products/{id}" impl CatalogManagement);
pub async fn update_product<B: CatalogManagement>(
    path: web::Path<i64>,
    body: web::Json<ProductUpdate>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let product =
        api.update_product(id, body.into_inner()).await?.ok_or(ServerError::NoRecordFound(format!("Product {id}")))?;
    Ok(HttpResponse::Ok().json(product))
}

route!(delete_product => Delete "/products/{id}" impl CatalogManagement);
pub async fn delete_product<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    if !api.delete_product(id).await? {
        return Err(ServerError::NoRecordFound(format!("Product {id}")));
    }
    Ok(HttpResponse::Ok().json(JsonResponse::success("Product deleted successfully")))
}

//----------------------------------------------    Orders   ----------------------------------------------------
route!(create_order => Post "/orders" impl OrderManagement);
pub async fn create_order<B: OrderManagement>(
    body: web::Json<NewOrder>,
    api: web::Data<OrderApi<B>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let mut new_order = body.into_inner();
    if new_order.delivery_fee.is_none() {
        new_order.delivery_fee = Some(options.delivery_fee);
    }
    debug!("💻️ POST new order for {}", new_order.customer_phone);
    let order = api.place_order(new_order).await?;
    Ok(HttpResponse::Created().json(order))
}

route!(orders => Get "/orders" impl OrderManagement);
pub async fn orders<B: OrderManagement>(
    query: web::Query<OrderSearchQuery>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let filter = query.into_inner().into_filter();
    trace!("💻️ GET orders. {filter}");
    let orders = api.search(filter).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_key => Get "/orders/{key}" impl OrderManagement);
pub async fn order_by_key<B: OrderManagement>(
    path: web::Path<String>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let key = parse_order_key(&path.into_inner())?;
    trace!("💻️ GET order {key}");
    let order = api.order(&key).await?.ok_or(ServerError::NoRecordFound(format!("Order {key}")))?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_order => Patch "/orders/{key}" impl OrderManagement);
pub async fn update_order<B: OrderManagement>(
    path: web::Path<String>,
    body: web::Json<OrderUpdate>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let key = parse_order_key(&path.into_inner())?;
    debug!("💻️ PATCH order {key}");
    let order =
        api.update_order(&key, body.into_inner()).await?.ok_or(ServerError::NoRecordFound(format!("Order {key}")))?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_order_status => Post "/orders/{key}/status" impl OrderManagement);
pub async fn update_order_status<B: OrderManagement>(
    path: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let key = parse_order_key(&path.into_inner())?;
    let status = body.into_inner().status;
    debug!("💻️ POST order {key} status -> {status}");
    let order =
        api.update_status(&key, status).await?.ok_or(ServerError::NoRecordFound(format!("Order {key}")))?;
    Ok(HttpResponse::Ok().json(order))
}

route!(delete_order => Delete "/orders/{key}" impl OrderManagement);
pub async fn delete_order<B: OrderManagement>(
    path: web::Path<String>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let key = parse_order_key(&path.into_inner())?;
    debug!("💻️ DELETE order {key}");
    api.delete_order(&key).await?.ok_or(ServerError::NoRecordFound(format!("Order {key}")))?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Order deleted successfully")))
}

/// Resolve a path segment into the tagged order key. Numeric segments address the internal id,
/// anything else is an order code.
pub fn parse_order_key(raw: &str) -> Result<OrderKey, ServerError> {
    raw.parse::<OrderKey>().map_err(|_| ServerError::InvalidRequestPath(raw.to_string()))
}
