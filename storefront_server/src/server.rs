use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use storefront_engine::{CatalogApi, OrderApi, PaymentFlowApi, SqliteDatabase};

use crate::{
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    payment_routes::{CreatePaymentRoute, PaymentCallbackRoute, PaymentStatusRoute},
    routes::{
        health,
        CategoriesRoute,
        CreateCategoryRoute,
        CreateOrderRoute,
        CreateProductRoute,
        DeleteCategoryRoute,
        DeleteOrderRoute,
        DeleteProductRoute,
        FixCategoryOrdersRoute,
        OrderByKeyRoute,
        OrdersRoute,
        ProductByIdRoute,
        ProductsRoute,
        ReorderCategoriesRoute,
        UpdateCategoryRoute,
        UpdateOrderRoute,
        UpdateOrderStatusRoute,
        UpdateProductRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let (host, port) = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let catalog_api = CatalogApi::new(db.clone());
        let orders_api = OrderApi::new(db.clone());
        let payments_api = PaymentFlowApi::new(db.clone());
        let options = ServerOptions::from_config(&config);
        let api_scope = web::scope("/api")
            .service(CategoriesRoute::<SqliteDatabase>::new())
            .service(CreateCategoryRoute::<SqliteDatabase>::new())
            .service(ReorderCategoriesRoute::<SqliteDatabase>::new())
            .service(UpdateCategoryRoute::<SqliteDatabase>::new())
            .service(DeleteCategoryRoute::<SqliteDatabase>::new())
            .service(FixCategoryOrdersRoute::<SqliteDatabase>::new())
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(CreateProductRoute::<SqliteDatabase>::new())
            .service(ProductByIdRoute::<SqliteDatabase>::new())
            .service(UpdateProductRoute::<SqliteDatabase>::new())
            .service(DeleteProductRoute::<SqliteDatabase>::new())
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(OrdersRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new())
            .service(OrderByKeyRoute::<SqliteDatabase>::new())
            .service(UpdateOrderRoute::<SqliteDatabase>::new())
            .service(DeleteOrderRoute::<SqliteDatabase>::new())
            .service(CreatePaymentRoute::<SqliteDatabase, SqliteDatabase>::new())
            .service(PaymentCallbackRoute::<SqliteDatabase>::new())
            .service(PaymentStatusRoute::<SqliteDatabase, SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("rsg::access_log"))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(payments_api))
            .app_data(web::Data::new(options))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
