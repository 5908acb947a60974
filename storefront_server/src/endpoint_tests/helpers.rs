use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use log::debug;
use rsg_common::Vnd;

use crate::config::ServerOptions;

pub fn test_options() -> ServerOptions {
    ServerOptions { use_x_forwarded_for: false, use_forwarded: false, enforce_https: true, delivery_fee: Vnd::from(20_000) }
}

async fn run_request(
    req: TestRequest,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let app = App::new().app_data(web::Data::new(test_options())).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req.to_request()).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub async fn get_request(path: &str, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    run_request(TestRequest::get().uri(path), configure).await
}

pub async fn post_request(
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    run_request(TestRequest::post().uri(path).set_json(body), configure).await
}

pub async fn post_form_request(
    path: &str,
    form_body: String,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = TestRequest::post()
        .uri(path)
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload(form_body);
    run_request(req, configure).await
}

pub async fn post_request_with_proto(
    path: &str,
    body: serde_json::Value,
    proto: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = TestRequest::post().uri(path).insert_header(("X-Forwarded-Proto", proto)).set_json(body);
    run_request(req, configure).await
}

pub async fn patch_request(
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    run_request(TestRequest::patch().uri(path).set_json(body), configure).await
}

pub async fn delete_request(path: &str, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    run_request(TestRequest::delete().uri(path), configure).await
}
