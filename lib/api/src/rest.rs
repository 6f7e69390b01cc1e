use crate::handler::Dispatcher;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// JSON-RPC over HTTP: `POST /jsonrpc` takes one message, `GET /health` for probes
pub struct RestApi;

impl RestApi {
    pub async fn start(dispatcher: Dispatcher, host: &str, port: u16) -> std::io::Result<()> {
        info!("Starting HTTP JSON-RPC server on {}:{}", host, port);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(dispatcher.clone()))
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    }
}

/// Register the routes; shared with tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/jsonrpc", web::post().to(jsonrpc))
        .route("/health", web::get().to(health));
}

async fn jsonrpc(dispatcher: web::Data<Dispatcher>, body: web::Bytes) -> ActixResult<HttpResponse> {
    match dispatcher.handle_bytes(&body).await {
        Some(response) => Ok(HttpResponse::Ok().json(response)),
        None => Ok(HttpResponse::NoContent().finish()),
    }
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
