use actix_web::{App, HttpServer, middleware::Logger, web};
use cosmic_lens::{config::Config, handlers, state::AppState};
use log::info;
use reqwest::Client;
use std::env;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env();

    let default_filter = if config.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    let http = Client::builder()
        .build()
        .map_err(|e| std::io::Error::other(format!("failed to build reqwest client: {e}")))?;

    let state = Arc::new(AppState::new(config.clone(), http));

    info!("Cosmic Lens Detect running at http://localhost:{port}");
    info!("Prediction service: {}", state.client.endpoint());
    info!(
        "Debug mode: {}",
        if config.debug { "ENABLED" } else { "disabled" }
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(state.clone()))
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
