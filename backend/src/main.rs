use std::net::SocketAddr;

use axum::{http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

mod db;
mod domain;
mod rest;

use domain::{AnimalService, CuidadoService};
use rest::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Setting up database");
    let db = db::DbConnection::init().await?;

    // Set up our application state
    let state = AppState::new(AnimalService::new(db.clone()), CuidadoService::new(db));

    // CORS setup to allow browser clients to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Set up our application routes
    let app = Router::new()
        .route("/", get(rest::home))
        .route("/animais", get(rest::list_animais).post(rest::create_animal))
        .route(
            "/animais/:id",
            get(rest::get_animal)
                .put(rest::update_animal)
                .delete(rest::delete_animal),
        )
        .route("/cuidados", get(rest::list_cuidados).post(rest::create_cuidado))
        .route(
            "/cuidados/:id",
            get(rest::get_cuidado)
                .put(rest::update_cuidado)
                .delete(rest::delete_cuidado),
        )
        .layer(cors)
        .with_state(state);

    // Start the server
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
