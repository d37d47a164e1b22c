mod model;
mod server;

use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::server::{
    config::Config, error::AppError, router::router, startup, state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    startup::ensure_default_admin(&db, &config).await?;

    let session = startup::connect_to_session(&db).await?;
    let http_client = startup::setup_reqwest_client();
    let storage = startup::setup_storage(&config, http_client.clone());
    let ai = startup::setup_ai_service(&config, http_client);

    let state = AppState::new(
        db,
        storage,
        ai,
        config.email_domain.clone(),
        config.default_import_password.clone(),
    );

    let app = router()
        .fallback_service(ServeDir::new(&config.static_dir))
        .with_state(state)
        .layer(session)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.app_addr).await?;
    tracing::info!("Listening on {}", config.app_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
