use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::EnvFilter;

use crate::server::{
    config::Config,
    data::user::UserRepository,
    error::AppError,
    model::user::CreateUserParams,
    service::{
        ai::{client::HttpChatCompletion, AiService},
        storage::{ObjectStorage, SupabaseStorage},
    },
    util::password::hash_password,
};

/// Username of the account created on first start.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_EMAIL: &str = "admin@polyu.edu.hk";

/// Initializes the global tracing subscriber.
///
/// Log levels are read from `RUST_LOG` and default to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the application can
/// access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Creates the session layer backed by the application database.
///
/// Sessions are stored in the same SQLite pool as application data and expire after
/// 7 days of inactivity.
///
/// # Arguments
/// - `db` - Connected database whose pool hosts the session table
///
/// # Returns
/// - `Ok(SessionManagerLayer)` - Layer ready to wrap the router
/// - `Err(AppError)` - Failed to create the session table
pub async fn connect_to_session(
    db: &DatabaseConnection,
) -> Result<SessionManagerLayer<SqliteStore>, AppError> {
    let pool = db.get_sqlite_connection_pool();
    let session_store = SqliteStore::new(pool.clone());

    session_store
        .migrate()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to migrate session store: {}", e)))?;

    let session = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(7)));

    Ok(session)
}

/// Builds the shared HTTP client.
///
/// Redirects are disabled so outbound calls only ever reach the configured hosts.
pub fn setup_reqwest_client() -> reqwest::Client {
    reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(std::time::Duration::from_secs(60))
        .build()
        .unwrap_or_default()
}

/// Builds the Supabase storage backend from configuration.
pub fn setup_storage(config: &Config, http_client: reqwest::Client) -> Arc<dyn ObjectStorage> {
    Arc::new(SupabaseStorage::new(
        http_client,
        &config.storage_url,
        &config.storage_key,
        &config.storage_bucket,
    ))
}

/// Builds the AI service from configuration.
///
/// Without an API key the service is still created; every call then degrades to the
/// fallback responses.
pub fn setup_ai_service(config: &Config, http_client: reqwest::Client) -> AiService {
    if config.ai_api_key.is_none() {
        tracing::warn!("AI_API_KEY is not set, AI features will return fallback responses");
    }

    AiService::new(Arc::new(HttpChatCompletion::new(
        http_client,
        &config.ai_base_url,
        config.ai_api_key.clone(),
        &config.ai_model,
    )))
}

/// Creates the default administrator account if it does not exist yet.
///
/// # Arguments
/// - `db` - Database connection
/// - `config` - Configuration holding the initial admin password
///
/// # Returns
/// - `Ok(())` - Admin already present or created
/// - `Err(AppError)` - Database or hashing failure
pub async fn ensure_default_admin(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<(), AppError> {
    let user_repo = UserRepository::new(db);

    if user_repo
        .find_by_username(DEFAULT_ADMIN_USERNAME)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let password_hash = hash_password(&config.default_admin_password)?;

    user_repo
        .create(CreateUserParams {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            email: DEFAULT_ADMIN_EMAIL.to_string(),
            password_hash,
            role: entity::user::Role::Admin,
            student_id: None,
            full_name: "System Administrator".to_string(),
            department: Some("IT Services".to_string()),
        })
        .await?;

    tracing::info!(
        "Created default admin account '{}', change its password after first login",
        DEFAULT_ADMIN_USERNAME
    );

    Ok(())
}
