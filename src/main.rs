mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::{admindb::AdminExt, db::DBClient};
use crate::service::{chat::ChatService, lifecycle::LifecycleService};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub lifecycle_service: LifecycleService,
    pub chat_service: ChatService,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client = Arc::new(db_client);
        let lifecycle_service = LifecycleService::new(db_client.clone());
        let chat_service = ChatService::new(&config);

        Self {
            env: config,
            db_client,
            lifecycle_service,
            chat_service,
        }
    }
}

/// Creates the first admin account when the admins table is empty, so a fresh
/// deployment is reachable without manual SQL. Credentials come from the
/// environment; the password must be changed after first login.
async fn seed_default_admin(db_client: &DBClient) {
    let count = match db_client.admin_count().await {
        Ok(count) => count,
        Err(err) => {
            tracing::error!("failed to count admins: {}", err);
            return;
        }
    };

    if count > 0 {
        return;
    }

    let username = std::env::var("DEFAULT_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password =
        std::env::var("DEFAULT_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    let hashed = match utils::password::hash(&password) {
        Ok(hashed) => hashed,
        Err(err) => {
            tracing::error!("failed to hash default admin password: {}", err);
            return;
        }
    };

    match db_client
        .create_admin(&username, "admin@repairshop.local", &hashed, "Shop Administrator")
        .await
    {
        Ok(admin) => tracing::warn!(
            "seeded default admin '{}'; change the password after first login",
            admin.username
        ),
        Err(err) => tracing::error!("failed to seed default admin: {}", err),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            println!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            println!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!("./migrations").run(&pool).await {
        println!("🔥 Failed to run database migrations: {:?}", err);
        std::process::exit(1);
    }

    let allowed_origins = vec![
        "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        "http://localhost:8000".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ]);

    let db_client = DBClient::new(pool);
    seed_default_admin(&db_client).await;

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state).layer(cors);

    println!("🚀 Server is running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
