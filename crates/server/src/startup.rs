use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::products::repository::SeaOrmProductRepository;
use service::products::service::ProductService;
use service::sessions::seaorm::SeaOrmSessionStore;
use service::sessions::SessionStore;

use crate::routes::{self, auth};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(5000);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

fn load_session_cfg() -> configs::SessionConfig {
    configs::load_default().map(|cfg| cfg.session).unwrap_or_default()
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // DB connection
    let db = models::db::connect().await?;

    let auth_svc = Arc::new(AuthService::new(
        Arc::new(SeaOrmAuthRepository { db: db.clone() }),
        AuthConfig::default(),
    ));
    let product_svc = Arc::new(ProductService::new(Arc::new(SeaOrmProductRepository {
        db: db.clone(),
    })));
    let session_store: Arc<dyn SessionStore> = Arc::new(SeaOrmSessionStore { db });

    let state = auth::ServerState {
        auth: auth_svc,
        products: product_svc,
        sessions: session_store,
        session_cfg: load_session_cfg(),
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
