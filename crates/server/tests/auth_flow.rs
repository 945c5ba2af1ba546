use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::json;
use std::sync::Arc;
use tower::Service;
use uuid::Uuid;

use server::routes::{self, auth};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::products::repository::SeaOrmProductRepository;
use service::products::service::ProductService;
use service::sessions::seaorm::SeaOrmSessionStore;
use service::sessions::SessionStore;

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

/// Build the app against a real database, or None so the test can skip when
/// Postgres is unavailable.
async fn build_app() -> Option<Router> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match models::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }

    let state = auth::ServerState {
        auth: Arc::new(AuthService::new(
            Arc::new(SeaOrmAuthRepository { db: db.clone() }),
            AuthConfig::default(),
        )),
        products: Arc::new(ProductService::new(Arc::new(SeaOrmProductRepository {
            db: db.clone(),
        }))),
        sessions: Arc::new(SeaOrmSessionStore { db }) as Arc<dyn SessionStore>,
        session_cfg: configs::SessionConfig::default(),
    };
    Some(routes::build_router(cors(), state))
}

fn post_json(uri: &str, body: serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(c) = cookie {
        builder = builder.header("cookie", c);
    }
    builder.body(Body::from(serde_json::to_vec(&body).unwrap())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(c) = cookie {
        builder = builder.header("cookie", c);
    }
    builder.body(Body::empty()).unwrap()
}

fn session_cookie(resp: &axum::response::Response) -> String {
    resp.headers()
        .get("set-cookie")
        .expect("set-cookie present")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_signup_login_profile_logout_flow() {
    let Some(mut app) = build_app().await else { return };

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let password = "S3curePass!";

    // Signup
    let resp = app
        .call(post_json("/api/auth/signup", json!({"name": "Tester", "email": email, "password": password}), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], email);

    // Duplicate signup is rejected
    let resp = app
        .call(post_json("/api/auth/signup", json!({"name": "Tester", "email": email, "password": password}), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Login sets the session cookie
    let resp = app
        .call(post_json("/api/auth/login", json!({"email": email, "password": password}), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp);
    assert!(cookie.starts_with("sid="));

    // Profile resolves through the session store
    let resp = app.call(get("/api/profile", Some(&cookie))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["user"]["email"], email);

    // Logout revokes the session; the cookie no longer resolves
    let resp = app.call(post_json("/api/auth/logout", json!({}), Some(&cookie))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app.call(get("/api/profile", Some(&cookie))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let Some(mut app) = build_app().await else { return };

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let resp = app
        .call(post_json("/api/auth/signup", json!({"name": "Tester", "email": email, "password": "StrongPass123"}), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .call(post_json("/api/auth/login", json!({"email": email, "password": "wrong1"}), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_signup_short_password_rejected_with_field_errors() {
    let Some(mut app) = build_app().await else { return };

    let resp = app
        .call(post_json("/api/auth/signup", json!({"name": "A", "email": "bad", "password": "short"}), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    let errors = body["errors"].as_array().expect("field errors");
    assert_eq!(errors.len(), 3);
}

#[tokio::test]
async fn test_profile_requires_session() {
    let Some(mut app) = build_app().await else { return };

    let resp = app.call(get("/api/profile", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app.call(get("/api/profile", Some("sid=not-a-real-token"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
