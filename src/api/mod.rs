pub mod handlers;
pub mod session;

use crate::db::ShopStore;
use axum::{
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

pub use handlers::{authenticate, health_check, shop_data};

/// 共享状态
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ShopStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ShopStore>) -> Self {
        Self { store }
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/auth",
            post(handlers::authenticate).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/shop/:shop_id/data",
            get(handlers::shop_data).fallback(handlers::method_not_allowed),
        )
        .layer(ServiceBuilder::new().layer(middleware::from_fn(request_logger)))
        .with_state(state)
}

/// 请求日志: 方法、路径、状态码、耗时
async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        "{} {} -> {} ({:?})",
        method,
        path,
        response.status().as_u16(),
        start.elapsed()
    );
    response
}
