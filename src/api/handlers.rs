use crate::api::session::{session_set_cookie, ShopSession};
use crate::api::AppState;
use crate::error::{AppError, ErrorBody};
use crate::models::{ShopData, ShopIdentity};
use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// 请求体: 店铺名
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    #[serde(default)]
    pub shop_name: Option<String>,
}

/// 登录响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub shop: ShopIdentity,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 店铺登录: 按名称查找店铺并下发会话 Cookie
pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let shop_name = payload
        .ok()
        .and_then(|Json(req)| req.shop_name)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::Validation("Shop name is required".to_string()))?;

    tracing::info!("Auth request for shop: {}", shop_name);

    let Some(shop) = state.store.find_shop_by_name(&shop_name).await? else {
        tracing::warn!("Shop not found: {}", shop_name);
        return Err(AppError::NotFound("Shop not found".to_string()));
    };

    let identity = ShopIdentity::from(shop);
    let cookie = session_set_cookie(&identity)?;
    tracing::info!("Shop {} authenticated as id {}", identity.name, identity.id);

    let body = AuthResponse {
        success: true,
        shop: identity,
    };
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// 店铺数据: 店铺、商品、规格、订单
///
/// 只返回原始行, 聚合在客户端完成。
pub async fn shop_data(
    State(state): State<AppState>,
    ShopSession(session): ShopSession,
    Path(raw_shop_id): Path<String>,
) -> Result<Json<ShopData>, AppError> {
    let shop_id: i64 = raw_shop_id
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid shop ID: {}", raw_shop_id)))?;

    if session.id != shop_id {
        tracing::warn!(
            "Shop {} tried to read data of shop {}",
            session.id,
            shop_id
        );
        return Err(AppError::Forbidden("Unauthorized access to shop data".to_string()));
    }

    let Some(data) = state.store.load_shop_data(shop_id).await? else {
        tracing::warn!("Shop not found with ID: {}", shop_id);
        return Err(AppError::NotFound("Shop not found".to_string()));
    };

    tracing::info!(
        "店铺 {} 数据: {} 个商品, {} 个规格, {} 条订单",
        shop_id,
        data.products.len(),
        data.variants.len(),
        data.orders.len()
    );

    Ok(Json(data))
}

/// 不支持的请求方法
pub async fn method_not_allowed() -> Response {
    let body = ErrorBody {
        error: "Method not allowed".to_string(),
    };
    (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response()
}
