use crate::api::handlers::AuthResponse;
use crate::api::session::{encode_session, SESSION_COOKIE};
use crate::error::{AppError, ErrorBody};
use crate::models::{ShopData, ShopIdentity};
use reqwest::{header, Response};
use serde_json::json;

/// 访问分析服务的 HTTP 客户端
///
/// 登录后保存会话 Cookie, 之后的店铺数据请求自动带上。
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_cookie: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 使用之前保存的店铺恢复会话
    pub fn restore_session(&mut self, shop: &ShopIdentity) -> Result<(), AppError> {
        self.session_cookie = Some(format!("{}={}", SESSION_COOKIE, encode_session(shop)?));
        Ok(())
    }

    pub fn clear_session(&mut self) {
        self.session_cookie = None;
    }

    /// POST /api/auth
    pub async fn authenticate(&mut self, shop_name: &str) -> Result<ShopIdentity, AppError> {
        let url = format!("{}/api/auth", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "shopName": shop_name }))
            .send()
            .await?;
        let response = check_status(response).await?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);

        let body: AuthResponse = response.json().await?;
        match cookie {
            Some(cookie) => self.session_cookie = Some(cookie),
            None => self.restore_session(&body.shop)?,
        }

        Ok(body.shop)
    }

    /// GET /api/shop/{shopId}/data
    pub async fn fetch_shop_data(&self, shop_id: i64) -> Result<ShopData, AppError> {
        let url = format!("{}/api/shop/{}/data", self.base_url, shop_id);
        tracing::info!("Fetching shop data for ID: {}", shop_id);

        let mut request = self.http.get(&url);
        if let Some(cookie) = &self.session_cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = check_status(request.send().await?).await?;
        let data: ShopData = response.json().await?;
        tracing::info!(
            "Fetched shop data: {} products, {} variants, {} orders",
            data.products.len(),
            data.variants.len(),
            data.orders.len()
        );
        Ok(data)
    }
}

/// 非 2xx 响应转换为 AppError::Api, 错误信息取自 `{error}` 响应体
async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    tracing::error!("API error {}: {}", status.as_u16(), message);

    Err(AppError::Api {
        status: status.as_u16(),
        message,
    })
}
