use crate::error::AppError;
use crate::models::ShopIdentity;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

/// 会话 Cookie 名
pub const SESSION_COOKIE: &str = "ecommerce_analytics_shop";

/// 编码 Cookie 值: 百分号编码后的 `{"id","name"}` JSON
pub fn encode_session(shop: &ShopIdentity) -> Result<String, AppError> {
    let json = serde_json::to_string(shop)?;
    Ok(urlencoding::encode(&json).into_owned())
}

pub fn decode_session(value: &str) -> Result<ShopIdentity, AppError> {
    let invalid = || AppError::Unauthenticated("Invalid authentication data".to_string());
    let json = urlencoding::decode(value).map_err(|_| invalid())?;
    serde_json::from_str(&json).map_err(|_| invalid())
}

/// 登录成功后下发的 Set-Cookie 头
pub fn session_set_cookie(shop: &ShopIdentity) -> Result<String, AppError> {
    Ok(format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE,
        encode_session(shop)?
    ))
}

/// 从 Cookie 头里取出指定 Cookie 的值
pub fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// 已登录店铺; 缺少或无法解析 Cookie 时返回 401
#[derive(Debug, Clone)]
pub struct ShopSession(pub ShopIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for ShopSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = find_cookie(&parts.headers, SESSION_COOKIE)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Unauthenticated("Authentication required".to_string()))?;
        decode_session(value).map(ShopSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_value_roundtrips_through_header() {
        let shop = ShopIdentity {
            id: 7,
            name: "Home Goods".to_string(),
        };
        let value = encode_session(&shop).unwrap();
        assert!(!value.contains('"'));
        assert!(!value.contains(' '));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, value)).unwrap(),
        );
        let found = find_cookie(&headers, SESSION_COOKIE).unwrap();
        assert_eq!(decode_session(found).unwrap(), shop);
    }

    #[test]
    fn garbage_cookie_is_unauthenticated() {
        assert!(matches!(
            decode_session("not-json"),
            Err(AppError::Unauthenticated(_))
        ));
    }
}
