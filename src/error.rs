use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// 统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 缺少或非法的店铺名 / 店铺ID
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// 缺少或无法解析的会话 Cookie
    #[error("{0}")]
    Unauthenticated(String),

    /// 会话店铺与请求店铺不一致
    #[error("{0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 服务端返回的非 2xx 响应
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 单行订单数据非法 (日期/数量/价格), 聚合时跳过
    #[error("Data error: {0}")]
    Data(String),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// 错误响应体: `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对外展示的错误信息, 不暴露数据库细节
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "Database query failed".to_string(),
            AppError::Api { message, .. } => message.clone(),
            other if other.status_code().is_server_error() => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("请求失败: {}", self);
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
