use thiserror::Error;

// =========================================================
// API 错误类型
// =========================================================

/// 调用后端 API 时可能出现的错误
///
/// UI 层只需区分两类：`Unauthorized`（清除会话并要求重新登录）
/// 和其他错误（以 toast 形式提示）。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 401/403: Token 无效、过期或权限不足
    #[error("unauthorized")]
    Unauthorized,
    /// 其他非 2xx 响应
    #[error("request failed ({status}): {message}")]
    Status { status: u16, message: String },
    /// 网络层失败（无法连接、CORS 等）
    #[error("network error: {0}")]
    Network(String),
    /// 请求体序列化失败
    #[error("failed to encode request: {0}")]
    Encode(String),
    /// 响应体解析失败
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// 与后端错误状态表对应的 HTTP 状态码（网络/编解码错误没有状态码）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Encode(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// 展示给用户的提示（toast / 表单内联错误）
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Session expired, please sign in again".to_string(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Network(_) => "Cannot reach the server".to_string(),
            ApiError::Encode(_) | ApiError::Decode(_) => {
                "Unexpected data from the server".to_string()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(ApiError::Unauthorized.status_code(), Some(401));
        let not_found = ApiError::Status {
            status: 404,
            message: "Student not found with id: 4".to_string(),
        };
        assert!(not_found.is_not_found());
        assert_eq!(not_found.user_message(), "Student not found with id: 4");
        assert_eq!(ApiError::Network("TypeError".to_string()).status_code(), None);
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let msg = ApiError::Decode("expected value at line 1".to_string()).user_message();
        assert!(!msg.contains("line 1"));
        assert_eq!(
            ApiError::Network("Failed to fetch".to_string()).user_message(),
            "Cannot reach the server"
        );
    }
}
