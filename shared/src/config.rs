//! 客户端配置
//!
//! 默认后端地址在编译期通过 `GRADE_MANAGER_API_URL` 注入，
//! 用户可以在登录页覆盖（覆盖值由前端写入 LocalStorage）。

/// 未设置 `GRADE_MANAGER_API_URL` 时使用的后端地址
pub const FALLBACK_API_BASE_URL: &str = "http://localhost:8080/api";
/// toast 自动关闭时间
pub const DEFAULT_TOAST_TIMEOUT_MS: u32 = 2_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub toast_timeout_ms: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let base = option_env!("GRADE_MANAGER_API_URL").unwrap_or(FALLBACK_API_BASE_URL);
        Self {
            api_base_url: normalize_base_url(base).unwrap_or_else(|| FALLBACK_API_BASE_URL.to_string()),
            toast_timeout_ms: DEFAULT_TOAST_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// 应用覆盖地址；空白值被忽略
    pub fn with_base_url(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url.and_then(normalize_base_url) {
            self.api_base_url = url;
        }
        self
    }
}

/// 去掉首尾空白和结尾的 `/`，空值返回 `None`
pub fn normalize_base_url(url: &str) -> Option<String> {
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize_base_url(" https://sgm.example.edu/api/ ").as_deref(),
            Some("https://sgm.example.edu/api")
        );
        assert_eq!(normalize_base_url("   "), None);
        assert_eq!(normalize_base_url("///"), None);
    }

    #[test]
    fn test_override_and_blank_override() {
        let config = ClientConfig::default().with_base_url(Some("http://10.0.0.5:8080/api/"));
        assert_eq!(config.api_base_url, "http://10.0.0.5:8080/api");

        let default = ClientConfig::default();
        assert_eq!(
            default.clone().with_base_url(Some("  ")).api_base_url,
            default.api_base_url
        );
        assert_eq!(default.clone().with_base_url(None), default);
        assert_eq!(default.toast_timeout_ms, DEFAULT_TOAST_TIMEOUT_MS);
    }
}
