use crate::error::{ApiError, ApiResult};
use crate::protocol::{ApiRequest, HttpMethod, LoginRequest};
use crate::{CONTENT_TYPE_JSON, ErrorBody, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE};

#[cfg(test)]
mod tests;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 传输层
///
/// 浏览器内是单线程的，因此不要求 `Send`。
/// 传输失败（连接失败、CORS）以 `ApiError::Network` 返回。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// API 客户端
// =========================================================

/// 附带 Bearer Token 的 REST 客户端
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient<C> {
    base_url: String,
    token: Option<String>,
    http: C,
}

impl<C: HttpClient> ApiClient<C> {
    /// 未认证的客户端（仅用于登录）
    pub fn new(base_url: &str, http: C) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            token: None,
            http,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn build<R: ApiRequest>(&self, req: &R) -> ApiResult<HttpRequest> {
        let mut http_req = HttpRequest::new(self.url(&req.path()), R::METHOD);

        if let Some(token) = &self.token {
            http_req = http_req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        if R::METHOD.has_body() {
            let body = serde_json::to_string(req).map_err(|e| ApiError::Encode(e.to_string()))?;
            http_req = http_req
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_body(body);
        }

        Ok(http_req)
    }

    /// 发送一个类型化请求并解析响应
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let http_req = self.build(req)?;
        let res = self.http.send(http_req).await?;

        if res.status == 401 || res.status == 403 {
            return Err(ApiError::Unauthorized);
        }

        if !res.ok() {
            return Err(ApiError::Status {
                status: res.status,
                message: error_message(&res),
            });
        }

        // 204 / 空响应体按 JSON null 处理，使 `()` 响应可以直接解析
        let body = if res.body.trim().is_empty() {
            "null"
        } else {
            res.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// 登录并返回 Token
    ///
    /// 登录接口的 401/403 代表凭据错误，而不是会话失效。
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.send(&req).await {
            Ok(res) => Ok(res.token),
            Err(ApiError::Unauthorized) => Err(ApiError::Status {
                status: 401,
                message: "Invalid email or password".to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}

fn error_message(res: &HttpResponse) -> String {
    serde_json::from_str::<ErrorBody>(&res.body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| format!("HTTP {}", res.status))
}
