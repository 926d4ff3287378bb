//! HTTP 传输层
//!
//! 基于 `gloo-net` 实现共享层的 [`HttpClient`] 抽象。
//! 状态码与响应体的解释由共享层的 `ApiClient` 完成。

use gloo_net::http::{Request, RequestBuilder};
use grade_manager_shared::client::{ApiClient, HttpClient, HttpRequest, HttpResponse};
use grade_manager_shared::protocol::HttpMethod;
use grade_manager_shared::{ApiError, ApiResult};

/// 浏览器 fetch 传输
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlooHttpClient;

/// 前端使用的 API 客户端
pub type GradeApi = ApiClient<GlooHttpClient>;

fn builder(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
        HttpMethod::Put => Request::put(url),
        HttpMethod::Patch => Request::patch(url),
        HttpMethod::Delete => Request::delete(url),
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for GlooHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = builder(req.method, &req.url);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Encode(e.to_string()))?;

        let res = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = res.status();
        // 错误响应的 body 可能为空，读取失败时按空字符串处理
        let body = res.text().await.unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}

/// 使用指定后端地址创建客户端
pub fn api_client(base_url: &str, token: Option<&str>) -> GradeApi {
    let api = ApiClient::new(base_url, GlooHttpClient);
    match token {
        Some(token) => api.with_token(token),
        None => api,
    }
}
