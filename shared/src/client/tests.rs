use super::*;
use crate::protocol::{
    BranchRequest, CreateBranch, DeleteBranch, ListBranches, ListStudents, UpdateBranch,
};
use crate::Branch;
use std::cell::RefCell;
use std::collections::HashMap;

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

struct MockHttpClient {
    // (Method URL, (Status, Response Body))
    responses: RefCell<HashMap<String, (u16, String)>>,
    // 记录发出的请求
    requests: RefCell<Vec<HttpRequest>>,
    fail_network: bool,
}

impl MockHttpClient {
    fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            fail_network: false,
        }
    }

    fn offline() -> Self {
        Self {
            fail_network: true,
            ..Self::new()
        }
    }

    fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.responses.borrow_mut().insert(
            format!("{} {}", method.as_str(), url),
            (status, body.to_string()),
        );
    }

    fn last_request(&self) -> HttpRequest {
        self.requests.borrow().last().cloned().unwrap()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for &MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.borrow_mut().push(req.clone());

        if self.fail_network {
            return Err(ApiError::Network("connection refused".to_string()));
        }

        let key = format!("{} {}", req.method.as_str(), req.url);
        let responses = self.responses.borrow();
        let (status, body) = responses
            .get(&key)
            .cloned()
            .unwrap_or((404, "Not Found".to_string()));
        Ok(HttpResponse { status, body })
    }
}

const BASE: &str = "http://localhost:8080/api";

// =========================================================
// 请求构建
// =========================================================

#[tokio::test]
async fn test_attaches_bearer_token_and_joins_url() {
    let mock = MockHttpClient::new();
    mock.mock_response(HttpMethod::Get, "http://localhost:8080/api/branches", 200, "[]");

    let client = ApiClient::new("http://localhost:8080/api/", &mock).with_token("abc.def.ghi");
    let branches: Vec<Branch> = client.send(&ListBranches).await.unwrap();

    assert!(branches.is_empty());
    let req = mock.last_request();
    assert_eq!(req.url, "http://localhost:8080/api/branches");
    assert_eq!(req.header("authorization"), Some("Bearer abc.def.ghi"));
    assert_eq!(req.body, None);
    assert_eq!(req.header(HEADER_CONTENT_TYPE), None);
}

#[tokio::test]
async fn test_anonymous_client_sends_no_authorization() {
    let mock = MockHttpClient::new();
    let client = ApiClient::new(BASE, &mock);
    let _ = client.send(&ListBranches).await;
    assert_eq!(mock.last_request().header(HEADER_AUTHORIZATION), None);
}

#[tokio::test]
async fn test_json_body_for_write_methods() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Put,
        &format!("{}/branches/3", BASE),
        200,
        r#"{"id":3,"name":"Civil"}"#,
    );

    let client = ApiClient::new(BASE, &mock).with_token("t");
    let updated = client
        .send(&UpdateBranch {
            id: 3,
            body: BranchRequest {
                name: "Civil".to_string(),
            },
        })
        .await
        .unwrap();

    assert_eq!(updated, Branch { id: 3, name: "Civil".to_string() });
    let req = mock.last_request();
    assert_eq!(req.method, HttpMethod::Put);
    assert_eq!(req.header(HEADER_CONTENT_TYPE), Some(CONTENT_TYPE_JSON));
    assert_eq!(req.body.as_deref(), Some(r#"{"name":"Civil"}"#));
}

// =========================================================
// 响应处理
// =========================================================

#[tokio::test]
async fn test_empty_body_decodes_as_unit() {
    let mock = MockHttpClient::new();
    mock.mock_response(HttpMethod::Delete, &format!("{}/branches/9", BASE), 204, "");

    let client = ApiClient::new(BASE, &mock).with_token("t");
    client.send(&DeleteBranch { id: 9 }).await.unwrap();
    assert_eq!(mock.last_request().method, HttpMethod::Delete);
}

#[tokio::test]
async fn test_unauthorized_statuses() {
    let mock = MockHttpClient::new();
    mock.mock_response(HttpMethod::Get, &format!("{}/students", BASE), 401, "");
    mock.mock_response(HttpMethod::Get, &format!("{}/branches", BASE), 403, "");

    let client = ApiClient::new(BASE, &mock).with_token("expired");
    let err = client.send(&ListStudents).await.unwrap_err();
    assert!(err.is_unauthorized());
    let err = client.send(&ListBranches).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
}

#[tokio::test]
async fn test_error_message_is_extracted() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Post,
        &format!("{}/branches", BASE),
        409,
        r#"{"status":409,"error":"Conflict","message":"Branch already exists"}"#,
    );

    let client = ApiClient::new(BASE, &mock).with_token("t");
    let err = client
        .send(&CreateBranch(BranchRequest {
            name: "CSE".to_string(),
        }))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 409,
            message: "Branch already exists".to_string()
        }
    );
    assert_eq!(err.status_code(), Some(409));
}

#[tokio::test]
async fn test_non_json_error_falls_back_to_status() {
    let mock = MockHttpClient::new();
    let client = ApiClient::new(BASE, &mock).with_token("t");
    let err = client.send(&ListBranches).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "request failed (404): HTTP 404");
}

#[tokio::test]
async fn test_decode_failure() {
    let mock = MockHttpClient::new();
    mock.mock_response(HttpMethod::Get, &format!("{}/students", BASE), 200, r#"{"oops":1}"#);

    let client = ApiClient::new(BASE, &mock).with_token("t");
    let err = client.send(&ListStudents).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_network_failure_is_propagated() {
    let mock = MockHttpClient::offline();
    let client = ApiClient::new(BASE, &mock).with_token("t");
    let err = client.send(&ListBranches).await.unwrap_err();
    assert_eq!(err, ApiError::Network("connection refused".to_string()));
}

// =========================================================
// 登录
// =========================================================

#[tokio::test]
async fn test_login_returns_token() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Post,
        &format!("{}/auth/login", BASE),
        200,
        r#"{"token":"header.payload.sig"}"#,
    );

    let client = ApiClient::new(BASE, &mock);
    let token = client.login(" admin@sgm.com ", "admin123").await.unwrap();

    assert_eq!(token, "header.payload.sig");
    let req = mock.last_request();
    assert_eq!(
        req.body.as_deref(),
        Some(r#"{"email":"admin@sgm.com","password":"admin123"}"#)
    );
    assert_eq!(req.header(HEADER_AUTHORIZATION), None);
}

#[tokio::test]
async fn test_login_rejection_is_not_a_session_error() {
    let mock = MockHttpClient::new();
    mock.mock_response(HttpMethod::Post, &format!("{}/auth/login", BASE), 403, "");

    let client = ApiClient::new(BASE, &mock);
    let err = client.login("admin@sgm.com", "wrong").await.unwrap_err();
    assert!(!err.is_unauthorized());
    assert_eq!(err.status_code(), Some(401));
}
