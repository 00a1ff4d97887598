//! NCP 请求构造与发送

use chrono::Utc;
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::{HttpRequest, HttpResponse, HttpUtils};
use crate::sign::{
    ACCESS_KEY_HEADER, SIGNATURE_HEADER, TIMESTAMP_HEADER, make_signature, request_uri,
};

use super::NcpDnsClient;

impl NcpDnsClient {
    // ==================== 辅助方法 ====================

    /// 拼接完整 URL，query 参数做 URL 编码
    pub(crate) fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!("{}{path}", self.base_url);
        if !query.is_empty() {
            let query = query
                .iter()
                .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// 构造已签名的请求
    ///
    /// 时间戳在此处获取，调用方应立即发送返回的请求。
    pub(crate) fn build_request(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<HttpRequest> {
        let parsed = Url::parse(url).map_err(|e| ProviderError::InvalidParameter {
            param: "url".to_string(),
            detail: format!("'{url}': {e}"),
        })?;

        let timestamp = Utc::now().timestamp_millis();
        let signature = make_signature(
            method.as_str(),
            &request_uri(&parsed),
            timestamp,
            &self.credentials.access_key,
            &self.credentials.secret_key,
        );

        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            (TIMESTAMP_HEADER.to_string(), timestamp.to_string()),
            (
                ACCESS_KEY_HEADER.to_string(),
                self.credentials.access_key.clone(),
            ),
            (SIGNATURE_HEADER.to_string(), signature),
        ];

        Ok(HttpRequest {
            method,
            url: parsed.to_string(),
            headers,
            body,
        })
    }

    /// 签名、发送并校验状态码
    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
        operation: &'static str,
    ) -> Result<HttpResponse> {
        let request = self.build_request(method, url, body)?;
        let response = HttpUtils::execute(self.transport.as_ref(), request, operation).await?;
        HttpUtils::ensure_success(&response, operation)?;
        Ok(response)
    }

    // ==================== 请求方法 ====================

    /// 执行 GET 请求并解析 JSON 响应
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        operation: &'static str,
    ) -> Result<T> {
        let url = self.endpoint(path, query);
        let response = self.execute(Method::GET, &url, None, operation).await?;
        HttpUtils::parse_json(&response.body, operation)
    }

    /// 执行带 JSON body 的请求（POST/DELETE），忽略响应内容
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        operation: &'static str,
    ) -> Result<()> {
        let payload =
            serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                detail: e.to_string(),
            })?;
        let url = self.endpoint(path, &[]);
        self.execute(method, &url, Some(payload), operation)
            .await
            .map(|_| ())
    }

    /// 执行无 body 的 PUT 请求，忽略响应内容
    pub(crate) async fn put_empty(&self, path: &str, operation: &'static str) -> Result<()> {
        let url = self.endpoint(path, &[]);
        self.execute(Method::PUT, &url, None, operation)
            .await
            .map(|_| ())
    }
}
