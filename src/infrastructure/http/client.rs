//! Shared reqwest client for one upstream service

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::domain::{AppError, AppResult, Credentials, DomainError};
use crate::shared::errors::InfraError;
use crate::shared::retry::{retry_with_backoff, RetryConfig};

/// Client bound to one service's base URL
#[derive(Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: String,
    service: &'static str,
    retry: RetryConfig,
}

impl ServiceClient {
    pub fn new(
        service: &'static str,
        base_url: impl Into<String>,
        timeout: Duration,
        retry: RetryConfig,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(InfraError::from)?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service,
            retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, credentials: Option<&Credentials>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(service = self.service, %method, %url, "Upstream request");
        let builder = self.http.request(method, url);
        match credentials {
            Some(c) => builder.header(reqwest::header::AUTHORIZATION, c.header_value()),
            None => builder,
        }
    }

    /// GET with retry on transient failures; 404 yields `None`.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        credentials: Option<&Credentials>,
    ) -> AppResult<Option<T>> {
        retry_with_backoff(
            &self.retry,
            || self.get_once(path, query, credentials),
            AppError::is_transient,
            path,
        )
        .await
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        credentials: Option<&Credentials>,
    ) -> AppResult<Option<T>> {
        let response = self
            .request(Method::GET, path, credentials)
            .query(query)
            .send()
            .await
            .map_err(InfraError::from)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = self.check(response).await?;
        Ok(Some(response.json::<T>().await.map_err(InfraError::from)?))
    }

    /// GET with retry; 404 is an error.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        credentials: Option<&Credentials>,
    ) -> AppResult<T> {
        self.get_optional(path, query, credentials)
            .await?
            .ok_or_else(|| DomainError::not_found("Resource", "path", path).into())
    }

    /// POST a JSON body. Never retried.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        credentials: Option<&Credentials>,
    ) -> AppResult<T> {
        let response = self
            .request(Method::POST, path, credentials)
            .json(body)
            .send()
            .await
            .map_err(InfraError::from)?;
        let response = self.check(response).await?;
        Ok(response.json::<T>().await.map_err(InfraError::from)?)
    }

    /// Send a multipart form (`POST` or `PUT`). Never retried.
    pub async fn send_form<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: reqwest::multipart::Form,
        credentials: Option<&Credentials>,
    ) -> AppResult<T> {
        let response = self
            .request(method, path, credentials)
            .multipart(form)
            .send()
            .await
            .map_err(InfraError::from)?;
        let response = self.check(response).await?;
        Ok(response.json::<T>().await.map_err(InfraError::from)?)
    }

    pub async fn delete(&self, path: &str, credentials: Option<&Credentials>) -> AppResult<()> {
        let response = self
            .request(Method::DELETE, path, credentials)
            .send()
            .await
            .map_err(InfraError::from)?;
        self.check(response).await?;
        Ok(())
    }

    /// Map non-success statuses onto domain errors.
    async fn check(&self, response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let detail = error_detail(&response.text().await.unwrap_or_default())
            .unwrap_or_else(|| status.to_string());

        let err = match status {
            StatusCode::UNAUTHORIZED => DomainError::Unauthorized(detail),
            StatusCode::FORBIDDEN => DomainError::Forbidden(detail),
            StatusCode::NOT_FOUND => DomainError::not_found("Resource", "path", path),
            StatusCode::CONFLICT => DomainError::Conflict(detail),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                DomainError::Validation(detail)
            }
            _ => DomainError::UpstreamUnavailable(format!(
                "{} service returned {}: {}",
                self.service, status, detail
            )),
        };
        Err(err.into())
    }
}

/// `detail` from an error body (`{"detail": "..."}`), if present
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_detail_message() {
        assert_eq!(
            error_detail(r#"{"detail":"Villa not found"}"#).as_deref(),
            Some("Villa not found")
        );
        assert!(error_detail(r#"{"detail":[{"loc":["body"]}]}"#)
            .unwrap()
            .contains("loc"));
        assert_eq!(error_detail("<html>"), None);
        assert_eq!(error_detail(r#"{"message":"x"}"#), None);
    }

    #[test]
    fn base_url_is_normalized() {
        let client = ServiceClient::new(
            "villa",
            "http://localhost:8002/",
            Duration::from_secs(1),
            RetryConfig::default(),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8002");
    }
}
