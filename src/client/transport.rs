//! HTTP transport used by the controller to reach the weather handler.

use async_trait::async_trait;
use reqwest::Url;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

/// Status and raw body of a handler reply.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait WeatherTransport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpReply, TransportError>;
}

/// [`WeatherTransport`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WeatherTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpReply, TransportError> {
        let request_error = |e: reqwest::Error| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(request_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(request_error)?;

        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_reqwest_transport_reply() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("city", "Oslo"))
            .respond_with(ResponseTemplate::new(404).set_body_string("{\"error\":true}"))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&format!("{}/weather?city=Oslo", mock_server.uri())).unwrap();
        let reply = ReqwestTransport::new().get(&url).await.unwrap();

        assert_eq!(reply.status, 404);
        assert!(!reply.is_success());
        assert_eq!(reply.body, "{\"error\":true}");
    }

    #[tokio::test]
    async fn test_reqwest_transport_unreachable() {
        let url = Url::parse("http://127.0.0.1:9/weather").unwrap();
        let err = ReqwestTransport::new().get(&url).await.unwrap_err();
        assert!(err.to_string().contains("127.0.0.1:9"));
    }
}
