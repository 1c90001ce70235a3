use crate::domain::ports::{TallyTransport, TransportResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// reqwest 實作；每次呼叫就是一個 POST
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TallyTransport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        body: String,
        timeout: Duration,
    ) -> Result<TransportResponse> {
        let response = self
            .client
            .post(endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .timeout(timeout)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(TransportResponse { status, body })
    }
}
