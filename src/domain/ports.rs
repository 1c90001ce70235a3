use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    /// 組合後的 `host:port`
    fn endpoint(&self) -> String;
    fn timeout(&self) -> Duration;
    fn log_payloads(&self) -> bool;
    fn default_company(&self) -> Option<&str> {
        None
    }
}

/// HTTP 回應的原始狀態碼與內容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// 單次 POST，不重試、不保留連線狀態
#[async_trait]
pub trait TallyTransport: Send + Sync {
    async fn post(&self, endpoint: &str, body: String, timeout: Duration)
        -> Result<TransportResponse>;
}
