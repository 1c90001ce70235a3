pub mod client;
pub mod envelope;
pub mod requests;
pub mod response;
pub mod transport;

pub use crate::domain::model::{FlatMap, ImportSummary};
pub use crate::domain::ports::{ConfigProvider, TallyTransport, TransportResponse};
pub use crate::utils::error::Result;
