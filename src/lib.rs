pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::{toml_config::TomlConfig, ClientConfig};
pub use core::{
    client::TallyClient,
    envelope::Node,
    response::{check_status, company_names, flatten, import_summary, is_empty_envelope, parse},
    transport::HttpTransport,
};
pub use domain::model::*;
pub use utils::error::{ErrorCategory, ErrorSeverity, Result, TallyError};
