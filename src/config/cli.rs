use crate::config::toml_config::TomlConfig;
use crate::config::ClientConfig;
use crate::domain::model::{DateRange, ExportFormat};
use crate::utils::error::{Result, TallyError};
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "tally-connector")]
#[command(about = "Talk to a Tally server over its XML HTTP interface")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "TALLY_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "TALLY_PORT")]
    pub port: Option<u16>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, global = true, help = "Company to run the command against")]
    pub company: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check that Tally answers on the configured endpoint
    Ping,
    /// List company names
    Companies,
    /// Show the active company
    Current,
    /// Make a company the active one
    Select { name: String },
    Ledgers,
    Groups,
    StockItems,
    Units,
    VoucherTypes,
    /// Show one ledger
    Ledger { name: String },
    Vouchers {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long = "type")]
        voucher_type: Option<String>,
    },
    /// Fetch a predefined report as XML
    Report {
        name: String,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Render a report to a file
    Export {
        report: String,
        #[arg(long, default_value = "pdf")]
        format: ExportFormat,
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Flatten an XML file into JSON
    Parse { file: PathBuf },
    /// Call a TDL function
    Tdl {
        function: String,
        params: Vec<String>,
    },
}

impl CliConfig {
    /// 設定檔為基礎，命令列參數覆蓋
    pub fn resolve(&self) -> Result<(ClientConfig, Option<String>)> {
        let file_config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        file_config.validate()?;

        let mut client = file_config.tally.clone();
        if let Some(host) = &self.host {
            client.host = host.clone();
        }
        if let Some(port) = self.port {
            client.port = port;
        }
        if let Some(timeout) = self.timeout {
            client.timeout_seconds = timeout;
        }
        if self.verbose {
            client.log_payloads = true;
        }
        client.validate()?;

        let company = self
            .company
            .clone()
            .or_else(|| file_config.company().map(str::to_string));
        Ok((client, company))
    }
}

/// 兩端都給才組成區間，只給一端視為錯誤
pub fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Option<DateRange>> {
    match (from, to) {
        (Some(from), Some(to)) => DateRange::new(from, to).map(Some),
        (None, None) => Ok(None),
        _ => Err(TallyError::invalid_input(
            "--from and --to must be given together",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = CliConfig::parse_from([
            "tally-connector",
            "--host",
            "http://10.1.1.1",
            "--port",
            "9100",
            "--company",
            "Acme",
            "companies",
        ]);
        let (config, company) = cli.resolve().unwrap();
        assert_eq!(config.endpoint(), "http://10.1.1.1:9100");
        assert_eq!(company.as_deref(), Some("Acme"));
        assert!(matches!(cli.command, Command::Companies));
    }

    #[test]
    fn test_export_arguments() {
        let cli = CliConfig::parse_from([
            "tally-connector",
            "export",
            "Balance Sheet",
            "--output",
            "bs.pdf",
            "--from",
            "2024-04-01",
            "--to",
            "2025-03-31",
        ]);
        match cli.command {
            Command::Export {
                report,
                format,
                from,
                to,
                ..
            } => {
                assert_eq!(report, "Balance Sheet");
                assert_eq!(format, ExportFormat::Pdf);
                assert!(date_range(from, to).unwrap().is_some());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_half_open_range_is_rejected() {
        let from = NaiveDate::from_ymd_opt(2024, 4, 1);
        assert!(date_range(from, None).is_err());
        assert!(date_range(None, None).unwrap().is_none());
    }

    #[test]
    fn test_invalid_host_fails_validation() {
        let cli = CliConfig::parse_from(["tally-connector", "--host", "nope", "ping"]);
        assert!(cli.resolve().is_err());
    }
}
