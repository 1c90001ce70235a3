use clap::Parser;
use std::collections::BTreeMap;
use tally_connector::config::cli::{date_range, Command};
use tally_connector::utils::error::ErrorSeverity;
use tally_connector::utils::logger;
use tally_connector::{CliConfig, TallyClient, TallyError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting tally-connector CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let (config, company) = match cli.resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let span = tracing::info_span!("tally", endpoint = %config.endpoint());
    let client = TallyClient::from_config(&config).with_span(span);

    if let Err(e) = run(&client, cli.command, company.as_deref()).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(
    client: &TallyClient,
    command: Command,
    company: Option<&str>,
) -> Result<(), TallyError> {
    match command {
        Command::Ping => {
            if client.test_connection().await {
                println!("✅ Tally is reachable at {}", client.endpoint());
            } else {
                println!("❌ Tally is not reachable at {}", client.endpoint());
                std::process::exit(2);
            }
        }
        Command::Companies => {
            for name in client.list_companies().await? {
                println!("{}", name);
            }
        }
        Command::Current => match client.current_company_name().await? {
            Some(name) => println!("{}", name),
            None => println!("(no company loaded)"),
        },
        Command::Select { name } => {
            if client.select_company(&name).await? {
                println!("✅ Selected '{}'", name);
            } else {
                return Err(TallyError::application(format!(
                    "Tally did not select company '{}'",
                    name
                )));
            }
        }
        Command::Ledgers => println!("{}", client.get_ledgers_list(company).await?),
        Command::Groups => println!("{}", client.get_groups_list(company).await?),
        Command::StockItems => println!("{}", client.get_stock_items_list(company).await?),
        Command::Units => println!("{}", client.get_units_list(company).await?),
        Command::VoucherTypes => println!("{}", client.get_voucher_types_list(company).await?),
        Command::Ledger { name } => println!("{}", client.get_ledger(&name, company).await?),
        Command::Vouchers {
            from,
            to,
            voucher_type,
        } => {
            let range = date_range(from, to)?;
            let body = client
                .get_vouchers(company, range, voucher_type.as_deref())
                .await?;
            println!("{}", body);
        }
        Command::Report { name, from, to } => {
            let range = date_range(from, to)?;
            println!("{}", client.get_report(&name, company, range).await?);
        }
        Command::Export {
            report,
            format,
            output,
            from,
            to,
        } => {
            let range = date_range(from, to)?;
            let bytes = client
                .export_document(&report, format, company, range)
                .await?;
            tokio::fs::write(&output, &bytes).await?;
            println!("📁 Output saved to: {}", output.display());
        }
        Command::Parse { file } => {
            let content = tokio::fs::read_to_string(&file).await?;
            let fields: BTreeMap<String, String> =
                tally_connector::parse(&content).into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }
        Command::Tdl { function, params } => {
            let params: Vec<&str> = params.iter().map(String::as_str).collect();
            println!("{}", client.execute_tdl_function(&function, &params).await?);
        }
    }
    Ok(())
}
