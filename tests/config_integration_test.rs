use anyhow::Result;
use httpmock::prelude::*;
use tally_connector::utils::validation::Validate;
use tally_connector::{TallyClient, TomlConfig};
use tempfile::TempDir;
use tokio_test::assert_ok;

/// 從設定檔建立 client，預設公司會帶進每個請求
#[tokio::test]
async fn test_client_from_toml_file() -> Result<()> {
    let server = MockServer::start_async().await;
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("tally.toml");

    let config_content = format!(
        r#"
[tally]
host = "http://{}"
port = {}
timeout_seconds = 5

[defaults]
company = "Configured Co"
"#,
        server.host(),
        server.port()
    );
    tokio::fs::write(&config_path, config_content).await?;

    let config = TomlConfig::from_file(&config_path)?;
    assert_ok!(config.validate());

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<SVCURRENTCOMPANY>Configured Co</SVCURRENTCOMPANY>")
                .body_contains("<ID>Units</ID>");
            then.status(200).body("<ENVELOPE></ENVELOPE>");
        })
        .await;

    let client = TallyClient::from_config(&config);
    assert_eq!(
        client.endpoint(),
        format!("http://{}:{}", server.host(), server.port())
    );
    assert_ok!(client.get_units_list(None).await);

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_missing_config_file_is_io_error() {
    let err = TomlConfig::from_file("/definitely/not/here/tally.toml").unwrap_err();
    assert!(matches!(err, tally_connector::TallyError::IoError(_)));
}
