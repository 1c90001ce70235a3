use anyhow::Result;
use httpmock::prelude::*;
use std::time::Duration;
use tally_connector::{ClientConfig, ErrorCategory, ExportFormat, TallyClient, TallyError};

fn client_for(server: &MockServer) -> TallyClient {
    let config = ClientConfig::new(format!("http://{}", server.host()), server.port());
    TallyClient::from_config(&config)
}

/// 回傳一個目前沒有人監聽的 port
fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[tokio::test]
async fn test_send_returns_body_unchanged() -> Result<()> {
    let server = MockServer::start_async().await;
    let body = "<ENVELOPE>\n  <NAME>Acme &amp; Co</NAME>\n</ENVELOPE>\n";

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/").body("<ENVELOPE/>");
            then.status(200).body(body);
        })
        .await;

    let client = client_for(&server);
    let response = client.send("<ENVELOPE/>".to_string()).await?;

    mock.assert_async().await;
    assert_eq!(response, body);
    Ok(())
}

#[tokio::test]
async fn test_send_empty_body_on_200() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200).body("");
        })
        .await;

    let client = client_for(&server);
    assert_eq!(client.send("<ENVELOPE/>".to_string()).await?, "");
    assert!(client.test_connection().await);
    Ok(())
}

#[tokio::test]
async fn test_non_200_status_across_operations() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(503).body("Service Unavailable");
        })
        .await;

    let client = client_for(&server);

    let results = vec![
        client.get_current_company().await.map(|_| ()),
        client.get_ledgers_list(Some("Acme")).await.map(|_| ()),
        client.get_groups_list(None).await.map(|_| ()),
        client.get_stock_items_list(None).await.map(|_| ()),
        client.list_companies().await.map(|_| ()),
        client.select_company("Acme").await.map(|_| ()),
        client.delete_ledger("Cash", None).await.map(|_| ()),
        client
            .export_document("Trial Balance", ExportFormat::Pdf, None, None)
            .await
            .map(|_| ()),
    ];

    for result in results {
        let err = result.unwrap_err();
        assert!(matches!(err, TallyError::HttpStatus { status: 503 }), "{:?}", err);
        assert_eq!(err.category(), ErrorCategory::Protocol);
        assert!(err.is_retryable());
    }
    mock.assert_hits_async(8).await;
    assert!(!client.test_connection().await);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let config = ClientConfig::new("http://127.0.0.1", unused_port()).with_timeout(5);
    let client = TallyClient::from_config(&config);

    let err = client.get_ledgers_list(None).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Transport);
    assert!(err.user_friendly_message().contains("Tally"));

    assert!(client.list_companies().await.is_err());
    assert!(!client.test_connection().await);
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .body("<ENVELOPE></ENVELOPE>")
                .delay(Duration::from_secs(3));
        })
        .await;

    let config =
        ClientConfig::new(format!("http://{}", server.host()), server.port()).with_timeout(1);
    let client = TallyClient::from_config(&config);

    let err = client.get_current_company().await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
    assert_eq!(err.category(), ErrorCategory::Transport);
}

#[tokio::test]
async fn test_list_companies_sorted_and_deduplicated() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<ID>List of Companies</ID>")
                .body_contains("<NATIVEMETHOD>Name</NATIVEMETHOD>");
            then.status(200).body(
                r#"<ENVELOPE>
 <HEADER><VERSION>1</VERSION><STATUS>1</STATUS></HEADER>
 <BODY><DESC></DESC><DATA><COLLECTION>
  <COMPANY NAME="B"><NAME>B</NAME></COMPANY>
  <COMPANY NAME="A"><NAME>A</NAME></COMPANY>
  <COMPANY NAME="B"><NAME>B</NAME></COMPANY>
 </COLLECTION></DATA></BODY>
</ENVELOPE>"#,
            );
        })
        .await;

    let client = client_for(&server);
    let names = client.list_companies().await?;

    mock.assert_async().await;
    assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_list_companies_failure_distinct_from_empty() -> Result<()> {
    let server = MockServer::start_async().await;
    let mut empty = server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .body("<ENVELOPE><BODY><DATA><COLLECTION></COLLECTION></DATA></BODY></ENVELOPE>");
        })
        .await;

    let client = client_for(&server);
    assert!(client.list_companies().await?.is_empty());
    empty.delete_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .body("<ENVELOPE><HEADER><STATUS>0</STATUS></HEADER></ENVELOPE>");
        })
        .await;

    let err = client.list_companies().await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Application);
    Ok(())
}

#[tokio::test]
async fn test_select_company_exact_empty_envelope() -> Result<()> {
    let server = MockServer::start_async().await;
    let ok = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<SVCURRENTCOMPANY>Good Co</SVCURRENTCOMPANY>");
            then.status(200).body("  <ENVELOPE></ENVELOPE>\r\n");
        })
        .await;
    let rejected = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<SVCURRENTCOMPANY>Missing Co</SVCURRENTCOMPANY>");
            then.status(200).body(
                "<ENVELOPE><LINEERROR>Could not set 'SVCurrentCompany' to 'Missing Co'</LINEERROR></ENVELOPE>",
            );
        })
        .await;
    let garbled = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<SVCURRENTCOMPANY>Garbled Co</SVCURRENTCOMPANY>");
            then.status(200).body("<ENVELOPE>");
        })
        .await;

    let client = client_for(&server);
    assert!(client.select_company("Good Co").await?);
    assert!(!client.select_company("Missing Co").await?);
    assert!(!client.select_company("Garbled Co").await?);

    ok.assert_async().await;
    rejected.assert_async().await;
    garbled.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_export_document_returns_raw_bytes() -> Result<()> {
    let server = MockServer::start_async().await;
    let pdf: Vec<u8> = vec![0x25, 0x50, 0x44, 0x46, 0x2d, 0x31, 0x2e, 0x37, 0x00, 0xff, 0xfe];
    let expected = pdf.clone();

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<TALLYREQUEST>Export Data</TALLYREQUEST>")
                .body_contains("<REPORTNAME>Balance Sheet</REPORTNAME>")
                .body_contains("<SVEXPORTFORMAT>$$SysName:PDF</SVEXPORTFORMAT>");
            then.status(200)
                .header("Content-Type", "application/pdf")
                .body(pdf);
        })
        .await;

    let client = client_for(&server);
    let bytes = client
        .export_document("Balance Sheet", ExportFormat::Pdf, None, None)
        .await?;

    mock.assert_async().await;
    assert_eq!(bytes, expected);
    Ok(())
}

#[tokio::test]
async fn test_query_documents_are_escaped() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<SVCURRENTCOMPANY>R&amp;D &lt;India&gt;</SVCURRENTCOMPANY>");
            then.status(200).body("<ENVELOPE></ENVELOPE>");
        })
        .await;

    let client = client_for(&server);
    client.get_ledgers_list(Some("R&D <India>")).await?;
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_execute_tdl_function() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<TYPE>TDLFunction</TYPE><ID>SimpleAdd</ID>")
                .body_contains("<PARAM>10</PARAM><PARAM>20</PARAM>");
            then.status(200).body("<RESULT>30</RESULT>");
        })
        .await;

    let client = client_for(&server);
    let body = client.execute_tdl_function("SimpleAdd", &["10", "20"]).await?;

    mock.assert_async().await;
    assert_eq!(tally_connector::parse(&body)["RESULT"], "30");
    Ok(())
}
