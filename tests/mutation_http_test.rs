use anyhow::Result;
use chrono::NaiveDate;
use httpmock::prelude::*;
use tally_connector::{
    import_summary, ClientConfig, CompanyFlags, ErrorCategory, LedgerChanges, LedgerEntry,
    LedgerSpec, TallyClient, TallyError, UnitChanges, UnitSpec, VoucherRef, VoucherSpec,
};

const CREATED_RESPONSE: &str = r#"<RESPONSE>
 <CREATED>1</CREATED>
 <ALTERED>0</ALTERED>
 <DELETED>0</DELETED>
 <LASTVCHID>0</LASTVCHID>
 <LASTMID>311</LASTMID>
 <COMBINED>0</COMBINED>
 <IGNORED>0</IGNORED>
 <ERRORS>0</ERRORS>
 <CANCELLED>0</CANCELLED>
</RESPONSE>"#;

fn client_for(server: &MockServer) -> TallyClient {
    let config = ClientConfig::new(format!("http://{}", server.host()), server.port());
    TallyClient::from_config(&config)
}

#[tokio::test]
async fn test_create_ledger_round_trip() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<TALLYREQUEST>Import Data</TALLYREQUEST>")
                .body_contains("<REPORTNAME>All Masters</REPORTNAME>")
                .body_contains("<LEDGER NAME=\"Acme &amp; Sons\" ACTION=\"Create\">")
                .body_contains("<PARENT>Sundry Debtors</PARENT>");
            then.status(200).body(CREATED_RESPONSE);
        })
        .await;

    let client = client_for(&server);
    let spec = LedgerSpec::new("Acme & Sons", "Sundry Debtors");
    let body = client.create_ledger(&spec, None).await?;

    mock.assert_async().await;
    let summary = import_summary(&body)?;
    assert_eq!(summary.created, 1);
    assert_eq!(summary.last_master_id, Some(311));
    assert!(summary.is_success());
    Ok(())
}

#[tokio::test]
async fn test_alter_omits_unset_fields() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<LEDGER NAME=\"Cash\" ACTION=\"Alter\"><EMAIL>cash@acme.test</EMAIL></LEDGER>");
            then.status(200).body(CREATED_RESPONSE);
        })
        .await;

    let client = client_for(&server);
    let changes = LedgerChanges {
        email: Some("cash@acme.test".to_string()),
        ..Default::default()
    };
    client.alter_ledger("Cash", &changes, None).await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_guarded_mutations_never_reach_the_server() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200).body(CREATED_RESPONSE);
        })
        .await;

    let client = client_for(&server);

    let err = client
        .configure_company("Acme", &CompanyFlags::default())
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::CallerInput);

    let err = client
        .update_unit("Nos", &UnitChanges::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, TallyError::InvalidInput { .. }));

    let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
    let unbalanced = VoucherSpec::new("Payment", date)
        .entry(LedgerEntry::debit("Rent", 1000.0))
        .entry(LedgerEntry::credit("Bank", 999.0));
    assert!(client.create_voucher(&unbalanced, None).await.is_err());

    assert!(client.delete_ledger("   ", None).await.is_err());

    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_unit_lifecycle() -> Result<()> {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<UNIT NAME=\"Box\" ACTION=\"Create\">");
            then.status(200).body(CREATED_RESPONSE);
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<UNIT NAME=\"Box\" ACTION=\"Alter\"><DECIMALPLACES>3</DECIMALPLACES></UNIT>");
            then.status(200).body(CREATED_RESPONSE);
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<UNIT NAME=\"Box\" ACTION=\"Delete\"/>");
            then.status(200).body(CREATED_RESPONSE);
        })
        .await;

    let client = client_for(&server);
    let spec = UnitSpec {
        symbol: "Box".to_string(),
        formal_name: None,
        decimal_places: Some(0),
    };
    client.create_unit(&spec, None).await?;
    client
        .update_unit(
            "Box",
            &UnitChanges {
                formal_name: None,
                decimal_places: Some(3),
            },
            None,
        )
        .await?;
    client.delete_unit("Box", None).await?;

    create.assert_async().await;
    update.assert_async().await;
    delete.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_voucher_create_and_cancel() -> Result<()> {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("<REPORTNAME>Vouchers</REPORTNAME>")
                .body_contains("<SVCURRENTCOMPANY>Acme</SVCURRENTCOMPANY>")
                .body_contains("<VOUCHER VCHTYPE=\"Sales\" ACTION=\"Create\">")
                .body_contains("<NARRATION>Invoice &lt;42&gt;</NARRATION>");
            then.status(200).body(
                "<RESPONSE><CREATED>1</CREATED><LASTVCHID>87</LASTVCHID><ERRORS>0</ERRORS></RESPONSE>",
            );
        })
        .await;
    let cancel = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("TAGNAME=\"MASTERID\" TAGVALUE=\"87\" ACTION=\"Cancel\"");
            then.status(200)
                .body("<RESPONSE><CANCELLED>1</CANCELLED><ERRORS>0</ERRORS></RESPONSE>");
        })
        .await;

    let client = client_for(&server);
    let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
    let mut spec = VoucherSpec::new("Sales", date)
        .entry(LedgerEntry::debit("Acme Retail", 1180.0))
        .entry(LedgerEntry::credit("Sales", 1000.0))
        .entry(LedgerEntry::credit("Output GST", 180.0));
    spec.narration = Some("Invoice <42>".to_string());
    spec.party_ledger = Some("Acme Retail".to_string());

    let body = client.create_voucher(&spec, Some("Acme")).await?;
    let voucher_id = import_summary(&body)?
        .last_voucher_id
        .expect("voucher id in response");

    let body = client
        .cancel_voucher(&VoucherRef::MasterId(voucher_id), None, Some("Acme"))
        .await?;
    assert_eq!(import_summary(&body)?.cancelled, 1);

    create.assert_async().await;
    cancel.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_line_errors_surface_in_summary() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200).body(
                "<RESPONSE><CREATED>0</CREATED><ERRORS>1</ERRORS><LINEERROR>Group &apos;Nowhere&apos; does not exist!</LINEERROR></RESPONSE>",
            );
        })
        .await;

    let client = client_for(&server);
    let body = client
        .create_ledger(&LedgerSpec::new("Orphan", "Nowhere"), None)
        .await?;

    let summary = import_summary(&body)?;
    assert!(!summary.is_success());
    assert_eq!(summary.line_errors, vec!["Group 'Nowhere' does not exist!"]);

    let err = tally_connector::check_status(&body).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Application);
    Ok(())
}
