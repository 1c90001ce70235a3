use crate::config::{ClientConfig, MAX_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS};
use crate::core::envelope::Node;
use crate::core::requests;
use crate::core::response;
use crate::core::transport::HttpTransport;
use crate::domain::model::{
    CompanyFlags, CompanySpec, DateRange, ExportFormat, GroupChanges, GroupSpec, LedgerChanges,
    LedgerSpec, StockItemChanges, StockItemSpec, UnitChanges, UnitSpec, VoucherRef, VoucherSpec,
};
use crate::domain::ports::{ConfigProvider, TallyTransport, TransportResponse};
use crate::utils::error::{Result, TallyError};
use std::time::Duration;
use tracing::Instrument;

/// Client for Tally's XML-over-HTTP interface.
///
/// The endpoint is fixed at construction. Each operation is one POST; failures come
/// back as [`TallyError`] and never panic. The client holds no mutable state, so a
/// shared reference can be used from several tasks at once.
pub struct TallyClient<T: TallyTransport = HttpTransport> {
    endpoint: String,
    timeout: Duration,
    log_payloads: bool,
    default_company: Option<String>,
    transport: T,
    span: tracing::Span,
}

impl TallyClient<HttpTransport> {
    pub fn new(host: &str, port: u16) -> Self {
        Self::from_config(&ClientConfig::new(host, port))
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::with_transport(config, HttpTransport::new())
    }
}

impl Default for TallyClient<HttpTransport> {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl<T: TallyTransport> TallyClient<T> {
    /// 逾時會限制在 1..=600 秒之間
    pub fn with_transport<C: ConfigProvider>(config: &C, transport: T) -> Self {
        let requested = config.timeout();
        let timeout = requested.clamp(
            Duration::from_secs(MIN_TIMEOUT_SECONDS),
            Duration::from_secs(MAX_TIMEOUT_SECONDS),
        );
        if timeout != requested {
            tracing::warn!(
                "⚠️ Timeout {:?} is out of range, using {:?} instead",
                requested,
                timeout
            );
        }

        Self {
            endpoint: config.endpoint(),
            timeout,
            log_payloads: config.log_payloads(),
            default_company: config.default_company().map(str::to_string),
            transport,
            span: tracing::Span::none(),
        }
    }

    /// 由呼叫端提供的 span；所有請求的日誌都掛在它底下
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn company<'a>(&'a self, company: Option<&'a str>) -> Option<&'a str> {
        company.or(self.default_company.as_deref())
    }

    async fn round_trip(&self, body: String) -> Result<TransportResponse> {
        async move {
            tracing::debug!("📡 POST {} ({} bytes)", self.endpoint, body.len());
            if self.log_payloads {
                tracing::debug!("📤 Request body:\n{}", body);
            }

            let response = match self.transport.post(&self.endpoint, body, self.timeout).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!("❌ Request to {} failed: {}", self.endpoint, e);
                    return Err(e);
                }
            };

            tracing::debug!(
                "📥 HTTP {} ({} bytes)",
                response.status,
                response.body.len()
            );
            if !response.is_ok() {
                tracing::warn!("❌ Tally answered HTTP {}", response.status);
                return Err(TallyError::HttpStatus {
                    status: response.status,
                });
            }
            if self.log_payloads {
                tracing::debug!("📥 Response body:\n{}", response.text());
            }
            Ok(response)
        }
        .instrument(self.span.clone())
        .await
    }

    /// POST a serialized document and return the body unchanged.
    pub async fn send(&self, xml: String) -> Result<String> {
        Ok(self.round_trip(xml).await?.text())
    }

    /// Like [`send`](Self::send) but keeps the raw bytes (PDF and other exports).
    pub async fn send_bytes(&self, xml: String) -> Result<Vec<u8>> {
        Ok(self.round_trip(xml).await?.body)
    }

    pub async fn send_node(&self, node: &Node) -> Result<String> {
        self.send(node.to_xml()).await
    }

    /// 空 body 的 POST，只看是否回 200
    pub async fn test_connection(&self) -> bool {
        match self.round_trip(String::new()).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Connection test failed: {}", e);
                false
            }
        }
    }

    // -------------------- Collections --------------------

    pub async fn get_companies_list(&self, include_simple_companies: bool) -> Result<String> {
        self.send_node(&requests::companies_list(include_simple_companies))
            .await
    }

    /// Names of the companies Tally knows about, sorted and without duplicates.
    pub async fn list_companies(&self) -> Result<Vec<String>> {
        let body = self.get_companies_list(false).await?;
        let names = response::company_names(&body)?;
        tracing::info!("🏢 Found {} companies", names.len());
        Ok(names)
    }

    pub async fn get_ledgers_list(&self, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::ledgers_list(self.company(company)))
            .await
    }

    pub async fn get_groups_list(&self, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::groups_list(self.company(company)))
            .await
    }

    pub async fn get_stock_items_list(&self, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::stock_items_list(self.company(company)))
            .await
    }

    pub async fn get_units_list(&self, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::units_list(self.company(company)))
            .await
    }

    pub async fn get_voucher_types_list(&self, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::voucher_types_list(self.company(company)))
            .await
    }

    pub async fn get_ledger(&self, name: &str, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::ledger(name, self.company(company))?)
            .await
    }

    pub async fn get_vouchers(
        &self,
        company: Option<&str>,
        range: Option<DateRange>,
        voucher_type: Option<&str>,
    ) -> Result<String> {
        self.send_node(&requests::vouchers(
            self.company(company),
            range,
            voucher_type,
        )?)
        .await
    }

    pub async fn get_sales_report(
        &self,
        company: Option<&str>,
        range: Option<DateRange>,
    ) -> Result<String> {
        self.get_vouchers(company, range, Some("Sales")).await
    }

    // -------------------- Reports --------------------

    pub async fn get_current_company(&self) -> Result<String> {
        self.send_node(&requests::current_company()).await
    }

    pub async fn current_company_name(&self) -> Result<Option<String>> {
        let body = self.get_current_company().await?;
        response::check_status(&body)?;
        let mut fields = response::flatten(&body)?;
        Ok(fields.remove("NAME"))
    }

    pub async fn get_report(
        &self,
        report_name: &str,
        company: Option<&str>,
        range: Option<DateRange>,
    ) -> Result<String> {
        self.send_node(&requests::report(
            report_name,
            self.company(company),
            range,
        )?)
        .await
    }

    /// Make `name` the active company.
    ///
    /// Tally signals success with an exactly empty envelope; any other body,
    /// well-formed or not, is reported as `Ok(false)`.
    pub async fn select_company(&self, name: &str) -> Result<bool> {
        let body = self.send_node(&requests::select_company(name)?).await?;
        if response::is_empty_envelope(&body) {
            tracing::info!("✅ Selected company '{}'", name);
            Ok(true)
        } else {
            tracing::warn!("⚠️ Tally did not select company '{}'", name);
            Ok(false)
        }
    }

    pub async fn export_document(
        &self,
        report_name: &str,
        format: ExportFormat,
        company: Option<&str>,
        range: Option<DateRange>,
    ) -> Result<Vec<u8>> {
        let node = requests::export_document(report_name, format, self.company(company), range)?;
        let bytes = self.send_bytes(node.to_xml()).await?;
        tracing::info!(
            "📄 Exported '{}' as {} ({} bytes)",
            report_name,
            format,
            bytes.len()
        );
        Ok(bytes)
    }

    pub async fn execute_tdl_function(&self, function: &str, params: &[&str]) -> Result<String> {
        self.send_node(&requests::tdl_function(function, params)?)
            .await
    }

    // -------------------- Ledgers --------------------

    pub async fn create_ledger(&self, spec: &LedgerSpec, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::create_ledger(spec, self.company(company))?)
            .await
    }

    pub async fn alter_ledger(
        &self,
        name: &str,
        changes: &LedgerChanges,
        company: Option<&str>,
    ) -> Result<String> {
        self.send_node(&requests::alter_ledger(name, changes, self.company(company))?)
            .await
    }

    pub async fn delete_ledger(&self, name: &str, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::delete_ledger(name, self.company(company))?)
            .await
    }

    // -------------------- Groups --------------------

    pub async fn create_group(&self, spec: &GroupSpec, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::create_group(spec, self.company(company))?)
            .await
    }

    pub async fn alter_group(
        &self,
        name: &str,
        changes: &GroupChanges,
        company: Option<&str>,
    ) -> Result<String> {
        self.send_node(&requests::alter_group(name, changes, self.company(company))?)
            .await
    }

    pub async fn delete_group(&self, name: &str, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::delete_group(name, self.company(company))?)
            .await
    }

    // -------------------- Stock items --------------------

    pub async fn create_stock_item(
        &self,
        spec: &StockItemSpec,
        company: Option<&str>,
    ) -> Result<String> {
        self.send_node(&requests::create_stock_item(spec, self.company(company))?)
            .await
    }

    pub async fn alter_stock_item(
        &self,
        name: &str,
        changes: &StockItemChanges,
        company: Option<&str>,
    ) -> Result<String> {
        self.send_node(&requests::alter_stock_item(
            name,
            changes,
            self.company(company),
        )?)
        .await
    }

    pub async fn delete_stock_item(&self, name: &str, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::delete_stock_item(name, self.company(company))?)
            .await
    }

    // -------------------- Units --------------------

    pub async fn create_unit(&self, spec: &UnitSpec, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::create_unit(spec, self.company(company))?)
            .await
    }

    pub async fn update_unit(
        &self,
        name: &str,
        changes: &UnitChanges,
        company: Option<&str>,
    ) -> Result<String> {
        self.send_node(&requests::update_unit(name, changes, self.company(company))?)
            .await
    }

    pub async fn delete_unit(&self, name: &str, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::delete_unit(name, self.company(company))?)
            .await
    }

    // -------------------- Companies --------------------

    pub async fn create_company(&self, spec: &CompanySpec) -> Result<String> {
        self.send_node(&requests::create_company(spec)?).await
    }

    pub async fn configure_company(&self, name: &str, flags: &CompanyFlags) -> Result<String> {
        self.send_node(&requests::configure_company(name, flags)?)
            .await
    }

    pub async fn delete_company(&self, name: &str) -> Result<String> {
        self.send_node(&requests::delete_company(name)?).await
    }

    // -------------------- Vouchers --------------------

    pub async fn create_voucher(&self, spec: &VoucherSpec, company: Option<&str>) -> Result<String> {
        self.send_node(&requests::create_voucher(spec, self.company(company))?)
            .await
    }

    pub async fn alter_voucher_narration(
        &self,
        reference: &VoucherRef,
        narration: &str,
        company: Option<&str>,
    ) -> Result<String> {
        self.send_node(&requests::alter_voucher_narration(
            reference,
            narration,
            self.company(company),
        )?)
        .await
    }

    pub async fn delete_voucher(
        &self,
        reference: &VoucherRef,
        company: Option<&str>,
    ) -> Result<String> {
        self.send_node(&requests::delete_voucher(reference, self.company(company))?)
            .await
    }

    pub async fn cancel_voucher(
        &self,
        reference: &VoucherRef,
        narration: Option<&str>,
        company: Option<&str>,
    ) -> Result<String> {
        self.send_node(&requests::cancel_voucher(
            reference,
            narration,
            self.company(company),
        )?)
        .await
    }
}
