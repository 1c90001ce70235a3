use crate::utils::error::TallyError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 回應攤平成 欄位名 -> 文字
pub type FlatMap = HashMap<String, String>;

/// Tally 的日期格式 (YYYYMMDD)
pub fn tally_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// 金額固定兩位小數
pub fn tally_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// 金額換成分（兩位小數，四捨五入，遠離零）
pub fn minor_units(value: f64) -> i64 {
    let units = (value.abs() * 100.0).round() as i64;
    if value < 0.0 {
        -units
    } else {
        units
    }
}

/// 以分為單位的金額輸出成 Tally 格式
pub fn format_minor_units(units: i64) -> String {
    let sign = if units < 0 { "-" } else { "" };
    let abs = units.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// 起訖日期（含），只能經由 [`DateRange::new`] 建立
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = TallyError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.from, raw.to)
    }
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, TallyError> {
        if from > to {
            return Err(TallyError::invalid_input(format!(
                "date range starts after it ends ({} > {})",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xml,
    Pdf,
    Html,
    Excel,
    Ascii,
}

impl ExportFormat {
    pub fn sys_name(&self) -> &'static str {
        match self {
            ExportFormat::Xml => "$$SysName:XML",
            ExportFormat::Pdf => "$$SysName:PDF",
            ExportFormat::Html => "$$SysName:HTML",
            ExportFormat::Excel => "$$SysName:Excel",
            ExportFormat::Ascii => "$$SysName:ASCII",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Xml => "xml",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
            ExportFormat::Excel => "excel",
            ExportFormat::Ascii => "ascii",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(ExportFormat::Xml),
            "pdf" => Ok(ExportFormat::Pdf),
            "html" => Ok(ExportFormat::Html),
            "excel" | "xls" | "xlsx" => Ok(ExportFormat::Excel),
            "ascii" | "txt" => Ok(ExportFormat::Ascii),
            other => Err(TallyError::invalid_input(format!(
                "unsupported export format '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSpec {
    pub name: String,
    pub parent: String,
    pub opening_balance: Option<f64>,
    #[serde(default)]
    pub address: Vec<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub email: Option<String>,
    pub gstin: Option<String>,
    pub bill_wise: Option<bool>,
}

impl LedgerSpec {
    pub fn new(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerChanges {
    pub new_name: Option<String>,
    pub parent: Option<String>,
    pub opening_balance: Option<f64>,
    pub address: Option<Vec<String>>,
    pub email: Option<String>,
    pub gstin: Option<String>,
}

impl LedgerChanges {
    pub fn is_empty(&self) -> bool {
        self.new_name.is_none()
            && self.parent.is_none()
            && self.opening_balance.is_none()
            && self.address.is_none()
            && self.email.is_none()
            && self.gstin.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub parent: String,
    pub is_addable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupChanges {
    pub new_name: Option<String>,
    pub parent: Option<String>,
}

impl GroupChanges {
    pub fn is_empty(&self) -> bool {
        self.new_name.is_none() && self.parent.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockItemSpec {
    pub name: String,
    pub parent: Option<String>,
    pub base_units: String,
    pub opening_quantity: Option<f64>,
    pub opening_rate: Option<f64>,
    pub hsn_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemChanges {
    pub new_name: Option<String>,
    pub parent: Option<String>,
    pub base_units: Option<String>,
}

impl StockItemChanges {
    pub fn is_empty(&self) -> bool {
        self.new_name.is_none() && self.parent.is_none() && self.base_units.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub symbol: String,
    pub formal_name: Option<String>,
    pub decimal_places: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitChanges {
    pub formal_name: Option<String>,
    pub decimal_places: Option<u8>,
}

impl UnitChanges {
    pub fn is_empty(&self) -> bool {
        self.formal_name.is_none() && self.decimal_places.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySpec {
    pub name: String,
    pub mailing_name: Option<String>,
    #[serde(default)]
    pub address: Vec<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub email: Option<String>,
    pub financial_year_from: Option<NaiveDate>,
    pub books_from: Option<NaiveDate>,
}

/// 公司功能開關；未設定的欄位不會送出
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyFlags {
    pub maintain_inventory: Option<bool>,
    pub integrate_accounts: Option<bool>,
    pub bill_wise_details: Option<bool>,
    pub enable_gst: Option<bool>,
}

impl CompanyFlags {
    pub fn is_empty(&self) -> bool {
        self.maintain_inventory.is_none()
            && self.integrate_accounts.is_none()
            && self.bill_wise_details.is_none()
            && self.enable_gst.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntrySide {
    Debit,
    Credit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub ledger: String,
    pub amount: f64,
    pub side: EntrySide,
}

impl LedgerEntry {
    pub fn debit(ledger: impl Into<String>, amount: f64) -> Self {
        Self {
            ledger: ledger.into(),
            amount,
            side: EntrySide::Debit,
        }
    }

    pub fn credit(ledger: impl Into<String>, amount: f64) -> Self {
        Self {
            ledger: ledger.into(),
            amount,
            side: EntrySide::Credit,
        }
    }

    /// 送出的金額（分）；Tally 的借方是負數且 ISDEEMEDPOSITIVE=Yes
    pub fn signed_minor_units(&self) -> i64 {
        let units = minor_units(self.amount.abs());
        match self.side {
            EntrySide::Debit => -units,
            EntrySide::Credit => units,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherSpec {
    pub voucher_type: String,
    pub date: NaiveDate,
    pub number: Option<String>,
    pub reference: Option<String>,
    pub narration: Option<String>,
    pub party_ledger: Option<String>,
    pub entries: Vec<LedgerEntry>,
}

impl VoucherSpec {
    pub fn new(voucher_type: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            voucher_type: voucher_type.into(),
            date,
            number: None,
            reference: None,
            narration: None,
            party_ledger: None,
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, entry: LedgerEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

/// 以內部 MASTERID 或 日期+類型+號碼 指定憑證
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoucherRef {
    MasterId(u64),
    Number {
        date: NaiveDate,
        voucher_type: String,
        number: String,
    },
}

/// Import 回應的統計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub created: u32,
    pub altered: u32,
    pub deleted: u32,
    pub cancelled: u32,
    pub ignored: u32,
    pub errors: u32,
    pub last_voucher_id: Option<u64>,
    pub last_master_id: Option<u64>,
    pub line_errors: Vec<String>,
}

impl ImportSummary {
    pub fn is_success(&self) -> bool {
        self.errors == 0 && self.line_errors.is_empty()
    }
}
