//! Request builders, one per operation.
//!
//! Every builder is a pure function from typed parameters to a [`Node`] tree. Four
//! envelope shapes are used:
//!
//! - `Export` / `Collection`: a named collection, optionally defined inline in `TDL`
//! - `Export` / `Data`: a predefined or inline report
//! - `Export Data`: a report rendered to a target format (`EXPORTDATA/REQUESTDESC`)
//! - `Import Data`: master and voucher mutations (`IMPORTDATA/REQUESTDATA/TALLYMESSAGE`)
//!
//! Optional fields that the caller left unset are omitted from the document.

use crate::core::envelope::{tags, Node, SYSNAME_XML};
use crate::domain::model::{
    format_minor_units, tally_amount, tally_date, yes_no, CompanyFlags, CompanySpec, DateRange, ExportFormat,
    GroupChanges, GroupSpec, LedgerChanges, LedgerSpec, StockItemChanges, StockItemSpec,
    UnitChanges, UnitSpec, VoucherRef, VoucherSpec,
};
use crate::utils::error::{Result, TallyError};
use crate::utils::validation::require_name;

pub const REPORT_ALL_MASTERS: &str = "All Masters";
pub const REPORT_VOUCHERS: &str = "Vouchers";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Alter,
    Delete,
    Cancel,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "Create",
            Action::Alter => "Alter",
            Action::Delete => "Delete",
            Action::Cancel => "Cancel",
        }
    }
}

/// Session variables injected under `STATICVARIABLES`.
#[derive(Debug, Clone, Default)]
pub struct StaticVariables<'a> {
    pub export_format: Option<&'a str>,
    pub range: Option<DateRange>,
    pub company: Option<&'a str>,
}

impl<'a> StaticVariables<'a> {
    pub fn xml() -> Self {
        Self {
            export_format: Some(SYSNAME_XML),
            ..Default::default()
        }
    }

    pub fn company(mut self, company: Option<&'a str>) -> Self {
        self.company = company;
        self
    }

    pub fn range(mut self, range: Option<DateRange>) -> Self {
        self.range = range;
        self
    }

    pub fn to_node(&self) -> Node {
        let mut node = Node::new(tags::STATICVARIABLES)
            .opt_child(tags::SVEXPORTFORMAT, self.export_format);
        if let Some(range) = self.range {
            node = node
                .text_child(tags::SVFROMDATE, tally_date(range.from_date()))
                .text_child(tags::SVTODATE, tally_date(range.to_date()));
        }
        node.opt_child(tags::SVCURRENTCOMPANY, self.company)
    }
}

fn versioned_header(request: &str, kind: &str, id: &str) -> Node {
    Node::new(tags::HEADER)
        .text_child(tags::VERSION, "1")
        .text_child(tags::TALLYREQUEST, request)
        .text_child(tags::TYPE, kind)
        .text_child(tags::ID, id)
}

fn legacy_header(request: &str) -> Node {
    Node::new(tags::HEADER).text_child(tags::TALLYREQUEST, request)
}

fn desc(statics: Node, definitions: Vec<Node>) -> Node {
    let mut desc = Node::new(tags::DESC).child(statics);
    if !definitions.is_empty() {
        desc.push(Node::new(tags::TDL).child(Node::new(tags::TDLMESSAGE).children(definitions)));
    }
    desc
}

/// `Export` / `Collection` envelope.
pub fn collection_request(id: &str, statics: Node, definitions: Vec<Node>) -> Node {
    Node::new(tags::ENVELOPE)
        .child(versioned_header("Export", "Collection", id))
        .child(Node::new(tags::BODY).child(desc(statics, definitions)))
}

/// `Export` / `Data` envelope.
pub fn report_request(id: &str, statics: Node, definitions: Vec<Node>) -> Node {
    Node::new(tags::ENVELOPE)
        .child(versioned_header("Export", "Data", id))
        .child(Node::new(tags::BODY).child(desc(statics, definitions)))
}

/// `Import Data` envelope; each message goes into its own `TALLYMESSAGE`.
pub fn import_request(report_name: &str, company: Option<&str>, messages: Vec<Node>) -> Node {
    let statics = StaticVariables::default().company(company).to_node();
    let request_data = Node::new(tags::REQUESTDATA).children(messages.into_iter().map(|m| {
        Node::new(tags::TALLYMESSAGE)
            .attr("xmlns:UDF", "TallyUDF")
            .child(m)
    }));

    Node::new(tags::ENVELOPE)
        .child(legacy_header("Import Data"))
        .child(
            Node::new(tags::BODY).child(
                Node::new(tags::IMPORTDATA)
                    .child(
                        Node::new(tags::REQUESTDESC)
                            .text_child(tags::REPORTNAME, report_name)
                            .child(statics),
                    )
                    .child(request_data),
            ),
        )
}

fn collection_definition(name: &str, entity_type: &str, methods: &[&str], initialize: bool) -> Node {
    Node::tdl_definition(tags::COLLECTION, name, initialize)
        .text_child(tags::TYPE, entity_type)
        .children(
            methods
                .iter()
                .map(|m| Node::with_text(tags::NATIVEMETHOD, *m)),
        )
}

fn formula(name: &str, expression: String) -> Node {
    Node::with_text(tags::SYSTEM, expression)
        .attr("TYPE", "Formulae")
        .attr(tags::NAME, name)
}

/// TDL 字串常值不能含雙引號
fn formula_literal(kind: &str, value: &str) -> Result<String> {
    require_name(kind, value)?;
    if value.contains('"') {
        return Err(TallyError::invalid_input(format!(
            "{} name cannot contain a double quote when used in a filter",
            kind
        )));
    }
    Ok(format!("\"{}\"", value))
}

// -------------------- Collections --------------------

pub fn companies_list(include_simple_companies: bool) -> Node {
    let statics = Node::new(tags::STATICVARIABLES)
        .text_child(tags::SVISSIMPLECOMPANY, yes_no(include_simple_companies));
    collection_request(
        "List of Companies",
        statics,
        vec![collection_definition("List of Companies", "Company", &["Name"], true)],
    )
}

pub fn ledgers_list(company: Option<&str>) -> Node {
    collection_request(
        "Ledgers",
        StaticVariables::xml().company(company).to_node(),
        vec![collection_definition(
            "Ledgers",
            "Ledger",
            &["Address", "Masterid", "*"],
            false,
        )],
    )
}

pub fn groups_list(company: Option<&str>) -> Node {
    collection_request(
        "Groups",
        StaticVariables::xml().company(company).to_node(),
        vec![collection_definition(
            "Groups",
            "Group",
            &["Name", "Parent", "Masterid"],
            false,
        )],
    )
}

pub fn stock_items_list(company: Option<&str>) -> Node {
    collection_request(
        "Custom List of StockItems",
        StaticVariables::default().company(company).to_node(),
        vec![collection_definition(
            "Custom List of StockItems",
            "StockItem",
            &["MasterID", "GUID"],
            true,
        )],
    )
}

pub fn units_list(company: Option<&str>) -> Node {
    collection_request(
        "Units",
        StaticVariables::xml().company(company).to_node(),
        vec![collection_definition(
            "Units",
            "Unit",
            &["Name", "OriginalName", "DecimalPlaces"],
            false,
        )],
    )
}

pub fn voucher_types_list(company: Option<&str>) -> Node {
    collection_request(
        "Voucher Types",
        StaticVariables::xml().company(company).to_node(),
        vec![collection_definition(
            "Voucher Types",
            "VoucherType",
            &["Name", "Parent"],
            false,
        )],
    )
}

/// 單一科目明細，用內嵌 formula 過濾名稱
pub fn ledger(name: &str, company: Option<&str>) -> Result<Node> {
    let literal = formula_literal("Ledger", name)?;
    let collection = collection_definition("Ledger Details", "Ledger", &["*"], false)
        .text_child(tags::FILTERS, "LedgerNameFilter");
    Ok(collection_request(
        "Ledger Details",
        StaticVariables::xml().company(company).to_node(),
        vec![
            collection,
            formula("LedgerNameFilter", format!("$Name = {}", literal)),
        ],
    ))
}

pub fn vouchers(
    company: Option<&str>,
    range: Option<DateRange>,
    voucher_type: Option<&str>,
) -> Result<Node> {
    let mut collection = Node::tdl_definition(tags::COLLECTION, "Filtered Vouchers", false)
        .text_child(tags::TYPE, "Voucher")
        .text_child(
            tags::FETCH,
            "Date, VoucherNumber, VoucherTypeName, PartyLedgerName, Amount, Narration, MasterID",
        );
    let mut definitions = Vec::new();

    if let Some(voucher_type) = voucher_type {
        let literal = formula_literal("Voucher type", voucher_type)?;
        collection = collection.text_child(tags::FILTERS, "VoucherTypeFilter");
        definitions.push(formula(
            "VoucherTypeFilter",
            format!("$VoucherTypeName = {}", literal),
        ));
    }
    definitions.insert(0, collection);

    Ok(collection_request(
        "Filtered Vouchers",
        StaticVariables::xml().company(company).range(range).to_node(),
        definitions,
    ))
}

// -------------------- Reports --------------------

/// 透過內嵌 report → form → part → line → field 取目前公司名稱
pub fn current_company() -> Node {
    let definitions = vec![
        Node::tdl_definition(tags::REPORT, "GetCurrentCompanyNameReport", false)
            .text_child("FORMS", "CompanyNameForm"),
        Node::tdl_definition(tags::FORM, "CompanyNameForm", false)
            .text_child("TOPPARTS", "CompanyNamePart")
            .text_child("XMLTAG", tags::COMPANY),
        Node::tdl_definition(tags::PART, "CompanyNamePart", false)
            .text_child("TOPLINES", "CompanyNameLine")
            .text_child("SCROLLED", "Vertical"),
        Node::tdl_definition(tags::LINE, "CompanyNameLine", false)
            .text_child("LEFTFIELDS", "CompanyNameField"),
        Node::tdl_definition(tags::FIELD, "CompanyNameField", false)
            .text_child("SET", "##SVCURRENTCOMPANY")
            .text_child("XMLTAG", tags::NAME),
    ];
    report_request(
        "GetCurrentCompanyNameReport",
        StaticVariables::xml().to_node(),
        definitions,
    )
}

/// Predefined report (Day Book, Trial Balance, ...) exported as XML.
pub fn report(name: &str, company: Option<&str>, range: Option<DateRange>) -> Result<Node> {
    require_name("Report", name)?;
    Ok(report_request(
        name,
        StaticVariables::xml().company(company).range(range).to_node(),
        Vec::new(),
    ))
}

/// 空白 form 的 report；Tally 切換公司成功時回傳空的 ENVELOPE
pub fn select_company(name: &str) -> Result<Node> {
    require_name("Company", name)?;
    let definitions = vec![
        Node::tdl_definition(tags::REPORT, "SelectCompanyReport", false)
            .text_child("FORMS", "SelectCompanyForm"),
        Node::tdl_definition(tags::FORM, "SelectCompanyForm", false),
    ];
    Ok(report_request(
        "SelectCompanyReport",
        StaticVariables::xml().company(Some(name)).to_node(),
        definitions,
    ))
}

/// `Export Data`: a report rendered to `format`.
pub fn export_document(
    report_name: &str,
    format: ExportFormat,
    company: Option<&str>,
    range: Option<DateRange>,
) -> Result<Node> {
    require_name("Report", report_name)?;
    let statics = StaticVariables {
        export_format: Some(format.sys_name()),
        range,
        company,
    }
    .to_node();

    Ok(Node::new(tags::ENVELOPE)
        .child(legacy_header("Export Data"))
        .child(
            Node::new(tags::BODY).child(
                Node::new(tags::EXPORTDATA).child(
                    Node::new(tags::REQUESTDESC)
                        .text_child(tags::REPORTNAME, report_name)
                        .child(statics),
                ),
            ),
        ))
}

pub fn tdl_function(function: &str, params: &[&str]) -> Result<Node> {
    require_name("TDL function", function)?;
    Ok(Node::new(tags::ENVELOPE)
        .child(versioned_header("Execute", "TDLFunction", function))
        .child(
            Node::new(tags::BODY).child(
                Node::new(tags::DESC)
                    .children(params.iter().map(|p| Node::with_text(tags::PARAM, *p))),
            ),
        ))
}

// -------------------- Masters --------------------

fn master(kind: &str, name: &str, action: Action) -> Node {
    Node::new(kind).attr(tags::NAME, name).attr("ACTION", action.as_str())
}

fn name_list(name: &str) -> Node {
    Node::new("NAME.LIST").text_child(tags::NAME, name)
}

fn address_list(lines: &[String]) -> Node {
    Node::new("ADDRESS.LIST")
        .attr("TYPE", "String")
        .children(lines.iter().map(|l| Node::with_text("ADDRESS", l.as_str())))
}

fn nothing_to_change(kind: &str, name: &str) -> TallyError {
    TallyError::invalid_input(format!(
        "no fields supplied to change for {} '{}'",
        kind, name
    ))
}

pub fn create_ledger(spec: &LedgerSpec, company: Option<&str>) -> Result<Node> {
    require_name("Ledger", &spec.name)?;
    require_name("Parent group", &spec.parent)?;

    let mut ledger = master("LEDGER", &spec.name, Action::Create)
        .child(name_list(&spec.name))
        .text_child("PARENT", spec.parent.as_str())
        .opt_child("OPENINGBALANCE", spec.opening_balance.map(tally_amount));
    if !spec.address.is_empty() {
        ledger.push(address_list(&spec.address));
    }
    let ledger = ledger
        .opt_child("LEDSTATENAME", spec.state.as_deref())
        .opt_child("COUNTRYNAME", spec.country.as_deref())
        .opt_child("PINCODE", spec.pincode.as_deref())
        .opt_child("EMAIL", spec.email.as_deref())
        .opt_child("PARTYGSTIN", spec.gstin.as_deref())
        .opt_child("ISBILLWISEON", spec.bill_wise.map(yes_no));

    Ok(import_request(REPORT_ALL_MASTERS, company, vec![ledger]))
}

pub fn alter_ledger(name: &str, changes: &LedgerChanges, company: Option<&str>) -> Result<Node> {
    require_name("Ledger", name)?;
    if changes.is_empty() {
        return Err(nothing_to_change("ledger", name));
    }

    let mut ledger = master("LEDGER", name, Action::Alter);
    if let Some(new_name) = &changes.new_name {
        require_name("Ledger", new_name)?;
        ledger.push(name_list(new_name));
    }
    let mut ledger = ledger
        .opt_child("PARENT", changes.parent.as_deref())
        .opt_child("OPENINGBALANCE", changes.opening_balance.map(tally_amount));
    if let Some(address) = &changes.address {
        ledger.push(address_list(address));
    }
    let ledger = ledger
        .opt_child("EMAIL", changes.email.as_deref())
        .opt_child("PARTYGSTIN", changes.gstin.as_deref());

    Ok(import_request(REPORT_ALL_MASTERS, company, vec![ledger]))
}

pub fn delete_ledger(name: &str, company: Option<&str>) -> Result<Node> {
    require_name("Ledger", name)?;
    Ok(import_request(
        REPORT_ALL_MASTERS,
        company,
        vec![master("LEDGER", name, Action::Delete)],
    ))
}

pub fn create_group(spec: &GroupSpec, company: Option<&str>) -> Result<Node> {
    require_name("Group", &spec.name)?;
    require_name("Parent group", &spec.parent)?;

    let group = master("GROUP", &spec.name, Action::Create)
        .child(name_list(&spec.name))
        .text_child("PARENT", spec.parent.as_str())
        .opt_child("ISADDABLE", spec.is_addable.map(yes_no));
    Ok(import_request(REPORT_ALL_MASTERS, company, vec![group]))
}

pub fn alter_group(name: &str, changes: &GroupChanges, company: Option<&str>) -> Result<Node> {
    require_name("Group", name)?;
    if changes.is_empty() {
        return Err(nothing_to_change("group", name));
    }

    let mut group = master("GROUP", name, Action::Alter);
    if let Some(new_name) = &changes.new_name {
        require_name("Group", new_name)?;
        group.push(name_list(new_name));
    }
    let group = group.opt_child("PARENT", changes.parent.as_deref());
    Ok(import_request(REPORT_ALL_MASTERS, company, vec![group]))
}

pub fn delete_group(name: &str, company: Option<&str>) -> Result<Node> {
    require_name("Group", name)?;
    Ok(import_request(
        REPORT_ALL_MASTERS,
        company,
        vec![master("GROUP", name, Action::Delete)],
    ))
}

pub fn create_stock_item(spec: &StockItemSpec, company: Option<&str>) -> Result<Node> {
    require_name("Stock item", &spec.name)?;
    require_name("Base unit", &spec.base_units)?;

    let units = spec.base_units.as_str();
    // 期初數量帶單位，期初金額為負數（借方）
    let opening_value = match (spec.opening_quantity, spec.opening_rate) {
        (Some(qty), Some(rate)) => Some(tally_amount(-(qty * rate))),
        _ => None,
    };

    let item = master("STOCKITEM", &spec.name, Action::Create)
        .child(name_list(&spec.name))
        .opt_child("PARENT", spec.parent.as_deref())
        .text_child("BASEUNITS", units)
        .opt_child(
            "OPENINGBALANCE",
            spec.opening_quantity.map(|q| format!("{} {}", q, units)),
        )
        .opt_child(
            "OPENINGRATE",
            spec.opening_rate
                .map(|r| format!("{}/{}", tally_amount(r), units)),
        )
        .opt_child("OPENINGVALUE", opening_value)
        .opt_child("HSNCODE", spec.hsn_code.as_deref());

    Ok(import_request(REPORT_ALL_MASTERS, company, vec![item]))
}

pub fn alter_stock_item(
    name: &str,
    changes: &StockItemChanges,
    company: Option<&str>,
) -> Result<Node> {
    require_name("Stock item", name)?;
    if changes.is_empty() {
        return Err(nothing_to_change("stock item", name));
    }

    let mut item = master("STOCKITEM", name, Action::Alter);
    if let Some(new_name) = &changes.new_name {
        require_name("Stock item", new_name)?;
        item.push(name_list(new_name));
    }
    let item = item
        .opt_child("PARENT", changes.parent.as_deref())
        .opt_child("BASEUNITS", changes.base_units.as_deref());
    Ok(import_request(REPORT_ALL_MASTERS, company, vec![item]))
}

pub fn delete_stock_item(name: &str, company: Option<&str>) -> Result<Node> {
    require_name("Stock item", name)?;
    Ok(import_request(
        REPORT_ALL_MASTERS,
        company,
        vec![master("STOCKITEM", name, Action::Delete)],
    ))
}

pub fn create_unit(spec: &UnitSpec, company: Option<&str>) -> Result<Node> {
    require_name("Unit", &spec.symbol)?;
    let unit = master("UNIT", &spec.symbol, Action::Create)
        .text_child(tags::NAME, spec.symbol.as_str())
        .opt_child("ORIGINALNAME", spec.formal_name.as_deref())
        .opt_child("DECIMALPLACES", spec.decimal_places.map(|d| d.to_string()))
        .text_child("ISSIMPLEUNIT", "Yes");
    Ok(import_request(REPORT_ALL_MASTERS, company, vec![unit]))
}

pub fn update_unit(name: &str, changes: &UnitChanges, company: Option<&str>) -> Result<Node> {
    require_name("Unit", name)?;
    if changes.is_empty() {
        return Err(nothing_to_change("unit", name));
    }
    let unit = master("UNIT", name, Action::Alter)
        .opt_child("ORIGINALNAME", changes.formal_name.as_deref())
        .opt_child("DECIMALPLACES", changes.decimal_places.map(|d| d.to_string()));
    Ok(import_request(REPORT_ALL_MASTERS, company, vec![unit]))
}

pub fn delete_unit(name: &str, company: Option<&str>) -> Result<Node> {
    require_name("Unit", name)?;
    Ok(import_request(
        REPORT_ALL_MASTERS,
        company,
        vec![master("UNIT", name, Action::Delete)],
    ))
}

pub fn create_company(spec: &CompanySpec) -> Result<Node> {
    require_name("Company", &spec.name)?;
    let mut company = master(tags::COMPANY, &spec.name, Action::Create)
        .text_child(tags::NAME, spec.name.as_str())
        .opt_child("BASICCOMPANYFORMALNAME", spec.mailing_name.as_deref());
    if !spec.address.is_empty() {
        company.push(address_list(&spec.address));
    }
    let company = company
        .opt_child("STATENAME", spec.state.as_deref())
        .opt_child("COUNTRYNAME", spec.country.as_deref())
        .opt_child("PINCODE", spec.pincode.as_deref())
        .opt_child("EMAIL", spec.email.as_deref())
        .opt_child("STARTINGFROM", spec.financial_year_from.map(tally_date))
        .opt_child("BOOKSFROM", spec.books_from.map(tally_date));
    Ok(import_request(REPORT_ALL_MASTERS, None, vec![company]))
}

pub fn configure_company(name: &str, flags: &CompanyFlags) -> Result<Node> {
    require_name("Company", name)?;
    if flags.is_empty() {
        return Err(TallyError::invalid_input(format!(
            "no configuration flags supplied for company '{}'",
            name
        )));
    }
    let company = master(tags::COMPANY, name, Action::Alter)
        .opt_child("ISINVENTORYON", flags.maintain_inventory.map(yes_no))
        .opt_child("ISINTEGRATED", flags.integrate_accounts.map(yes_no))
        .opt_child("ISBILLWISEON", flags.bill_wise_details.map(yes_no))
        .opt_child("ISGSTON", flags.enable_gst.map(yes_no));
    Ok(import_request(REPORT_ALL_MASTERS, Some(name), vec![company]))
}

pub fn delete_company(name: &str) -> Result<Node> {
    require_name("Company", name)?;
    Ok(import_request(
        REPORT_ALL_MASTERS,
        None,
        vec![master(tags::COMPANY, name, Action::Delete)],
    ))
}

// -------------------- Vouchers --------------------

fn voucher_ref(reference: &VoucherRef, action: Action) -> Result<Node> {
    let node = match reference {
        VoucherRef::MasterId(id) => Node::new("VOUCHER")
            .attr("TAGNAME", "MASTERID")
            .attr("TAGVALUE", id.to_string()),
        VoucherRef::Number {
            date,
            voucher_type,
            number,
        } => {
            require_name("Voucher type", voucher_type)?;
            require_name("Voucher number", number)?;
            Node::new("VOUCHER")
                .attr("DATE", tally_date(*date))
                .attr("TAGNAME", "Voucher Number")
                .attr("TAGVALUE", number.as_str())
                .attr("VCHTYPE", voucher_type.as_str())
        }
    };
    Ok(node.attr("ACTION", action.as_str()))
}

pub fn create_voucher(spec: &VoucherSpec, company: Option<&str>) -> Result<Node> {
    require_name("Voucher type", &spec.voucher_type)?;
    if spec.entries.is_empty() {
        return Err(TallyError::invalid_input("voucher has no ledger entries"));
    }
    // 借貸平衡以實際送出的金額（分）計算
    let mut amounts = Vec::with_capacity(spec.entries.len());
    for entry in &spec.entries {
        require_name("Ledger", &entry.ledger)?;
        let units = if entry.amount.is_finite() {
            entry.signed_minor_units()
        } else {
            0
        };
        if units == 0 {
            return Err(TallyError::invalid_input(format!(
                "entry for ledger '{}' has no amount",
                entry.ledger
            )));
        }
        amounts.push(units);
    }
    let balance: i64 = amounts.iter().sum();
    if balance != 0 {
        return Err(TallyError::invalid_input(format!(
            "voucher debits and credits differ by {}",
            format_minor_units(balance.abs())
        )));
    }

    let entries = spec.entries.iter().zip(amounts).map(|(entry, units)| {
        Node::new("ALLLEDGERENTRIES.LIST")
            .text_child("LEDGERNAME", entry.ledger.as_str())
            .text_child("ISDEEMEDPOSITIVE", yes_no(units < 0))
            .text_child("AMOUNT", format_minor_units(units))
    });

    let voucher = Node::new("VOUCHER")
        .attr("VCHTYPE", spec.voucher_type.as_str())
        .attr("ACTION", Action::Create.as_str())
        .text_child("DATE", tally_date(spec.date))
        .text_child("VOUCHERTYPENAME", spec.voucher_type.as_str())
        .opt_child("VOUCHERNUMBER", spec.number.as_deref())
        .opt_child("REFERENCE", spec.reference.as_deref())
        .opt_child("NARRATION", spec.narration.as_deref())
        .opt_child("PARTYLEDGERNAME", spec.party_ledger.as_deref())
        .children(entries);

    Ok(import_request(REPORT_VOUCHERS, company, vec![voucher]))
}

pub fn alter_voucher_narration(
    reference: &VoucherRef,
    narration: &str,
    company: Option<&str>,
) -> Result<Node> {
    let voucher = voucher_ref(reference, Action::Alter)?.text_child("NARRATION", narration);
    Ok(import_request(REPORT_VOUCHERS, company, vec![voucher]))
}

pub fn delete_voucher(reference: &VoucherRef, company: Option<&str>) -> Result<Node> {
    let voucher = voucher_ref(reference, Action::Delete)?;
    Ok(import_request(REPORT_VOUCHERS, company, vec![voucher]))
}

pub fn cancel_voucher(
    reference: &VoucherRef,
    narration: Option<&str>,
    company: Option<&str>,
) -> Result<Node> {
    let voucher = voucher_ref(reference, Action::Cancel)?.opt_child("NARRATION", narration);
    Ok(import_request(REPORT_VOUCHERS, company, vec![voucher]))
}
