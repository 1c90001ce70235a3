//! XML node tree used to build Tally request envelopes.
//!
//! Requests are assembled as a tree of [`Node`]s and serialized by [`Node::to_xml`],
//! which escapes every text value and attribute value. Element and attribute names
//! are Tally's fixed vocabulary and are written verbatim.

use quick_xml::escape::escape;
use std::fmt::Write;

/// Tally wire vocabulary.
pub mod tags {
    pub const ENVELOPE: &str = "ENVELOPE";
    pub const HEADER: &str = "HEADER";
    pub const VERSION: &str = "VERSION";
    pub const TALLYREQUEST: &str = "TALLYREQUEST";
    pub const TYPE: &str = "TYPE";
    pub const ID: &str = "ID";
    pub const BODY: &str = "BODY";
    pub const DESC: &str = "DESC";
    pub const STATICVARIABLES: &str = "STATICVARIABLES";
    pub const TDL: &str = "TDL";
    pub const TDLMESSAGE: &str = "TDLMESSAGE";
    pub const IMPORTDATA: &str = "IMPORTDATA";
    pub const EXPORTDATA: &str = "EXPORTDATA";
    pub const REQUESTDESC: &str = "REQUESTDESC";
    pub const REQUESTDATA: &str = "REQUESTDATA";
    pub const REPORTNAME: &str = "REPORTNAME";
    pub const TALLYMESSAGE: &str = "TALLYMESSAGE";
    pub const PARAM: &str = "PARAM";

    pub const SVEXPORTFORMAT: &str = "SVEXPORTFORMAT";
    pub const SVCURRENTCOMPANY: &str = "SVCURRENTCOMPANY";
    pub const SVFROMDATE: &str = "SVFROMDATE";
    pub const SVTODATE: &str = "SVTODATE";
    pub const SVISSIMPLECOMPANY: &str = "SVIsSimpleCompany";

    pub const COLLECTION: &str = "COLLECTION";
    pub const REPORT: &str = "REPORT";
    pub const FORM: &str = "FORM";
    pub const PART: &str = "PART";
    pub const LINE: &str = "LINE";
    pub const FIELD: &str = "FIELD";
    pub const SYSTEM: &str = "SYSTEM";
    pub const NATIVEMETHOD: &str = "NATIVEMETHOD";
    pub const FETCH: &str = "FETCH";
    pub const FILTERS: &str = "FILTERS";

    pub const COMPANY: &str = "COMPANY";
    pub const NAME: &str = "NAME";
    pub const STATUS: &str = "STATUS";
    pub const LINEERROR: &str = "LINEERROR";
}

/// 一般 Export 使用的格式變數值
pub const SYSNAME_XML: &str = "$$SysName:XML";

/// TDL 定義 (REPORT/FORM/PART/...) 固定帶的旗標屬性
const TDL_DEFINITION_FLAGS: [&str; 5] = ["ISMODIFY", "ISFIXED", "ISINITIALIZE", "ISOPTION", "ISINTERNAL"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// TDL 內嵌定義節點，例如 `<COLLECTION NAME=".." ISMODIFY="No" ...>`
    pub fn tdl_definition(kind: &str, name: &str, initialize: bool) -> Self {
        let mut node = Node::new(kind).attr(tags::NAME, name);
        for flag in TDL_DEFINITION_FLAGS {
            let value = if flag == "ISINITIALIZE" && initialize { "Yes" } else { "No" };
            node = node.attr(flag, value);
        }
        node
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn text_child(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.child(Node::with_text(name, text))
    }

    /// 值為 None 時整個元素省略，不送空值
    pub fn opt_child<S: AsRef<str>>(self, name: &str, value: Option<S>) -> Self {
        match value {
            Some(v) => self.text_child(name, v.as_ref()),
            None => self,
        }
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 深度優先找第一個符合名稱的子孫節點（含自己）
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", key, escape(value.as_str()));
        }

        if self.text.is_none() && self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text.as_str()));
        }
        for child in &self.children {
            child.write_into(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}
