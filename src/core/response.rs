//! Response parsing.
//!
//! Tally answers with loosely structured XML, so parsing here is shallow: a single
//! pass over the element tree that looks at each element's direct text.

use crate::core::envelope::tags;
use crate::domain::model::{FlatMap, ImportSummary};
use crate::utils::error::{Result, TallyError};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::{BTreeSet, HashMap};

/// Body Tally returns when a company switch succeeded.
pub const EMPTY_ENVELOPE: &str = "<ENVELOPE></ENVELOPE>";

struct OpenElement {
    text: String,
    seen_child: bool,
    order: usize,
}

/// Visit every element once it is closed.
///
/// The callback receives the element path (root first, the element itself last),
/// the element's direct text (text before its first child, untrimmed) and the
/// element's position in document order.
fn walk<F>(xml: &str, mut visit: F) -> Result<()>
where
    F: FnMut(&[String], &str, usize),
{
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut order = 0usize;
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            TallyError::malformed(format!(
                "XML parse error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) | Event::Empty(e) if stack.is_empty() && seen_root => {
                return Err(TallyError::malformed(format!(
                    "unexpected second root element <{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Event::Start(e) => {
                if let Some(parent) = stack.last_mut() {
                    parent.seen_child = true;
                }
                seen_root = true;
                path.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                stack.push(OpenElement {
                    text: String::new(),
                    seen_child: false,
                    order,
                });
                order += 1;
            }
            Event::Empty(e) => {
                if let Some(parent) = stack.last_mut() {
                    parent.seen_child = true;
                }
                seen_root = true;
                path.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                visit(&path, "", order);
                order += 1;
                path.pop();
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| TallyError::malformed(format!("invalid text content: {}", e)))?;
                match stack.last_mut() {
                    Some(open) if !open.seen_child => open.text.push_str(&text),
                    Some(_) => {}
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(TallyError::malformed("text outside of the root element"));
                    }
                }
            }
            Event::CData(c) => {
                if let Some(open) = stack.last_mut() {
                    if !open.seen_child {
                        open.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
            }
            Event::End(_) => {
                let open = stack
                    .pop()
                    .ok_or_else(|| TallyError::malformed("closing tag without an opening tag"))?;
                visit(&path, &open.text, open.order);
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(name) = path.last() {
        return Err(TallyError::malformed(format!("unclosed element <{}>", name)));
    }
    if !seen_root {
        return Err(TallyError::malformed("no element found"));
    }
    Ok(())
}

/// Flatten a document into `element name -> trimmed direct text`.
///
/// Elements with blank text are skipped. When a name repeats, the element that
/// comes last in document order wins.
pub fn flatten(xml: &str) -> Result<FlatMap> {
    let mut leaves: Vec<(usize, String, String)> = Vec::new();
    walk(xml, |path, text, order| {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if let Some(name) = path.last() {
            leaves.push((order, name.clone(), text.to_string()));
        }
    })?;

    leaves.sort_by_key(|(order, _, _)| *order);
    Ok(leaves
        .into_iter()
        .map(|(_, name, text)| (name, text))
        .collect())
}

/// Lenient [`flatten`]: malformed input becomes a single `error` entry.
pub fn parse(xml: &str) -> FlatMap {
    match flatten(xml) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!("⚠️ Could not parse Tally response: {}", e);
            HashMap::from([("error".to_string(), e.to_string())])
        }
    }
}

/// `ENVELOPE/HEADER/STATUS` 不是 1、或出現 LINEERROR，都視為 Tally 端失敗
pub fn check_status(xml: &str) -> Result<()> {
    let mut status: Option<String> = None;
    let mut line_errors = Vec::new();

    walk(xml, |path, text, _| {
        let text = text.trim();
        match path {
            [root, header, leaf]
                if root == tags::ENVELOPE && header == tags::HEADER && leaf == tags::STATUS =>
            {
                status = Some(text.to_string());
            }
            [.., leaf] if leaf == tags::LINEERROR && !text.is_empty() => {
                line_errors.push(text.to_string());
            }
            _ => {}
        }
    })?;

    if !line_errors.is_empty() {
        return Err(TallyError::application(line_errors.join("; ")));
    }
    match status {
        Some(status) if status != "1" => Err(TallyError::application(format!(
            "Tally returned status {}",
            status
        ))),
        _ => Ok(()),
    }
}

/// `COLLECTION/COMPANY/NAME` values, deduplicated and sorted.
pub fn company_names(xml: &str) -> Result<Vec<String>> {
    check_status(xml)?;

    let mut names = BTreeSet::new();
    walk(xml, |path, text, _| {
        let text = text.trim();
        if text.is_empty() || !path.iter().any(|p| p == tags::COLLECTION) {
            return;
        }
        let is_company_name = match path {
            [.., company, name] => company == tags::COMPANY && name == tags::NAME,
            _ => false,
        } || match path {
            [.., company, list, name] => {
                company == tags::COMPANY && list == "NAME.LIST" && name == tags::NAME
            }
            _ => false,
        };
        if is_company_name {
            names.insert(text.to_string());
        }
    })?;

    Ok(names.into_iter().collect())
}

/// Only an exactly empty envelope counts as success.
pub fn is_empty_envelope(body: &str) -> bool {
    body.trim() == EMPTY_ENVELOPE
}

fn count(field: &str, text: &str) -> Result<u32> {
    text.parse()
        .map_err(|_| TallyError::malformed(format!("{} is not a number: '{}'", field, text)))
}

fn id(field: &str, text: &str) -> Result<Option<u64>> {
    let value: u64 = text
        .parse()
        .map_err(|_| TallyError::malformed(format!("{} is not a number: '{}'", field, text)))?;
    Ok((value != 0).then_some(value))
}

/// Import acknowledgement counters and line errors.
pub fn import_summary(xml: &str) -> Result<ImportSummary> {
    let mut fields: Vec<(String, String)> = Vec::new();
    walk(xml, |path, text, _| {
        let text = text.trim();
        if let Some(name) = path.last() {
            if !text.is_empty() {
                fields.push((name.clone(), text.to_string()));
            }
        }
    })?;

    let mut summary = ImportSummary::default();
    for (name, text) in &fields {
        match name.as_str() {
            "CREATED" => summary.created = count(name, text)?,
            "ALTERED" => summary.altered = count(name, text)?,
            "DELETED" => summary.deleted = count(name, text)?,
            "CANCELLED" => summary.cancelled = count(name, text)?,
            "IGNORED" => summary.ignored = count(name, text)?,
            "ERRORS" => summary.errors = count(name, text)?,
            "LASTVCHID" => summary.last_voucher_id = id(name, text)?,
            "LASTMID" => summary.last_master_id = id(name, text)?,
            "LINEERROR" => summary.line_errors.push(text.clone()),
            _ => {}
        }
    }
    Ok(summary)
}
