//! Flat XML wire codec.
//!
//! Requests are a single `<xml>` root with one child per field, each value
//! wrapped in CDATA. Child order follows [`FieldSet`] iteration order and is
//! unspecified; the gateway matches fields by name only.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;

use crate::fields::FieldSet;
use crate::{Result, WxPayError};

/// Root element of every document.
pub const ROOT_ELEMENT: &str = "xml";

/// Encode a field set as a flat CDATA document.
pub fn encode_fields(fields: &FieldSet) -> String {
    let mut out = String::with_capacity(64 + fields.len() * 48);
    out.push('<');
    out.push_str(ROOT_ELEMENT);
    out.push('>');
    for (name, value) in fields.iter() {
        push_element(&mut out, name, value);
    }
    out.push_str("</");
    out.push_str(ROOT_ELEMENT);
    out.push('>');
    out
}

fn push_element(out: &mut String, name: &str, value: &str) {
    out.push('<');
    out.push_str(name);
    out.push_str("><![CDATA[");
    // A literal "]]>" would close the section early; split it across two.
    out.push_str(&value.replace("]]>", "]]]]><![CDATA[>"));
    out.push_str("]]></");
    out.push_str(name);
    out.push('>');
}

/// Decode a flat document into a field set.
///
/// Both CDATA and escaped text values are accepted. Nested elements and
/// non-whitespace text directly under the root are rejected.
pub fn decode_fields(body: &str) -> Result<FieldSet> {
    let mut reader = Reader::from_str(body);
    let mut fields = FieldSet::new();
    let mut depth = 0usize;
    let mut current: Option<(String, String)> = None;
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                depth += 1;
                match depth {
                    1 => seen_root = true,
                    2 => {
                        let name = String::from_utf8(start.name().as_ref().to_vec())
                            .map_err(|e| WxPayError::Decode(e.to_string()))?;
                        current = Some((name, String::new()));
                    }
                    _ => {
                        return Err(WxPayError::Decode(
                            "nested elements are not supported".to_string(),
                        ))
                    }
                }
            }
            Event::Empty(empty) => match depth {
                0 => seen_root = true,
                1 => {
                    let name = String::from_utf8(empty.name().as_ref().to_vec())
                        .map_err(|e| WxPayError::Decode(e.to_string()))?;
                    fields.insert(name, "");
                }
                _ => {
                    return Err(WxPayError::Decode(
                        "nested elements are not supported".to_string(),
                    ))
                }
            },
            Event::Text(text) => {
                let decoded = text.unescape()?;
                match current.as_mut() {
                    Some((_, value)) => value.push_str(&decoded),
                    None if depth == 1 && !decoded.trim().is_empty() => {
                        return Err(stray_text());
                    }
                    None => {}
                }
            }
            Event::CData(cdata) => {
                let raw =
                    std::str::from_utf8(&cdata).map_err(|e| WxPayError::Decode(e.to_string()))?;
                match current.as_mut() {
                    Some((_, value)) => value.push_str(raw),
                    None if depth == 1 => return Err(stray_text()),
                    None => {}
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some((name, value)) = current.take() {
                        fields.insert(name, value);
                    }
                }
                depth = depth.saturating_sub(1);
                if depth == 0 && seen_root {
                    break;
                }
            }
            Event::Eof => {
                if !seen_root {
                    return Err(WxPayError::Decode("missing root element".to_string()));
                }
                if depth > 0 {
                    return Err(WxPayError::Decode("unexpected end of document".to_string()));
                }
                break;
            }
            _ => {}
        }
    }

    Ok(fields)
}

fn stray_text() -> WxPayError {
    WxPayError::Decode("text outside a field element".to_string())
}

/// Decode a reply into a typed structure. Unknown elements are ignored.
pub fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    if body.trim().is_empty() {
        return Err(WxPayError::Decode("empty response body".to_string()));
    }
    Ok(quick_xml::de::from_str(body)?)
}

/// Acknowledgement body a callback handler answers the gateway with.
pub fn notification_ack(success: bool, message: &str) -> String {
    let mut out = String::from("<xml>");
    push_element(&mut out, "return_code", if success { "SUCCESS" } else { "FAIL" });
    push_element(&mut out, "return_msg", message);
    out.push_str("</xml>");
    out
}
