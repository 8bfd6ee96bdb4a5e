//! Minimal XML element tree for reading SOAP responses.
//!
//! Responses are parsed into an owned tree of [`XmlElement`]s keyed by local
//! name, so `soapenv:Body` and `Body` address the same element. Lookups are
//! path-based (`root.path(&["Body", "deployResponse", "result"])`), which is
//! all the Metadata API needs.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::DecodeFailure;

/// An element with its local name, text content and child elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<XmlElement, DecodeFailure> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    stack.push(XmlElement::named(
                        String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                    ));
                }
                Ok(Event::Empty(e)) => {
                    let element = XmlElement::named(
                        String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                    );
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| DecodeFailure::Xml("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| DecodeFailure::Xml(e.to_string()))?;
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text);
                    }
                }
                Ok(Event::CData(c)) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(DecodeFailure::Xml(format!(
                        "at position {}: {}",
                        reader.error_position(),
                        e
                    )))
                }
            }
        }

        if !stack.is_empty() {
            return Err(DecodeFailure::Xml("unexpected end of document".to_string()));
        }
        root.ok_or(DecodeFailure::EmptyPayload)
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given local name, in document order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a path of child names from this element.
    pub fn path(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    /// Depth-first search for the first descendant with the given name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children
            .iter()
            .find_map(|c| if c.name == name { Some(c) } else { c.find(name) })
    }

    /// Text of a direct child, if the child exists.
    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Text of a direct child, empty when absent.
    pub fn string_of(&self, name: &str) -> String {
        self.text_of(name).unwrap_or_default().to_string()
    }

    /// Text of a direct child as an optional owned string; empty counts as absent.
    pub fn opt_string_of(&self, name: &str) -> Option<String> {
        self.text_of(name)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn bool_of(&self, name: &str) -> bool {
        self.text_of(name) == Some("true")
    }

    pub fn i64_of(&self, name: &str) -> i64 {
        self.text_of(name)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn f64_of(&self, name: &str) -> f64 {
        self.text_of(name)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), DecodeFailure> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(DecodeFailure::Xml("multiple root elements".to_string())),
    }
    Ok(())
}

/// Escape text for inclusion in an XML element or attribute.
pub fn escape(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}
