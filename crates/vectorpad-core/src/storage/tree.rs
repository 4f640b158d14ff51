//! Minimal element tree over quick-xml: enough structure to validate a
//! drawing file before trusting any of it.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

/// An element with its attributes and child elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    /// Non-whitespace text, CDATA or an entity reference appeared directly
    /// inside this element.
    pub has_text: bool,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl ToString) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse a document into its root element.
pub fn parse_document(text: &str) -> Result<XmlElement, String> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(ref e) => {
                let element = start_element(&reader, e)?;
                if root.is_some() && stack.is_empty() {
                    return Err(format!("second root element <{}>", element.name));
                }
                stack.push(element);
            }
            Event::Empty(ref e) => {
                let element = start_element(&reader, e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err(format!("second root element <{}>", element.name)),
                }
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err("unbalanced end tag".to_string());
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) => match stack.last_mut() {
                Some(current) => current.has_text = true,
                None => return Err("text outside the root element".to_string()),
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", open.name));
    }
    root.ok_or_else(|| "document has no root element".to_string())
}

fn start_element(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<XmlElement, String> {
    let name = e.name();
    let tag = reader
        .decoder()
        .decode(name.as_ref())
        .map_err(|err| err.to_string())?;
    let mut element = XmlElement::new(tag.as_ref());

    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_err(|err| err.to_string())?
            .into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| err.to_string())?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Serialize an element tree with an XML declaration and two-space indent.
pub fn write_document(root: &XmlElement) -> Result<String, String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(|e| e.to_string())?;
    write_element(&mut writer, root)?;
    String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), String> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| e.to_string());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| e.to_string())?;
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let doc = parse_document(
            r##"<?xml version="1.0"?>
            <File>
              <Shape Type="Rect"><Brush Color1="#FF000000"/><Points/></Shape>
            </File>"##,
        )
        .unwrap();
        assert_eq!(doc.name, "File");
        assert_eq!(doc.children.len(), 1);
        let shape = &doc.children[0];
        assert_eq!(shape.attr("Type"), Some("Rect"));
        assert_eq!(shape.children[0].attr("Color1"), Some("#FF000000"));
        assert!(!shape.has_text);
    }

    #[test]
    fn test_text_is_recorded() {
        let doc = parse_document("<File>hello</File>").unwrap();
        assert!(doc.has_text);
        let doc = parse_document("<File>\n   </File>").unwrap();
        assert!(!doc.has_text);
    }

    #[test]
    fn test_entity_reference_counts_as_text() {
        let doc = parse_document("<File>&amp;</File>").unwrap();
        assert!(doc.has_text);
        let doc = parse_document("<File><Shape>&#65;</Shape></File>").unwrap();
        assert!(!doc.has_text);
        assert!(doc.children[0].has_text);
    }

    #[test]
    fn test_malformed_documents() {
        assert!(parse_document("").is_err());
        assert!(parse_document("<File>").is_err());
        assert!(parse_document("<File></Other>").is_err());
        assert!(parse_document("<A/><B/>").is_err());
    }

    #[test]
    fn test_write_then_parse() {
        let root = XmlElement::new("File").with_child(
            XmlElement::new("Shape")
                .with_attr("Type", "Line")
                .with_attr("Note", "a<b & \"c\""),
        );
        let text = write_document(&root).unwrap();
        assert!(text.starts_with("<?xml"));
        assert_eq!(parse_document(&text).unwrap(), root);
    }
}
