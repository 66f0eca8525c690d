//! Pretty-printed XML rendering of a [`Document`].
//!
//! Output layout:
//!
//! ```text
//! <?xml version="1.0" ?>
//! <contacts>
//!   <contact id="0">
//!     <GivenName>Aaron</GivenName>
//!   </contact>
//!   <contact id="1"/>
//! </contacts>
//! ```
//!
//! Elements without text or children are written self-closing. Every
//! character is checked against the target [`Encoding`] and against the XML
//! 1.0 character range; what fails either check is handled according to the
//! [`EncodingPolicy`].

use tracing::debug;

use crate::error::{ExportError, Result};
use crate::profile::{Encoding, EncodingPolicy};
use crate::tree::{Document, Element};

const DECLARATION: &str = "<?xml version=\"1.0\" ?>";
const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Serializer {
    pub encoding: Encoding,
    pub policy: EncodingPolicy,
    pub trim: bool,
}

impl Serializer {
    pub fn new(encoding: Encoding, policy: EncodingPolicy) -> Self {
        Self {
            encoding,
            policy,
            trim: false,
        }
    }

    pub fn trimmed(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Render the whole document to bytes in the target encoding.
    pub fn serialize(&self, doc: &Document) -> Result<Vec<u8>> {
        let mut out = String::new();
        out.push_str(DECLARATION);
        out.push('\n');
        self.write_element(&mut out, &doc.root, 0)?;
        let text = if self.trim { out.trim() } else { out.as_str() };
        debug!(encoding = %self.encoding, len = text.len(), "serialized document");
        Ok(text.as_bytes().to_vec())
    }

    fn write_element(&self, out: &mut String, element: &Element, depth: usize) -> Result<()> {
        self.check_name(&element.tag)?;
        let indent = INDENT.repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&element.tag);
        for (name, value) in &element.attributes {
            self.check_name(name)?;
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            self.escape_into(out, value)?;
            out.push('"');
        }

        let text = element.text.as_deref().filter(|t| !t.is_empty());
        match (text, element.children.is_empty()) {
            (None, true) => out.push_str("/>\n"),
            (Some(text), true) => {
                out.push('>');
                self.escape_into(out, text)?;
                out.push_str(&format!("</{}>\n", element.tag));
            }
            (text, false) => {
                out.push_str(">\n");
                if let Some(text) = text {
                    out.push_str(&INDENT.repeat(depth + 1));
                    self.escape_into(out, text)?;
                    out.push('\n');
                }
                for child in &element.children {
                    self.write_element(out, child, depth + 1)?;
                }
                out.push_str(&format!("{indent}</{}>\n", element.tag));
            }
        }
        Ok(())
    }

    fn escape_into(&self, out: &mut String, text: &str) -> Result<()> {
        for c in text.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&apos;"),
                // parsers normalize a raw CR to LF
                '\r' => out.push_str("&#13;"),
                c if is_xml_char(c) && self.encoding.can_represent(c) => out.push(c),
                c => match self.policy {
                    EncodingPolicy::CharRef => out.push_str(&format!("&#{};", c as u32)),
                    EncodingPolicy::Strict => return Err(self.unencodable(c)),
                },
            }
        }
        Ok(())
    }

    fn unencodable(&self, c: char) -> ExportError {
        if is_xml_char(c) {
            ExportError::Serialization(format!(
                "character U+{:04X} cannot be encoded as {}",
                c as u32, self.encoding
            ))
        } else {
            ExportError::Serialization(format!(
                "character U+{:04X} is not allowed in XML",
                c as u32
            ))
        }
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if !is_xml_name(name) {
            return Err(ExportError::Serialization(format!(
                "'{name}' is not a valid element name"
            )));
        }
        if let Some(c) = name.chars().find(|c| !self.encoding.can_represent(*c)) {
            return Err(self.unencodable(c));
        }
        Ok(())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | '_' | 'A'..='Z' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => is_name_start_char(first) && chars.all(is_name_char),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::append_field;

    fn render(doc: &Document, serializer: Serializer) -> String {
        String::from_utf8(serializer.serialize(doc).unwrap()).unwrap()
    }

    fn single_field(text: &str) -> Document {
        let mut doc = Document::new_root("messages");
        let record = doc.append_record("message", 0);
        append_field(record, "msg_txt", text);
        doc
    }

    #[test]
    fn renders_indented_document() {
        let mut doc = Document::new_root("contacts");
        let record = doc.append_record("contact", 0);
        append_field(record, "GivenName", "Aaron");
        append_field(record, "Note", "");
        doc.append_record("contact", 1);

        let out = render(&doc, Serializer::new(Encoding::Utf8, EncodingPolicy::Strict));
        assert_eq!(
            out,
            "<?xml version=\"1.0\" ?>\n\
             <contacts>\n  \
             <contact id=\"0\">\n    \
             <GivenName>Aaron</GivenName>\n    \
             <Note/>\n  \
             </contact>\n  \
             <contact id=\"1\"/>\n\
             </contacts>\n"
        );
    }

    #[test]
    fn escapes_reserved_characters() {
        let doc = single_field(r#"a & b <c> "d" 'e'"#);
        let out = render(&doc, Serializer::new(Encoding::Utf8, EncodingPolicy::Strict));
        assert!(out.contains(
            "<msg_txt>a &amp; b &lt;c&gt; &quot;d&quot; &apos;e&apos;</msg_txt>"
        ));
    }

    #[test]
    fn char_refs_for_unrepresentable_characters() {
        let doc = single_field("Grüße €");
        let out = render(&doc, Serializer::new(Encoding::Ascii, EncodingPolicy::CharRef));
        assert!(out.contains("<msg_txt>Gr&#252;&#223;e &#8364;</msg_txt>"));
        assert!(out.is_ascii());
    }

    #[test]
    fn strict_policy_fails_on_unrepresentable_characters() {
        let doc = single_field("€");
        let err = Serializer::new(Encoding::Ascii, EncodingPolicy::Strict)
            .serialize(&doc)
            .unwrap_err();
        assert!(matches!(err, ExportError::Serialization(_)));
    }

    #[test]
    fn control_characters_follow_policy() {
        let doc = single_field("a\u{1}b");
        assert!(Serializer::new(Encoding::Utf8, EncodingPolicy::Strict)
            .serialize(&doc)
            .is_err());
        let out = render(&doc, Serializer::new(Encoding::Utf8, EncodingPolicy::CharRef));
        assert!(out.contains("a&#1;b"));
    }

    #[test]
    fn carriage_returns_are_referenced() {
        let mut doc = single_field("a\r\nb");
        doc.root.children[0].attributes.push(("note".to_string(), "x\ry".to_string()));
        for policy in [EncodingPolicy::Strict, EncodingPolicy::CharRef] {
            let out = render(&doc, Serializer::new(Encoding::Utf8, policy));
            assert!(out.contains("<msg_txt>a&#13;\nb</msg_txt>"));
            assert!(out.contains("note=\"x&#13;y\""));
            assert!(!out.contains('\r'));
        }
    }

    #[test]
    fn trimming_removes_trailing_newline() {
        let doc = single_field("x");
        let out = render(
            &doc,
            Serializer::new(Encoding::Utf8, EncodingPolicy::CharRef).trimmed(true),
        );
        assert!(out.ends_with("</messages>"));
    }

    #[test]
    fn rejects_invalid_tag_names() {
        let mut doc = Document::new_root("contacts");
        let record = doc.append_record("contact", 0);
        append_field(record, "1st name", "x");
        for policy in [EncodingPolicy::Strict, EncodingPolicy::CharRef] {
            assert!(Serializer::new(Encoding::Utf8, policy).serialize(&doc).is_err());
        }
    }

    #[test]
    fn validates_names() {
        assert!(is_xml_name("msg_address_substr"));
        assert!(is_xml_name("GUID"));
        assert!(!is_xml_name(""));
        assert!(!is_xml_name("9lives"));
        assert!(!is_xml_name("two words"));
    }
}
