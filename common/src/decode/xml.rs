//! XML property documents.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <!DOCTYPE properties SYSTEM "http://java.sun.com/dtd/properties.dtd">
//! <properties>
//!   <comment>optional</comment>
//!   <entry key="hello">こんにちは</entry>
//! </properties>
//! ```
//!
//! The document encoding comes from its byte-order mark or XML declaration;
//! any configured encoding is ignored.

use std::io::Read;

use encoding_rs::{Encoding, UTF_8};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{DecodeError, Decoder, Entries, read_bytes};

const ROOT_ELEMENT: &[u8] = b"properties";
const COMMENT_ELEMENT: &[u8] = b"comment";
const ENTRY_ELEMENT: &[u8] = b"entry";
const KEY_ATTRIBUTE: &str = "key";

/// Decoder for `<properties>` XML documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct XmlPropertiesDecoder;

impl XmlPropertiesDecoder {
    /// Parse an already-decoded document.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Malformed`] for XML syntax errors, a root
    /// element other than `<properties>`, unexpected elements, or an
    /// `<entry>` without a `key` attribute.
    pub fn parse(document: &str) -> Result<Entries, DecodeError> {
        let mut reader = Reader::from_str(document);
        let mut entries = Entries::new();
        let mut state = State::Prolog;

        loop {
            let event = reader.read_event().map_err(|error| {
                DecodeError::malformed(format!(
                    "invalid XML at byte {}: {error}",
                    reader.error_position()
                ))
            })?;

            state = match (state, event) {
                (current, Event::Eof) => {
                    return match current {
                        State::Epilog => Ok(entries),
                        _ => Err(DecodeError::malformed("unexpected end of document")),
                    };
                }
                (
                    state,
                    Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_),
                ) => state,

                (State::Prolog, Event::Start(start)) => {
                    expect_root(&start)?;
                    State::Properties
                }
                (State::Prolog, Event::Empty(start)) => {
                    expect_root(&start)?;
                    State::Epilog
                }

                (State::Properties, Event::Start(start)) => match start.local_name().as_ref() {
                    COMMENT_ELEMENT => State::Comment,
                    ENTRY_ELEMENT => State::Entry {
                        key: entry_key(&start)?,
                        value: String::new(),
                    },
                    _ => return Err(unexpected_element(&start)),
                },
                (State::Properties, Event::Empty(start)) => match start.local_name().as_ref() {
                    COMMENT_ELEMENT => State::Properties,
                    ENTRY_ELEMENT => {
                        entries.insert(entry_key(&start)?, String::new());
                        State::Properties
                    }
                    _ => return Err(unexpected_element(&start)),
                },
                (State::Properties, Event::End(_)) => State::Epilog,

                (State::Comment, Event::End(_)) => State::Properties,
                (State::Comment, Event::Text(_) | Event::CData(_)) => State::Comment,

                (State::Entry { key, mut value }, Event::Text(text)) => {
                    let unescaped = text
                        .unescape()
                        .map_err(|error| DecodeError::malformed(error.to_string()))?;
                    value.push_str(&unescaped);
                    State::Entry { key, value }
                }
                (State::Entry { key, mut value }, Event::CData(data)) => {
                    let raw = data.into_inner();
                    let text = std::str::from_utf8(&raw)
                        .map_err(|error| DecodeError::malformed(error.to_string()))?;
                    value.push_str(text);
                    State::Entry { key, value }
                }
                (State::Entry { key, value }, Event::End(_)) => {
                    entries.insert(key, value);
                    State::Properties
                }

                (state @ (State::Prolog | State::Properties | State::Epilog), Event::Text(text)) => {
                    if !is_whitespace(&text) {
                        return Err(DecodeError::malformed(
                            "character data outside an <entry> element",
                        ));
                    }
                    state
                }
                (_, Event::Start(start) | Event::Empty(start)) => {
                    return Err(unexpected_element(&start));
                }
                (_, _) => return Err(DecodeError::malformed("unexpected XML content")),
            };
        }
    }
}

impl Decoder for XmlPropertiesDecoder {
    fn decode(&self, stream: &mut dyn Read, _encoding: Option<&str>) -> Result<Entries, DecodeError> {
        let bytes = read_bytes(stream)?;
        Self::parse(&decode_document(&bytes)?)
    }
}

enum State {
    Prolog,
    Properties,
    Comment,
    Entry { key: String, value: String },
    Epilog,
}

fn expect_root(start: &BytesStart<'_>) -> Result<(), DecodeError> {
    if start.local_name().as_ref() == ROOT_ELEMENT {
        Ok(())
    } else {
        Err(DecodeError::malformed(format!(
            "root element must be <properties>, found <{}>",
            String::from_utf8_lossy(start.name().as_ref())
        )))
    }
}

fn unexpected_element(start: &BytesStart<'_>) -> DecodeError {
    DecodeError::malformed(format!(
        "unexpected element <{}>",
        String::from_utf8_lossy(start.name().as_ref())
    ))
}

fn entry_key(start: &BytesStart<'_>) -> Result<String, DecodeError> {
    let attribute = start
        .try_get_attribute(KEY_ATTRIBUTE)
        .map_err(|error| DecodeError::malformed(error.to_string()))?
        .ok_or_else(|| DecodeError::malformed("<entry> element without a key attribute"))?;
    attribute
        .unescape_value()
        .map(|value| value.into_owned())
        .map_err(|error| DecodeError::malformed(error.to_string()))
}

fn is_whitespace(text: &[u8]) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

/// Decode document bytes using the byte-order mark, then the XML
/// declaration, then UTF-8.
fn decode_document(bytes: &[u8]) -> Result<String, DecodeError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_length)) => (encoding, bytes.get(bom_length..).unwrap_or_default()),
        None => (declared_encoding(bytes)?.unwrap_or(UTF_8), bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(std::borrow::Cow::into_owned)
        .ok_or_else(|| DecodeError::malformed(format!("document is not valid {}", encoding.name())))
}

fn declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>, DecodeError> {
    let Some(declaration) = bytes
        .strip_prefix(b"<?xml")
        .and_then(|rest| rest.split(|&byte| byte == b'>').next())
    else {
        return Ok(None);
    };

    let Some(label) = attribute_value(declaration, b"encoding") else {
        return Ok(None);
    };

    Encoding::for_label(label)
        .map(Some)
        .ok_or_else(|| DecodeError::UnsupportedEncoding {
            name: String::from_utf8_lossy(label).into_owned(),
        })
}

fn attribute_value<'a>(declaration: &'a [u8], name: &[u8]) -> Option<&'a [u8]> {
    let start = declaration
        .windows(name.len())
        .position(|window| window == name)?;
    let rest = declaration.get(start + name.len()..)?.trim_ascii_start();
    let rest = rest.strip_prefix(b"=")?.trim_ascii_start();
    let (&quote, rest) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let end = rest.iter().position(|&byte| byte == quote)?;
    rest.get(..end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DOCTYPE: &str = r#"<!DOCTYPE properties SYSTEM "http://java.sun.com/dtd/properties.dtd">"#;

    #[test]
    fn reads_entries_and_ignores_comments() {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
{DOCTYPE}
<properties>
  <comment>greetings</comment>
  <entry key="hello">Hello &amp; welcome</entry>
  <entry key="empty"/>
  <entry key="raw"><![CDATA[<b>bold</b>]]></entry>
</properties>
"#
        );

        let entries = XmlPropertiesDecoder::parse(&document).expect("valid document");

        assert_eq!(entries.len(), 3);
        assert_eq!(entries.get("hello").map(String::as_str), Some("Hello & welcome"));
        assert_eq!(entries.get("empty").map(String::as_str), Some(""));
        assert_eq!(entries.get("raw").map(String::as_str), Some("<b>bold</b>"));
    }

    #[test]
    fn empty_properties_element_is_valid() {
        let entries = XmlPropertiesDecoder::parse("<properties/>").expect("valid document");
        assert!(entries.is_empty());
    }

    #[rstest]
    #[case::wrong_root("<settings><entry key=\"a\">b</entry></settings>")]
    #[case::missing_key("<properties><entry>b</entry></properties>")]
    #[case::unknown_child("<properties><value key=\"a\">b</value></properties>")]
    #[case::nested_element("<properties><entry key=\"a\"><b>x</b></entry></properties>")]
    #[case::stray_text("<properties>loose</properties>")]
    #[case::truncated("<properties><entry key=\"a\">b</entry>")]
    #[case::mismatched("<properties><entry key=\"a\">b</properties>")]
    fn rejects_malformed_documents(#[case] document: &str) {
        assert!(matches!(
            XmlPropertiesDecoder::parse(document),
            Err(DecodeError::Malformed { .. })
        ));
    }

    #[test]
    fn honours_declared_encoding() {
        let document = "<?xml version=\"1.0\" encoding=\"Shift_JIS\"?>\
            <properties><entry key=\"hello\">\u{3053}\u{3093}\u{306b}\u{3061}\u{306f}</entry></properties>";
        let (encoded, _, _) = encoding_rs::SHIFT_JIS.encode(document);
        let mut bytes: &[u8] = &encoded;

        let entries = XmlPropertiesDecoder
            .decode(&mut bytes, Some("ISO-8859-1"))
            .expect("shift_jis document");

        assert_eq!(
            entries.get("hello").map(String::as_str),
            Some("\u{3053}\u{3093}\u{306b}\u{3061}\u{306f}")
        );
    }

    #[test]
    fn byte_order_mark_wins() {
        let mut bytes: &[u8] = b"\xef\xbb\xbf<properties><entry key=\"k\">v</entry></properties>";
        let entries = XmlPropertiesDecoder.decode(&mut bytes, None).expect("utf-8 document");
        assert_eq!(entries.get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn rejects_unknown_declared_encoding() {
        let mut bytes: &[u8] = b"<?xml version=\"1.0\" encoding=\"x-unknown\"?><properties/>";
        assert!(matches!(
            XmlPropertiesDecoder.decode(&mut bytes, None),
            Err(DecodeError::UnsupportedEncoding { name }) if name == "x-unknown"
        ));
    }
}
