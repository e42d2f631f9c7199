//! Character set lookup for text resources.

use encoding_rs::Encoding;

use super::DecodeError;

/// A character set used to turn resource bytes into text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Charset {
    /// Byte-for-byte ISO-8859-1, the default for property files.
    Latin1,
    /// Any encoding known to `encoding_rs`.
    Labelled(&'static Encoding),
}

impl Charset {
    /// Look up an encoding label such as `UTF-8`, `Shift_JIS`, or `SJIS`.
    ///
    /// `None` selects [`Charset::Latin1`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedEncoding`] for unknown labels.
    pub fn for_label(label: Option<&str>) -> Result<Self, DecodeError> {
        let Some(name) = label.map(str::trim) else {
            return Ok(Self::Latin1);
        };

        if is_latin1_label(name) {
            return Ok(Self::Latin1);
        }

        Encoding::for_label(name.as_bytes())
            .or_else(|| Encoding::for_label(name.replace('_', "-").as_bytes()))
            .map(Self::Labelled)
            .ok_or_else(|| DecodeError::UnsupportedEncoding {
                name: name.to_owned(),
            })
    }

    /// Canonical name of the character set.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Latin1 => "ISO-8859-1",
            Self::Labelled(encoding) => encoding.name(),
        }
    }

    /// Decode `bytes` strictly, rejecting malformed sequences.
    ///
    /// A leading byte-order mark is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Malformed`] when `bytes` are not valid in this
    /// character set.
    pub fn decode(self, bytes: &[u8]) -> Result<String, DecodeError> {
        match self {
            Self::Latin1 => Ok(bytes.iter().copied().map(char::from).collect()),
            Self::Labelled(encoding) => {
                let text = encoding
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .ok_or_else(|| {
                        DecodeError::malformed(format!(
                            "input is not valid {}",
                            encoding.name()
                        ))
                    })?;
                let mut owned = text.into_owned();
                if owned.starts_with('\u{feff}') {
                    owned.remove(0);
                }
                Ok(owned)
            }
        }
    }
}

fn is_latin1_label(name: &str) -> bool {
    ["iso-8859-1", "iso8859-1", "iso_8859_1", "latin1", "l1"]
        .iter()
        .any(|label| name.eq_ignore_ascii_case(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "ISO-8859-1")]
    #[case(Some("ISO-8859-1"), "ISO-8859-1")]
    #[case(Some("UTF-8"), "UTF-8")]
    #[case(Some("utf8"), "UTF-8")]
    #[case(Some("SJIS"), "Shift_JIS")]
    #[case(Some("Shift_JIS"), "Shift_JIS")]
    #[case(Some("EUC-JP"), "EUC-JP")]
    fn resolves_labels(#[case] label: Option<&str>, #[case] expected: &str) {
        let charset = Charset::for_label(label).expect("known label");
        assert_eq!(charset.name(), expected);
    }

    #[test]
    fn rejects_unknown_labels() {
        let error = Charset::for_label(Some("klingon-8")).expect_err("unknown label");
        assert!(matches!(error, DecodeError::UnsupportedEncoding { name } if name == "klingon-8"));
    }

    #[test]
    fn latin1_maps_every_byte() {
        let text = Charset::Latin1.decode(&[0x61, 0xe9, 0xff]).expect("latin1 never fails");
        assert_eq!(text, "a\u{e9}\u{ff}");
    }

    #[test]
    fn strict_decoding_rejects_malformed_input() {
        let utf8 = Charset::for_label(Some("UTF-8")).expect("known label");
        assert!(matches!(
            utf8.decode(&[0x66, 0xff, 0xfe]),
            Err(DecodeError::Malformed { .. })
        ));
    }

    #[test]
    fn strips_byte_order_mark() {
        let utf8 = Charset::for_label(Some("UTF-8")).expect("known label");
        let text = utf8.decode("\u{feff}key=value".as_bytes()).expect("valid utf-8");
        assert_eq!(text, "key=value");
    }
}
