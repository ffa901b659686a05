//! Code page conversion for strings stored in game files.

use encoding_rs::Encoding;

use crate::error::{Error, Result};

/// Code page used when a string carries no language information
pub const DEFAULT_ENCODING: &Encoding = encoding_rs::WINDOWS_1252;

/// Decode `bytes` from `encoding`. Undecodable sequences become U+FFFD.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Encode `text` into `encoding`
///
/// Fails with [`Error::UnencodableText`] when a character has no mapping in the code page,
/// rather than writing the HTML numeric escape `encoding_rs` would substitute.
pub fn encode(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>> {
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(Error::UnencodableText {
            text: text.to_owned(),
            encoding: encoding.name(),
        });
    }
    Ok(bytes.into_owned())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{decode, encode, DEFAULT_ENCODING};

    #[test]
    fn windows_1252_round_trip() {
        let bytes = [b'C', b'a', b'f', 0xE9, 0x20, 0x80];
        let text = decode(&bytes, DEFAULT_ENCODING);
        assert_eq!(text, "Café €");
        assert_eq!(encode(&text, DEFAULT_ENCODING).unwrap(), bytes.to_vec());
    }

    #[test]
    fn unmappable_text_fails() {
        assert!(encode("日本", DEFAULT_ENCODING).is_err());
    }
}
