//! Décodage des octets d'entrée en texte
//!
//! Ordre de détection : BOM, puis attribut `encoding` de la déclaration XML,
//! puis UTF-8 par défaut. Aucun caractère de remplacement : une séquence invalide
//! est une erreur.

use std::borrow::Cow;

use encoding_rs::Encoding;
use memchr::memmem;
use tracing::{debug, warn};

use crate::GmlError;

/// Taille maximale lue pour trouver la déclaration XML
const DECLARATION_WINDOW: usize = 512;

/// Décode un document en `&str`, sans copie pour l'UTF-8
pub fn decode(bytes: &[u8]) -> Result<Cow<'_, str>, GmlError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        debug!(encoding = encoding.name(), "Byte order mark detected");
        return decode_with(encoding, &bytes[bom_len..]);
    }

    let encoding = match declared_label(bytes) {
        Some(label) => match Encoding::for_label(label.as_bytes()) {
            Some(encoding) => encoding,
            None => {
                warn!(label, "Unknown declared encoding, assuming UTF-8");
                encoding_rs::UTF_8
            }
        },
        None => encoding_rs::UTF_8,
    };

    decode_with(encoding, bytes)
}

fn decode_with<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Result<Cow<'a, str>, GmlError> {
    if encoding == encoding_rs::UTF_8 {
        return simdutf8::compat::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|e| GmlError::invalid_encoding(encoding.name(), e.to_string()));
    }

    debug!(encoding = encoding.name(), "Transcoding input to UTF-8");
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| GmlError::invalid_encoding(encoding.name(), "malformed byte sequence"))
}

/// Valeur de `encoding="..."` dans la déclaration `<?xml ... ?>`
fn declared_label(bytes: &[u8]) -> Option<&str> {
    let head = &bytes[..bytes.len().min(DECLARATION_WINDOW)];
    if !head.starts_with(b"<?xml") {
        return None;
    }
    let end = memmem::find(head, b"?>")?;
    let declaration = &head[..end];

    let start = memmem::find(declaration, b"encoding")? + b"encoding".len();
    let rest = &declaration[start..];
    let eq = rest.iter().position(|&b| b == b'=')?;
    let rest = &rest[eq + 1..];
    let blank = rest.iter().take_while(|b| b.is_ascii_whitespace()).count();
    let rest = &rest[blank..];

    let quote = *rest.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = memchr::memchr(quote, &rest[1..])?;
    std::str::from_utf8(&rest[1..1 + len]).ok().map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_borrowed() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a>Bodø</a>";
        let decoded = decode(xml.as_bytes()).unwrap();
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, xml);
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"<a/>");
        assert_eq!(decode(&bytes).unwrap(), "<a/>");
    }

    #[test]
    fn test_declared_latin1() {
        let mut bytes = b"<?xml version='1.0' encoding='ISO-8859-1'?><navn>Troms".to_vec();
        bytes.push(0xF8); // ø
        bytes.extend_from_slice(b"</navn>");
        let decoded = decode(&bytes).unwrap();
        assert!(decoded.ends_with("<navn>Tromsø</navn>"));
    }

    #[test]
    fn test_utf16_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<a>å</a>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode(&bytes).unwrap(), "<a>å</a>");
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes = b"<a>\xFF\xFE\xFD</a>";
        assert!(matches!(
            decode(bytes),
            Err(GmlError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn test_declared_label() {
        assert_eq!(
            declared_label(b"<?xml version=\"1.0\" encoding = \"windows-1252\" ?><a/>"),
            Some("windows-1252")
        );
        assert_eq!(declared_label(b"<?xml version=\"1.0\"?><a/>"), None);
        assert_eq!(declared_label(b"<a encoding=\"latin1\"/>"), None);
    }

    #[test]
    fn test_unknown_label_assumes_utf8() {
        let xml = "<?xml version=\"1.0\" encoding=\"x-sosi\"?><a>æ</a>";
        assert_eq!(decode(xml.as_bytes()).unwrap(), xml);
    }
}
