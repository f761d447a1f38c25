//! Padded standard base64 (RFC 4648) around the DER record.

use crate::error::HdbError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::error;

pub fn encode_transport(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Canonical padding is required and trailing bits must be zero. Nothing is
/// trimmed, whitespace included.
pub fn decode_transport(text: &str) -> Result<Vec<u8>, HdbError> {
    STANDARD.decode(text).map_err(|err| {
        error!(?err, "invalid base64 transport encoding");
        HdbError::InvalidEncoding
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_transport, encode_transport};
    use crate::error::HdbError;

    #[test]
    fn transport_roundtrip() {
        assert_eq!(encode_transport(&[0, 1, 2, 3]), "AAECAw==");
        assert_eq!(decode_transport("AAECAw=="), Ok(vec![0, 1, 2, 3]));
        assert_eq!(decode_transport(""), Ok(vec![]));
    }

    #[test]
    fn transport_strict() {
        for bad in [
            "AAECAw",
            "AAECAw=",
            "AAECAw===",
            "AAECAw==AA",
            "AAEC Aw==",
            "AAECAw==\n",
            "AAECA-==",
            "AAECAx==",
        ] {
            assert_eq!(decode_transport(bad), Err(HdbError::InvalidEncoding), "{bad}");
        }
    }
}
