use der::asn1::OctetString;
use der::Sequence;

/// ```text
/// EncryptionKey ::= SEQUENCE {
///         keytype[0]      krb5int32,
///         keyvalue[1]     OCTET STRING
/// }
/// ```
///
/// In an HDB entry the key value is usually sealed with the master key
/// named by `mkvno`, it is carried here as opaque octets.
#[derive(Debug, Clone, Eq, PartialEq, Sequence)]
pub(crate) struct EncryptionKey {
    #[asn1(context_specific = "0")]
    pub(crate) key_type: i32,
    #[asn1(context_specific = "1")]
    pub(crate) key_value: OctetString,
}

/// ```text
/// Salt ::= SEQUENCE {
///         type[0]         INTEGER (0..4294967295),
///         salt[1]         OCTET STRING,
///         opaque[2]       OCTET STRING OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Sequence)]
pub(crate) struct Salt {
    #[asn1(context_specific = "0")]
    pub(crate) salt_type: u32,
    #[asn1(context_specific = "1")]
    pub(crate) salt: OctetString,
    #[asn1(context_specific = "2", optional = "true")]
    pub(crate) opaque: Option<OctetString>,
}

/// ```text
/// Key ::= SEQUENCE {
///         mkvno[0]        INTEGER (0..4294967295) OPTIONAL, -- master key version number
///         key[1]          EncryptionKey,
///         salt[2]         Salt OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Sequence)]
pub(crate) struct Key {
    #[asn1(context_specific = "0", optional = "true")]
    pub(crate) mkvno: Option<u32>,
    #[asn1(context_specific = "1")]
    pub(crate) key: EncryptionKey,
    #[asn1(context_specific = "2", optional = "true")]
    pub(crate) salt: Option<Salt>,
}

/// ```text
/// Keys ::= SEQUENCE OF Key
/// ```
pub(crate) type Keys = Vec<Key>;

#[cfg(test)]
mod tests {
    use super::{Key, Keys};
    use crate::asn1::constants::EncryptionType;
    use der::{Decode, Encode};

    #[test]
    fn key_parse_with_salt() {
        // aes256, no mkvno, pw-salt "EXAMPLE.COMalice"
        let blob = "302ea10f300da003020112a106040400010203a21b3019a003020103a11204104558414d504c452e434f4d616c696365";
        let blob = hex::decode(blob).expect("Failed to decode sample");
        let key = Key::from_der(&blob).expect("Failed to decode");
        assert!(key.mkvno.is_none());
        assert_eq!(
            key.key.key_type,
            EncryptionType::AES256_CTS_HMAC_SHA1_96 as i32
        );
        assert_eq!(key.key.key_value.as_bytes(), &[0, 1, 2, 3]);
        let salt = key.salt.as_ref().expect("salt must be there");
        assert_eq!(salt.salt_type, 3);
        assert_eq!(salt.salt.as_bytes(), b"EXAMPLE.COMalice");
        assert!(salt.opaque.is_none());
        assert_eq!(key.to_der().expect("Failed to encode"), blob);
    }

    #[test]
    fn key_parse_with_mkvno() {
        let blob = "3022a003020101a11b3019a003020111a1120410000102030405060708090a0b0c0d0e0f";
        let blob = hex::decode(blob).expect("Failed to decode sample");
        let key = Key::from_der(&blob).expect("Failed to decode");
        assert_eq!(key.mkvno, Some(1));
        assert_eq!(
            key.key.key_type,
            EncryptionType::AES128_CTS_HMAC_SHA1_96 as i32
        );
        assert_eq!(key.key.key_value.as_bytes().len(), 16);
        assert!(key.salt.is_none());

        // Cut inside the key value.
        assert!(Key::from_der(&blob[..blob.len() - 3]).is_err());
    }

    #[test]
    fn keys_empty_sequence() {
        let keys: Keys = Vec::new();
        assert_eq!(keys.to_der().expect("Failed to encode"), vec![0x30, 0x00]);
        assert!(Keys::from_der(&[0x30, 0x00])
            .expect("Failed to decode")
            .is_empty());
    }
}
