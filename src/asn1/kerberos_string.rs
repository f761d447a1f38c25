use der::asn1::OctetString;
use der::DecodeValue;
use der::EncodeValue;
use der::FixedTag;
use der::Tag;
use std::fmt;

/// ```text
/// KerberosString  ::= GeneralString (IA5String)
/// ````
///
/// Heimdal stores whatever octets it was given in a GeneralString, so this
/// accepts any UTF-8 rather than restricting itself to IA5.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct KerberosString(pub(crate) String);

impl FixedTag for KerberosString {
    const TAG: Tag = Tag::GeneralString;
}

impl<'a> DecodeValue<'a> for KerberosString {
    type Error = der::Error;

    fn decode_value<R: der::Reader<'a>>(reader: &mut R, header: der::Header) -> der::Result<Self> {
        let octets = OctetString::decode_value(reader, header)?;
        String::from_utf8(octets.into_bytes().into_vec())
            .map(Self)
            .map_err(|_| der::Error::from(der::ErrorKind::Value { tag: Self::TAG }))
    }
}

impl EncodeValue for KerberosString {
    fn value_len(&self) -> der::Result<der::Length> {
        der::Length::try_from(self.0.len())
    }

    fn encode_value(&self, encoder: &mut impl der::Writer) -> der::Result<()> {
        encoder.write(self.0.as_bytes())
    }
}

impl fmt::Display for KerberosString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for KerberosString {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for KerberosString {
    fn from(value: &str) -> Self {
        KerberosString(value.to_string())
    }
}

impl From<KerberosString> for String {
    fn from(value: KerberosString) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::KerberosString;
    use der::{Decode, Encode};

    #[test]
    fn kerberos_string_general_string() {
        let blob = hex::decode("1b0b4558414d504c452e434f4d").expect("Failed to decode sample");
        let realm = KerberosString::from_der(&blob).expect("Failed to decode");
        assert_eq!(realm.as_ref(), "EXAMPLE.COM");
        assert_eq!(realm.to_der().expect("Failed to encode"), blob);
    }

    #[test]
    fn kerberos_string_utf8() {
        let name = KerberosString::from("jürgen");
        let der = name.to_der().expect("Failed to encode");
        assert_eq!(der[0], 0x1b);
        assert_eq!(KerberosString::from_der(&der).expect("Failed to decode"), name);

        // Not UTF-8
        let blob = [0x1b, 0x02, 0xc3, 0x28];
        assert!(KerberosString::from_der(&blob).is_err());
    }
}
