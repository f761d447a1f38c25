use der::asn1::GeneralizedTime;
use der::DecodeValue;
use der::EncodeValue;
use der::FixedTag;
use der::Tag;
use std::time::Duration;

/// ```text
/// KerberosTime    ::= GeneralizedTime -- with no fractional seconds
/// ````
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct KerberosTime(GeneralizedTime);

impl KerberosTime {
    pub(crate) fn from_unix_seconds(secs: u64) -> der::Result<Self> {
        GeneralizedTime::from_unix_duration(Duration::from_secs(secs)).map(Self)
    }

    pub(crate) fn to_unix_seconds(self) -> u64 {
        self.0.to_unix_duration().as_secs()
    }
}

impl FixedTag for KerberosTime {
    const TAG: Tag = Tag::GeneralizedTime;
}

impl<'a> DecodeValue<'a> for KerberosTime {
    type Error = der::Error;

    fn decode_value<R: der::Reader<'a>>(reader: &mut R, header: der::Header) -> der::Result<Self> {
        GeneralizedTime::decode_value(reader, header).map(Self)
    }
}

impl EncodeValue for KerberosTime {
    fn value_len(&self) -> der::Result<der::Length> {
        self.0.value_len()
    }

    fn encode_value(&self, encoder: &mut impl der::Writer) -> der::Result<()> {
        self.0.encode_value(encoder)
    }
}
