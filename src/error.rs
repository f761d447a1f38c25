use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HdbError {
    // =========================================================================================
    // IMPORTANT: The only data carried by these variants are field names or flag names taken
    // from the schema. Never put key material, principal names or other record contents in
    // an error - these end up on stderr and in logs of whatever drives the conversion.
    //
    // If you want to debug the error, then use the error! macro at the error raise site to
    // report relevant information.
    // =========================================================================================
    /// A required field is absent. Holds the JSON path or ASN.1 field name.
    MissingField(String),
    /// A field is present but has the wrong type or an out of range value.
    InvalidType(String),
    /// A timestamp or duration could not be parsed or is out of range.
    InvalidTimestamp(String),
    /// A flag name outside of the HDBFlags set.
    UnknownFlag(String),
    /// A length prefix claims more bytes than remain.
    TruncatedInput,
    /// The base64 transport text is not valid padded standard base64.
    InvalidEncoding,
    /// A binary tag that is neither known nor skippable.
    UnsupportedTag,

    MalformedJson,
    TrailingData,
    DerDecode,
    DerEncode,
}

impl fmt::Display for HdbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HdbError::MissingField(name) => write!(f, "missing field: {name}"),
            HdbError::InvalidType(name) => write!(f, "invalid type or value for field: {name}"),
            HdbError::InvalidTimestamp(name) => write!(f, "invalid timestamp for field: {name}"),
            HdbError::UnknownFlag(name) => write!(f, "unknown flag: {name}"),
            HdbError::TruncatedInput => f.write_str("truncated input"),
            HdbError::InvalidEncoding => f.write_str("invalid base64 encoding"),
            HdbError::UnsupportedTag => f.write_str("unsupported tag"),
            HdbError::MalformedJson => f.write_str("malformed json"),
            HdbError::TrailingData => f.write_str("trailing data after record"),
            HdbError::DerDecode => f.write_str("malformed der"),
            HdbError::DerEncode => f.write_str("unable to der encode record"),
        }
    }
}

impl std::error::Error for HdbError {}

/// Decode side mapping. Encoders map their failures to `DerEncode` at the
/// call site instead.
impl From<der::Error> for HdbError {
    fn from(value: der::Error) -> Self {
        match value.kind() {
            der::ErrorKind::Incomplete { .. } => HdbError::TruncatedInput,
            der::ErrorKind::TagUnexpected { .. } | der::ErrorKind::TagUnknown { .. } => {
                HdbError::UnsupportedTag
            }
            der::ErrorKind::TrailingData { .. } => HdbError::TrailingData,
            _ => HdbError::DerDecode,
        }
    }
}
