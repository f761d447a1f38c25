use super::kerberos_time::KerberosTime;
use der::Sequence;

/// ```text
/// GENERATION ::= SEQUENCE {
///         time[0]         KerberosTime,                   -- timestamp
///         usec[1]         INTEGER (0..4294967295),        -- microseconds
///         gen[2]          INTEGER (0..4294967295)         -- generation number
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Sequence)]
pub(crate) struct Generation {
    #[asn1(context_specific = "0")]
    pub(crate) time: KerberosTime,
    #[asn1(context_specific = "1")]
    pub(crate) usec: u32,
    #[asn1(context_specific = "2")]
    pub(crate) gen: u32,
}

/// ```text
/// HDB-EncTypeList ::= SEQUENCE OF INTEGER (0..4294967295)
/// ```
pub(crate) type HdbEncTypeList = Vec<u32>;
