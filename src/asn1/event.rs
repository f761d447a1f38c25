use super::kerberos_time::KerberosTime;
use super::principal::Principal;
use der::Sequence;

/// ```text
/// Event ::= SEQUENCE {
///         time[0]         KerberosTime,
///         principal[1]    Principal OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Sequence)]
pub(crate) struct Event {
    #[asn1(context_specific = "0")]
    pub(crate) time: KerberosTime,
    #[asn1(context_specific = "1", optional = "true")]
    pub(crate) principal: Option<Principal>,
}
