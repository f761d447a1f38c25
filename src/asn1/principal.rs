use super::kerberos_string::KerberosString;
use der::Sequence;

/// ```text
/// Realm           ::= KerberosString
///
/// PrincipalName   ::= SEQUENCE {
///         name-type       [0] Int32,
///         name-string     [1] SEQUENCE OF KerberosString
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Sequence)]
pub(crate) struct PrincipalName {
    #[asn1(context_specific = "0")]
    pub(crate) name_type: i32,
    #[asn1(context_specific = "1")]
    pub(crate) name_string: Vec<KerberosString>,
}

/// ```text
/// Principal       ::= SEQUENCE {
///         name[0]                 PrincipalName,
///         realm[1]                Realm
/// }
/// ```
///
/// Heimdal's own pairing of a name and its realm, used for the entry
/// principal, event principals and aliases.
#[derive(Debug, Clone, Eq, PartialEq, Sequence)]
pub(crate) struct Principal {
    #[asn1(context_specific = "0")]
    pub(crate) name: PrincipalName,
    #[asn1(context_specific = "1")]
    pub(crate) realm: KerberosString,
}

#[cfg(test)]
mod tests {
    use super::Principal;
    use der::{Decode, Encode};

    #[test]
    fn principal_parse() {
        let blob = "3023a0123010a003020101a10930071b05616c696365a10d1b0b4558414d504c452e434f4d";
        let blob = hex::decode(blob).expect("Failed to decode sample");
        let principal = Principal::from_der(&blob).expect("Failed to decode");
        assert_eq!(principal.name.name_type, 1);
        assert_eq!(principal.name.name_string.len(), 1);
        assert_eq!(principal.name.name_string[0].as_ref(), "alice");
        assert_eq!(principal.realm.as_ref(), "EXAMPLE.COM");
        assert_eq!(principal.to_der().expect("Failed to encode"), blob);
    }
}
