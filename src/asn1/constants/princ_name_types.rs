use num_enum::{IntoPrimitive, TryFromPrimitive};

/// `NAME-TYPE` values from Heimdal's `krb5.asn1`.
///
/// Entries keep the raw `Int32`, so a name type missing here still passes
/// through a conversion unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum PrincipalNameType {
    NtSrvHstNeedsCanon = -195894762,
    NtEntPrincipalAndId = -130,
    NtMsPrincipalAndId = -129,
    NtMsPrincipal = -128,
    NtUnknown = 0,
    NtPrincipal = 1,
    NtSrvInst = 2,
    NtSrvHst = 3,
    NtSrvXhst = 4,
    NtUid = 5,
    NtX500Principal = 6,
    NtSmtpName = 7,
    NtEnterprise = 10,
    NtWellknown = 11,
    NtSrvHstDomain = 12,
    NtNtlm = 100,
    NtX509GeneralName = 101,
    NtGssHostbasedService = 102,
    NtCacheUuid = 103,
}
