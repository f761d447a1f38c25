//! JSON names of the HDB flags.

use crate::asn1::hdb_flags::HdbFlags;

/// Every flag in bit order. JSON output lists them in this order.
pub const FLAG_NAMES: [(HdbFlags, &str); 32] = [
    (HdbFlags::Initial, "initial"),
    (HdbFlags::Forwardable, "forwardable"),
    (HdbFlags::Proxiable, "proxiable"),
    (HdbFlags::Renewable, "renewable"),
    (HdbFlags::Postdate, "postdate"),
    (HdbFlags::Server, "server"),
    (HdbFlags::Client, "client"),
    (HdbFlags::Invalid, "invalid"),
    (HdbFlags::RequirePreauth, "require_preauth"),
    (HdbFlags::ChangePw, "change_pw"),
    (HdbFlags::RequireHwauth, "require_hwauth"),
    (HdbFlags::OkAsDelegate, "ok_as_delegate"),
    (HdbFlags::UserToUser, "user_to_user"),
    (HdbFlags::Immutable, "immutable"),
    (HdbFlags::TrustedForDelegation, "trusted_for_delegation"),
    (HdbFlags::AllowKerberos4, "allow_kerberos4"),
    (HdbFlags::AllowDigest, "allow_digest"),
    (HdbFlags::LockedOut, "locked_out"),
    (HdbFlags::RequirePwchange, "require_pwchange"),
    (HdbFlags::Materialize, "materialize"),
    (HdbFlags::VirtualKeys, "virtual_keys"),
    (HdbFlags::Virtual, "virtual"),
    (HdbFlags::Synthetic, "synthetic"),
    (HdbFlags::NoAuthDataReqd, "no_auth_data_reqd"),
    (HdbFlags::AuthDataReqd, "auth_data_reqd"),
    (HdbFlags::Unused25, "unused25"),
    (HdbFlags::Unused26, "unused26"),
    (HdbFlags::Unused27, "unused27"),
    (HdbFlags::Unused28, "unused28"),
    (HdbFlags::Unused29, "unused29"),
    (HdbFlags::ForceCanonicalize, "force_canonicalize"),
    (HdbFlags::DoNotStore, "do_not_store"),
];

/// Exact, case sensitive match. Operators get an error for a typo rather
/// than a silently dropped flag.
pub fn flag_from_name(name: &str) -> Option<HdbFlags> {
    FLAG_NAMES
        .iter()
        .find_map(|(flag, n)| (*n == name).then_some(*flag))
}
