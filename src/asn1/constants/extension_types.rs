use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Context tags of the `data` CHOICE inside an `HDB-extension`.
///
/// ```text
/// HDB-extension ::= SEQUENCE {
///         mandatory[0]    BOOLEAN,
///         data[1]         CHOICE {
///                 pkinit-acl[0]                   HDB-Ext-PKINIT-acl,
///                 pkinit-cert-hash[1]             HDB-Ext-PKINIT-hash,
///                 allowed-to-delegate-to[2]       HDB-Ext-Constrained-delegation-acl,
/// --              referral-info[3]                HDB-Ext-Referrals,
///                 lm-owf[4]                       HDB-Ext-Lan-Manager-OWF,
///                 password[5]                     HDB-Ext-Password,
///                 aliases[6]                      HDB-Ext-Aliases,
///                 last-pw-change[7]               KerberosTime,
///                 pkinit-cert[8]                  HDB-Ext-PKINIT-cert,
///                 hist-keys[9]                    HDB-Ext-KeySet,
///                 hist-kvno-diff-clnt[10]         INTEGER (0..4294967295),
///                 hist-kvno-diff-svc[11]          INTEGER (0..4294967295),
///                 policy[12]                      UTF8String,
///                 principal-id[13]                INTEGER,
///                 key-rotation[14]                HDB-Ext-KeyRotation,
///                 krb5-config[15]                 OCTET STRING,
///                 ...
///         },
///         ...
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum HdbExtensionType {
    PkinitAcl = 0,
    PkinitCertHash = 1,
    AllowedToDelegateTo = 2,
    ReferralInfo = 3,
    LmOwf = 4,
    Password = 5,
    Aliases = 6,
    LastPwChange = 7,
    PkinitCert = 8,
    HistKeys = 9,
    HistKvnoDiffClnt = 10,
    HistKvnoDiffSvc = 11,
    Policy = 12,
    PrincipalId = 13,
    KeyRotation = 14,
    Krb5Config = 15,
}
