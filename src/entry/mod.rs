//! The in-memory form of one HDB entry, independent of how it is encoded.

mod binary;
pub mod flags;

pub use self::binary::{decode_binary, encode_binary};
pub(crate) use self::binary::{check_opaque_extensions, der_sequence};

use crate::asn1::constants::PrincipalNameType;
use crate::asn1::hdb_flags::HdbFlags;
use crate::error::HdbError;
use der::flagset::FlagSet;
use std::fmt;
use std::str::FromStr;
use tracing::error;

/// Seconds since the unix epoch, limited to what a GeneralizedTime can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// 9999-12-31T23:59:59Z
    pub const MAX_UNIX_SECONDS: u64 = 253_402_300_799;

    pub fn from_unix_seconds(secs: u64) -> Option<Self> {
        (secs <= Self::MAX_UNIX_SECONDS).then_some(Timestamp(secs))
    }

    pub fn unix_seconds(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name_type: i32,
    pub realm: String,
    pub components: Vec<String>,
}

impl Principal {
    /// A `KRB5_NT_PRINCIPAL` name.
    pub fn new(realm: &str, components: &[&str]) -> Self {
        Principal {
            name_type: PrincipalNameType::NtPrincipal.into(),
            realm: realm.to_string(),
            components: components.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Realm and components must all be non-empty. `field` prefixes the name
    /// reported in the error.
    pub(crate) fn validate(&self, field: &str) -> Result<(), HdbError> {
        if self.realm.is_empty() {
            error!(field, "principal has an empty realm");
            return Err(HdbError::InvalidType(format!("{field}.realm")));
        }
        if self.components.is_empty() || self.components.iter().any(|c| c.is_empty()) {
            error!(field, "principal has missing or empty components");
            return Err(HdbError::InvalidType(format!("{field}.components")));
        }
        Ok(())
    }

    /// Parse `comp1/comp2@REALM`. A backslash takes the next character
    /// literally. Without an `@` the realm comes from `default_realm`.
    pub(crate) fn parse(
        text: &str,
        default_realm: Option<&str>,
        field: &str,
    ) -> Result<Self, HdbError> {
        let mut components = Vec::new();
        let mut current = String::new();
        let mut realm: Option<String> = None;
        let mut chars = text.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    let escaped = chars.next().ok_or_else(|| {
                        error!(field, "principal ends in a bare escape");
                        HdbError::InvalidType(field.to_string())
                    })?;
                    current.push(escaped);
                }
                '/' if realm.is_none() => {
                    components.push(std::mem::take(&mut current));
                }
                '@' if realm.is_none() => {
                    components.push(std::mem::take(&mut current));
                    realm = Some(String::new());
                }
                '@' => {
                    error!(field, "principal has more than one realm separator");
                    return Err(HdbError::InvalidType(field.to_string()));
                }
                c => current.push(c),
            }
        }

        let realm = match realm {
            Some(_) => current,
            None => {
                components.push(current);
                default_realm.map(str::to_string).ok_or_else(|| {
                    error!(field, "principal has no realm and no default realm is set");
                    HdbError::InvalidType(field.to_string())
                })?
            }
        };

        let principal = Principal {
            name_type: PrincipalNameType::NtPrincipal.into(),
            realm,
            components,
        };
        principal.validate(field)?;
        Ok(principal)
    }
}

fn escape_into(f: &mut fmt::Formatter<'_>, part: &str) -> fmt::Result {
    for c in part.chars() {
        if matches!(c, '/' | '@' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            escape_into(f, component)?;
        }
        f.write_str("@")?;
        escape_into(f, &self.realm)
    }
}

impl FromStr for Principal {
    type Err = HdbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Principal::parse(s, None, "principal")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt {
    pub salt_type: u32,
    pub value: Vec<u8>,
    pub opaque: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct KeyEntry {
    pub kvno: u32,
    pub mkvno: Option<u32>,
    pub enctype: i32,
    pub key: Vec<u8>,
    pub salt: Option<Salt>,
    /// When a historic keyset was set. Current keys carry `None`.
    pub set_time: Option<Timestamp>,
}

impl fmt::Debug for KeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyEntry")
            .field("kvno", &self.kvno)
            .field("mkvno", &self.mkvno)
            .field("enctype", &self.enctype)
            .field("key", &format_args!("<{} bytes>", self.key.len()))
            .field("salt", &self.salt)
            .field("set_time", &self.set_time)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub time: Timestamp,
    pub principal: Option<Principal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub time: Timestamp,
    pub usec: u32,
    pub gen: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aliases {
    pub case_insensitive: bool,
    pub principals: Vec<Principal>,
}

/// A top level field with a context tag above `session-etypes`, carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField {
    pub tag: u32,
    pub constructed: bool,
    /// Content octets, without the tag and length.
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdbEntry {
    pub principal: Principal,
    pub kvno: u32,
    pub keys: Vec<KeyEntry>,
    pub created_by: Option<Event>,
    pub modified_by: Option<Event>,
    pub valid_start: Option<Timestamp>,
    pub valid_end: Option<Timestamp>,
    pub pw_end: Option<Timestamp>,
    pub max_life: Option<u32>,
    pub max_renew: Option<u32>,
    pub flags: FlagSet<HdbFlags>,
    pub etypes: Option<Vec<u32>>,
    pub generation: Option<Generation>,
    pub session_etypes: Option<Vec<u32>>,
    pub aliases: Option<Aliases>,
    /// DER of each `HDB-extension` that is not decoded into a field above.
    pub extensions: Vec<Vec<u8>>,
    pub unknown_fields: Vec<UnknownField>,
}

impl HdbEntry {
    /// An entry with no keys, no flags and every optional field unset.
    pub fn new(principal: Principal) -> Self {
        HdbEntry {
            principal,
            kvno: 0,
            keys: Vec::new(),
            created_by: None,
            modified_by: None,
            valid_start: None,
            valid_end: None,
            pw_end: None,
            max_life: None,
            max_renew: None,
            flags: FlagSet::default(),
            etypes: None,
            generation: None,
            session_etypes: None,
            aliases: None,
            extensions: Vec::new(),
            unknown_fields: Vec::new(),
        }
    }
}
