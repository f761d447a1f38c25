use super::event::Event;
use super::framing;
use super::generation::{Generation, HdbEncTypeList};
use super::hdb_extension::HdbExtensions;
use super::hdb_flags::HdbFlags;
use super::hdb_key::Keys;
use super::kerberos_time::KerberosTime;
use super::principal::Principal;
use crate::error::HdbError;
use der::asn1::Any;
use der::flagset::FlagSet;
use der::{Decode, Encode, Tag, TagNumber, Tagged};
use tracing::{error, trace};

/// ```text
/// HDB_entry ::= SEQUENCE {
///         principal[0]    Principal  OPTIONAL, -- this is optional only
///                                              -- for compatibility with libkrb5
///         kvno[1]         INTEGER (0..4294967295),
///         keys[2]         Keys,
///         created-by[3]   Event,
///         modified-by[4]  Event OPTIONAL,
///         valid-start[5]  KerberosTime OPTIONAL,
///         valid-end[6]    KerberosTime OPTIONAL,
///         pw-end[7]       KerberosTime OPTIONAL,
///         max-life[8]     INTEGER (0..4294967295) OPTIONAL,
///         max-renew[9]    INTEGER (0..4294967295) OPTIONAL,
///         flags[10]       HDBFlags,
///         etypes[11]      HDB-EncTypeList OPTIONAL,
///         generation[12]  GENERATION OPTIONAL,
///         extensions[13]  HDB-extensions OPTIONAL,
///         session-etypes[14] HDB-EncTypeList OPTIONAL
/// }
/// ```
///
/// This can't be a derived `Sequence`: context tags above `session-etypes`
/// are skipped over and kept in `unknown` so they can be written back out.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct HdbEntry {
    pub(crate) principal: Option<Principal>,
    pub(crate) kvno: u32,
    pub(crate) keys: Keys,
    pub(crate) created_by: Event,
    pub(crate) modified_by: Option<Event>,
    pub(crate) valid_start: Option<KerberosTime>,
    pub(crate) valid_end: Option<KerberosTime>,
    pub(crate) pw_end: Option<KerberosTime>,
    pub(crate) max_life: Option<u32>,
    pub(crate) max_renew: Option<u32>,
    pub(crate) flags: FlagSet<HdbFlags>,
    pub(crate) etypes: Option<HdbEncTypeList>,
    pub(crate) generation: Option<Generation>,
    pub(crate) extensions: Option<HdbExtensions>,
    pub(crate) session_etypes: Option<HdbEncTypeList>,
    /// Context tagged fields above `session-etypes`, in wire order.
    pub(crate) unknown: Vec<Any>,
}

pub(crate) const PRINCIPAL: u32 = 0;
pub(crate) const KVNO: u32 = 1;
pub(crate) const KEYS: u32 = 2;
pub(crate) const CREATED_BY: u32 = 3;
pub(crate) const MODIFIED_BY: u32 = 4;
pub(crate) const VALID_START: u32 = 5;
pub(crate) const VALID_END: u32 = 6;
pub(crate) const PW_END: u32 = 7;
pub(crate) const MAX_LIFE: u32 = 8;
pub(crate) const MAX_RENEW: u32 = 9;
pub(crate) const FLAGS: u32 = 10;
pub(crate) const ETYPES: u32 = 11;
pub(crate) const GENERATION: u32 = 12;
pub(crate) const EXTENSIONS: u32 = 13;
pub(crate) const SESSION_ETYPES: u32 = 14;

/// Field names as they appear in errors, indexed by context tag.
const FIELD_NAMES: [&str; 15] = [
    "principal",
    "kvno",
    "keys",
    "created_by",
    "modified_by",
    "valid_start",
    "valid_end",
    "pw_end",
    "max_life",
    "max_renew",
    "flags",
    "etypes",
    "generation",
    "extensions",
    "session_etypes",
];

pub(crate) fn context_tag(number: u32, constructed: bool) -> Tag {
    Tag::ContextSpecific {
        constructed,
        number: TagNumber(number),
    }
}

fn explicit<T: Encode>(number: u32, value: &T) -> der::Result<Any> {
    Any::new(context_tag(number, true), value.to_der()?)
}

fn decode_field<'a, T>(field: &'a Any, number: u32) -> Result<T, HdbError>
where
    T: Decode<'a, Error = der::Error>,
{
    let name = FIELD_NAMES.get(number as usize).copied().unwrap_or("unknown");
    T::from_der(field.value()).map_err(|err| {
        error!(?err, field = name, "unable to decode HDB_entry field");
        match HdbError::from(err) {
            HdbError::TruncatedInput => HdbError::TruncatedInput,
            _ => HdbError::InvalidType(name.to_string()),
        }
    })
}

fn missing(number: u32) -> HdbError {
    let name = FIELD_NAMES.get(number as usize).copied().unwrap_or("unknown");
    error!(field = name, "HDB_entry is missing a required field");
    HdbError::MissingField(name.to_string())
}

impl TryFrom<&[u8]> for HdbEntry {
    type Error = HdbError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        framing::check_record(bytes)?;

        let fields = Vec::<Any>::from_der(bytes).map_err(|err| {
            error!(?err, "HDB_entry is not a SEQUENCE");
            HdbError::from(err)
        })?;

        let mut principal = None;
        let mut kvno = None;
        let mut keys = None;
        let mut created_by = None;
        let mut modified_by = None;
        let mut valid_start = None;
        let mut valid_end = None;
        let mut pw_end = None;
        let mut max_life = None;
        let mut max_renew = None;
        let mut flags = None;
        let mut etypes = None;
        let mut generation = None;
        let mut extensions = None;
        let mut session_etypes = None;
        let mut unknown = Vec::new();

        let mut previous: Option<u32> = None;

        for field in fields {
            let tag = field.tag();
            let Tag::ContextSpecific {
                constructed,
                number,
            } = tag
            else {
                error!(?tag, "HDB_entry field is not context tagged");
                return Err(HdbError::UnsupportedTag);
            };
            let number = u32::from(number.value());

            if previous.is_some_and(|previous| number <= previous) {
                error!(number, ?previous, "HDB_entry field out of order or repeated");
                return Err(HdbError::UnsupportedTag);
            }
            previous = Some(number);

            if number > SESSION_ETYPES {
                trace!(number, constructed, "preserving unknown HDB_entry field");
                unknown.push(field);
                continue;
            }

            if !constructed {
                error!(number, "HDB_entry field must be explicitly tagged");
                return Err(HdbError::UnsupportedTag);
            }

            match number {
                PRINCIPAL => principal = Some(decode_field(&field, number)?),
                KVNO => kvno = Some(decode_field(&field, number)?),
                KEYS => keys = Some(decode_field(&field, number)?),
                CREATED_BY => created_by = Some(decode_field(&field, number)?),
                MODIFIED_BY => modified_by = Some(decode_field(&field, number)?),
                VALID_START => valid_start = Some(decode_field(&field, number)?),
                VALID_END => valid_end = Some(decode_field(&field, number)?),
                PW_END => pw_end = Some(decode_field(&field, number)?),
                MAX_LIFE => max_life = Some(decode_field(&field, number)?),
                MAX_RENEW => max_renew = Some(decode_field(&field, number)?),
                FLAGS => flags = Some(decode_field(&field, number)?),
                ETYPES => etypes = Some(decode_field(&field, number)?),
                GENERATION => generation = Some(decode_field(&field, number)?),
                EXTENSIONS => extensions = Some(decode_field(&field, number)?),
                SESSION_ETYPES => session_etypes = Some(decode_field(&field, number)?),
                _ => unreachable!(),
            }
        }

        Ok(HdbEntry {
            principal,
            kvno: kvno.ok_or_else(|| missing(KVNO))?,
            keys: keys.ok_or_else(|| missing(KEYS))?,
            created_by: created_by.ok_or_else(|| missing(CREATED_BY))?,
            modified_by,
            valid_start,
            valid_end,
            pw_end,
            max_life,
            max_renew,
            flags: flags.ok_or_else(|| missing(FLAGS))?,
            etypes,
            generation,
            extensions,
            session_etypes,
            unknown,
        })
    }
}

impl HdbEntry {
    fn fields(&self) -> der::Result<Vec<Any>> {
        let mut fields = Vec::with_capacity(16 + self.unknown.len());

        if let Some(principal) = &self.principal {
            fields.push(explicit(PRINCIPAL, principal)?);
        }
        fields.push(explicit(KVNO, &self.kvno)?);
        // An empty key list is still written, as an empty SEQUENCE.
        fields.push(explicit(KEYS, &self.keys)?);
        fields.push(explicit(CREATED_BY, &self.created_by)?);
        if let Some(modified_by) = &self.modified_by {
            fields.push(explicit(MODIFIED_BY, modified_by)?);
        }
        if let Some(valid_start) = &self.valid_start {
            fields.push(explicit(VALID_START, valid_start)?);
        }
        if let Some(valid_end) = &self.valid_end {
            fields.push(explicit(VALID_END, valid_end)?);
        }
        if let Some(pw_end) = &self.pw_end {
            fields.push(explicit(PW_END, pw_end)?);
        }
        if let Some(max_life) = &self.max_life {
            fields.push(explicit(MAX_LIFE, max_life)?);
        }
        if let Some(max_renew) = &self.max_renew {
            fields.push(explicit(MAX_RENEW, max_renew)?);
        }
        fields.push(explicit(FLAGS, &self.flags)?);
        if let Some(etypes) = &self.etypes {
            fields.push(explicit(ETYPES, etypes)?);
        }
        if let Some(generation) = &self.generation {
            fields.push(explicit(GENERATION, generation)?);
        }
        if let Some(extensions) = &self.extensions {
            fields.push(explicit(EXTENSIONS, extensions)?);
        }
        if let Some(session_etypes) = &self.session_etypes {
            fields.push(explicit(SESSION_ETYPES, session_etypes)?);
        }
        fields.extend(self.unknown.iter().cloned());

        Ok(fields)
    }

    pub(crate) fn to_der(&self) -> Result<Vec<u8>, HdbError> {
        self.fields()
            .and_then(|fields| fields.to_der())
            .map_err(|err| {
                error!(?err, "unable to encode HDB_entry");
                HdbError::DerEncode
            })
    }
}
