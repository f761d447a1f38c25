//! Conversion between [`HdbEntry`] and the DER form of Heimdal's `HDB_entry`.
//!
//! Only the leading run of current keys fits in `keys[2]`, everything after
//! it travels in a `hist-keys` extension, grouped by kvno and set time.

use super::{Aliases, Event, Generation, HdbEntry, KeyEntry, Principal, Salt, Timestamp, UnknownField};
use crate::asn1::constants::HdbExtensionType;
use crate::asn1::event::Event as RawEvent;
use crate::asn1::framing;
use crate::asn1::generation::Generation as RawGeneration;
use crate::asn1::hdb_entry::{self, context_tag, HdbEntry as RawHdbEntry};
use crate::asn1::hdb_extension::{HdbExtAliases, HdbExtKeySet, HdbExtension, HdbKeyset};
use crate::asn1::hdb_key::{EncryptionKey, Key, Salt as RawSalt};
use crate::asn1::kerberos_string::KerberosString;
use crate::asn1::kerberos_time::KerberosTime;
use crate::asn1::principal::{Principal as RawPrincipal, PrincipalName};
use crate::error::HdbError;
use der::asn1::{Any, OctetString};
use der::{Decode, Encode, Tag, Tagged};
use tracing::{debug, error, instrument, trace};

/// Decode the DER of one `HDB_entry`.
#[instrument(level = "debug", skip_all, fields(len = bytes.len()))]
pub fn decode_binary(bytes: &[u8]) -> Result<HdbEntry, HdbError> {
    let raw = RawHdbEntry::try_from(bytes)?;
    HdbEntry::try_from(raw)
}

/// Encode to the DER of one `HDB_entry`.
#[instrument(level = "debug", skip_all)]
pub fn encode_binary(entry: &HdbEntry) -> Result<Vec<u8>, HdbError> {
    RawHdbEntry::try_from(entry)?.to_der()
}

fn timestamp_from_raw(time: KerberosTime, field: &str) -> Result<Timestamp, HdbError> {
    Timestamp::from_unix_seconds(time.to_unix_seconds()).ok_or_else(|| {
        error!(field, "time is outside of the supported range");
        HdbError::InvalidType(field.to_string())
    })
}

fn timestamp_to_raw(time: Timestamp) -> Result<KerberosTime, HdbError> {
    KerberosTime::from_unix_seconds(time.unix_seconds()).map_err(|err| {
        error!(?err, "unable to represent time as GeneralizedTime");
        HdbError::DerEncode
    })
}

fn principal_from_raw(raw: &RawPrincipal, field: &str) -> Result<Principal, HdbError> {
    let principal = Principal {
        name_type: raw.name.name_type,
        realm: raw.realm.to_string(),
        components: raw
            .name
            .name_string
            .iter()
            .map(|c| c.to_string())
            .collect(),
    };
    principal.validate(field)?;
    Ok(principal)
}

fn principal_to_raw(principal: &Principal, field: &str) -> Result<RawPrincipal, HdbError> {
    principal.validate(field)?;
    Ok(RawPrincipal {
        name: PrincipalName {
            name_type: principal.name_type,
            name_string: principal
                .components
                .iter()
                .map(|c| KerberosString::from(c.as_str()))
                .collect(),
        },
        realm: KerberosString::from(principal.realm.as_str()),
    })
}

fn event_from_raw(raw: &RawEvent, field: &str) -> Result<Event, HdbError> {
    Ok(Event {
        time: timestamp_from_raw(raw.time, &format!("{field}.time"))?,
        principal: raw
            .principal
            .as_ref()
            .map(|p| principal_from_raw(p, &format!("{field}.principal")))
            .transpose()?,
    })
}

fn event_to_raw(event: &Event, field: &str) -> Result<RawEvent, HdbError> {
    Ok(RawEvent {
        time: timestamp_to_raw(event.time)?,
        principal: event
            .principal
            .as_ref()
            .map(|p| principal_to_raw(p, &format!("{field}.principal")))
            .transpose()?,
    })
}

/// Heimdal requires `created-by`. An unset value is written as an event at
/// the epoch with no principal, and that event is read back as unset.
fn is_unset_event(event: &RawEvent) -> bool {
    event.principal.is_none() && event.time.to_unix_seconds() == 0
}

fn unset_event() -> Result<RawEvent, HdbError> {
    Ok(RawEvent {
        time: timestamp_to_raw(Timestamp(0))?,
        principal: None,
    })
}

fn key_from_raw(raw: &Key, kvno: u32, set_time: Option<Timestamp>) -> KeyEntry {
    KeyEntry {
        kvno,
        mkvno: raw.mkvno,
        enctype: raw.key.key_type,
        key: raw.key.key_value.as_bytes().to_vec(),
        salt: raw.salt.as_ref().map(|salt| Salt {
            salt_type: salt.salt_type,
            value: salt.salt.as_bytes().to_vec(),
            opaque: salt.opaque.as_ref().map(|o| o.as_bytes().to_vec()),
        }),
        set_time,
    }
}

fn octets(bytes: &[u8]) -> Result<OctetString, HdbError> {
    OctetString::new(bytes).map_err(|err| {
        error!(?err, "unable to build octet string");
        HdbError::DerEncode
    })
}

fn key_to_raw(key: &KeyEntry) -> Result<Key, HdbError> {
    let salt = match &key.salt {
        Some(salt) => Some(RawSalt {
            salt_type: salt.salt_type,
            salt: octets(&salt.value)?,
            opaque: salt.opaque.as_deref().map(octets).transpose()?,
        }),
        None => None,
    };

    Ok(Key {
        mkvno: key.mkvno,
        key: EncryptionKey {
            key_type: key.enctype,
            key_value: octets(&key.key)?,
        },
        salt,
    })
}

fn build_extension<T: Encode>(data_type: HdbExtensionType, value: &T) -> Result<Any, HdbError> {
    HdbExtension::new(false, data_type, value)
        .and_then(|ext| ext.to_der())
        .and_then(|der| Any::from_der(&der))
        .map_err(|err| {
            error!(?err, ?data_type, "unable to build extension");
            HdbError::DerEncode
        })
}

/// The aliases an extension carries, when it is one that decoding reads into
/// [`HdbEntry::aliases`]. Mandatory or unreadable ones stay opaque.
fn model_aliases(ext: &HdbExtension) -> Option<Aliases> {
    if ext.mandatory || ext.data_type() != Some(Ok(HdbExtensionType::Aliases)) {
        return None;
    }
    let raw: HdbExtAliases = ext
        .decode_data()
        .map_err(|err| debug!(?err, "aliases extension not understood"))
        .ok()?;
    let principals = raw
        .aliases
        .iter()
        .enumerate()
        .map(|(j, p)| principal_from_raw(p, &format!("aliases.principals[{j}]")))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    Some(Aliases {
        case_insensitive: raw.case_insensitive,
        principals,
    })
}

/// The historic keys an extension carries, when it is one that decoding
/// appends to [`HdbEntry::keys`]. Empty keysets would vanish from the key
/// list, so those extensions stay opaque along with mandatory or unreadable
/// ones.
fn model_hist_keys(ext: &HdbExtension) -> Option<Vec<KeyEntry>> {
    if ext.mandatory || ext.data_type() != Some(Ok(HdbExtensionType::HistKeys)) {
        return None;
    }
    let keysets: HdbExtKeySet = ext
        .decode_data()
        .map_err(|err| debug!(?err, "hist-keys extension not understood"))
        .ok()?;
    if keysets.is_empty() || keysets.iter().any(|ks| ks.keys.is_empty()) {
        return None;
    }

    let mut keys = Vec::new();
    for keyset in keysets {
        let set_time = keyset
            .set_time
            .map(|t| timestamp_from_raw(t, "keys.set_time"))
            .transpose()
            .ok()?;
        keys.extend(
            keyset
                .keys
                .iter()
                .map(|k| key_from_raw(k, keyset.kvno, set_time)),
        );
    }
    Some(keys)
}

/// Extensions that are decoded into typed fields, the remainder stay as DER.
struct SplitExtensions {
    aliases: Option<Aliases>,
    hist_keys: Vec<KeyEntry>,
    opaque: Vec<Vec<u8>>,
}

fn split_extensions(extensions: Vec<Any>) -> Result<SplitExtensions, HdbError> {
    let mut split = SplitExtensions {
        aliases: None,
        hist_keys: Vec::new(),
        opaque: Vec::new(),
    };
    let mut seen_hist_keys = false;

    for (i, any) in extensions.into_iter().enumerate() {
        if any.tag() != Tag::Sequence {
            error!(index = i, tag = ?any.tag(), "extension is not a SEQUENCE");
            return Err(HdbError::InvalidType(format!("extensions[{i}]")));
        }

        let der = any.to_der().map_err(|err| {
            error!(?err, index = i, "unable to re-encode extension");
            HdbError::DerDecode
        })?;

        let Ok(ext) = HdbExtension::from_der(&der) else {
            debug!(index = i, "extension not understood, keeping as opaque");
            split.opaque.push(der);
            continue;
        };

        if split.aliases.is_none() {
            if let Some(aliases) = model_aliases(&ext) {
                trace!(count = aliases.principals.len(), "decoded aliases extension");
                split.aliases = Some(aliases);
                continue;
            }
        }
        if !seen_hist_keys {
            if let Some(keys) = model_hist_keys(&ext) {
                trace!(count = keys.len(), "decoded hist-keys extension");
                seen_hist_keys = true;
                split.hist_keys = keys;
                continue;
            }
        }
        split.opaque.push(der);
    }

    Ok(split)
}

/// Opaque extensions must come back as opaque extensions. One that decoding
/// would read into `aliases` or the key history, because no typed extension
/// of that kind is written ahead of it, is rejected.
pub(crate) fn check_opaque_extensions(entry: &HdbEntry) -> Result<(), HdbError> {
    let (_, historic) = split_keys(entry);

    for (i, bytes) in entry.extensions.iter().enumerate() {
        let Ok(ext) = HdbExtension::from_der(bytes) else {
            continue;
        };
        let shadowed = (entry.aliases.is_none() && model_aliases(&ext).is_some())
            || (historic.is_empty() && model_hist_keys(&ext).is_some());
        if shadowed {
            error!(
                index = i,
                data_type = ?ext.data_type(),
                "opaque extension would be read back as a typed field"
            );
            return Err(HdbError::InvalidType(format!("extensions[{i}]")));
        }
    }
    Ok(())
}

/// Current keys go in keys[2], the rest in hist-keys.
fn split_keys(entry: &HdbEntry) -> (&[KeyEntry], &[KeyEntry]) {
    let current = entry
        .keys
        .iter()
        .take_while(|k| k.kvno == entry.kvno && k.set_time.is_none())
        .count();
    entry.keys.split_at(current)
}

impl TryFrom<RawHdbEntry> for HdbEntry {
    type Error = HdbError;

    fn try_from(raw: RawHdbEntry) -> Result<Self, Self::Error> {
        let principal = raw.principal.as_ref().ok_or_else(|| {
            error!("HDB_entry has no principal");
            HdbError::MissingField("principal".to_string())
        })?;
        let principal = principal_from_raw(principal, "principal")?;

        let split = split_extensions(raw.extensions.unwrap_or_default())?;

        let mut keys: Vec<KeyEntry> = raw
            .keys
            .iter()
            .map(|k| key_from_raw(k, raw.kvno, None))
            .collect();
        keys.extend(split.hist_keys);

        let created_by = if is_unset_event(&raw.created_by) {
            None
        } else {
            Some(event_from_raw(&raw.created_by, "created_by")?)
        };

        let unknown_fields = raw
            .unknown
            .iter()
            .map(|any| match any.tag() {
                Tag::ContextSpecific {
                    constructed,
                    number,
                } => Ok(UnknownField {
                    tag: u32::from(number.value()),
                    constructed,
                    value: any.value().to_vec(),
                }),
                tag => {
                    error!(?tag, "unknown field is not context tagged");
                    Err(HdbError::UnsupportedTag)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HdbEntry {
            principal,
            kvno: raw.kvno,
            keys,
            created_by,
            modified_by: raw
                .modified_by
                .as_ref()
                .map(|e| event_from_raw(e, "modified_by"))
                .transpose()?,
            valid_start: raw
                .valid_start
                .map(|t| timestamp_from_raw(t, "valid_start"))
                .transpose()?,
            valid_end: raw
                .valid_end
                .map(|t| timestamp_from_raw(t, "valid_end"))
                .transpose()?,
            pw_end: raw
                .pw_end
                .map(|t| timestamp_from_raw(t, "pw_end"))
                .transpose()?,
            max_life: raw.max_life,
            max_renew: raw.max_renew,
            flags: raw.flags,
            etypes: raw.etypes,
            generation: raw
                .generation
                .map(|g| {
                    Ok::<_, HdbError>(Generation {
                        time: timestamp_from_raw(g.time, "generation.time")?,
                        usec: g.usec,
                        gen: g.gen,
                    })
                })
                .transpose()?,
            session_etypes: raw.session_etypes,
            aliases: split.aliases,
            extensions: split.opaque,
            unknown_fields,
        })
    }
}

fn unknown_to_raw(fields: &[UnknownField]) -> Result<Vec<Any>, HdbError> {
    let mut previous = hdb_entry::SESSION_ETYPES;
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            if field.tag <= previous {
                error!(index = i, tag = field.tag, "unknown field tag is not above the previous one");
                return Err(HdbError::InvalidType(format!("unknown_fields[{i}].tag")));
            }
            previous = field.tag;
            if field.constructed {
                framing::check_contents(&field.value)
                    .map_err(|_| HdbError::InvalidType(format!("unknown_fields[{i}].value")))?;
            }
            Any::new(context_tag(field.tag, field.constructed), field.value.clone()).map_err(
                |err| {
                    error!(?err, index = i, "unable to build unknown field");
                    HdbError::DerEncode
                },
            )
        })
        .collect()
}

/// Parse `bytes` as exactly one DER SEQUENCE.
pub(crate) fn der_sequence(bytes: &[u8]) -> Option<Any> {
    framing::check_record(bytes)
        .ok()
        .and_then(|()| Any::from_der(bytes).ok())
        .filter(|any| any.tag() == Tag::Sequence)
}

fn opaque_to_raw(extensions: &[Vec<u8>]) -> Result<Vec<Any>, HdbError> {
    extensions
        .iter()
        .enumerate()
        .map(|(i, bytes)| {
            der_sequence(bytes).ok_or_else(|| {
                error!(index = i, "extension is not a single DER SEQUENCE");
                HdbError::InvalidType(format!("extensions[{i}]"))
            })
        })
        .collect()
}

impl TryFrom<&HdbEntry> for RawHdbEntry {
    type Error = HdbError;

    fn try_from(entry: &HdbEntry) -> Result<Self, Self::Error> {
        let principal = principal_to_raw(&entry.principal, "principal")?;

        let (current_keys, historic_keys) = split_keys(entry);

        let keys = current_keys
            .iter()
            .map(key_to_raw)
            .collect::<Result<Vec<_>, _>>()?;

        let keysets = historic_keys
            .chunk_by(|a, b| a.kvno == b.kvno && a.set_time == b.set_time)
            .map(|run| {
                Ok(HdbKeyset {
                    kvno: run[0].kvno,
                    keys: run.iter().map(key_to_raw).collect::<Result<Vec<_>, _>>()?,
                    set_time: run[0].set_time.map(timestamp_to_raw).transpose()?,
                })
            })
            .collect::<Result<HdbExtKeySet, HdbError>>()?;

        let mut extensions = Vec::new();
        if let Some(aliases) = &entry.aliases {
            let raw = HdbExtAliases {
                case_insensitive: aliases.case_insensitive,
                aliases: aliases
                    .principals
                    .iter()
                    .enumerate()
                    .map(|(j, p)| principal_to_raw(p, &format!("aliases.principals[{j}]")))
                    .collect::<Result<Vec<_>, _>>()?,
            };
            extensions.push(build_extension(HdbExtensionType::Aliases, &raw)?);
        }
        if !keysets.is_empty() {
            trace!(keysets = keysets.len(), "writing hist-keys extension");
            extensions.push(build_extension(HdbExtensionType::HistKeys, &keysets)?);
        }
        extensions.extend(opaque_to_raw(&entry.extensions)?);
        check_opaque_extensions(entry)?;

        Ok(RawHdbEntry {
            principal: Some(principal),
            kvno: entry.kvno,
            keys,
            created_by: match &entry.created_by {
                Some(event) => event_to_raw(event, "created_by")?,
                None => unset_event()?,
            },
            modified_by: entry
                .modified_by
                .as_ref()
                .map(|e| event_to_raw(e, "modified_by"))
                .transpose()?,
            valid_start: entry.valid_start.map(timestamp_to_raw).transpose()?,
            valid_end: entry.valid_end.map(timestamp_to_raw).transpose()?,
            pw_end: entry.pw_end.map(timestamp_to_raw).transpose()?,
            max_life: entry.max_life,
            max_renew: entry.max_renew,
            flags: entry.flags,
            etypes: entry.etypes.clone(),
            generation: entry
                .generation
                .as_ref()
                .map(|g| {
                    Ok::<_, HdbError>(RawGeneration {
                        time: timestamp_to_raw(g.time)?,
                        usec: g.usec,
                        gen: g.gen,
                    })
                })
                .transpose()?,
            extensions: (!extensions.is_empty()).then_some(extensions),
            session_etypes: entry.session_etypes.clone(),
            unknown: unknown_to_raw(&entry.unknown_fields)?,
        })
    }
}
