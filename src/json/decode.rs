use super::RECORD_MEMBERS;
use crate::asn1::constants::{EncryptionType, PrincipalNameType};
use crate::asn1::hdb_entry::SESSION_ETYPES;
use crate::asn1::framing;
use crate::asn1::hdb_flags::HdbFlags;
use crate::entry::flags::flag_from_name;
use crate::entry::{
    check_opaque_extensions, der_sequence, Aliases, Event, Generation, HdbEntry, KeyEntry, Principal, Salt, Timestamp,
    UnknownField,
};
use crate::error::HdbError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use der::flagset::FlagSet;
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::{debug, error, instrument};

type Object = Map<String, Value>;

/// Settings for reading JSON written by older producers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Realm for a shorthand principal that has no `@REALM` part.
    pub default_realm: Option<String>,
}

/// Decode a JSON record with the default options.
pub fn decode_json(text: &str) -> Result<HdbEntry, HdbError> {
    decode_json_with(text, &DecodeOptions::default())
}

#[instrument(level = "debug", skip_all)]
pub fn decode_json_with(text: &str, options: &DecodeOptions) -> Result<HdbEntry, HdbError> {
    let value: Value = serde_json::from_str(text).map_err(|err| {
        error!(line = err.line(), column = err.column(), "unable to parse json");
        HdbError::MalformedJson
    })?;

    let Value::Object(record) = value else {
        error!("json record is not an object");
        return Err(HdbError::InvalidType("record".to_string()));
    };

    for name in record.keys() {
        if !RECORD_MEMBERS.contains(&name.as_str()) {
            debug!(member = %name, "ignoring unknown record member");
        }
    }

    let default_realm = options.default_realm.as_deref();

    let principal = present(&record, "principal")
        .ok_or_else(|| missing("principal"))
        .and_then(|value| principal_value(value, default_realm, "principal"))?;

    let keys = match present(&record, "keys") {
        None => Vec::new(),
        Some(Value::Array(keys)) => keys
            .iter()
            .enumerate()
            .map(|(i, key)| key_value(key, &format!("keys[{i}]")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(invalid("keys")),
    };

    let entry = HdbEntry {
        principal,
        kvno: optional(&record, "kvno", u32_value)?.unwrap_or(0),
        keys,
        created_by: optional(&record, "created_by", |v, f| event_value(v, default_realm, f))?,
        modified_by: optional(&record, "modified_by", |v, f| event_value(v, default_realm, f))?,
        valid_start: optional_timestamp(&record, "valid_start")?,
        valid_end: optional_timestamp(&record, "valid_end")?,
        pw_end: optional_timestamp(&record, "pw_end")?,
        max_life: optional(&record, "max_life", duration_value)?,
        max_renew: optional(&record, "max_renew", duration_value)?,
        flags: optional(&record, "flags", flags_value)?.unwrap_or_default(),
        etypes: optional(&record, "etypes", u32_list)?,
        generation: optional(&record, "generation", generation_value)?,
        session_etypes: optional(&record, "session_etypes", u32_list)?,
        aliases: optional(&record, "aliases", |v, f| aliases_value(v, default_realm, f))?,
        extensions: optional(&record, "extensions", extensions_value)?.unwrap_or_default(),
        unknown_fields: optional(&record, "unknown_fields", unknown_fields_value)?
            .unwrap_or_default(),
    };
    check_opaque_extensions(&entry)?;
    Ok(entry)
}

fn missing(field: &str) -> HdbError {
    error!(field, "required json member is missing");
    HdbError::MissingField(field.to_string())
}

fn invalid(field: &str) -> HdbError {
    error!(field, "json member has the wrong type or an out of range value");
    HdbError::InvalidType(field.to_string())
}

fn invalid_time(field: &str) -> HdbError {
    error!(field, "json member is not a valid timestamp or duration");
    HdbError::InvalidTimestamp(field.to_string())
}

/// A member that is absent or `null` is treated as not present.
fn present<'a>(object: &'a Object, name: &str) -> Option<&'a Value> {
    object.get(name).filter(|value| !value.is_null())
}

fn child(parent: &str, name: &str) -> String {
    format!("{parent}.{name}")
}

fn optional<T>(
    object: &Object,
    name: &str,
    decode: impl FnOnce(&Value, &str) -> Result<T, HdbError>,
) -> Result<Option<T>, HdbError> {
    present(object, name).map(|value| decode(value, name)).transpose()
}

fn optional_in<T>(
    object: &Object,
    parent: &str,
    name: &str,
    decode: impl FnOnce(&Value, &str) -> Result<T, HdbError>,
) -> Result<Option<T>, HdbError> {
    present(object, name)
        .map(|value| decode(value, &child(parent, name)))
        .transpose()
}

fn required_in<T>(
    object: &Object,
    parent: &str,
    name: &str,
    decode: impl FnOnce(&Value, &str) -> Result<T, HdbError>,
) -> Result<T, HdbError> {
    let field = child(parent, name);
    let value = present(object, name).ok_or_else(|| missing(&field))?;
    decode(value, &field)
}

fn object_value<'a>(value: &'a Value, field: &str) -> Result<&'a Object, HdbError> {
    value.as_object().ok_or_else(|| invalid(field))
}

/// A JSON number holding a whole value, so `3.0` is accepted and `3.5` is not.
fn integral(value: &Value) -> Option<i128> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .map(i128::from)
            .or_else(|| number.as_i64().map(i128::from))
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < 1e30)
                    .map(|f| f as i128)
            }),
        _ => None,
    }
}

fn u32_value(value: &Value, field: &str) -> Result<u32, HdbError> {
    integral(value)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| invalid(field))
}

fn i32_value(value: &Value, field: &str) -> Result<i32, HdbError> {
    integral(value)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| invalid(field))
}

fn bool_value(value: &Value, field: &str) -> Result<bool, HdbError> {
    value.as_bool().ok_or_else(|| invalid(field))
}

fn string_value<'a>(value: &'a Value, field: &str) -> Result<&'a str, HdbError> {
    value.as_str().ok_or_else(|| invalid(field))
}

fn bytes_value(value: &Value, field: &str) -> Result<Vec<u8>, HdbError> {
    let text = string_value(value, field)?;
    STANDARD.decode(text).map_err(|err| {
        error!(?err, field, "member is not valid base64");
        HdbError::InvalidType(field.to_string())
    })
}

fn u32_list(value: &Value, field: &str) -> Result<Vec<u32>, HdbError> {
    value
        .as_array()
        .ok_or_else(|| invalid(field))?
        .iter()
        .enumerate()
        .map(|(i, v)| u32_value(v, &format!("{field}[{i}]")))
        .collect()
}

fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

// Extended and basic ISO-8601 forms, with seconds or minutes. `%#z` takes
// `+01`, `+0100` and `+01:00`, the first being how PostgreSQL prints a
// timestamptz.
const OFFSET_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y%m%dT%H%M%S%.f%#z",
    "%Y%m%dT%H%M%#z",
];

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

/// Seconds since the epoch of an ISO-8601 date or date-time. A trailing `Z`,
/// no offset at all, or a bare date is UTC.
fn iso8601_seconds(text: &str) -> Option<i64> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.timestamp());
    }

    let (text, utc) = match text.strip_suffix(['Z', 'z']) {
        Some(rest) => (rest, true),
        None => (text, false),
    };

    if !utc {
        if let Some(time) = OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(text, format).ok())
        {
            return Some(time.timestamp());
        }
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|time| time.and_utc().timestamp())
}

/// Epoch seconds as a number or a decimal string, or an ISO-8601 / RFC 3339
/// date. Fractions of a second are dropped.
fn timestamp_value(value: &Value, field: &str) -> Result<Timestamp, HdbError> {
    let seconds = match value {
        Value::Number(_) => integral(value),
        Value::String(text) if is_decimal(text) => text.parse::<i128>().ok(),
        Value::String(text) => iso8601_seconds(text).map(i128::from),
        _ => None,
    };

    seconds
        .and_then(|s| u64::try_from(s).ok())
        .and_then(Timestamp::from_unix_seconds)
        .ok_or_else(|| invalid_time(field))
}

fn optional_timestamp(object: &Object, name: &str) -> Result<Option<Timestamp>, HdbError> {
    optional(object, name, timestamp_value)
}

/// Whole seconds as a number or a decimal string.
fn duration_value(value: &Value, field: &str) -> Result<u32, HdbError> {
    let seconds = match value {
        Value::Number(_) => integral(value),
        Value::String(text) if is_decimal(text) => text.parse::<i128>().ok(),
        _ => None,
    };
    seconds
        .and_then(|s| u32::try_from(s).ok())
        .ok_or_else(|| invalid_time(field))
}

fn flag_value(name: &str) -> Result<HdbFlags, HdbError> {
    flag_from_name(name).ok_or_else(|| {
        error!(flag = name, "unknown flag name");
        HdbError::UnknownFlag(name.to_string())
    })
}

/// `{"forwardable": true, ...}` or `["forwardable", ...]`.
fn flags_value(value: &Value, field: &str) -> Result<FlagSet<HdbFlags>, HdbError> {
    let mut flags = FlagSet::<HdbFlags>::default();
    match value {
        Value::Object(names) => {
            for (name, set) in names {
                let flag = flag_value(name)?;
                if bool_value(set, &child(field, name))? {
                    flags |= flag;
                }
            }
        }
        Value::Array(names) => {
            for (i, name) in names.iter().enumerate() {
                flags |= flag_value(string_value(name, &format!("{field}[{i}]"))?)?;
            }
        }
        _ => return Err(invalid(field)),
    }
    Ok(flags)
}

/// Either the `comp1/comp2@REALM` shorthand or the explicit object form.
fn principal_value(
    value: &Value,
    default_realm: Option<&str>,
    field: &str,
) -> Result<Principal, HdbError> {
    match value {
        Value::String(text) => Principal::parse(text, default_realm, field),
        Value::Object(object) => {
            let realm = required_in(object, field, "realm", |v, f| {
                string_value(v, f).map(str::to_string)
            })?;
            let components = required_in(object, field, "components", |v, f| {
                v.as_array()
                    .ok_or_else(|| invalid(f))?
                    .iter()
                    .enumerate()
                    .map(|(i, c)| string_value(c, &format!("{f}[{i}]")).map(str::to_string))
                    .collect::<Result<Vec<_>, _>>()
            })?;
            let name_type = optional_in(object, field, "name_type", i32_value)?
                .unwrap_or(PrincipalNameType::NtPrincipal.into());

            let principal = Principal {
                name_type,
                realm,
                components,
            };
            principal.validate(field)?;
            Ok(principal)
        }
        _ => Err(invalid(field)),
    }
}

fn enctype_value(value: &Value, field: &str) -> Result<i32, HdbError> {
    match value {
        Value::String(name) => EncryptionType::from_str(name)
            .map(i32::from)
            .map_err(|_| invalid(field)),
        _ => i32_value(value, field),
    }
}

fn salt_value(value: &Value, field: &str) -> Result<Salt, HdbError> {
    let object = object_value(value, field)?;
    Ok(Salt {
        salt_type: required_in(object, field, "type", u32_value)?,
        value: required_in(object, field, "value", bytes_value)?,
        opaque: optional_in(object, field, "opaque", bytes_value)?,
    })
}

fn key_value(value: &Value, field: &str) -> Result<KeyEntry, HdbError> {
    let object = object_value(value, field)?;
    Ok(KeyEntry {
        kvno: required_in(object, field, "kvno", u32_value)?,
        mkvno: optional_in(object, field, "mkvno", u32_value)?,
        enctype: required_in(object, field, "enctype", enctype_value)?,
        key: required_in(object, field, "key", bytes_value)?,
        salt: optional_in(object, field, "salt", salt_value)?,
        set_time: optional_in(object, field, "set_time", timestamp_value)?,
    })
}

fn event_value(value: &Value, default_realm: Option<&str>, field: &str) -> Result<Event, HdbError> {
    let object = object_value(value, field)?;
    Ok(Event {
        time: required_in(object, field, "time", timestamp_value)?,
        principal: optional_in(object, field, "principal", |v, f| {
            principal_value(v, default_realm, f)
        })?,
    })
}

fn generation_value(value: &Value, field: &str) -> Result<Generation, HdbError> {
    let object = object_value(value, field)?;
    Ok(Generation {
        time: required_in(object, field, "time", timestamp_value)?,
        usec: optional_in(object, field, "usec", u32_value)?.unwrap_or(0),
        gen: optional_in(object, field, "gen", u32_value)?.unwrap_or(0),
    })
}

fn aliases_value(
    value: &Value,
    default_realm: Option<&str>,
    field: &str,
) -> Result<Aliases, HdbError> {
    let object = object_value(value, field)?;
    let principals = required_in(object, field, "principals", |v, f| {
        v.as_array()
            .ok_or_else(|| invalid(f))?
            .iter()
            .enumerate()
            .map(|(i, p)| principal_value(p, default_realm, &format!("{f}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
    })?;
    Ok(Aliases {
        case_insensitive: optional_in(object, field, "case_insensitive", bool_value)?
            .unwrap_or(false),
        principals,
    })
}

/// Each element is the base64 of one DER `HDB-extension`.
fn extensions_value(value: &Value, field: &str) -> Result<Vec<Vec<u8>>, HdbError> {
    value
        .as_array()
        .ok_or_else(|| invalid(field))?
        .iter()
        .enumerate()
        .map(|(i, ext)| {
            let name = format!("{field}[{i}]");
            let bytes = bytes_value(ext, &name)?;
            match der_sequence(&bytes) {
                Some(_) => Ok(bytes),
                None => Err(invalid(&name)),
            }
        })
        .collect()
}

fn unknown_fields_value(value: &Value, field: &str) -> Result<Vec<UnknownField>, HdbError> {
    let mut previous = SESSION_ETYPES;
    value
        .as_array()
        .ok_or_else(|| invalid(field))?
        .iter()
        .enumerate()
        .map(|(i, element)| {
            let name = format!("{field}[{i}]");
            let object = object_value(element, &name)?;
            let tag = required_in(object, &name, "tag", u32_value)?;
            if tag <= previous {
                return Err(invalid(&child(&name, "tag")));
            }
            previous = tag;

            let constructed =
                optional_in(object, &name, "constructed", bool_value)?.unwrap_or(false);
            let value = required_in(object, &name, "value", bytes_value)?;
            if constructed && framing::check_contents(&value).is_err() {
                return Err(invalid(&child(&name, "value")));
            }
            Ok(UnknownField {
                tag,
                constructed,
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_json, decode_json_with, DecodeOptions};
    use crate::asn1::hdb_flags::HdbFlags;
    use crate::entry::{Principal, Timestamp};
    use crate::error::HdbError;

    const ALICE: &str = r#"{"principal":{"realm":"EXAMPLE.COM","components":["alice"]},"kvno":3,"keys":[{"kvno":3,"enctype":18,"key":"AAECAw=="}]}"#;

    fn with_member(member: &str) -> String {
        format!(
            r#"{{"principal":"alice@EXAMPLE.COM",{member}}}"#
        )
    }

    fn err(text: &str) -> HdbError {
        decode_json(text).expect_err("decode must fail")
    }

    #[test]
    fn json_decode_basic() {
        let _ = tracing_subscriber::fmt::try_init();
        let entry = decode_json(ALICE).expect("Failed to decode");
        assert_eq!(entry.principal, Principal::new("EXAMPLE.COM", &["alice"]));
        assert_eq!(entry.kvno, 3);
        assert_eq!(entry.keys.len(), 1);
        assert_eq!(entry.keys[0].kvno, 3);
        assert_eq!(entry.keys[0].enctype, 18);
        assert_eq!(entry.keys[0].key, vec![0, 1, 2, 3]);
        assert!(entry.keys[0].salt.is_none());
        assert!(entry.valid_start.is_none());
        assert!(entry.created_by.is_none());
        assert!(entry.flags.is_empty());
    }

    #[test]
    fn json_decode_principal_shapes() {
        let entry = decode_json(r#"{"principal":"host/kdc.example.com@EXAMPLE.COM"}"#)
            .expect("Failed to decode");
        assert_eq!(
            entry.principal,
            Principal::new("EXAMPLE.COM", &["host", "kdc.example.com"])
        );
        assert_eq!(entry.kvno, 0);
        assert!(entry.keys.is_empty());

        let entry = decode_json(
            r#"{"principal":{"name_type":3,"realm":"EXAMPLE.COM","components":["host","kdc"]}}"#,
        )
        .expect("Failed to decode");
        assert_eq!(entry.principal.name_type, 3);

        let options = DecodeOptions {
            default_realm: Some("EXAMPLE.COM".to_string()),
        };
        let entry = decode_json_with(r#"{"principal":"alice"}"#, &options)
            .expect("Failed to decode");
        assert_eq!(entry.principal, Principal::new("EXAMPLE.COM", &["alice"]));
        assert_eq!(
            err(r#"{"principal":"alice"}"#),
            HdbError::InvalidType("principal".to_string())
        );
    }

    #[test]
    fn json_decode_principal_errors() {
        assert_eq!(err(r#"{"kvno":1}"#), HdbError::MissingField("principal".to_string()));
        assert_eq!(
            err(r#"{"principal":null}"#),
            HdbError::MissingField("principal".to_string())
        );
        assert_eq!(
            err(r#"{"principal":{"components":["alice"]}}"#),
            HdbError::MissingField("principal.realm".to_string())
        );
        assert_eq!(
            err(r#"{"principal":{"realm":"","components":["alice"]}}"#),
            HdbError::InvalidType("principal.realm".to_string())
        );
        assert_eq!(
            err(r#"{"principal":{"realm":"EXAMPLE.COM","components":[]}}"#),
            HdbError::InvalidType("principal.components".to_string())
        );
        assert_eq!(
            err(r#"{"principal":42}"#),
            HdbError::InvalidType("principal".to_string())
        );
    }

    #[test]
    fn json_decode_kvno() {
        let entry = decode_json(&with_member(r#""kvno":3.0"#)).expect("Failed to decode");
        assert_eq!(entry.kvno, 3);
        let entry = decode_json(&with_member(r#""kvno":4294967295"#)).expect("Failed to decode");
        assert_eq!(entry.kvno, u32::MAX);

        for bad in [r#""kvno":3.5"#, r#""kvno":-1"#, r#""kvno":"3""#, r#""kvno":4294967296"#] {
            assert_eq!(
                err(&with_member(bad)),
                HdbError::InvalidType("kvno".to_string()),
                "{bad}"
            );
        }
    }

    #[test]
    fn json_decode_key_errors() {
        assert_eq!(
            err(&with_member(r#""keys":[{"kvno":1,"enctype":18,"key":"AAAA"},{"kvno":1,"enctype":18}]"#)),
            HdbError::MissingField("keys[1].key".to_string())
        );
        assert_eq!(
            err(&with_member(r#""keys":[{"enctype":18,"key":"AAAA"}]"#)),
            HdbError::MissingField("keys[0].kvno".to_string())
        );
        assert_eq!(
            err(&with_member(r#""keys":[{"kvno":1,"key":"AAAA"}]"#)),
            HdbError::MissingField("keys[0].enctype".to_string())
        );
        assert_eq!(
            err(&with_member(r#""keys":[{"kvno":1,"enctype":18,"key":"AAA"}]"#)),
            HdbError::InvalidType("keys[0].key".to_string())
        );
        assert_eq!(
            err(&with_member(r#""keys":[{"kvno":1,"enctype":"rot13","key":"AAAA"}]"#)),
            HdbError::InvalidType("keys[0].enctype".to_string())
        );
        assert_eq!(
            err(&with_member(r#""keys":{}"#)),
            HdbError::InvalidType("keys".to_string())
        );
    }

    #[test]
    fn json_decode_key_details() {
        let entry = decode_json(&with_member(
            r#""keys":[{"kvno":2,"mkvno":1,"enctype":"aes128-cts-hmac-sha1-96","key":"AAAA",
                "salt":{"type":3,"value":"c2FsdA==","opaque":null},"set_time":"1000"}]"#,
        ))
        .expect("Failed to decode");
        let key = &entry.keys[0];
        assert_eq!(key.mkvno, Some(1));
        assert_eq!(key.enctype, 17);
        let salt = key.salt.as_ref().expect("salt must be there");
        assert_eq!(salt.salt_type, 3);
        assert_eq!(salt.value, b"salt".to_vec());
        assert!(salt.opaque.is_none());
        assert_eq!(key.set_time, Timestamp::from_unix_seconds(1000));
    }

    #[test]
    fn json_decode_timestamps() {
        let cases = [
            (r#"1704067200"#, 1704067200),
            (r#""1704067200""#, 1704067200),
            (r#""2024-01-01T00:00:00Z""#, 1704067200),
            (r#""2024-01-01T01:00:00+01:00""#, 1704067200),
            (r#""2024-01-01T00:00:00.999Z""#, 1704067200),
            (r#""2024-01-01 00:00:00""#, 1704067200),
            (r#""2024-01-01T00:00:00""#, 1704067200),
            (r#""9999-12-31T23:59:59Z""#, 253402300799),
            (r#""2024-01-01 00:00:00+00""#, 1704067200),
            (r#""2024-01-01 00:00:00.25+00""#, 1704067200),
            (r#""2024-01-01T00:00:00+00""#, 1704067200),
            (r#""2024-01-01T00:00:00+0100""#, 1704063600),
            (r#""2024-01-01 01:00+01""#, 1704067200),
            (r#""2024-01-01T00:00Z""#, 1704067200),
            (r#""2024-01-01T00:00""#, 1704067200),
            (r#""20240101T000000Z""#, 1704067200),
            (r#""20240101T010000+0100""#, 1704067200),
            (r#""2024-01-01""#, 1704067200),
        ];
        for (text, expect) in cases {
            let entry = decode_json(&with_member(&format!(r#""valid_end":{text}"#)))
                .expect("Failed to decode");
            assert_eq!(
                entry.valid_end.map(|t| t.unix_seconds()),
                Some(expect),
                "{text}"
            );
        }

        let entry = decode_json(&with_member(r#""valid_end":null"#)).expect("Failed to decode");
        assert!(entry.valid_end.is_none());

        for bad in [
            r#""yesterday""#,
            r#"-1"#,
            r#"1.5"#,
            r#"253402300800"#,
            r#""1969-12-31T23:59:59Z""#,
            r#""2024-01-01T00:00:00+25""#,
            r#""2024-13-01""#,
            r#"true"#,
        ] {
            assert_eq!(
                err(&with_member(&format!(r#""pw_end":{bad}"#))),
                HdbError::InvalidTimestamp("pw_end".to_string()),
                "{bad}"
            );
        }

        assert_eq!(
            err(&with_member(r#""created_by":{"principal":"admin@EXAMPLE.COM"}"#)),
            HdbError::MissingField("created_by.time".to_string())
        );
        assert_eq!(
            err(&with_member(r#""generation":{"time":"soon"}"#)),
            HdbError::InvalidTimestamp("generation.time".to_string())
        );
    }

    #[test]
    fn json_decode_durations() {
        let entry = decode_json(&with_member(r#""max_life":36000,"max_renew":"604800""#))
            .expect("Failed to decode");
        assert_eq!(entry.max_life, Some(36000));
        assert_eq!(entry.max_renew, Some(604800));
        assert_eq!(
            err(&with_member(r#""max_life":"10h""#)),
            HdbError::InvalidTimestamp("max_life".to_string())
        );
        assert_eq!(
            err(&with_member(r#""max_renew":4294967296"#)),
            HdbError::InvalidTimestamp("max_renew".to_string())
        );
    }

    #[test]
    fn json_decode_flags() {
        let entry = decode_json(&with_member(
            r#""flags":{"forwardable":true,"client":true,"invalid":false}"#,
        ))
        .expect("Failed to decode");
        assert_eq!(entry.flags, HdbFlags::Forwardable | HdbFlags::Client);

        let entry = decode_json(&with_member(r#""flags":["server","do_not_store"]"#))
            .expect("Failed to decode");
        assert_eq!(entry.flags, HdbFlags::Server | HdbFlags::DoNotStore);

        assert_eq!(
            err(&with_member(r#""flags":{"forwardible":true}"#)),
            HdbError::UnknownFlag("forwardible".to_string())
        );
        assert_eq!(
            err(&with_member(r#""flags":["client","disabled"]"#)),
            HdbError::UnknownFlag("disabled".to_string())
        );
        assert_eq!(
            err(&with_member(r#""flags":{"client":1}"#)),
            HdbError::InvalidType("flags.client".to_string())
        );
    }

    #[test]
    fn json_decode_extras() {
        let entry = decode_json(&with_member(
            r#""aliases":{"case_insensitive":true,"principals":["al@EXAMPLE.COM"]},
               "extensions":["MAOAAQE="],
               "unknown_fields":[{"tag":20,"constructed":true,"value":"AgEH"},{"tag":21,"value":"yv4="}],
               "some_future_member":{"x":1}"#,
        ))
        .expect("Failed to decode");
        let aliases = entry.aliases.expect("aliases must be there");
        assert!(aliases.case_insensitive);
        assert_eq!(aliases.principals, vec![Principal::new("EXAMPLE.COM", &["al"])]);
        assert_eq!(entry.extensions, vec![vec![0x30, 0x03, 0x80, 0x01, 0x01]]);
        assert_eq!(entry.unknown_fields.len(), 2);
        assert_eq!(entry.unknown_fields[1].value, vec![0xca, 0xfe]);
        assert!(!entry.unknown_fields[1].constructed);

        assert_eq!(
            err(&with_member(r#""extensions":["AgEA"]"#)),
            HdbError::InvalidType("extensions[0]".to_string())
        );
        assert_eq!(
            err(&with_member(r#""unknown_fields":[{"tag":12,"value":""}]"#)),
            HdbError::InvalidType("unknown_fields[0].tag".to_string())
        );
        assert_eq!(
            err(&with_member(r#""unknown_fields":[{"tag":30,"value":""},{"tag":20,"value":""}]"#)),
            HdbError::InvalidType("unknown_fields[1].tag".to_string())
        );
    }

    #[test]
    fn json_decode_extension_read_as_aliases() {
        // HDB-extension { mandatory FALSE, aliases [6] { FALSE, {} } }
        let member = r#""extensions":["MBSgAwEBAKENpgswCaADAQEAoQIwAA=="]"#;
        assert_eq!(
            err(&with_member(member)),
            HdbError::InvalidType("extensions[0]".to_string())
        );

        let entry = decode_json(&with_member(&format!(
            r#""aliases":{{"principals":["al@EXAMPLE.COM"]}},{member}"#
        )))
        .expect("Failed to decode");
        assert_eq!(entry.extensions.len(), 1);
    }

    #[test]
    fn json_decode_malformed() {
        assert_eq!(err("{"), HdbError::MalformedJson);
        assert_eq!(err(""), HdbError::MalformedJson);
        assert_eq!(err("[]"), HdbError::InvalidType("record".to_string()));
    }
}
