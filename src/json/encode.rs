use crate::entry::flags::FLAG_NAMES;
use crate::entry::{Event, HdbEntry, KeyEntry, Principal, Timestamp};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Map, Value};
use tracing::instrument;

/// Canonical compact JSON. Every member is written, unset ones as `null`.
#[instrument(level = "debug", skip_all)]
pub fn encode_json(entry: &HdbEntry) -> String {
    to_value(entry).to_string()
}

/// As [`encode_json`], indented for people to read.
#[instrument(level = "debug", skip_all)]
pub fn encode_json_pretty(entry: &HdbEntry) -> String {
    format!("{:#}", to_value(entry))
}

fn timestamp(time: Option<Timestamp>) -> Value {
    match time {
        Some(time) => Value::from(time.unix_seconds()),
        None => Value::Null,
    }
}

fn bytes(value: &[u8]) -> Value {
    Value::String(STANDARD.encode(value))
}

fn principal(principal: &Principal) -> Value {
    json!({
        "name_type": principal.name_type,
        "realm": principal.realm,
        "components": principal.components,
    })
}

fn event(event: Option<&Event>) -> Value {
    match event {
        Some(event) => json!({
            "time": event.time.unix_seconds(),
            "principal": event.principal.as_ref().map(principal),
        }),
        None => Value::Null,
    }
}

fn key(key: &KeyEntry) -> Value {
    json!({
        "kvno": key.kvno,
        "mkvno": key.mkvno,
        "enctype": key.enctype,
        "key": bytes(&key.key),
        "salt": key.salt.as_ref().map(|salt| json!({
            "type": salt.salt_type,
            "value": bytes(&salt.value),
            "opaque": salt.opaque.as_deref().map(bytes),
        })),
        "set_time": timestamp(key.set_time),
    })
}

fn to_value(entry: &HdbEntry) -> Value {
    let flags: Map<String, Value> = FLAG_NAMES
        .iter()
        .map(|(flag, name)| (name.to_string(), Value::Bool(entry.flags.contains(*flag))))
        .collect();

    json!({
        "principal": principal(&entry.principal),
        "kvno": entry.kvno,
        "keys": entry.keys.iter().map(key).collect::<Vec<_>>(),
        "created_by": event(entry.created_by.as_ref()),
        "modified_by": event(entry.modified_by.as_ref()),
        "valid_start": timestamp(entry.valid_start),
        "valid_end": timestamp(entry.valid_end),
        "pw_end": timestamp(entry.pw_end),
        "max_life": entry.max_life,
        "max_renew": entry.max_renew,
        "flags": flags,
        "etypes": entry.etypes,
        "generation": entry.generation.as_ref().map(|g| json!({
            "time": g.time.unix_seconds(),
            "usec": g.usec,
            "gen": g.gen,
        })),
        "session_etypes": entry.session_etypes,
        "aliases": entry.aliases.as_ref().map(|a| json!({
            "case_insensitive": a.case_insensitive,
            "principals": a.principals.iter().map(principal).collect::<Vec<_>>(),
        })),
        "extensions": entry.extensions.iter().map(|e| bytes(e)).collect::<Vec<_>>(),
        "unknown_fields": entry.unknown_fields.iter().map(|u| json!({
            "tag": u.tag,
            "constructed": u.constructed,
            "value": bytes(&u.value),
        })).collect::<Vec<_>>(),
    })
}
