// #![deny(warnings)]

#![warn(unused_extern_crates)]
// Enable some groups of clippy lints.
#![deny(clippy::suspicious)]
#![deny(clippy::perf)]
// Specific lints to enforce.
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]
#![deny(clippy::disallowed_types)]
#![deny(clippy::manual_let_else)]
#![allow(clippy::unreachable)]

mod asn1;
pub mod entry;
pub mod error;
pub mod json;
pub mod transport;

pub use crate::asn1::constants::{EncryptionType, HdbExtensionType, PrincipalNameType};
pub use crate::asn1::hdb_flags::HdbFlags;
pub use crate::entry::{
    decode_binary, encode_binary, Aliases, Event, Generation, HdbEntry, KeyEntry, Principal, Salt,
    Timestamp, UnknownField,
};
pub use crate::error::HdbError;
pub use crate::json::{decode_json, decode_json_with, encode_json, encode_json_pretty, DecodeOptions};
pub use crate::transport::{decode_transport, encode_transport};
pub use der::flagset::FlagSet;

use tracing::{debug, instrument};

/// JSON text to the base64 transport form of the DER record.
#[instrument(level = "debug", skip_all)]
pub fn json2hdb(text: &str) -> Result<String, HdbError> {
    json2hdb_with(text, &DecodeOptions::default())
}

pub fn json2hdb_with(text: &str, options: &DecodeOptions) -> Result<String, HdbError> {
    let entry = decode_json_with(text, options)?;
    let der = encode_binary(&entry)?;
    Ok(encode_transport(&der))
}

/// Base64 transport text to canonical JSON.
#[instrument(level = "debug", skip_all)]
pub fn hdb2json(text: &str) -> Result<String, HdbError> {
    transport_to_entry(text).map(|entry| encode_json(&entry))
}

/// As [`hdb2json`], with the JSON indented.
#[instrument(level = "debug", skip_all)]
pub fn hdb2json_pretty(text: &str) -> Result<String, HdbError> {
    transport_to_entry(text).map(|entry| encode_json_pretty(&entry))
}

fn transport_to_entry(text: &str) -> Result<HdbEntry, HdbError> {
    let der = decode_transport(text)?;
    let entry = decode_binary(&der)?;
    debug!(principal = %entry.principal, keys = entry.keys.len(), "decoded entry");
    Ok(entry)
}
