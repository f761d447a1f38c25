//! The pghdb JSON form of an HDB entry.

mod decode;
mod encode;

pub use self::decode::{decode_json, decode_json_with, DecodeOptions};
pub use self::encode::{encode_json, encode_json_pretty};

/// Top level members, in the order the encoder writes them.
pub(crate) const RECORD_MEMBERS: [&str; 17] = [
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
    "session_etypes",
    "aliases",
    "extensions",
    "unknown_fields",
];
