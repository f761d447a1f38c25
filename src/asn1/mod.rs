pub mod constants;
pub mod event;
pub mod framing;
pub mod generation;
pub mod hdb_entry;
pub mod hdb_extension;
pub mod hdb_flags;
pub mod hdb_key;
pub mod kerberos_string;
pub mod kerberos_time;
pub mod principal;
